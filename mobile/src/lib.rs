// strideguard-mobile — Native mobile surface for iOS and Android
// This crate exports the permission core API to the platform shells

pub use strideguard_core::*;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use strideguard_core::platform::scripted::{
        RecordingNavigator, ScriptedBridge, ScriptedDialog,
    };

    fn platform_controller(dialogs: ScriptedDialog) -> Arc<PermissionController> {
        Arc::new(PermissionController::new(
            PlatformDescriptor::android(31),
            Arc::new(ScriptedBridge::approving()),
            Arc::new(dialogs),
            Arc::new(RecordingNavigator::new()),
        ))
    }

    #[tokio::test]
    async fn test_mobile_permission_screen_flow() {
        let controller = platform_controller(ScriptedDialog::faulting());

        assert_eq!(
            controller.record(PermissionKind::Location).status,
            PermissionStatus::NotRequested
        );

        let status = controller.request(PermissionKind::Location).await.unwrap();
        assert_eq!(status, PermissionStatus::Granted);
        assert!(controller.record(PermissionKind::Location).is_satisfied());
    }

    #[tokio::test]
    async fn test_mobile_lifecycle_attach_detach() {
        let controller = platform_controller(ScriptedDialog::answering([
            DialogChoice::OpenSettings,
            DialogChoice::ConfirmedDisabled,
        ]));

        let lifecycle = AppLifecycle::new();
        controller.watch_lifecycle(&lifecycle);

        controller
            .request(PermissionKind::BackgroundRunExemption)
            .await
            .unwrap();
        assert!(controller.pending_return());

        controller.detach_lifecycle();
    }

    #[tokio::test]
    async fn test_mobile_snapshot_for_ui() {
        let controller = platform_controller(ScriptedDialog::faulting());
        controller.deny(PermissionKind::DevicePairing);

        let json = controller.snapshot().to_json().unwrap();
        assert!(json.contains("Denied"));
    }
}
