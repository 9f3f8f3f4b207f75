// End-to-end permission flows driven the way the platform shell drives them:
// through the public controller surface and the lifecycle broadcast.

use std::sync::Arc;
use std::time::Duration;

use strideguard_core::platform::scripted::{RecordingNavigator, ScriptedBridge, ScriptedDialog};
use strideguard_core::{
    AppLifecycle, CapabilityId, CapabilityReply, DialogChoice, PermissionController,
    PermissionKind, PermissionStatus, PlatformDescriptor,
};

fn controller_with(
    platform: PlatformDescriptor,
    bridge: Arc<ScriptedBridge>,
    dialogs: Arc<ScriptedDialog>,
    navigator: Arc<RecordingNavigator>,
) -> Arc<PermissionController> {
    Arc::new(PermissionController::new(platform, bridge, dialogs, navigator))
}

async fn wait_until(timeout: Duration, condition: impl Fn() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}

#[tokio::test]
async fn full_screen_walkthrough_on_api_31() {
    let bridge = Arc::new(ScriptedBridge::approving());
    let dialogs = Arc::new(ScriptedDialog::answering([
        DialogChoice::OpenSettings,
        DialogChoice::ConfirmedDisabled,
    ]));
    let navigator = Arc::new(RecordingNavigator::new());
    let controller = controller_with(
        PlatformDescriptor::android(31),
        bridge.clone(),
        dialogs,
        navigator,
    );

    for kind in [
        PermissionKind::Location,
        PermissionKind::ActivityRecognition,
        PermissionKind::DevicePairing,
    ] {
        let status = controller.request(kind).await.unwrap();
        assert_eq!(status, PermissionStatus::Granted, "{kind}");
    }

    controller
        .request(PermissionKind::BackgroundRunExemption)
        .await
        .unwrap();
    controller.on_foreground_transition().await;

    // Every card now shows the satisfied badge
    for kind in PermissionKind::ALL {
        assert!(controller.record(kind).is_satisfied(), "{kind}");
    }

    // Two single prompts plus one paired prompt
    assert_eq!(bridge.single_requests().len(), 2);
    assert_eq!(
        bridge.multi_requests(),
        vec![vec![CapabilityId::BluetoothScan, CapabilityId::BluetoothConnect]]
    );
}

#[tokio::test]
async fn battery_round_trip_through_lifecycle_broadcast() {
    let dialogs = Arc::new(ScriptedDialog::answering([
        DialogChoice::OpenSettings,
        DialogChoice::ConfirmedDisabled,
    ]));
    let navigator = Arc::new(RecordingNavigator::new());
    let controller = controller_with(
        PlatformDescriptor::android(31),
        Arc::new(ScriptedBridge::approving()),
        dialogs,
        navigator.clone(),
    );

    let lifecycle = AppLifecycle::new();
    controller.watch_lifecycle(&lifecycle);

    let status = controller
        .request(PermissionKind::BackgroundRunExemption)
        .await
        .unwrap();
    assert_eq!(status, PermissionStatus::AwaitingExternalConfirmation);
    assert_eq!(navigator.open_count(), 1);

    // Backgrounded is ignored; the foreground return drives the attestation
    lifecycle.notify_backgrounded();
    lifecycle.notify_foregrounded();

    let configured = wait_until(Duration::from_secs(2), || {
        controller.record(PermissionKind::BackgroundRunExemption).status
            == PermissionStatus::Configured
    })
    .await;
    assert!(configured);
    assert!(!controller.pending_return());
}

#[tokio::test]
async fn battery_retry_loop_reopens_settings_until_attested() {
    let dialogs = Arc::new(ScriptedDialog::answering([
        DialogChoice::OpenSettings,
        DialogChoice::RetrySettings,
        DialogChoice::ConfirmedDisabled,
    ]));
    let navigator = Arc::new(RecordingNavigator::new());
    let controller = controller_with(
        PlatformDescriptor::android(31),
        Arc::new(ScriptedBridge::approving()),
        dialogs.clone(),
        navigator.clone(),
    );

    let lifecycle = AppLifecycle::new();
    controller.watch_lifecycle(&lifecycle);

    controller
        .request(PermissionKind::BackgroundRunExemption)
        .await
        .unwrap();

    // First return: user says no, settings open again
    lifecycle.notify_foregrounded();
    assert!(wait_until(Duration::from_secs(2), || navigator.open_count() == 2).await);
    assert_eq!(
        controller.record(PermissionKind::BackgroundRunExemption).status,
        PermissionStatus::AwaitingExternalConfirmation
    );
    assert!(controller.pending_return());

    // Second return: user attests
    lifecycle.notify_foregrounded();
    assert!(
        wait_until(Duration::from_secs(2), || {
            controller.record(PermissionKind::BackgroundRunExemption).status
                == PermissionStatus::Configured
        })
        .await
    );
    assert_eq!(dialogs.present_count(), 3);
}

#[tokio::test]
async fn detached_controller_ignores_lifecycle_events() {
    let dialogs = Arc::new(ScriptedDialog::answering([DialogChoice::OpenSettings]));
    let controller = controller_with(
        PlatformDescriptor::android(31),
        Arc::new(ScriptedBridge::approving()),
        dialogs.clone(),
        Arc::new(RecordingNavigator::new()),
    );

    let lifecycle = AppLifecycle::new();
    controller.watch_lifecycle(&lifecycle);
    controller
        .request(PermissionKind::BackgroundRunExemption)
        .await
        .unwrap();

    controller.detach_lifecycle();
    lifecycle.notify_foregrounded();
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Excursion still outstanding; no attestation dialog was shown
    assert!(controller.pending_return());
    assert_eq!(dialogs.present_count(), 1);
    assert_eq!(
        controller.record(PermissionKind::BackgroundRunExemption).status,
        PermissionStatus::AwaitingExternalConfirmation
    );
}

#[tokio::test]
async fn deny_lock_round_trip_across_kinds() {
    let bridge = Arc::new(ScriptedBridge::approving());
    bridge.set_reply(CapabilityId::BluetoothConnect, CapabilityReply::Refused);
    let controller = controller_with(
        PlatformDescriptor::android(31),
        bridge,
        Arc::new(ScriptedDialog::faulting()),
        Arc::new(RecordingNavigator::new()),
    );

    // Deny, then re-request: lock clears exactly when the outcome is satisfied
    controller.deny(PermissionKind::Location);
    let status = controller.request(PermissionKind::Location).await.unwrap();
    assert_eq!(status, PermissionStatus::Granted);
    assert!(!controller.record(PermissionKind::Location).deny_locked);

    // Pairing re-request lands in Denied (partial grant) and stays locked
    controller.deny(PermissionKind::DevicePairing);
    let status = controller.request(PermissionKind::DevicePairing).await.unwrap();
    assert_eq!(status, PermissionStatus::Denied);
    assert!(controller.record(PermissionKind::DevicePairing).deny_locked);
}

#[tokio::test]
async fn registry_snapshot_serializes_for_the_shell() {
    let controller = controller_with(
        PlatformDescriptor::android(31),
        Arc::new(ScriptedBridge::approving()),
        Arc::new(ScriptedDialog::faulting()),
        Arc::new(RecordingNavigator::new()),
    );

    controller.request(PermissionKind::Location).await.unwrap();
    let json = controller.snapshot().to_json().unwrap();

    assert!(json.contains("Granted"));
    assert!(json.contains("BackgroundRunExemption"));
}
