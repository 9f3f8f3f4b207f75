// StrideGuard Core — Permission Spine
//
// One canonical controller/registry pair for the whole permission screen.
// If a status transition can't be expressed here, it doesn't belong in the
// rendering layer either.

pub mod permissions;
pub mod platform;

pub use permissions::{
    PermissionController, PermissionError, PermissionKind, PermissionRecord, PermissionRegistry,
    PermissionStatus, MIN_ACTIVITY_RECOGNITION_VERSION, MIN_DEVICE_PAIRING_VERSION,
};
pub use platform::{
    AppLifecycle, BridgeError, CapabilityBridge, CapabilityId, CapabilityReply,
    ConfirmationDialog, DialogChoice, LifecycleEvent, LifecycleEventSource, OsFamily,
    PlatformDescriptor, PromptSpec, SettingsNavigator,
};

/// Initialize tracing output (idempotent)
///
/// Platform code calls this once at process start; repeated calls are
/// harmless. Honors `RUST_LOG`, defaulting to `info`.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}
