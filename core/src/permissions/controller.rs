//! Permission orchestration
//!
//! `PermissionController` is the single canonical driver for all four
//! permission kinds: it calls the platform capability bridge, applies
//! version gating, runs the battery-exemption settings round-trip, and
//! writes every outcome into the `PermissionRegistry`.
//!
//! One controller instance per permission screen. Platform code constructs
//! it with the collaborator seams from `crate::platform`, attaches it to the
//! app lifecycle, and reads records (or the JSON snapshot) to render.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::permissions::prompts;
use crate::permissions::registry::{PermissionKind, PermissionRecord, PermissionRegistry, PermissionStatus};
use crate::platform::bridge::{
    CapabilityBridge, CapabilityId, ConfirmationDialog, DialogChoice, SettingsNavigator,
};
use crate::platform::descriptor::{OsFamily, PlatformDescriptor};
use crate::platform::lifecycle::{LifecycleEvent, LifecycleEventSource};

// ============================================================================
// VERSION GATES
// ============================================================================

/// Activity recognition became a runtime permission at API 29
pub const MIN_ACTIVITY_RECOGNITION_VERSION: u32 = 29;

/// Bluetooth scan/connect became runtime permissions at API 31
pub const MIN_DEVICE_PAIRING_VERSION: u32 = 31;

/// Device pairing is all-or-nothing across these two sub-capabilities
const PAIRING_CAPABILITIES: [CapabilityId; 2] =
    [CapabilityId::BluetoothScan, CapabilityId::BluetoothConnect];

// ============================================================================
// ERROR TYPES
// ============================================================================

/// The only failure that crosses the controller boundary
///
/// Collaborator faults are absorbed into the `Error` status on the affected
/// record; user refusal and version-gated skips are ordinary statuses
/// (`Denied`, `NotRequired`), not errors.
#[derive(Debug, Clone, Error)]
pub enum PermissionError {
    /// Request aborted before touching the bridge; status unchanged.
    /// Surfaced to the user as a one-time advisory.
    #[error("Permission flow requires Android; this device reports {0}")]
    PlatformUnsupported(OsFamily),
}

// ============================================================================
// CONTROLLER
// ============================================================================

/// Drives permission requests and owns the canonical state
pub struct PermissionController {
    platform: PlatformDescriptor,
    bridge: Arc<dyn CapabilityBridge>,
    dialogs: Arc<dyn ConfirmationDialog>,
    navigator: Arc<dyn SettingsNavigator>,
    registry: Arc<RwLock<PermissionRegistry>>,
    /// Armed while a battery-settings excursion is outstanding. Single
    /// writer discipline: only the battery request and the foreground
    /// handler touch it. The `swap` on the foreground path collapses
    /// re-entrant transitions into at most one serviced excursion.
    pending_return: AtomicBool,
    lifecycle_task: RwLock<Option<JoinHandle<()>>>,
}

impl PermissionController {
    pub fn new(
        platform: PlatformDescriptor,
        bridge: Arc<dyn CapabilityBridge>,
        dialogs: Arc<dyn ConfirmationDialog>,
        navigator: Arc<dyn SettingsNavigator>,
    ) -> Self {
        Self {
            platform,
            bridge,
            dialogs,
            navigator,
            registry: Arc::new(RwLock::new(PermissionRegistry::new())),
            pending_return: AtomicBool::new(false),
            lifecycle_task: RwLock::new(None),
        }
    }

    // ------------------------------------------------------------------------
    // STATE ACCESS
    // ------------------------------------------------------------------------

    /// Current record for a kind
    pub fn record(&self, kind: PermissionKind) -> PermissionRecord {
        self.registry.read().get(kind)
    }

    /// Clone of the full registry for rendering
    pub fn snapshot(&self) -> PermissionRegistry {
        self.registry.read().clone()
    }

    /// Whether a battery-settings excursion is outstanding
    pub fn pending_return(&self) -> bool {
        self.pending_return.load(Ordering::SeqCst)
    }

    /// Write a status, applying the deny-affordance lock policy: satisfied
    /// statuses unlock, an explicit refusal locks, everything else keeps
    /// the current lock.
    fn apply(&self, kind: PermissionKind, status: PermissionStatus) -> PermissionStatus {
        let mut registry = self.registry.write();
        let deny_locked = match status {
            s if s.is_satisfied() => false,
            PermissionStatus::Denied => true,
            _ => registry.get(kind).deny_locked,
        };
        registry.set(kind, status, deny_locked);
        status
    }

    // ------------------------------------------------------------------------
    // REQUEST / DENY
    // ------------------------------------------------------------------------

    /// Request a permission from the platform
    ///
    /// Resolves to the new status for the kind. The caller is responsible
    /// for not re-invoking a request for the same kind while one is still
    /// in flight.
    pub async fn request(
        &self,
        kind: PermissionKind,
    ) -> Result<PermissionStatus, PermissionError> {
        match kind {
            PermissionKind::Location => {
                self.request_capability(kind, CapabilityId::FineLocation, None)
                    .await
            }
            PermissionKind::ActivityRecognition => {
                self.request_capability(
                    kind,
                    CapabilityId::ActivityRecognition,
                    Some(MIN_ACTIVITY_RECOGNITION_VERSION),
                )
                .await
            }
            PermissionKind::DevicePairing => self.request_device_pairing().await,
            PermissionKind::BackgroundRunExemption => {
                Ok(self.request_background_exemption().await)
            }
        }
    }

    /// Explicit user opt-out without a platform prompt
    ///
    /// Idempotent: repeating it leaves the record at `Denied` with the deny
    /// affordance locked.
    pub fn deny(&self, kind: PermissionKind) -> PermissionStatus {
        info!("Permission denied by user: {}", kind);
        self.apply(kind, PermissionStatus::Denied)
    }

    /// Single-capability request with optional version gate
    async fn request_capability(
        &self,
        kind: PermissionKind,
        capability: CapabilityId,
        min_version: Option<u32>,
    ) -> Result<PermissionStatus, PermissionError> {
        if !self.platform.is_android() {
            warn!(
                "Capability request for {} aborted: unsupported platform {}",
                kind, self.platform.os_family
            );
            return Err(PermissionError::PlatformUnsupported(self.platform.os_family));
        }

        if let Some(min) = min_version {
            if !self.platform.supports(min) {
                info!(
                    "{} not required below API {} (device is {})",
                    kind, min, self.platform.os_version
                );
                return Ok(self.apply(kind, PermissionStatus::NotRequired));
            }
        }

        let prompt = prompts::prompt_for(capability);
        let status = match self.bridge.request(capability, &prompt).await {
            Ok(reply) if reply.is_approved() => PermissionStatus::Granted,
            Ok(_) => PermissionStatus::Denied,
            Err(err) => {
                warn!("Capability request for {} faulted: {}", capability, err);
                PermissionStatus::Error
            }
        };

        info!("{} request resolved: {}", kind, status);
        Ok(self.apply(kind, status))
    }

    /// Scan + connect requested atomically; any refusal denies the whole
    /// kind (partial grants are not modeled)
    async fn request_device_pairing(&self) -> Result<PermissionStatus, PermissionError> {
        let kind = PermissionKind::DevicePairing;

        if !self.platform.is_android() {
            warn!(
                "Capability request for {} aborted: unsupported platform {}",
                kind, self.platform.os_family
            );
            return Err(PermissionError::PlatformUnsupported(self.platform.os_family));
        }

        if !self.platform.supports(MIN_DEVICE_PAIRING_VERSION) {
            info!(
                "{} not required below API {} (device is {})",
                kind, MIN_DEVICE_PAIRING_VERSION, self.platform.os_version
            );
            return Ok(self.apply(kind, PermissionStatus::NotRequired));
        }

        let status = match self.bridge.request_multiple(&PAIRING_CAPABILITIES).await {
            Ok(replies) => {
                let all_approved = PAIRING_CAPABILITIES.iter().all(|capability| {
                    replies
                        .get(capability)
                        .map(|reply| reply.is_approved())
                        .unwrap_or(false)
                });
                if all_approved {
                    PermissionStatus::Granted
                } else {
                    PermissionStatus::Denied
                }
            }
            Err(err) => {
                warn!("Capability request for {} faulted: {}", kind, err);
                PermissionStatus::Error
            }
        };

        info!("{} request resolved: {}", kind, status);
        Ok(self.apply(kind, status))
    }

    // ------------------------------------------------------------------------
    // BATTERY EXEMPTION ROUND-TRIP
    // ------------------------------------------------------------------------

    /// Start the battery-exemption settings excursion
    ///
    /// The platform offers no grant/deny API for the exemption, so this only
    /// asks whether to navigate to system settings. Proceeding arms the
    /// pending-return flag; the actual outcome is attested by the user after
    /// the next foreground transition.
    async fn request_background_exemption(&self) -> PermissionStatus {
        let kind = PermissionKind::BackgroundRunExemption;
        let choices = [DialogChoice::Cancel, DialogChoice::OpenSettings];

        match self
            .dialogs
            .present(
                prompts::BATTERY_PROMPT_TITLE,
                prompts::BATTERY_PROMPT_MESSAGE,
                &choices,
            )
            .await
        {
            Ok(DialogChoice::OpenSettings) => {
                let status = self.apply(kind, PermissionStatus::AwaitingExternalConfirmation);
                self.pending_return.store(true, Ordering::SeqCst);
                info!("Battery exemption excursion started, awaiting return");
                self.navigator.open_system_settings();
                status
            }
            Ok(_) => {
                info!("Battery exemption excursion cancelled");
                self.apply(kind, PermissionStatus::Cancelled)
            }
            Err(err) => {
                warn!("Battery exemption prompt faulted: {}", err);
                self.apply(kind, PermissionStatus::Error)
            }
        }
    }

    /// Handle an app foreground transition
    ///
    /// No-op unless a settings excursion is outstanding. Otherwise asks the
    /// user to attest the outcome: "yes" lands in `Configured` (advisory,
    /// never verified against the actual system setting — the platform
    /// exposes no such query); "no" re-arms the excursion and navigates to
    /// settings again. Returns whether an excursion was serviced.
    pub async fn on_foreground_transition(&self) -> bool {
        // Disarm first so a second foreground event during the dialog
        // collapses into this excursion instead of queueing another.
        if !self.pending_return.swap(false, Ordering::SeqCst) {
            return false;
        }

        let kind = PermissionKind::BackgroundRunExemption;
        let choices = [DialogChoice::RetrySettings, DialogChoice::ConfirmedDisabled];

        match self
            .dialogs
            .present(
                prompts::BATTERY_CONFIRM_TITLE,
                prompts::BATTERY_CONFIRM_MESSAGE,
                &choices,
            )
            .await
        {
            Ok(DialogChoice::ConfirmedDisabled) => {
                info!("Battery exemption attested by user");
                self.apply(kind, PermissionStatus::Configured);
            }
            Ok(_) => {
                info!("Battery exemption not confirmed, reopening settings");
                self.apply(kind, PermissionStatus::AwaitingExternalConfirmation);
                self.pending_return.store(true, Ordering::SeqCst);
                self.navigator.open_system_settings();
            }
            Err(err) => {
                warn!("Battery attestation prompt faulted: {}", err);
                self.apply(kind, PermissionStatus::Error);
            }
        }
        true
    }

    // ------------------------------------------------------------------------
    // LIFECYCLE SUBSCRIPTION
    // ------------------------------------------------------------------------

    /// Subscribe to app lifecycle events
    ///
    /// Spawns a listener task that forwards foreground transitions into
    /// `on_foreground_transition`. The task holds only a weak reference and
    /// is aborted by `detach_lifecycle` or when the controller drops.
    pub fn watch_lifecycle(self: &Arc<Self>, source: &dyn LifecycleEventSource) {
        let mut rx = source.subscribe();
        let controller = Arc::downgrade(self);

        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(LifecycleEvent::Foregrounded) => {
                        let Some(controller) = controller.upgrade() else {
                            break;
                        };
                        controller.on_foreground_transition().await;
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Lifecycle listener lagged, skipped {} events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        if let Some(previous) = self.lifecycle_task.write().replace(handle) {
            previous.abort();
        }
    }

    /// Stop listening for lifecycle events
    pub fn detach_lifecycle(&self) {
        if let Some(handle) = self.lifecycle_task.write().take() {
            handle.abort();
        }
    }
}

impl Drop for PermissionController {
    fn drop(&mut self) {
        self.detach_lifecycle();
    }
}

// ============================================================================
// TESTS
// ============================================================================
