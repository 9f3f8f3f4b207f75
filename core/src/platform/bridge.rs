//! Collaborator seams between the permission core and the platform shell
//!
//! The core never talks to the Android permission API, the settings intent
//! or the alert dialog directly. Platform code (or a test harness)
//! implements these traits and hands them to `PermissionController`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Faults raised by the platform collaborators
///
/// These never cross the controller boundary: the controller absorbs them
/// into the `Error` status on the affected record.
#[derive(Debug, Clone, Error)]
pub enum BridgeError {
    #[error("Capability service fault: {0}")]
    CapabilityFault(String),
    #[error("Dialog presentation failed: {0}")]
    DialogFault(String),
}

// ============================================================================
// CAPABILITY TYPES
// ============================================================================

/// Platform capability identifiers the core can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapabilityId {
    FineLocation,
    ActivityRecognition,
    BluetoothScan,
    BluetoothConnect,
}

impl fmt::Display for CapabilityId {
    /// Renders the Android manifest permission name
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityId::FineLocation => write!(f, "android.permission.ACCESS_FINE_LOCATION"),
            CapabilityId::ActivityRecognition => {
                write!(f, "android.permission.ACTIVITY_RECOGNITION")
            }
            CapabilityId::BluetoothScan => write!(f, "android.permission.BLUETOOTH_SCAN"),
            CapabilityId::BluetoothConnect => write!(f, "android.permission.BLUETOOTH_CONNECT"),
        }
    }
}

/// Outcome of a single capability request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapabilityReply {
    Approved,
    Refused,
}

impl CapabilityReply {
    pub fn is_approved(&self) -> bool {
        *self == CapabilityReply::Approved
    }
}

/// Rationale copy shown alongside a capability request prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSpec {
    pub title: String,
    pub message: String,
}

impl PromptSpec {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// DIALOG CHOICES
// ============================================================================

/// The labeled choices a confirmation dialog can offer
///
/// `Cancel`/`OpenSettings` belong to the battery excursion prompt;
/// `ConfirmedDisabled`/`RetrySettings` to the post-return attestation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogChoice {
    Cancel,
    OpenSettings,
    ConfirmedDisabled,
    RetrySettings,
}

impl fmt::Display for DialogChoice {
    /// Renders the button label shown to the user
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogChoice::Cancel => write!(f, "Cancel"),
            DialogChoice::OpenSettings => write!(f, "Open Settings"),
            DialogChoice::ConfirmedDisabled => write!(f, "Yes, I Disabled It"),
            DialogChoice::RetrySettings => write!(f, "No, Open Settings Again"),
        }
    }
}

// ============================================================================
// PLATFORM BRIDGE TRAITS
// ============================================================================

/// Platform capability-request service
///
/// Implemented by platform code over `PermissionsAndroid` (or an equivalent
/// runtime-permission API). Both calls suspend until the user answers the
/// system prompt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CapabilityBridge: Send + Sync {
    /// Request a single capability, showing the given rationale
    async fn request(
        &self,
        capability: CapabilityId,
        prompt: &PromptSpec,
    ) -> Result<CapabilityReply, BridgeError>;

    /// Request several capabilities in one platform prompt, returning the
    /// per-capability outcome
    async fn request_multiple(
        &self,
        capabilities: &[CapabilityId],
    ) -> Result<HashMap<CapabilityId, CapabilityReply>, BridgeError>;
}

/// Confirmation-dialog sink
///
/// Presents a titled message with a fixed set of labeled choices and
/// resolves with exactly one of them. There is no timeout: the future
/// completes only when the user responds.
#[async_trait]
pub trait ConfirmationDialog: Send + Sync {
    async fn present(
        &self,
        title: &str,
        message: &str,
        choices: &[DialogChoice],
    ) -> Result<DialogChoice, BridgeError>;
}

/// External-navigation sink for the system settings surface
///
/// Fire-and-forget; no return value is observed. The follow-up happens via
/// the lifecycle foreground event when the user comes back.
pub trait SettingsNavigator: Send + Sync {
    fn open_system_settings(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_manifest_names() {
        assert_eq!(
            CapabilityId::FineLocation.to_string(),
            "android.permission.ACCESS_FINE_LOCATION"
        );
        assert_eq!(
            CapabilityId::BluetoothScan.to_string(),
            "android.permission.BLUETOOTH_SCAN"
        );
    }

    #[test]
    fn test_reply_approval() {
        assert!(CapabilityReply::Approved.is_approved());
        assert!(!CapabilityReply::Refused.is_approved());
    }

    #[test]
    fn test_dialog_choice_labels() {
        assert_eq!(DialogChoice::OpenSettings.to_string(), "Open Settings");
        assert_eq!(
            DialogChoice::RetrySettings.to_string(),
            "No, Open Settings Again"
        );
    }
}
