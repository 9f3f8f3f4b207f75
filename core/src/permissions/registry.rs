//! Canonical permission state for the onboarding screen
//!
//! `PermissionRegistry` is pure data: one record per tracked permission kind,
//! mutated only by `PermissionController` transition functions. It never
//! performs I/O and never blocks. The rendering layer reads it (or the JSON
//! snapshot) to decide which cards show the granted badge and which still
//! offer accept/deny buttons.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// PERMISSION KINDS
// ============================================================================

/// The device capabilities tracked by the onboarding screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionKind {
    /// Fine location access
    Location,
    /// Physical activity recognition (walking, driving, running)
    ActivityRecognition,
    /// Bluetooth device pairing (scan + connect)
    DevicePairing,
    /// Battery-optimization exemption for background operation
    BackgroundRunExemption,
}

impl PermissionKind {
    /// All tracked kinds, in display order
    pub const ALL: [PermissionKind; 4] = [
        PermissionKind::Location,
        PermissionKind::ActivityRecognition,
        PermissionKind::DevicePairing,
        PermissionKind::BackgroundRunExemption,
    ];
}

impl fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionKind::Location => write!(f, "Location"),
            PermissionKind::ActivityRecognition => write!(f, "Physical Activity"),
            PermissionKind::DevicePairing => write!(f, "Bluetooth"),
            PermissionKind::BackgroundRunExemption => write!(f, "Battery Optimization"),
        }
    }
}

// ============================================================================
// PERMISSION STATUS
// ============================================================================

/// Per-permission status as shown on the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionStatus {
    /// No request has been made yet
    NotRequested,
    /// Platform approved the capability request
    Granted,
    /// User refused, either at the platform prompt or via the deny button
    Denied,
    /// Version-gated skip: the platform is old enough that the capability
    /// does not exist as a runtime permission
    NotRequired,
    /// User attested that the background-run exemption was applied.
    /// Terminal satisfied state for `BackgroundRunExemption` only.
    Configured,
    /// User was sent to system settings and has not yet confirmed the
    /// outcome. Exclusive to `BackgroundRunExemption`.
    AwaitingExternalConfirmation,
    /// User backed out of the settings excursion without navigating
    Cancelled,
    /// The capability service (or dialog sink) faulted; retry is manual
    Error,
}

impl PermissionStatus {
    /// Whether this status counts as satisfied for display purposes:
    /// the card shows the granted badge and hides the accept/deny buttons.
    pub fn is_satisfied(&self) -> bool {
        matches!(
            self,
            PermissionStatus::Granted
                | PermissionStatus::Configured
                | PermissionStatus::NotRequired
        )
    }
}

impl fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionStatus::NotRequested => write!(f, "Not Requested"),
            PermissionStatus::Granted => write!(f, "Granted"),
            PermissionStatus::Denied => write!(f, "Denied"),
            PermissionStatus::NotRequired => write!(f, "Not Required"),
            PermissionStatus::Configured => write!(f, "Configured"),
            PermissionStatus::AwaitingExternalConfirmation => {
                write!(f, "Settings Opened - Please Return")
            }
            PermissionStatus::Cancelled => write!(f, "Cancelled"),
            PermissionStatus::Error => write!(f, "Error"),
        }
    }
}

// ============================================================================
// PERMISSION RECORD & REGISTRY
// ============================================================================

/// Status plus button availability for one permission kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRecord {
    /// Current status
    pub status: PermissionStatus,
    /// Once the user explicitly denies, the deny button is disabled until a
    /// fresh request cycle lands in the satisfied set. Accept stays enabled.
    pub deny_locked: bool,
}

impl PermissionRecord {
    fn new() -> Self {
        Self {
            status: PermissionStatus::NotRequested,
            deny_locked: false,
        }
    }

    /// Whether the record's status counts as satisfied for display
    pub fn is_satisfied(&self) -> bool {
        self.status.is_satisfied()
    }
}

/// Holds one `PermissionRecord` per tracked kind
///
/// Pure assignment semantics: `set` is last-write-wins, no merging, no side
/// effects. State lives for the duration of the screen and is never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionRegistry {
    records: HashMap<PermissionKind, PermissionRecord>,
}

impl PermissionRegistry {
    /// Create a registry with all four kinds at `NotRequested`
    pub fn new() -> Self {
        let records = PermissionKind::ALL
            .iter()
            .map(|kind| (*kind, PermissionRecord::new()))
            .collect();
        Self { records }
    }

    /// Get the record for a kind
    pub fn get(&self, kind: PermissionKind) -> PermissionRecord {
        // Keys are fixed at construction, so the entry always exists.
        self.records
            .get(&kind)
            .copied()
            .unwrap_or_else(PermissionRecord::new)
    }

    /// Overwrite the record for a kind
    pub fn set(&mut self, kind: PermissionKind, status: PermissionStatus, deny_locked: bool) {
        self.records.insert(
            kind,
            PermissionRecord {
                status,
                deny_locked,
            },
        );
    }

    /// JSON snapshot for the rendering shell
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Default for PermissionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
