//! Permission state machine and orchestration
//!
//! `registry` holds the canonical per-kind status and button availability;
//! `controller` drives requests against the platform seams and applies every
//! transition; `prompts` carries the user-facing copy.

pub mod controller;
pub mod prompts;
pub mod registry;

pub use controller::{
    PermissionController, PermissionError, MIN_ACTIVITY_RECOGNITION_VERSION,
    MIN_DEVICE_PAIRING_VERSION,
};
pub use registry::{PermissionKind, PermissionRecord, PermissionRegistry, PermissionStatus};
