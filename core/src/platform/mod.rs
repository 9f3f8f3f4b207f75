//! Platform integration layer for the permission core
//!
//! This module provides:
//! - Host platform description (OS family + version) for capability gating
//! - Bridge traits the platform shell implements: capability requests,
//!   confirmation dialogs, settings navigation
//! - App-lifecycle event delivery for the settings round-trip
//! - Scripted collaborator doubles for tests and headless harnesses

pub mod bridge;
pub mod descriptor;
pub mod lifecycle;
pub mod scripted;

pub use bridge::{
    BridgeError, CapabilityBridge, CapabilityId, CapabilityReply, ConfirmationDialog,
    DialogChoice, PromptSpec, SettingsNavigator,
};
pub use descriptor::{OsFamily, PlatformDescriptor};
pub use lifecycle::{AppLifecycle, LifecycleEvent, LifecycleEventSource};
pub use scripted::{RecordingNavigator, ScriptedBridge, ScriptedDialog};
