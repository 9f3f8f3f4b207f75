//! Scripted platform collaborators
//!
//! Deterministic `CapabilityBridge` / `ConfirmationDialog` /
//! `SettingsNavigator` implementations for tests and headless harnesses.
//! They record every interaction so tests can assert exact call counts.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::bridge::{
    BridgeError, CapabilityBridge, CapabilityId, CapabilityReply, ConfirmationDialog,
    DialogChoice, PromptSpec, SettingsNavigator,
};

// ============================================================================
// SCRIPTED CAPABILITY BRIDGE
// ============================================================================

/// Capability bridge that answers from a script
pub struct ScriptedBridge {
    default_reply: CapabilityReply,
    overrides: RwLock<HashMap<CapabilityId, CapabilityReply>>,
    fault: Option<String>,
    single_requests: RwLock<Vec<(CapabilityId, PromptSpec)>>,
    multi_requests: RwLock<Vec<Vec<CapabilityId>>>,
}

impl ScriptedBridge {
    /// Approve every request
    pub fn approving() -> Self {
        Self::with_default(CapabilityReply::Approved)
    }

    /// Refuse every request
    pub fn refusing() -> Self {
        Self::with_default(CapabilityReply::Refused)
    }

    /// Fail every request with a capability fault
    pub fn faulty(reason: impl Into<String>) -> Self {
        let mut bridge = Self::with_default(CapabilityReply::Refused);
        bridge.fault = Some(reason.into());
        bridge
    }

    fn with_default(default_reply: CapabilityReply) -> Self {
        Self {
            default_reply,
            overrides: RwLock::new(HashMap::new()),
            fault: None,
            single_requests: RwLock::new(Vec::new()),
            multi_requests: RwLock::new(Vec::new()),
        }
    }

    /// Override the reply for one capability
    pub fn set_reply(&self, capability: CapabilityId, reply: CapabilityReply) {
        self.overrides.write().insert(capability, reply);
    }

    fn reply_for(&self, capability: CapabilityId) -> CapabilityReply {
        self.overrides
            .read()
            .get(&capability)
            .copied()
            .unwrap_or(self.default_reply)
    }

    /// Every single-capability request made so far
    pub fn single_requests(&self) -> Vec<(CapabilityId, PromptSpec)> {
        self.single_requests.read().clone()
    }

    /// Every multi-capability request made so far
    pub fn multi_requests(&self) -> Vec<Vec<CapabilityId>> {
        self.multi_requests.read().clone()
    }

    /// Total bridge invocations, single and multi combined
    pub fn total_requests(&self) -> usize {
        self.single_requests.read().len() + self.multi_requests.read().len()
    }
}

#[async_trait]
impl CapabilityBridge for ScriptedBridge {
    async fn request(
        &self,
        capability: CapabilityId,
        prompt: &PromptSpec,
    ) -> Result<CapabilityReply, BridgeError> {
        self.single_requests
            .write()
            .push((capability, prompt.clone()));

        if let Some(reason) = &self.fault {
            return Err(BridgeError::CapabilityFault(reason.clone()));
        }
        Ok(self.reply_for(capability))
    }

    async fn request_multiple(
        &self,
        capabilities: &[CapabilityId],
    ) -> Result<HashMap<CapabilityId, CapabilityReply>, BridgeError> {
        self.multi_requests.write().push(capabilities.to_vec());

        if let Some(reason) = &self.fault {
            return Err(BridgeError::CapabilityFault(reason.clone()));
        }
        Ok(capabilities
            .iter()
            .map(|capability| (*capability, self.reply_for(*capability)))
            .collect())
    }
}

// ============================================================================
// SCRIPTED CONFIRMATION DIALOG
// ============================================================================

/// Confirmation dialog that answers from a queued script
///
/// Faults once the script runs dry, so a test that triggers an unexpected
/// dialog fails loudly instead of hanging.
pub struct ScriptedDialog {
    answers: RwLock<VecDeque<DialogChoice>>,
    presented_titles: RwLock<Vec<String>>,
}

impl ScriptedDialog {
    pub fn answering(answers: impl IntoIterator<Item = DialogChoice>) -> Self {
        Self {
            answers: RwLock::new(answers.into_iter().collect()),
            presented_titles: RwLock::new(Vec::new()),
        }
    }

    /// Dialog with no scripted answers; every presentation faults
    pub fn faulting() -> Self {
        Self::answering([])
    }

    /// Queue another answer after construction
    pub fn push_answer(&self, choice: DialogChoice) {
        self.answers.write().push_back(choice);
    }

    /// Titles of every dialog presented so far
    pub fn presented_titles(&self) -> Vec<String> {
        self.presented_titles.read().clone()
    }

    pub fn present_count(&self) -> usize {
        self.presented_titles.read().len()
    }
}

#[async_trait]
impl ConfirmationDialog for ScriptedDialog {
    async fn present(
        &self,
        title: &str,
        _message: &str,
        choices: &[DialogChoice],
    ) -> Result<DialogChoice, BridgeError> {
        self.presented_titles.write().push(title.to_string());

        let answer = self
            .answers
            .write()
            .pop_front()
            .ok_or_else(|| BridgeError::DialogFault("no scripted answer left".to_string()))?;

        if !choices.contains(&answer) {
            return Err(BridgeError::DialogFault(format!(
                "scripted answer {:?} not among offered choices",
                answer
            )));
        }
        Ok(answer)
    }
}

// ============================================================================
// RECORDING SETTINGS NAVIGATOR
// ============================================================================

/// Settings navigator that only counts invocations
#[derive(Default)]
pub struct RecordingNavigator {
    opens: AtomicUsize,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the settings surface was opened
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl SettingsNavigator for RecordingNavigator {
    fn open_system_settings(&self) {
        self.opens.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_bridge_records_and_replies() {
        let bridge = ScriptedBridge::approving();
        bridge.set_reply(CapabilityId::BluetoothConnect, CapabilityReply::Refused);

        let prompt = PromptSpec::new("t", "m");
        let reply = bridge
            .request(CapabilityId::FineLocation, &prompt)
            .await
            .unwrap();
        assert_eq!(reply, CapabilityReply::Approved);

        let replies = bridge
            .request_multiple(&[CapabilityId::BluetoothScan, CapabilityId::BluetoothConnect])
            .await
            .unwrap();
        assert_eq!(
            replies[&CapabilityId::BluetoothScan],
            CapabilityReply::Approved
        );
        assert_eq!(
            replies[&CapabilityId::BluetoothConnect],
            CapabilityReply::Refused
        );

        assert_eq!(bridge.total_requests(), 2);
        assert_eq!(bridge.single_requests()[0].0, CapabilityId::FineLocation);
    }

    #[tokio::test]
    async fn test_faulty_bridge() {
        let bridge = ScriptedBridge::faulty("service down");
        let prompt = PromptSpec::new("t", "m");

        let err = bridge
            .request(CapabilityId::FineLocation, &prompt)
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::CapabilityFault(_)));
    }

    #[tokio::test]
    async fn test_scripted_dialog_consumes_answers_in_order() {
        let dialog =
            ScriptedDialog::answering([DialogChoice::OpenSettings, DialogChoice::Cancel]);
        let choices = [DialogChoice::Cancel, DialogChoice::OpenSettings];

        let first = dialog.present("Battery", "msg", &choices).await.unwrap();
        let second = dialog.present("Battery", "msg", &choices).await.unwrap();
        assert_eq!(first, DialogChoice::OpenSettings);
        assert_eq!(second, DialogChoice::Cancel);

        // Script exhausted
        assert!(dialog.present("Battery", "msg", &choices).await.is_err());
        assert_eq!(dialog.present_count(), 3);
    }

    #[tokio::test]
    async fn test_scripted_dialog_rejects_unoffered_answer() {
        let dialog = ScriptedDialog::answering([DialogChoice::ConfirmedDisabled]);
        let err = dialog
            .present("Battery", "msg", &[DialogChoice::Cancel, DialogChoice::OpenSettings])
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::DialogFault(_)));
    }

    #[test]
    fn test_recording_navigator_counts() {
        let navigator = RecordingNavigator::new();
        assert_eq!(navigator.open_count(), 0);
        navigator.open_system_settings();
        navigator.open_system_settings();
        assert_eq!(navigator.open_count(), 2);
    }
}
