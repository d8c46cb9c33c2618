use crate::common::SendOutcome;

/// Trạng thái cục bộ của UI (không thuộc về phiên chat).
#[derive(Debug, Default)]
pub struct ViewState {
    pub input_text: String,
    pub last_outcome: Option<SendOutcome>,
    /// Store revision drawn last frame; used to scroll on new messages.
    pub seen_revision: u64,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the revision being drawn, returning whether it is new.
    pub fn observe_revision(&mut self, revision: u64) -> bool {
        let changed = revision != self.seen_revision;
        self.seen_revision = revision;
        changed
    }

    pub fn outcome_hint(&self) -> Option<&'static str> {
        match self.last_outcome? {
            SendOutcome::Sent | SendOutcome::Empty => None,
            SendOutcome::NotConnected => Some("Not connected: message shown locally only"),
            SendOutcome::Closed => Some("Session closed: message shown locally only"),
        }
    }
}
