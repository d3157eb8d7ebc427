//! Confirmation gate for destructive operations.
//!
//! The gate is either closed or holds exactly one pending request. Opening
//! the gate while a request is pending replaces it; the earlier request is
//! dropped without running.

use log::{debug, warn};
use serde::Serialize;

/// A request waiting for the user's decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prompt<A> {
    pub title: String,
    pub message: String,
    #[serde(skip)]
    pub action: A,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmationGate<A> {
    Closed,
    Open(Prompt<A>),
}

impl<A> Default for ConfirmationGate<A> {
    fn default() -> Self {
        ConfirmationGate::Closed
    }
}

impl<A> ConfirmationGate<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the gate with `action` pending. Returns the request it
    /// superseded, if any.
    pub fn open(&mut self, title: impl Into<String>, message: impl Into<String>, action: A) -> Option<Prompt<A>> {
        let prompt = Prompt {
            title: title.into(),
            message: message.into(),
            action,
        };
        debug!("Confirmation requested: {}", prompt.title);
        match std::mem::replace(self, ConfirmationGate::Open(prompt)) {
            ConfirmationGate::Open(previous) => {
                warn!("Confirmation '{}' superseded before it was answered", previous.title);
                Some(previous)
            }
            ConfirmationGate::Closed => None,
        }
    }

    /// Closes the gate and hands back the pending action for the caller to
    /// run. `None` when nothing was pending.
    pub fn confirm(&mut self) -> Option<A> {
        match std::mem::take(self) {
            ConfirmationGate::Open(prompt) => Some(prompt.action),
            ConfirmationGate::Closed => None,
        }
    }

    /// Closes the gate without running anything. Escape and backdrop clicks
    /// map here too.
    pub fn cancel(&mut self) -> bool {
        let was_open = self.is_open();
        *self = ConfirmationGate::Closed;
        was_open
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ConfirmationGate::Open(_))
    }

    pub fn prompt(&self) -> Option<&Prompt<A>> {
        match self {
            ConfirmationGate::Open(prompt) => Some(prompt),
            ConfirmationGate::Closed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_returns_action_and_closes() {
        let mut gate = ConfirmationGate::new();
        gate.open("과목 삭제", "삭제하시겠습니까?", 7);
        assert!(gate.is_open());
        assert_eq!(gate.prompt().map(|p| p.title.as_str()), Some("과목 삭제"));
        assert_eq!(gate.confirm(), Some(7));
        assert!(!gate.is_open());
        assert_eq!(gate.confirm(), None);
    }

    #[test]
    fn test_cancel_drops_action() {
        let mut gate = ConfirmationGate::new();
        gate.open("노트 삭제", "삭제하시겠습니까?", "note-1");
        assert!(gate.cancel());
        assert_eq!(gate.confirm(), None);
        assert!(!gate.cancel());
    }

    #[test]
    fn test_last_open_wins() {
        let mut gate = ConfirmationGate::new();
        assert!(gate.open("first", "", 1).is_none());
        let superseded = gate.open("second", "", 2);
        assert_eq!(superseded.map(|p| p.action), Some(1));
        assert_eq!(gate.confirm(), Some(2));
    }
}
