//! Single-slot notification channel for success and error feedback.
//!
//! At most one message is visible. Posting replaces whatever is showing, and
//! every message disappears on its own once `dismiss_after` has elapsed. The
//! caller supplies the clock so the channel itself never spawns timers.

use std::time::{Duration, Instant};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// Where a visible message is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Visible,
    /// The exit transition is running; the message is still on screen.
    Leaving,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    #[serde(skip)]
    pub posted_at: Instant,
}

#[derive(Debug)]
pub struct NotificationChannel {
    slot: Option<Notification>,
    next_id: u64,
    visible_for: Duration,
    dismiss_after: Duration,
}

impl NotificationChannel {
    pub fn new(visible_for: Duration, dismiss_after: Duration) -> Self {
        Self {
            slot: None,
            next_id: 1,
            visible_for,
            dismiss_after: dismiss_after.max(visible_for),
        }
    }

    pub fn post(&mut self, kind: NotificationKind, message: impl Into<String>, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.slot = Some(Notification {
            id,
            kind,
            message: message.into(),
            posted_at: now,
        });
        id
    }

    pub fn success(&mut self, message: impl Into<String>, now: Instant) -> u64 {
        self.post(NotificationKind::Success, message, now)
    }

    pub fn error(&mut self, message: impl Into<String>, now: Instant) -> u64 {
        self.post(NotificationKind::Error, message, now)
    }

    /// The message on screen at `now`, if it has not expired.
    pub fn current(&self, now: Instant) -> Option<&Notification> {
        self.slot
            .as_ref()
            .filter(|n| now.saturating_duration_since(n.posted_at) < self.dismiss_after)
    }

    pub fn phase(&self, now: Instant) -> Option<Phase> {
        self.current(now).map(|n| {
            if now.saturating_duration_since(n.posted_at) < self.visible_for {
                Phase::Visible
            } else {
                Phase::Leaving
            }
        })
    }

    pub fn dismiss(&mut self) {
        self.slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> NotificationChannel {
        NotificationChannel::new(Duration::from_millis(2500), Duration::from_millis(3000))
    }

    #[test]
    fn test_new_message_replaces_old() {
        let mut ch = channel();
        let t0 = Instant::now();
        ch.success("과목이 추가되었습니다.", t0);
        let id = ch.error("이미 존재하는 과목입니다.", t0 + Duration::from_millis(100));

        let current = ch.current(t0 + Duration::from_millis(200)).unwrap();
        assert_eq!(current.id, id);
        assert_eq!(current.kind, NotificationKind::Error);
    }

    #[test]
    fn test_lifecycle() {
        let mut ch = channel();
        let t0 = Instant::now();
        ch.success("saved", t0);

        assert_eq!(ch.phase(t0 + Duration::from_millis(10)), Some(Phase::Visible));
        assert_eq!(ch.phase(t0 + Duration::from_millis(2600)), Some(Phase::Leaving));
        assert_eq!(ch.phase(t0 + Duration::from_millis(3000)), None);

        assert!(ch.current(t0 + Duration::from_millis(2999)).is_some());
        assert!(ch.current(t0 + Duration::from_millis(3000)).is_none());
    }

    #[test]
    fn test_replacement_restarts_timer() {
        let mut ch = channel();
        let t0 = Instant::now();
        ch.success("first", t0);
        ch.success("second", t0 + Duration::from_millis(2000));
        let later = t0 + Duration::from_millis(4000);
        assert_eq!(ch.current(later).map(|n| n.message.as_str()), Some("second"));
    }

    #[test]
    fn test_dismiss() {
        let mut ch = channel();
        let t0 = Instant::now();
        ch.success("bye", t0);
        ch.dismiss();
        assert!(ch.current(t0).is_none());
    }
}
