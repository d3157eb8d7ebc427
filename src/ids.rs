//! Timestamp-based record identifiers.
//!
//! Ids are the decimal millisecond timestamp at creation. Two ids requested
//! within the same millisecond would collide, so the generator never hands
//! out a value less than or equal to the previous one.

use chrono::{DateTime, Utc};

#[derive(Debug, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self, now: DateTime<Utc>) -> String {
        let millis = now.timestamp_millis();
        self.last = if millis > self.last { millis } else { self.last + 1 };
        self.last.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ids_follow_clock() {
        let mut ids = IdGenerator::new();
        let t = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        assert_eq!(ids.next_id(t), "1700000000000");
    }

    #[test]
    fn test_same_millisecond_does_not_collide() {
        let mut ids = IdGenerator::new();
        let t = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let a = ids.next_id(t);
        let b = ids.next_id(t);
        assert_ne!(a, b);
        assert_eq!(b, "1700000000001");
    }
}
