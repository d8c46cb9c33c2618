use chrono::Utc;

/// Hands out message ids from the wall clock in milliseconds, bumped past
/// the previous id so they stay strictly increasing within one session.
#[derive(Debug, Default)]
pub struct MessageIdGenerator {
    last: i64,
}

impl MessageIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> i64 {
        self.next_from(Utc::now().timestamp_millis())
    }

    fn next_from(&mut self, now_millis: i64) -> i64 {
        let id = now_millis.max(self.last + 1);
        self.last = id;
        id
    }
}
