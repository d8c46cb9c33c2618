use crate::common::ChatMessage;

/// Append-only, in-memory log of the messages shown in the current session.
///
/// Order is insertion order. Nothing is ever reordered, deduplicated or
/// evicted, and there is no API to reach a stored message mutably.
#[derive(Debug, Default)]
pub struct ConversationStore {
    messages: Vec<ChatMessage>,
    revision: u64,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: ChatMessage) {
        log::trace!("Appending message {} from {}", message.id, message.sender);
        self.messages.push(message);
        self.revision += 1;
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Bumped on every append; views re-render when it changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn remote(id: i64, sender: &str, text: &str) -> ChatMessage {
        ChatMessage {
            id,
            text: text.to_string(),
            sender: sender.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn keeps_arrival_order_not_timestamp_order() {
        let mut store = ConversationStore::new();
        let mut late = remote(2, "Bob", "sent later");
        late.timestamp = Utc::now() + Duration::seconds(30);
        let early = remote(1, "Alice", "sent earlier");

        store.append(late);
        store.append(early);

        let texts: Vec<_> = store.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["sent later", "sent earlier"]);
    }

    #[test]
    fn never_deduplicates() {
        let mut store = ConversationStore::new();
        let message = remote(1, "Alice", "hey");
        store.append(message.clone());
        store.append(message);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn earlier_entries_are_untouched_by_later_appends() {
        let mut store = ConversationStore::new();
        let first = ChatMessage::local(1, "hi");
        store.append(first.clone());
        for id in 2..50 {
            store.append(remote(id, "Alice", "more"));
        }
        assert_eq!(store.messages()[0], first);
    }

    #[test]
    fn interleaved_origins_keep_relative_order() {
        let mut store = ConversationStore::new();
        let local_count: i64 = 5;
        let remote_count: i64 = 7;
        for i in 0..local_count {
            store.append(ChatMessage::local(i, format!("local {i}")));
        }
        for i in 0..remote_count {
            store.append(remote(100 + i, "Alice", &format!("remote {i}")));
        }

        assert_eq!(store.len() as i64, local_count + remote_count);
        let local_ids: Vec<_> = store.iter().filter(|m| m.is_local()).map(|m| m.id).collect();
        let remote_ids: Vec<_> = store.iter().filter(|m| !m.is_local()).map(|m| m.id).collect();
        assert_eq!(local_ids, (0..local_count).collect::<Vec<_>>());
        assert_eq!(remote_ids, (100..100 + remote_count).collect::<Vec<_>>());
    }

    #[test]
    fn revision_tracks_appends() {
        let mut store = ConversationStore::new();
        assert!(store.is_empty());
        assert_eq!(store.revision(), 0);
        store.append(ChatMessage::local(1, "hi"));
        store.append(remote(2, "Alice", "hey"));
        assert_eq!(store.revision(), 2);
    }
}
