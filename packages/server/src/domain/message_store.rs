//! Message Store: arrival-ordered messages, bounded only by age.

use super::{entity::Message, value_object::Timestamp};

/// Append-only message buffer. Messages are kept in arrival order, never
/// re-sorted by their client-supplied timestamp, and only leave through
/// [`MessageStore::prune_older_than`].
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Remove every message older than `now - max_age_ms` in a single pass.
    /// Returns how many were removed.
    pub fn prune_older_than(&mut self, max_age_ms: i64, now: Timestamp) -> usize {
        let before = self.messages.len();
        self.messages.retain(|m| !m.is_expired(now, max_age_ms));
        before - self.messages.len()
    }

    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{entity::fixtures::message, value_object::MessageKind};

    const DAY_MS: i64 = 86_400_000;

    #[test]
    fn test_append_preserves_arrival_order_not_timestamp_order() {
        // テスト項目: append の順序が保持され、timestamp で並べ替えられない
        // given (前提条件):
        let mut store = MessageStore::new();

        // when (操作):
        store.append(message("third by clock", 300, MessageKind::Message));
        store.append(message("first by clock", 100, MessageKind::Alert));
        store.append(message("second by clock", 200, MessageKind::Emergency));

        // then (期待する結果):
        let texts: Vec<&str> = store.all().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["third by clock", "first by clock", "second by clock"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_prune_removes_exactly_expired_messages() {
        // テスト項目: now - 24h より古いメッセージだけが削除される
        // given (前提条件):
        let now = Timestamp::new(10 * DAY_MS);
        let mut store = MessageStore::new();
        store.append(message("old", now.value() - DAY_MS - 1, MessageKind::Message));
        store.append(message("boundary", now.value() - DAY_MS, MessageKind::Message));
        store.append(message("fresh", now.value() - 5, MessageKind::Message));
        store.append(message("older", 0, MessageKind::Alert));

        // when (操作):
        let removed = store.prune_older_than(DAY_MS, now);

        // then (期待する結果):
        assert_eq!(removed, 2);
        let texts: Vec<&str> = store.all().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["boundary", "fresh"]);
    }

    #[test]
    fn test_prune_is_idempotent() {
        // テスト項目: 新しいメッセージがなければ 2 回目の prune は何も削除しない
        // given (前提条件):
        let now = Timestamp::new(3 * DAY_MS);
        let mut store = MessageStore::new();
        store.append(message("old", 0, MessageKind::Message));
        store.append(message("fresh", now.value(), MessageKind::Message));

        // when (操作):
        let first = store.prune_older_than(DAY_MS, now);
        let second = store.prune_older_than(DAY_MS, now);

        // then (期待する結果):
        assert_eq!(first, 1);
        assert_eq!(second, 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_prune_empty_store() {
        // テスト項目: 空のストアの prune はエラーにならず 0 を返す
        // given (前提条件):
        let mut store = MessageStore::new();

        // when (操作):
        let removed = store.prune_older_than(DAY_MS, Timestamp::new(DAY_MS));

        // then (期待する結果):
        assert_eq!(removed, 0);
        assert!(store.is_empty());
    }
}
