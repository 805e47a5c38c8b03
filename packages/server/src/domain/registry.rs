//! Connection Registry: live connections and the presence records they own.

use std::collections::HashMap;

use super::{
    entity::{PresenceRecord, Registration},
    value_object::{ConnectionId, Timestamp, UserId},
};

/// Live set of `user id → presence record` plus the association of every
/// connection to the user it registered as.
///
/// Invariants:
/// - at most one presence record per user id
/// - a connection maps to at most one user id, and a presence record is only
///   ever removed through the connection that currently owns it
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    /// Every live connection; `None` until it registers
    connections: HashMap<ConnectionId, Option<UserId>>,
    presence: HashMap<UserId, PresenceRecord>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly opened, still unregistered connection.
    pub fn connect(&mut self, connection_id: ConnectionId) {
        self.connections.entry(connection_id).or_insert(None);
    }

    /// Insert or overwrite the presence record for the registration's user id.
    ///
    /// Last writer wins. A connection that previously owned the record is
    /// orphaned (its user mapping is cleared), and a record this connection
    /// owned under a different user id is dropped.
    ///
    /// Returns the record that was replaced, if any.
    pub fn register(
        &mut self,
        connection_id: ConnectionId,
        registration: Registration,
        now: Timestamp,
    ) -> Option<PresenceRecord> {
        let user_id = registration.user_id.clone();

        if let Some(Some(previous_user)) = self.connections.get(&connection_id) {
            if previous_user != &user_id {
                let previous_user = previous_user.clone();
                self.remove_if_owned(&previous_user, &connection_id);
            }
        }

        let record = PresenceRecord::new(registration, connection_id.clone(), now);
        let replaced = self.presence.insert(user_id.clone(), record);

        if let Some(old) = &replaced {
            if old.connection_id != connection_id {
                if let Some(mapping) = self.connections.get_mut(&old.connection_id) {
                    *mapping = None;
                }
            }
        }

        self.connections.insert(connection_id, Some(user_id));
        replaced
    }

    /// Refresh `last_active`. Returns `false` when the record no longer exists.
    pub fn touch(&mut self, user_id: &UserId, now: Timestamp) -> bool {
        match self.presence.get_mut(user_id) {
            Some(record) => {
                record.last_active = now;
                true
            }
            None => false,
        }
    }

    /// User id the connection is currently registered as.
    pub fn user_of(&self, connection_id: &ConnectionId) -> Option<&UserId> {
        self.connections.get(connection_id).and_then(Option::as_ref)
    }

    /// Forget the connection and delete the presence record it owns.
    ///
    /// A record that has since been taken over by another connection is left
    /// untouched. Returns the deleted record, if any.
    pub fn remove(&mut self, connection_id: &ConnectionId) -> Option<PresenceRecord> {
        let user_id = self.connections.remove(connection_id).flatten()?;
        self.remove_if_owned(&user_id, connection_id)
    }

    /// Delete every record idle for more than `max_idle_ms`. Returns how many
    /// were removed.
    pub fn sweep_stale(&mut self, max_idle_ms: i64, now: Timestamp) -> usize {
        let before = self.presence.len();
        self.presence
            .retain(|_, record| !record.is_stale(now, max_idle_ms));
        before - self.presence.len()
    }

    /// All presence records, sorted by user id.
    pub fn snapshot(&self) -> Vec<PresenceRecord> {
        let mut records: Vec<PresenceRecord> = self.presence.values().cloned().collect();
        records.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        records
    }

    pub fn get(&self, user_id: &UserId) -> Option<&PresenceRecord> {
        self.presence.get(user_id)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn user_count(&self) -> usize {
        self.presence.len()
    }

    fn remove_if_owned(
        &mut self,
        user_id: &UserId,
        connection_id: &ConnectionId,
    ) -> Option<PresenceRecord> {
        match self.presence.get(user_id) {
            Some(record) if &record.connection_id == connection_id => {
                self.presence.remove(user_id)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::fixtures::{connection, registration};

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    #[test]
    fn test_register_creates_record_and_mapping() {
        // テスト項目: register でプレゼンスレコードと接続の対応付けが作成される
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        registry.connect(connection("c1"));

        // when (操作):
        let replaced = registry.register(
            connection("c1"),
            registration("u1", "Alice"),
            Timestamp::new(1_000),
        );

        // then (期待する結果):
        assert!(replaced.is_none());
        assert_eq!(registry.user_of(&connection("c1")), Some(&user("u1")));
        let record = registry.get(&user("u1")).unwrap();
        assert_eq!(record.name, "Alice");
        assert_eq!(record.connection_id, connection("c1"));
        assert_eq!(record.last_active, Timestamp::new(1_000));
        assert_eq!(registry.connection_count(), 1);
        assert_eq!(registry.user_count(), 1);
    }

    #[test]
    fn test_register_same_user_keeps_single_latest_record() {
        // テスト項目: 同じ user id で複数回 register すると最新の 1 件のみ残る
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        registry.register(connection("c1"), registration("u1", "Alice"), Timestamp::new(1));
        registry.register(connection("c2"), registration("u2", "Bob"), Timestamp::new(2));

        // when (操作):
        let replaced = registry.register(
            connection("c3"),
            registration("u1", "Alice (phone)"),
            Timestamp::new(3),
        );

        // then (期待する結果):
        assert_eq!(replaced.map(|r| r.name), Some("Alice".to_string()));
        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 2);
        let alice: Vec<_> = snapshot.iter().filter(|r| r.user_id == user("u1")).collect();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].name, "Alice (phone)");
        assert_eq!(alice[0].connection_id, connection("c3"));
    }

    #[test]
    fn test_overwritten_connection_is_orphaned() {
        // テスト項目: 上書きされた古い接続はユーザーとの対応付けを失う
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        registry.register(connection("old"), registration("u1", "Alice"), Timestamp::new(1));

        // when (操作):
        registry.register(connection("new"), registration("u1", "Alice"), Timestamp::new(2));

        // then (期待する結果):
        assert_eq!(registry.user_of(&connection("old")), None);
        assert_eq!(registry.user_of(&connection("new")), Some(&user("u1")));
        // 古い接続自体はまだ生きている
        assert_eq!(registry.connection_count(), 2);
    }

    #[test]
    fn test_remove_superseded_connection_keeps_newer_record() {
        // テスト項目: 新しい登録に置き換えられた接続の切断は新しいレコードを削除しない
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        registry.register(connection("old"), registration("u1", "Alice"), Timestamp::new(1));
        registry.register(connection("new"), registration("u1", "Alice"), Timestamp::new(2));

        // when (操作):
        let removed = registry.remove(&connection("old"));

        // then (期待する結果):
        assert!(removed.is_none());
        let record = registry.get(&user("u1")).unwrap();
        assert_eq!(record.connection_id, connection("new"));
        assert_eq!(registry.connection_count(), 1);
    }

    #[test]
    fn test_remove_owning_connection_deletes_record() {
        // テスト項目: レコードを所有する接続を削除するとレコードも削除される
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        registry.register(connection("c1"), registration("u1", "Alice"), Timestamp::new(1));

        // when (操作):
        let removed = registry.remove(&connection("c1"));

        // then (期待する結果):
        assert_eq!(removed.map(|r| r.user_id), Some(user("u1")));
        assert_eq!(registry.user_count(), 0);
        assert_eq!(registry.connection_count(), 0);
    }

    #[test]
    fn test_remove_unregistered_or_unknown_connection_is_noop() {
        // テスト項目: 未登録・未知の接続の削除は何もしない
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        registry.connect(connection("anon"));
        registry.register(connection("c1"), registration("u1", "Alice"), Timestamp::new(1));

        // when (操作):
        let anon = registry.remove(&connection("anon"));
        let unknown = registry.remove(&connection("ghost"));

        // then (期待する結果):
        assert!(anon.is_none());
        assert!(unknown.is_none());
        assert_eq!(registry.user_count(), 1);
        assert_eq!(registry.connection_count(), 1);
    }

    #[test]
    fn test_reregister_under_new_user_drops_old_record() {
        // テスト項目: 同じ接続が別の user id で登録し直すと古いレコードは削除される
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        registry.register(connection("c1"), registration("u1", "Alice"), Timestamp::new(1));

        // when (操作):
        registry.register(connection("c1"), registration("u9", "Alias"), Timestamp::new(2));

        // then (期待する結果):
        assert!(registry.get(&user("u1")).is_none());
        assert_eq!(registry.user_of(&connection("c1")), Some(&user("u9")));
        assert_eq!(registry.user_count(), 1);
    }

    #[test]
    fn test_touch_updates_last_active() {
        // テスト項目: touch で last_active が更新され、存在しないユーザーは false を返す
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        registry.register(connection("c1"), registration("u1", "Alice"), Timestamp::new(1));

        // when (操作):
        let touched = registry.touch(&user("u1"), Timestamp::new(50));
        let missing = registry.touch(&user("nobody"), Timestamp::new(50));

        // then (期待する結果):
        assert!(touched);
        assert!(!missing);
        assert_eq!(
            registry.get(&user("u1")).unwrap().last_active,
            Timestamp::new(50)
        );
    }

    #[test]
    fn test_sweep_stale_removes_only_idle_records() {
        // テスト項目: sweep_stale は max_idle を超えたレコードだけを削除する
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        registry.register(connection("c1"), registration("u1", "Alice"), Timestamp::new(0));
        registry.register(connection("c2"), registration("u2", "Bob"), Timestamp::new(100_000));
        registry.register(connection("c3"), registration("u3", "Carol"), Timestamp::new(60_000));

        // when (操作):
        let now = Timestamp::new(180_000);
        let removed = registry.sweep_stale(120_000, now);

        // then (期待する結果): u1 (180s idle) のみ削除、u3 はちょうど 120s なので残る
        assert_eq!(removed, 1);
        let ids: Vec<String> = registry
            .snapshot()
            .into_iter()
            .map(|r| r.user_id.into_string())
            .collect();
        assert_eq!(ids, vec!["u2".to_string(), "u3".to_string()]);
    }

    #[test]
    fn test_sweep_stale_with_nothing_stale_returns_zero() {
        // テスト項目: stale なレコードがない場合は 0 を返し何も変えない
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        registry.register(connection("c1"), registration("u1", "Alice"), Timestamp::new(10));

        // when (操作):
        let removed = registry.sweep_stale(120_000, Timestamp::new(20));

        // then (期待する結果):
        assert_eq!(removed, 0);
        assert_eq!(registry.user_count(), 1);
    }

    #[test]
    fn test_swept_user_touch_is_noop_and_disconnect_removes_nothing() {
        // テスト項目: sweep 済みユーザーの heartbeat と切断は no-op になる
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        registry.register(connection("c1"), registration("u1", "Alice"), Timestamp::new(0));
        registry.sweep_stale(120_000, Timestamp::new(500_000));

        // when (操作):
        let touched = registry.touch(&user("u1"), Timestamp::new(500_001));
        let removed = registry.remove(&connection("c1"));

        // then (期待する結果):
        assert!(!touched);
        assert!(removed.is_none());
        assert_eq!(registry.connection_count(), 0);
    }

    #[test]
    fn test_snapshot_is_sorted_by_user_id() {
        // テスト項目: snapshot は user id 順にソートされる
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        registry.register(connection("c3"), registration("charlie", "C"), Timestamp::new(0));
        registry.register(connection("c1"), registration("alice", "A"), Timestamp::new(0));
        registry.register(connection("c2"), registration("bob", "B"), Timestamp::new(0));

        // when (操作):
        let snapshot = registry.snapshot();

        // then (期待する結果):
        let ids: Vec<&str> = snapshot.iter().map(|r| r.user_id.as_str()).collect();
        assert_eq!(ids, vec!["alice", "bob", "charlie"]);
    }
}
