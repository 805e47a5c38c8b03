//! InMemory Message Repository 実装
//!
//! `MessageStore` ドメインモデルを保持し、MessageRepository trait を実装します。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Message, MessageRepository, MessageStore, Timestamp};

/// インメモリ Message Repository 実装
pub struct InMemoryMessageRepository {
    store: Arc<Mutex<MessageStore>>,
}

impl InMemoryMessageRepository {
    /// 新しい InMemoryMessageRepository を作成
    pub fn new(store: Arc<Mutex<MessageStore>>) -> Self {
        Self { store }
    }
}

impl Default for InMemoryMessageRepository {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(MessageStore::new())))
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn append(&self, message: Message) {
        self.store.lock().await.append(message);
    }

    async fn prune_older_than(&self, max_age_ms: i64, now: Timestamp) -> usize {
        self.store.lock().await.prune_older_than(max_age_ms, now)
    }

    async fn all(&self) -> Vec<Message> {
        self.store.lock().await.all().to_vec()
    }

    async fn count(&self) -> usize {
        self.store.lock().await.len()
    }
}
