//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - ストアへの追加、newMessage のブロードキャスト、emergency の追加通知
//!
//! ### どのような状況を想定しているか
//! - 正常系：通常メッセージ・アラート
//! - emergency：emergency ブロードキャストと外部通知が 1 回ずつ行われる
//! - 外部通知の失敗：ブロードキャストは成功扱い
//! - 未登録の接続からの送信も受け付ける

use std::sync::Arc;

use crate::domain::{
    ConnectionId, EmergencyNotifier, Message, MessagePusher, MessageRepository, RelayEvent,
};

use super::error::SendMessageError;

/// Registered --sendMessage--> Registered (also accepted while unregistered)
pub struct SendMessageUseCase {
    messages: Arc<dyn MessageRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    notifier: Arc<dyn EmergencyNotifier>,
}

impl SendMessageUseCase {
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        notifier: Arc<dyn EmergencyNotifier>,
    ) -> Self {
        Self {
            messages,
            message_pusher,
            notifier,
        }
    }

    /// メッセージ送信を実行
    ///
    /// Appends the message, broadcasts `newMessage` to every connection and,
    /// for emergencies, broadcasts `emergency` and invokes the notifier.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - number of connections the message was handed to
    /// * `Err(SendMessageError)` - the message was stored but could not be broadcast
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        message: Message,
    ) -> Result<usize, SendMessageError> {
        tracing::info!(
            "Message from {} on '{}' [{}]: {}",
            message.name,
            connection_id,
            message.kind.as_str(),
            message.preview()
        );

        self.messages.append(message.clone()).await;

        let delivered = self
            .message_pusher
            .broadcast(&RelayEvent::NewMessage(message.clone()))
            .await
            .map_err(SendMessageError::BroadcastFailed)?;

        if message.kind.is_emergency() {
            self.message_pusher
                .broadcast(&RelayEvent::Emergency(message.clone()))
                .await
                .map_err(SendMessageError::BroadcastFailed)?;

            if let Err(e) = self.notifier.notify(&message).await {
                tracing::error!("Failed to notify emergency contacts: {}", e);
            }
        }

        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            Location, MessageKind, NotifyError, entity::fixtures::message,
            notifier::MockEmergencyNotifier,
        },
        usecase::test_support::{TestRelay, drain, event_names},
    };

    fn create_usecase(relay: &TestRelay, notifier: MockEmergencyNotifier) -> SendMessageUseCase {
        SendMessageUseCase::new(relay.messages.clone(), relay.pusher.clone(), Arc::new(notifier))
    }

    fn never_notified() -> MockEmergencyNotifier {
        let mut notifier = MockEmergencyNotifier::new();
        notifier.expect_notify().never();
        notifier
    }

    #[tokio::test]
    async fn test_send_message_appends_and_broadcasts_to_all() {
        // テスト項目: メッセージがストアに追加され、送信者を含む全接続に配信される
        // given (前提条件):
        let relay = TestRelay::new(0);
        let usecase = create_usecase(&relay, never_notified());
        let (alice, mut alice_rx) = relay.open("c-alice").await;
        let (_bob, mut bob_rx) = relay.open("c-bob").await;

        // when (操作):
        let result = usecase
            .execute(&alice, message("careful", 10, MessageKind::Alert))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(2));
        assert_eq!(relay.message_count().await, 1);
        for rx in [&mut alice_rx, &mut bob_rx] {
            let frames = drain(rx);
            assert_eq!(event_names(&frames), vec!["newMessage"]);
            assert_eq!(frames[0]["data"]["text"], "careful");
            assert_eq!(frames[0]["data"]["type"], "alert");
        }
    }

    #[tokio::test]
    async fn test_store_keeps_call_order_not_timestamp_order() {
        // テスト項目: ストアの順序は呼び出し順で、timestamp によって並べ替えられない
        // given (前提条件):
        let relay = TestRelay::new(0);
        let usecase = create_usecase(&relay, never_notified());
        let (conn, _rx) = relay.open("c1").await;

        // when (操作):
        for (text, ts) in [("a", 300), ("b", 100), ("c", 200)] {
            usecase
                .execute(&conn, message(text, ts, MessageKind::Message))
                .await
                .unwrap();
        }

        // then (期待する結果):
        let texts: Vec<String> = relay
            .messages
            .all()
            .await
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_emergency_broadcasts_twice_and_notifies_once() {
        // テスト項目: emergency は newMessage と emergency の両方が配信され、外部通知が 1 回呼ばれる
        // given (前提条件):
        let relay = TestRelay::new(0);
        let mut notifier = MockEmergencyNotifier::new();
        notifier
            .expect_notify()
            .times(1)
            .withf(|m| m.text == "help" && m.location.is_some())
            .returning(|_| Ok(()));
        let usecase = create_usecase(&relay, notifier);
        let (alice, mut alice_rx) = relay.open("c-alice").await;
        let (_bob, mut bob_rx) = relay.open("c-bob").await;

        let mut emergency = message("help", 20, MessageKind::Emergency);
        emergency.location = Some(Location {
            latitude: 1.0,
            longitude: 2.0,
            accuracy: Some(5.0),
        });

        // when (操作):
        usecase.execute(&alice, emergency).await.unwrap();

        // then (期待する結果):
        for rx in [&mut alice_rx, &mut bob_rx] {
            let frames = drain(rx);
            assert_eq!(event_names(&frames), vec!["newMessage", "emergency"]);
            assert_eq!(frames[0]["data"], frames[1]["data"]);
            assert_eq!(frames[1]["data"]["location"]["latitude"], 1.0);
        }
    }

    #[tokio::test]
    async fn test_notifier_failure_does_not_fail_send() {
        // テスト項目: 外部通知が失敗してもメッセージ送信は成功する
        // given (前提条件):
        let relay = TestRelay::new(0);
        let mut notifier = MockEmergencyNotifier::new();
        notifier
            .expect_notify()
            .times(1)
            .returning(|_| Err(NotifyError::DeliveryFailed("sms gateway down".to_string())));
        let usecase = create_usecase(&relay, notifier);
        let (conn, mut rx) = relay.open("c1").await;

        // when (操作):
        let result = usecase
            .execute(&conn, message("help", 1, MessageKind::Emergency))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(1));
        assert_eq!(event_names(&drain(&mut rx)), vec!["newMessage", "emergency"]);
    }

    #[tokio::test]
    async fn test_unknown_kind_is_relayed_verbatim() {
        // テスト項目: 未知の type も書き換えられずに配信される
        // given (前提条件):
        let relay = TestRelay::new(0);
        let usecase = create_usecase(&relay, never_notified());
        let (conn, mut rx) = relay.open("c1").await;

        // when (操作):
        usecase
            .execute(
                &conn,
                message("on my way", 1, MessageKind::Other("checkIn".to_string())),
            )
            .await
            .unwrap();

        // then (期待する結果):
        let frames = drain(&mut rx);
        assert_eq!(event_names(&frames), vec!["newMessage"]);
        assert_eq!(frames[0]["data"]["type"], "checkIn");
    }
}
