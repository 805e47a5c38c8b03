//! Shared application state.

use std::sync::Arc;

use crate::{config::ServerConfig, hub::HubHandle, usecase::GetRelayStatusUseCase};

/// State shared by every handler
pub struct AppState {
    /// HubHandle（ハブへのコマンド送信口）
    pub hub: HubHandle,
    /// GetRelayStatusUseCase（状態取得のユースケース）
    pub get_relay_status_usecase: Arc<GetRelayStatusUseCase>,
    /// Server settings; the origin policy is read from here
    pub config: ServerConfig,
}

impl AppState {
    /// `true` when a WebSocket upgrade from `origin` may proceed.
    ///
    /// Requests without an `Origin` header (non-browser clients) are accepted.
    pub fn accepts_origin(&self, origin: Option<&str>) -> bool {
        match origin {
            None => true,
            Some(_) if self.config.allows_any_origin() => true,
            Some(origin) => origin == self.config.allowed_origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        hub::{HubUseCases, RelayHub},
        infrastructure::notifier::LogEmergencyNotifier,
        usecase::test_support::TestRelay,
    };

    fn create_state(allowed_origin: &str) -> AppState {
        let relay = TestRelay::new(0);
        let config = ServerConfig::default();
        let usecases = HubUseCases::new(
            relay.presence.clone(),
            relay.messages.clone(),
            relay.pusher.clone(),
            Arc::new(LogEmergencyNotifier::new()),
            relay.clock.clone(),
            &config,
        );
        let (_hub, hub) = RelayHub::new(usecases, &config);
        AppState {
            hub,
            get_relay_status_usecase: Arc::new(GetRelayStatusUseCase::new(
                relay.presence.clone(),
                relay.messages.clone(),
            )),
            config: ServerConfig {
                allowed_origin: allowed_origin.to_string(),
                ..config
            },
        }
    }

    #[test]
    fn test_wildcard_accepts_any_origin() {
        // テスト項目: `*` の場合はどのオリジンも許可する
        // given (前提条件):
        let state = create_state("*");

        // when (操作):
        let accepted = state.accepts_origin(Some("https://evil.example"));

        // then (期待する結果):
        assert!(accepted);
    }

    #[test]
    fn test_specific_origin_rejects_others() {
        // テスト項目: 特定のオリジン設定時は一致するオリジンとヘッダーなしのみ許可する
        // given (前提条件):
        let state = create_state("https://app.example");

        // when (操作):
        let matching = state.accepts_origin(Some("https://app.example"));
        let other = state.accepts_origin(Some("https://evil.example"));
        let missing = state.accepts_origin(None);

        // then (期待する結果):
        assert!(matching);
        assert!(!other);
        assert!(missing);
    }
}
