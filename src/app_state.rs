use std::sync::Arc;

use crate::{
    config::Config,
    errors::AppResult,
    repositories::{InMemorySessionRepository, SessionRepository},
    services::{ContentGateway, DocumentService, LlmGateway, RetryPolicy, SessionService},
};

#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<SessionService>,
    pub session_repository: Arc<dyn SessionRepository>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        config.validate()?;
        let gateway = Arc::new(LlmGateway::new(&config));
        log::info!(
            "Content gateway: model {} at {}",
            config.llm_model,
            config.llm_api_base
        );
        Ok(Self::with_gateway(config, gateway))
    }

    /// Wires the in-memory session store and services around an existing gateway.
    pub fn with_gateway(config: Config, gateway: Arc<dyn ContentGateway>) -> Self {
        let session_repository: Arc<dyn SessionRepository> = Arc::new(InMemorySessionRepository::new());
        let session_service = Arc::new(SessionService::new(
            session_repository.clone(),
            gateway,
            DocumentService::new(config.max_document_bytes),
            RetryPolicy::from_config(&config),
        ));

        Self {
            session_service,
            session_repository,
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::gateway::MockContentGateway;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_new_rejects_missing_api_key() {
        let mut config = Config::test_config();
        config.llm_api_key = secrecy::SecretString::from(String::new());

        assert!(AppState::new(config).is_err());
    }

    #[tokio::test]
    async fn test_with_gateway_starts_empty() {
        let state = AppState::with_gateway(Config::test_config(), Arc::new(MockContentGateway::new()));

        assert_eq!(state.session_repository.count().await.expect("count"), 0);
    }
}
