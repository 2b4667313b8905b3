use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::errors::{AppError, AppResult};
use crate::models::domain::{QuizSession, SessionId};

/// A session behind its own lock. Holding the lock serialises events for that session.
pub type SessionHandle = Arc<Mutex<QuizSession>>;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, id: SessionId) -> AppResult<SessionHandle>;
    async fn get(&self, id: &SessionId) -> AppResult<Option<SessionHandle>>;
    async fn get_or_create(&self, id: &SessionId) -> AppResult<SessionHandle>;
    async fn remove(&self, id: &SessionId) -> AppResult<()>;
    async fn count(&self) -> AppResult<usize>;
}

/// Process-resident store. Sessions live until removed or the process exits.
#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, id: SessionId) -> AppResult<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&id) {
            return Err(AppError::AlreadyExists(format!("session {}", id)));
        }
        let handle = Arc::new(Mutex::new(QuizSession::new(id.clone())));
        sessions.insert(id.clone(), handle.clone());
        log::debug!("Created session {}", id);
        Ok(handle)
    }

    async fn get(&self, id: &SessionId) -> AppResult<Option<SessionHandle>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).cloned())
    }

    async fn get_or_create(&self, id: &SessionId) -> AppResult<SessionHandle> {
        if let Some(handle) = self.sessions.read().await.get(id) {
            return Ok(handle.clone());
        }
        let mut sessions = self.sessions.write().await;
        let handle = sessions
            .entry(id.clone())
            .or_insert_with(|| {
                log::debug!("Created session {} on first contact", id);
                Arc::new(Mutex::new(QuizSession::new(id.clone())))
            })
            .clone();
        Ok(handle)
    }

    async fn remove(&self, id: &SessionId) -> AppResult<()> {
        let mut sessions = self.sessions.write().await;
        sessions
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("session {}", id)))
    }

    async fn count(&self) -> AppResult<usize> {
        Ok(self.sessions.read().await.len())
    }
}
