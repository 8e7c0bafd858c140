//! Process-lifetime store of live interview sessions, keyed by id.
//!
//! The outer `RwLock` only guards the map; each session sits behind its own
//! `Mutex`, so requests against one session are serialized while different
//! sessions proceed independently.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::session::InterviewSession;

pub type SharedSession = Arc<Mutex<InterviewSession>>;

#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SharedSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an initialized session and returns its id.
    pub async fn insert(&self, session: InterviewSession) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        id
    }

    pub async fn get(&self, id: Uuid) -> Result<SharedSession, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Interview session {id} not found")))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Interview session {id} not found")))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::session::{InterviewContext, InterviewType};
    use crate::llm_client::mock::MockGenerator;

    fn session() -> InterviewSession {
        let ctx = InterviewContext::new("Engineer", "Sam", "JD", InterviewType::Screening, 30);
        InterviewSession::new(Arc::new(MockGenerator::always("Hello")), ctx)
    }

    #[tokio::test]
    async fn test_insert_get_remove() {
        let registry = SessionRegistry::new();
        let id = registry.insert(session()).await;

        assert_eq!(registry.len().await, 1);
        let shared = registry.get(id).await.unwrap();
        shared.lock().await.advance(None).await.unwrap();
        assert_eq!(registry.get(id).await.unwrap().lock().await.turns().len(), 1);

        registry.remove(id).await.unwrap();
        assert!(matches!(registry.get(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(registry.remove(id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_clones_share_sessions() {
        let registry = SessionRegistry::new();
        let other = registry.clone();
        let id = registry.insert(session()).await;
        assert!(other.get(id).await.is_ok());
    }
}
