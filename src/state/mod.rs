mod game;
pub mod round;
mod score;

pub use game::{Game, GuessOutcome};

use crate::config::GameConfig;
use crate::dataset::RosterSource;
use crate::types::SessionId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Errors raised by game transitions
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("Roster is empty")]
    EmptyRoster,

    #[error("Duplicate senator id in roster: {0}")]
    DuplicateId(String),

    #[error("No senators available for the next round")]
    NoSenatorsAvailable,

    #[error("Cannot advance while awaiting a guess")]
    NotShowingFeedback,
}

/// Bookkeeping for a connected session
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub id: SessionId,
    pub connected_at: String,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GameConfig>,
    pub roster_source: Arc<dyn RosterSource>,
    pub sessions: Arc<RwLock<HashMap<SessionId, SessionInfo>>>,
}

impl AppState {
    pub fn new(config: GameConfig, roster_source: Arc<dyn RosterSource>) -> Self {
        Self {
            config: Arc::new(config),
            roster_source,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a newly connected session
    pub async fn open_session(&self) -> SessionInfo {
        let info = SessionInfo {
            id: ulid::Ulid::new().to_string(),
            connected_at: chrono::Utc::now().to_rfc3339(),
        };

        self.sessions
            .write()
            .await
            .insert(info.id.clone(), info.clone());
        info
    }

    /// Forget a session once its socket is gone, returning what was registered
    pub async fn close_session(&self, id: &SessionId) -> Option<SessionInfo> {
        self.sessions.write().await.remove(id)
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }
}
