//! Bounded registry of live sessions with first-in-first-out eviction.

use std::collections::VecDeque;
use std::sync::Arc;

use hashbrown::HashMap;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::config::GameConfig;
use crate::game::session::{spawn_loop, GameError, GameId, Session, SessionHandle};
use crate::track::snapshot::RobotId;
use crate::track::source::StateSource;

/// Registry errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum DirectoryError {
    #[error("game {0} not found")]
    NotFound(GameId),
    #[error("game {0} already exists")]
    DuplicateId(GameId),
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Session registry bounded by a fixed capacity. Insertion order is
/// tracked in a queue; exceeding capacity evicts the oldest-inserted id
/// whether or not that game is still active. Eviction only drops the
/// strong handle, so an in-flight tick completes before the session's
/// loop exits.
pub struct SessionDirectory {
    sessions: HashMap<GameId, SessionHandle>,
    order: VecDeque<GameId>,
    capacity: usize,
    config: Arc<GameConfig>,
    source: StateSource,
}

impl SessionDirectory {
    pub fn new(config: Arc<GameConfig>, source: StateSource, capacity: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            order: VecDeque::new(),
            capacity,
            config,
            source,
        }
    }

    /// Create a new session, start its background loop and register it.
    /// A caller-supplied id must be unused; without one a UUID is
    /// generated.
    pub fn create(
        &mut self,
        id: Option<GameId>,
        team_1: RobotId,
        team_2: RobotId,
    ) -> Result<SessionHandle, DirectoryError> {
        let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());
        if self.sessions.contains_key(&id) {
            return Err(DirectoryError::DuplicateId(id));
        }

        let session = Session::new(
            id.clone(),
            self.config.clone(),
            team_1,
            team_2,
            self.source.latest(),
        )?;
        let handle: SessionHandle = Arc::new(RwLock::new(session));
        spawn_loop(&handle, self.source.subscribe());

        self.sessions.insert(id.clone(), handle.clone());
        self.order.push_back(id.clone());
        info!(game = %id, total = self.sessions.len(), "game created");

        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.sessions.remove(&oldest);
                info!(game = %oldest, "game evicted");
            }
        }

        Ok(handle)
    }

    pub fn get(&self, id: &str) -> Result<SessionHandle, DirectoryError> {
        self.sessions
            .get(id)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(id.to_string()))
    }

    /// Registered game ids in insertion order.
    pub fn list(&self) -> Vec<GameId> {
        self.order.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
