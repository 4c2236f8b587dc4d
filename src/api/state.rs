//! Shared state handed to every handler.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::GameConfig;
use crate::game::directory::SessionDirectory;
use crate::track::source::StateSource;

/// Application state behind the router. The directory lock is held only
/// for registry operations; per-session mutation happens under each
/// session's own lock.
pub struct AppState {
    pub config: Arc<GameConfig>,
    pub directory: RwLock<SessionDirectory>,
    pub source: StateSource,
}

impl AppState {
    pub fn new(config: Arc<GameConfig>, source: StateSource, capacity: usize) -> Self {
        Self {
            directory: RwLock::new(SessionDirectory::new(
                config.clone(),
                source.clone(),
                capacity,
            )),
            config,
            source,
        }
    }
}
