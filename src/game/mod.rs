//! Game engine: timers, teams, charging arbitration, scoring, the
//! per-session state machine and the bounded session directory.

pub mod charging;
pub mod directory;
pub mod score;
pub mod session;
pub mod team;
pub mod timer;

/// Failures contained to a single background tick. A bad snapshot is
/// logged and skipped; session state stays at its last-known-good value
/// and the loop keeps waiting for the next publish.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TickError {
    #[error("field region '{0}' missing from snapshot")]
    MissingRegion(String),
    #[error("scoring category '{0}' has no configured point value")]
    UnknownCategory(String),
}
