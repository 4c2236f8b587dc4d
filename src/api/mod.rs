//! HTTP control surface: operator commands, spectator reads and the
//! vision pipeline's snapshot push.

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
