//! Tracking-data boundary: snapshot types published by the vision
//! pipeline and the source cell the session loops wait on.

pub mod snapshot;
pub mod source;
