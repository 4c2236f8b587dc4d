//! Robo Liga scoring server library
//!
//! Runs live scoring sessions for the robot competition: the vision
//! pipeline pushes tracked positions, per-game session engines derive
//! scores, timers and charging-station occupancy, and an HTTP surface
//! exposes operator control and spectator reads.

pub mod api;
pub mod config;
pub mod game;
pub mod track;
pub mod util;
