//! Pausable stopwatch used for the match clock, per-team fuel countdown
//! and charging duration.

use std::time::{Duration, Instant};

/// Monotonic stopwatch that accrues time while running and holds its
/// value while paused.
#[derive(Debug, Clone, Default)]
pub struct Timer {
    accrued: Duration,
    running_since: Option<Instant>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to zero and begin running.
    pub fn start(&mut self) {
        self.accrued = Duration::ZERO;
        self.running_since = Some(Instant::now());
    }

    /// Freeze the accrued time. No-op if already paused.
    pub fn pause(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.accrued += since.elapsed();
        }
    }

    /// Continue accruing from the frozen value. No-op if already running.
    pub fn resume(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// Total accrued time, including the currently running stretch.
    pub fn elapsed(&self) -> Duration {
        match self.running_since {
            Some(since) => self.accrued + since.elapsed(),
            None => self.accrued,
        }
    }

    /// Accrued time in seconds.
    pub fn seconds(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    /// Shift accrued time forward without waiting (test clock control).
    #[cfg(test)]
    pub(crate) fn advance(&mut self, amount: Duration) {
        self.accrued += amount;
    }
}
