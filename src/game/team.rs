//! Roster entry for one competing side: identity, score, fuel countdown
//! and charging state.

use serde::{Deserialize, Serialize};

use crate::game::timer::Timer;
use crate::track::snapshot::RobotId;

/// Side assignment; doubles as the key for the team's basket region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamColor {
    Blue,
    Red,
}

impl TeamColor {
    /// Name of this side's collection basket region in the snapshot.
    pub fn basket_region(&self) -> &'static str {
        match self {
            TeamColor::Blue => "blue_basket",
            TeamColor::Red => "red_basket",
        }
    }
}

/// One competing team bound to a tracked robot.
///
/// Fuel is modeled as a countdown: the fuel timer accrues while the
/// robot is discharging, and remaining fuel is capacity minus accrued
/// time, clamped at zero. While charging the fuel timer is held paused.
#[derive(Debug, Clone)]
pub struct Team {
    pub robot_id: RobotId,
    pub color: TeamColor,
    pub name: String,
    pub score: i32,
    fuel_capacity: f64,
    fuel_timer: Timer,
    charging_timer: Timer,
    charging: bool,
}

impl Team {
    pub fn new(robot_id: RobotId, color: TeamColor, name: String, fuel_capacity: f64) -> Self {
        Self {
            robot_id,
            color,
            name,
            score: 0,
            fuel_capacity,
            fuel_timer: Timer::new(),
            charging_timer: Timer::new(),
            charging: false,
        }
    }

    /// Begin the fuel countdown (match start).
    pub fn start(&mut self) {
        self.fuel_timer.start();
    }

    /// Freeze the fuel countdown (match pause). The charging timer keeps
    /// tracking station occupancy independently.
    pub fn pause(&mut self) {
        self.fuel_timer.pause();
    }

    /// Unfreeze the fuel countdown, unless a charging station is holding
    /// it paused.
    pub fn resume(&mut self) {
        if !self.charging {
            self.fuel_timer.resume();
        }
    }

    /// Remaining fuel in seconds, clamped at zero.
    pub fn fuel(&self) -> f64 {
        (self.fuel_capacity - self.fuel_timer.seconds()).max(0.0)
    }

    /// Whether the fuel countdown has run out.
    pub fn exhausted(&self) -> bool {
        self.fuel() <= 0.0
    }

    pub fn is_charging(&self) -> bool {
        self.charging
    }

    /// Called every tick the robot holds a charging station. The first
    /// call of an occupancy episode suspends the fuel countdown and
    /// starts the charging clock; once `charging_time` seconds have
    /// accrued the fuel clock is reset to full and held paused until the
    /// robot leaves.
    pub fn charge(&mut self, charging_time: f64) {
        if !self.charging {
            self.start_charging();
        } else if self.charging_timer.seconds() >= charging_time {
            self.fuel_timer.start();
            self.fuel_timer.pause();
        }
    }

    fn start_charging(&mut self) {
        self.fuel_timer.pause();
        self.charging = true;
        self.charging_timer.start();
    }

    /// Called when the robot leaves its station (or loses arbitration).
    /// Resumes the fuel countdown from its held value.
    pub fn stop_charging(&mut self) {
        if self.charging {
            self.charging = false;
            self.charging_timer.pause();
            self.fuel_timer.resume();
        }
    }

    pub fn view(&self) -> TeamView {
        TeamView {
            id: self.robot_id,
            color: self.color,
            name: self.name.clone(),
            score: self.score,
            fuel: self.fuel(),
            charging: self.charging,
        }
    }

    /// Shift the fuel countdown forward (test clock control).
    #[cfg(test)]
    pub(crate) fn advance_fuel(&mut self, amount: std::time::Duration) {
        self.fuel_timer.advance(amount);
    }

    /// Shift the charging clock forward (test clock control).
    #[cfg(test)]
    pub(crate) fn advance_charging(&mut self, amount: std::time::Duration) {
        self.charging_timer.advance(amount);
    }
}

/// Serialized team entry exposed to spectators and operators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamView {
    pub id: RobotId,
    pub color: TeamColor,
    pub name: String,
    pub score: i32,
    pub fuel: f64,
    pub charging: bool,
}
