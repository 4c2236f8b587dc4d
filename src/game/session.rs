//! Per-game session: state machine, control operations and the
//! background tick loop that follows the tracking snapshots.

use std::sync::Arc;
use std::time::Duration;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::GameConfig;
use crate::game::charging::{ChargingArbiter, STATION_REGIONS};
use crate::game::score::score_deltas;
use crate::game::team::{Team, TeamColor, TeamView};
use crate::game::timer::Timer;
use crate::game::TickError;
use crate::track::snapshot::{ObjectId, RobotId, Snapshot};
use crate::util::vec2::Vec2;

/// Opaque session identifier; caller-supplied or a generated UUID.
pub type GameId = String;

/// Cooperative yield between ticks so many sessions share the runtime
/// fairly.
const TICK_YIELD: Duration = Duration::from_millis(10);

/// Session lifecycle. `Stopped` is terminal: the loop keeps reading
/// snapshots for observability but no longer mutates scores or timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    Created,
    Running,
    Paused,
    Stopped,
}

/// Synchronous rejections of control operations. Session state is
/// unchanged when any of these is returned.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GameError {
    #[error("team {0} does not exist in config")]
    UnknownTeam(RobotId),
    #[error("team ids must differ")]
    DuplicateTeam,
    #[error("cannot {op} while the game is {phase:?}")]
    InvalidPhase { op: &'static str, phase: GamePhase },
    #[error("write key does not match")]
    WrongKey,
    #[error("game time must be positive")]
    InvalidGameTime,
}

/// One live game. All mutation happens under the session's own lock:
/// the background loop and the control surface take it in turns, so a
/// score override committed between ticks is never overwritten by a
/// recompute that read earlier state.
pub struct Session {
    pub id: GameId,
    key: String,
    config: Arc<GameConfig>,
    phase: GamePhase,
    /// Target match duration in seconds
    game_time: f64,
    match_timer: Timer,
    teams: HashMap<RobotId, Team>,
    /// Side order as assigned: `[blue, red]`
    order: [RobotId; 2],
    arbiter: ChargingArbiter,
    last_snapshot: Arc<Snapshot>,
    last_timestamp: Option<f64>,
}

/// Shared handle; the directory owns the only long-lived strong
/// reference, the loop task holds a weak one.
pub type SessionHandle = Arc<RwLock<Session>>;

impl Session {
    pub fn new(
        id: GameId,
        config: Arc<GameConfig>,
        team_1: RobotId,
        team_2: RobotId,
        initial: Arc<Snapshot>,
    ) -> Result<Self, GameError> {
        let mut session = Self {
            id,
            key: Uuid::new_v4().simple().to_string(),
            game_time: config.game_time,
            config,
            phase: GamePhase::Created,
            match_timer: Timer::new(),
            teams: HashMap::new(),
            order: [team_1, team_2],
            arbiter: ChargingArbiter::new(),
            last_snapshot: initial,
            last_timestamp: None,
        };
        session.set_teams(team_1, team_2)?;
        Ok(session)
    }

    /// Write key required for privileged mutation (score override).
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    fn init_team(&self, robot_id: RobotId, color: TeamColor) -> Result<Team, GameError> {
        let name = self
            .config
            .robots
            .get(&robot_id)
            .ok_or(GameError::UnknownTeam(robot_id))?;
        Ok(Team::new(
            robot_id,
            color,
            name.clone(),
            self.config.robot_time,
        ))
    }

    /// Begin the match: start the match clock and every fuel countdown.
    /// Valid only once, from `Created`; restarting a game is a
    /// state-conflict error.
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.phase != GamePhase::Created {
            return Err(GameError::InvalidPhase {
                op: "start",
                phase: self.phase,
            });
        }
        self.match_timer.start();
        for team in self.teams.values_mut() {
            team.start();
        }
        self.phase = GamePhase::Running;
        info!(game = %self.id, "game started");
        Ok(())
    }

    /// Freeze the match clock and fuel countdowns. Charging timers keep
    /// tracking station occupancy.
    pub fn pause(&mut self) -> Result<(), GameError> {
        if self.phase != GamePhase::Running {
            return Err(GameError::InvalidPhase {
                op: "pause",
                phase: self.phase,
            });
        }
        self.match_timer.pause();
        for team in self.teams.values_mut() {
            team.pause();
        }
        self.phase = GamePhase::Paused;
        info!(game = %self.id, "game paused");
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), GameError> {
        if self.phase != GamePhase::Paused {
            return Err(GameError::InvalidPhase {
                op: "resume",
                phase: self.phase,
            });
        }
        self.match_timer.resume();
        for team in self.teams.values_mut() {
            team.resume();
        }
        self.phase = GamePhase::Running;
        info!(game = %self.id, "game resumed");
        Ok(())
    }

    /// Terminal stop: timers freeze and the loop stops mutating state,
    /// though it keeps observing snapshots.
    pub fn stop(&mut self) -> Result<(), GameError> {
        if self.phase == GamePhase::Stopped {
            return Err(GameError::InvalidPhase {
                op: "stop",
                phase: self.phase,
            });
        }
        self.match_timer.pause();
        for team in self.teams.values_mut() {
            team.pause();
        }
        self.phase = GamePhase::Stopped;
        info!(game = %self.id, "game stopped");
        Ok(())
    }

    /// Replace the roster. Both ids must exist in config and differ;
    /// previous scores, timers and station holdings are discarded.
    pub fn set_teams(&mut self, team_1: RobotId, team_2: RobotId) -> Result<(), GameError> {
        if team_1 == team_2 {
            return Err(GameError::DuplicateTeam);
        }
        let mut blue = self.init_team(team_1, TeamColor::Blue)?;
        let mut red = self.init_team(team_2, TeamColor::Red)?;

        // Mid-game replacement: fresh fuel countdowns follow the phase
        match self.phase {
            GamePhase::Running => {
                blue.start();
                red.start();
            }
            GamePhase::Paused => {
                blue.start();
                blue.pause();
                red.start();
                red.pause();
            }
            GamePhase::Created | GamePhase::Stopped => {}
        }

        for robot_id in self.teams.keys() {
            self.arbiter.release(*robot_id);
        }
        self.teams.clear();
        self.teams.insert(team_1, blue);
        self.teams.insert(team_2, red);
        self.order = [team_1, team_2];
        Ok(())
    }

    /// Privileged additive score override. Applied under the session
    /// lock, so it lands strictly between ticks and survives the next
    /// recompute.
    pub fn alter_score(&mut self, key: &str, delta_1: i32, delta_2: i32) -> Result<(), GameError> {
        if key != self.key {
            return Err(GameError::WrongKey);
        }
        let [team_1, team_2] = self.order;
        if let Some(team) = self.teams.get_mut(&team_1) {
            team.score += delta_1;
        }
        if let Some(team) = self.teams.get_mut(&team_2) {
            team.score += delta_2;
        }
        info!(game = %self.id, delta_1, delta_2, "score altered");
        Ok(())
    }

    /// Change the target match duration. Accrued time is untouched.
    pub fn set_game_time(&mut self, seconds: f64) -> Result<(), GameError> {
        if seconds <= 0.0 {
            return Err(GameError::InvalidGameTime);
        }
        self.game_time = seconds;
        Ok(())
    }

    /// One background tick. The latest snapshot is always retained for
    /// observability; scores, charging and timers only move while
    /// `Running`. Any error leaves state at its last-known-good value.
    pub fn tick(&mut self, snapshot: &Arc<Snapshot>) -> Result<(), TickError> {
        self.last_snapshot = snapshot.clone();
        if self.last_timestamp == Some(snapshot.timestamp) {
            return Ok(());
        }
        self.last_timestamp = Some(snapshot.timestamp);

        if self.phase != GamePhase::Running {
            return Ok(());
        }

        // Validate and compute everything fallible up front so a
        // malformed snapshot rejects the tick before any mutation.
        let deltas = score_deltas(&self.teams, snapshot, &self.config.points)?;
        let station_1 = snapshot
            .fields
            .get(STATION_REGIONS[0])
            .ok_or_else(|| TickError::MissingRegion(STATION_REGIONS[0].to_string()))?;
        let station_2 = snapshot
            .fields
            .get(STATION_REGIONS[1])
            .ok_or_else(|| TickError::MissingRegion(STATION_REGIONS[1].to_string()))?;

        for team in self.teams.values_mut() {
            // Exhausted teams take no part in arbitration
            if team.exhausted() {
                self.arbiter.release(team.robot_id);
                team.stop_charging();
                continue;
            }
            let holds = match snapshot.robots.get(&team.robot_id) {
                Some(robot) => {
                    self.arbiter
                        .evaluate(team.robot_id, robot.position, [station_1, station_2])
                }
                None => {
                    // Not tracked this snapshot: cannot be inside a station
                    self.arbiter.release(team.robot_id);
                    false
                }
            };
            if holds {
                team.charge(self.config.charging_time);
            } else {
                team.stop_charging();
            }
        }

        for (robot_id, delta) in deltas {
            if let Some(team) = self.teams.get_mut(&robot_id) {
                team.score += delta;
            }
        }
        Ok(())
    }

    /// Point-in-time serializable view of the session. Reads only what
    /// the caller's lock already covers; never waits on the loop.
    pub fn view(&self) -> GameView {
        let elapsed = self.match_timer.seconds();
        let mut objects = HashMap::new();
        for (category, tracked) in &self.last_snapshot.objects {
            for object in tracked.values() {
                objects.insert(
                    object.id,
                    ObjectView {
                        id: object.id,
                        category: category.clone(),
                        position: object.position,
                        direction: object.direction,
                    },
                );
            }
        }

        GameView {
            id: self.id.clone(),
            phase: self.phase,
            game_time: self.game_time,
            elapsed,
            time_left: (self.game_time - elapsed).max(0.0),
            team_1: self.order[0],
            team_2: self.order[1],
            teams: self.teams.iter().map(|(id, t)| (*id, t.view())).collect(),
            objects,
            timestamp: self.last_snapshot.timestamp,
        }
    }
}

/// Serialized session snapshot returned by every control and read
/// operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameView {
    pub id: GameId,
    pub phase: GamePhase,
    pub game_time: f64,
    pub elapsed: f64,
    pub time_left: f64,
    pub team_1: RobotId,
    pub team_2: RobotId,
    pub teams: HashMap<RobotId, TeamView>,
    pub objects: HashMap<ObjectId, ObjectView>,
    pub timestamp: f64,
}

/// Last-known state of one tracked scoring object, category-tagged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectView {
    pub id: ObjectId,
    pub category: String,
    pub position: Vec2,
    pub direction: f32,
}

/// Spawn the session's background loop. The task waits on the snapshot
/// readiness signal, processes each publish at most once and yields
/// briefly between ticks. It holds only a weak handle: once the
/// directory evicts the session, the in-flight tick finishes and the
/// loop exits.
pub fn spawn_loop(session: &SessionHandle, mut updates: watch::Receiver<Arc<Snapshot>>) {
    let weak = Arc::downgrade(session);
    tokio::spawn(async move {
        loop {
            if updates.changed().await.is_err() {
                debug!("snapshot source closed, session loop ending");
                break;
            }
            let snapshot = updates.borrow_and_update().clone();

            let Some(session) = weak.upgrade() else {
                debug!("session evicted, loop ending");
                break;
            };
            {
                let mut guard = session.write().await;
                if let Err(e) = guard.tick(&snapshot) {
                    warn!(game = %guard.id, "tick skipped: {e}");
                }
            }
            drop(session);

            tokio::time::sleep(TICK_YIELD).await;
        }
    });
}
