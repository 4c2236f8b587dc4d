use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

use hashbrown::HashMap;
use serde::Deserialize;

use crate::track::snapshot::RobotId;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to
    pub bind_address: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Maximum number of concurrently kept games; the oldest is evicted
    /// beyond this
    pub max_games: usize,
    /// Path to the game configuration file
    pub game_config_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 8088,
            max_games: 50,
            game_config_path: "game_config.json".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("BIND_ADDRESS") {
            if let Ok(parsed) = addr.parse() {
                config.bind_address = parsed;
            } else {
                tracing::warn!("Invalid BIND_ADDRESS '{}', using default", addr);
            }
        }

        if let Ok(port) = std::env::var("PORT") {
            if let Ok(parsed) = port.parse::<u16>() {
                if parsed > 0 {
                    config.port = parsed;
                } else {
                    tracing::warn!("PORT must be > 0, using default");
                }
            } else {
                tracing::warn!("Invalid PORT '{}', using default", port);
            }
        }

        if let Ok(max_games) = std::env::var("MAX_GAMES") {
            if let Ok(parsed) = max_games.parse::<usize>() {
                if parsed > 0 && parsed <= 10000 {
                    config.max_games = parsed;
                } else {
                    tracing::warn!("MAX_GAMES must be 1-10000, using default");
                }
            } else {
                tracing::warn!("Invalid MAX_GAMES '{}', using default", max_games);
            }
        }

        if let Ok(path) = std::env::var("GAME_CONFIG") {
            config.game_config_path = path;
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Port cannot be 0".to_string());
        }
        if self.max_games == 0 {
            return Err("max_games must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Competition configuration: the team roster, timing parameters and
/// point values. Loaded once at startup and shared read-only.
#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    /// Robot id to team name, from the competition roster
    pub robots: HashMap<RobotId, String>,
    /// Fuel capacity in seconds of drive time
    pub robot_time: f64,
    /// Default match duration in seconds
    pub game_time: f64,
    /// Seconds on a charging station for a full recharge
    pub charging_time: f64,
    /// Point value per scoring-object category
    pub points: HashMap<String, i32>,
}

impl GameConfig {
    /// Load the game configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: GameConfig = serde_json::from_str(&raw)?;
        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.robots.len() < 2 {
            return Err("config must list at least two robots".to_string());
        }
        if self.robot_time <= 0.0 {
            return Err("robot_time must be positive".to_string());
        }
        if self.game_time <= 0.0 {
            return Err("game_time must be positive".to_string());
        }
        if self.charging_time <= 0.0 {
            return Err("charging_time must be positive".to_string());
        }
        if self.points.is_empty() {
            return Err("points table must not be empty".to_string());
        }
        Ok(())
    }
}
