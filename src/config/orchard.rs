//! Pool and orchard configuration structures.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::ConfigError;

/// Environment variable naming a JSON configuration file.
pub const CONFIG_ENV_VAR: &str = "ORCHARD_CONFIG";

/// Object pool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Maximum number of inactive instances retained for reuse.
    pub capacity: usize,
    /// Create `capacity` instances up front.
    #[serde(default = "default_prewarm")]
    pub prewarm: bool,
}

const fn default_prewarm() -> bool {
    true
}

impl PoolConfig {
    /// Pre-warmed pool of the given capacity.
    pub const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            prewarm: true,
        }
    }
}

/// Location where an apple can appear.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// World position.
    pub position: [f32; 3],
    /// Euler rotation in degrees.
    #[serde(default)]
    pub rotation: [f32; 3],
}

impl SpawnPoint {
    /// Spawn point at `position` with no rotation.
    pub const fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: [x, y, z],
            rotation: [0.0; 3],
        }
    }
}

/// Randomized spawning parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Points visited on every wave.
    pub spawn_points: Vec<SpawnPoint>,
    /// Percent chance (1-100) of a red apple per point per wave.
    pub red_chance: f32,
    /// Percent chance (1-100) of a golden apple per point per wave.
    pub golden_chance: f32,
    /// Seconds between waves.
    pub spawn_every_secs: f64,
    /// Points awarded for grabbing a red apple.
    pub red_points: u32,
    /// Points awarded for grabbing a golden apple.
    pub golden_points: u32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            spawn_points: vec![
                SpawnPoint::at(1.5, 3.0, 0.0),
                SpawnPoint::at(-1.5, 3.2, 0.5),
                SpawnPoint::at(0.0, 3.5, 1.5),
                SpawnPoint::at(0.5, 2.8, -1.5),
            ],
            red_chance: 25.0,
            golden_chance: 5.0,
            spawn_every_secs: 8.0,
            red_points: 1,
            golden_points: 5,
        }
    }
}

/// Root orchard configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchardConfig {
    /// Spawning parameters.
    pub spawn: SpawnConfig,
    /// Red apple pool; defaults to two instances per spawn point.
    pub red_pool: Option<PoolConfig>,
    /// Golden apple pool; defaults to one instance per spawn point.
    pub golden_pool: Option<PoolConfig>,
}

impl OrchardConfig {
    /// Effective red apple pool configuration.
    pub fn red_pool(&self) -> PoolConfig {
        self.red_pool
            .clone()
            .unwrap_or_else(|| PoolConfig::new(self.spawn.spawn_points.len() * 2))
    }

    /// Effective golden apple pool configuration.
    pub fn golden_pool(&self) -> PoolConfig {
        self.golden_pool
            .clone()
            .unwrap_or_else(|| PoolConfig::new(self.spawn.spawn_points.len()))
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let spawn = &self.spawn;
        if spawn.spawn_points.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one spawn point must be defined".into(),
            ));
        }
        for (name, chance) in [("red_chance", spawn.red_chance), ("golden_chance", spawn.golden_chance)] {
            if !(1.0..=100.0).contains(&chance) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within 1..=100, got {chance}"
                )));
            }
        }
        if !(spawn.spawn_every_secs.is_finite() && spawn.spawn_every_secs > 0.0) {
            return Err(ConfigError::Invalid(
                "spawn_every_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] or [`ConfigError::Invalid`].
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(input)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`OrchardConfig::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Load configuration named by [`CONFIG_ENV_VAR`], after reading a `.env`
    /// file if present. Falls back to defaults when the variable is unset.
    ///
    /// # Errors
    ///
    /// As [`OrchardConfig::from_file`].
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("ignoring unreadable .env file: {}", e);
            }
        }
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => {
                tracing::info!("loading orchard config from {}", path);
                Self::from_file(path)
            }
            Err(_) => Ok(Self::default()),
        }
    }
}
