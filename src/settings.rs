//! Run settings
//!
//! Persisted as JSON next to the runner. Every field has a default, so a
//! settings file only needs the values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scenario::Scenario;
use crate::sim::StrategyKind;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Run settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed for spawning and tie-break noise
    pub seed: u64,
    /// Strategy every hunter uses
    pub strategy: StrategyKind,
    /// Play one round per strategy instead of just `strategy`
    pub run_all_strategies: bool,
    /// Fixed ticks per second
    pub tick_rate: u32,
    /// Give up on a round after this many ticks
    pub max_ticks: u64,
    /// Board layout
    pub scenario: Scenario,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0,
            strategy: StrategyKind::Direct,
            run_all_strategies: false,
            tick_rate: 50,
            max_ticks: 3_000,
            scenario: Scenario::default(),
        }
    }
}

impl Settings {
    /// Fixed timestep in seconds
    pub fn sim_dt(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    /// Strategies to play, in registry order
    pub fn strategies(&self) -> Vec<StrategyKind> {
        if self.run_all_strategies {
            StrategyKind::ALL.to_vec()
        } else {
            vec![self.strategy]
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tick_rate == 0 {
            return Err(SettingsError::Invalid("tick_rate must be positive".into()));
        }
        let zone = &self.scenario.guard_zone;
        if zone.min.x > zone.max.x || zone.min.y > zone.max.y {
            return Err(SettingsError::Invalid(format!(
                "guard zone min {} exceeds max {}",
                zone.min, zone.max
            )));
        }
        for (name, stats) in [
            ("hunter", self.scenario.hunter),
            ("quarry", self.scenario.quarry),
            ("guard", self.scenario.guard),
        ] {
            if !(stats.radius > 0.0 && stats.max_speed > 0.0 && stats.turn_rate >= 0.0) {
                return Err(SettingsError::Invalid(format!(
                    "{} stats need positive radius and max_speed, non-negative turn_rate",
                    name
                )));
            }
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let settings = Self::from_json(&fs::read_to_string(path)?)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
