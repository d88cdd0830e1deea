//! Run settings and preferences
//!
//! Loaded from JSON (all fields optional) and validated against the level
//! catalog before a session is built.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::LevelCatalog;
use crate::consts::*;
use crate::error::{ConfigError, Result};
use crate::sim::damage::DamageMode;
use crate::sim::entity::Lane;

/// How frame time is turned into simulation ticks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimestepMode {
    /// One tick per frame, fed the measured wall-clock delta
    #[default]
    Variable,
    /// Accumulate frame time and tick in fixed steps
    Fixed { step_ms: f32 },
}

impl TimestepMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimestepMode::Variable => "variable",
            TimestepMode::Fixed { .. } => "fixed",
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Canonical damage rule set
    pub damage_mode: DamageMode,
    pub timestep: TimestepMode,
    pub lane: Lane,
    /// Cosmetic vehicle id from the catalog
    pub vehicle_style: String,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            seed: 0x1a2e_b117,
            damage_mode: DamageMode::default(),
            timestep: TimestepMode::Variable,
            lane: Lane::default(),
            vehicle_style: "sedan".to_string(),

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl GameSettings {
    /// Parse settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Check settings against the catalog they will run with
    pub fn validate(&self, catalog: &LevelCatalog) -> Result<()> {
        let lane = &self.lane;
        if !(lane.width > 0.0 && lane.height > 0.0 && lane.x >= 0.0) {
            return Err(ConfigError::InvalidLane(format!(
                "x={} width={} height={}",
                lane.x, lane.width, lane.height
            )));
        }
        if lane.width < PLAYER_WIDTH {
            return Err(ConfigError::InvalidLane(format!(
                "lane width {} is narrower than the vehicle ({})",
                lane.width, PLAYER_WIDTH
            )));
        }
        let widest = catalog.widest_obstacle();
        if lane.width < widest {
            return Err(ConfigError::InvalidLane(format!(
                "lane width {} is narrower than the widest obstacle ({})",
                lane.width, widest
            )));
        }
        if lane.height < PLAYER_HEIGHT + PLAYER_BOTTOM_MARGIN {
            return Err(ConfigError::InvalidLane(format!(
                "lane height {} cannot fit the vehicle",
                lane.height
            )));
        }

        if let DamageMode::LivesPool { starting_lives: 0 } = self.damage_mode {
            return Err(ConfigError::InvalidSetting(
                "starting_lives must be at least 1".to_string(),
            ));
        }
        if let TimestepMode::Fixed { step_ms } = self.timestep {
            if !(step_ms.is_finite() && step_ms > 0.0) {
                return Err(ConfigError::InvalidSetting(format!(
                    "fixed step must be positive, got {step_ms}"
                )));
            }
        }
        if catalog.vehicle(&self.vehicle_style).is_none() {
            return Err(ConfigError::UnknownVehicleStyle(self.vehicle_style.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate_against_builtin_catalog() {
        let settings = GameSettings::default();
        assert!(settings.validate(&LevelCatalog::builtin()).is_ok());
        assert_eq!(settings.damage_mode, DamageMode::LivesPool { starting_lives: 1 });
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings = GameSettings::from_json(
            r#"{ "seed": 7, "damage_mode": "instant_death", "timestep": { "fixed": { "step_ms": 10.0 } } }"#,
        )
        .unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.damage_mode, DamageMode::InstantDeath);
        assert_eq!(settings.timestep, TimestepMode::Fixed { step_ms: 10.0 });
        assert_eq!(settings.vehicle_style, "sedan");
        assert_eq!(settings.lane, Lane::default());
    }

    #[test]
    fn rejects_bad_values() {
        let catalog = LevelCatalog::builtin();

        let mut narrow = GameSettings::default();
        narrow.lane.width = 100.0;
        assert!(matches!(narrow.validate(&catalog), Err(ConfigError::InvalidLane(_))));

        let mut no_lives = GameSettings::default();
        no_lives.damage_mode = DamageMode::LivesPool { starting_lives: 0 };
        assert!(matches!(no_lives.validate(&catalog), Err(ConfigError::InvalidSetting(_))));

        let mut zero_step = GameSettings::default();
        zero_step.timestep = TimestepMode::Fixed { step_ms: 0.0 };
        assert!(zero_step.validate(&catalog).is_err());

        let mut unknown_car = GameSettings::default();
        unknown_car.vehicle_style = "hovercraft".to_string();
        assert!(matches!(
            unknown_car.validate(&catalog),
            Err(ConfigError::UnknownVehicleStyle(_))
        ));
    }
}
