//! Damage rule sets
//!
//! Two mutually exclusive game modes: a single fatal touch, or a pool of lives
//! topped up by bonus pickups. The session picks one through [`DamageMode`].

use serde::{Deserialize, Serialize};

/// Result of the player taking a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    Survived { lives_left: u32 },
    Fatal,
}

/// How player hits and extra lives are resolved
pub trait DamageModel {
    fn starting_lives(&self) -> u32;

    /// Apply one hit. `lives` never goes below zero.
    fn apply_hit(&self, lives: &mut u32) -> HitOutcome;

    /// Whether bonus pickups exist in this mode
    fn offers_extra_lives(&self) -> bool;

    /// Apply a collected bonus
    fn grant_life(&self, lives: &mut u32);
}

/// Any touch ends the run
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantDeath;

impl DamageModel for InstantDeath {
    fn starting_lives(&self) -> u32 {
        1
    }

    fn apply_hit(&self, lives: &mut u32) -> HitOutcome {
        *lives = 0;
        HitOutcome::Fatal
    }

    fn offers_extra_lives(&self) -> bool {
        false
    }

    fn grant_life(&self, _lives: &mut u32) {}
}

/// Each touch costs one life; pickups add lives
#[derive(Debug, Clone, Copy)]
pub struct LivesPool {
    pub starting_lives: u32,
}

impl DamageModel for LivesPool {
    fn starting_lives(&self) -> u32 {
        self.starting_lives
    }

    fn apply_hit(&self, lives: &mut u32) -> HitOutcome {
        *lives = lives.saturating_sub(1);
        if *lives == 0 {
            HitOutcome::Fatal
        } else {
            HitOutcome::Survived { lives_left: *lives }
        }
    }

    fn offers_extra_lives(&self) -> bool {
        true
    }

    fn grant_life(&self, lives: &mut u32) {
        *lives = lives.saturating_add(1);
    }
}

/// Serializable selector for the active rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageMode {
    InstantDeath,
    LivesPool { starting_lives: u32 },
}

impl Default for DamageMode {
    fn default() -> Self {
        DamageMode::LivesPool { starting_lives: 1 }
    }
}

impl DamageMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DamageMode::InstantDeath => "instant_death",
            DamageMode::LivesPool { .. } => "lives_pool",
        }
    }

    /// Run `f` against the concrete rule set
    fn with_model<R>(&self, f: impl FnOnce(&dyn DamageModel) -> R) -> R {
        match *self {
            DamageMode::InstantDeath => f(&InstantDeath),
            DamageMode::LivesPool { starting_lives } => f(&LivesPool { starting_lives }),
        }
    }
}

impl DamageModel for DamageMode {
    fn starting_lives(&self) -> u32 {
        self.with_model(|m| m.starting_lives())
    }

    fn apply_hit(&self, lives: &mut u32) -> HitOutcome {
        self.with_model(|m| m.apply_hit(lives))
    }

    fn offers_extra_lives(&self) -> bool {
        self.with_model(|m| m.offers_extra_lives())
    }

    fn grant_life(&self, lives: &mut u32) {
        self.with_model(|m| m.grant_life(lives))
    }
}
