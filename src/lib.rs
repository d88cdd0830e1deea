//! Lane Blitz - A vertically scrolling lane shooter
//!
//! Core modules:
//! - `catalog`: Static level, phase and obstacle-type data
//! - `sim`: Deterministic simulation (spawning, motion, collisions, run state)
//! - `platform`: Collaborator seams (renderer, HUD, input) and the frame driver
//! - `audio`: Sound effect triggers
//! - `settings`: Data-driven run configuration

pub mod audio;
pub mod catalog;
pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;

pub use catalog::LevelCatalog;
pub use error::ConfigError;
pub use settings::{GameSettings, TimestepMode};

/// Game configuration constants
pub mod consts {
    /// Field (canvas) dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 500.0;

    /// Lane (road) geometry, centered on the field
    pub const LANE_WIDTH: f32 = 400.0;
    pub const LANE_X: f32 = (FIELD_WIDTH - LANE_WIDTH) / 2.0;

    /// Frame delta assumed on the first tick after a reset (ms)
    pub const DEFAULT_FRAME_MS: f32 = 16.0;
    /// Largest frame delta fed to the simulation (ms)
    pub const MAX_FRAME_MS: f32 = 100.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Player vehicle
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 25.0;
    pub const PLAYER_BOTTOM_MARGIN: f32 = 10.0;
    /// Horizontal movement per tick while steering
    pub const PLAYER_SPEED: f32 = 6.0;

    /// Projectiles
    pub const PROJECTILE_WIDTH: f32 = 6.0;
    pub const PROJECTILE_HEIGHT: f32 = 12.0;
    pub const PROJECTILE_SPEED: f32 = 8.0;
    /// Minimum time between shots (ms)
    pub const FIRE_COOLDOWN_MS: f32 = 200.0;

    /// Bonus pickups
    pub const BONUS_SIZE: f32 = 35.0;
    pub const BONUS_BASE_SPEED: f32 = 0.7;
    pub const BONUS_BASE_DRIFT: f32 = 0.5;
    pub const BONUS_SPIN_PER_TICK: f32 = 0.05;
    /// One-shot bonus delay windows (ms after level start)
    pub const FIRST_BONUS_WINDOW_MS: (f32, f32) = (5_000.0, 10_000.0);
    pub const SECOND_BONUS_WINDOW_MS: (f32, f32) = (15_000.0, 25_000.0);

    /// Combo window between scoring hits (ms)
    pub const COMBO_WINDOW_MS: f32 = 2_000.0;
    /// Per-combo bonus for shooting a normal obstacle
    pub const COMBO_BONUS_OBSTACLE: u64 = 10;
    /// Per-combo bonus for detonating a volatile obstacle
    pub const COMBO_BONUS_VOLATILE: u64 = 20;
    /// Score for letting an obstacle pass the bottom edge
    pub const PASS_SCORE: u64 = 10;

    /// Delay between a fatal detonation and the game-over transition (ms)
    pub const DETONATION_GAME_OVER_DELAY_MS: f32 = 300.0;

    /// Explosions
    pub const EXPLOSION_PARTICLES: usize = 40;
    pub const EXPLOSION_DECAY_PER_TICK: f32 = 0.02;
    pub const PARTICLE_DRAG: f32 = 0.98;
    pub const SHOT_EXPLOSION_RADIUS: f32 = 80.0;
    pub const CONTACT_EXPLOSION_RADIUS: f32 = 100.0;
    /// Explosion palette: red, yellow, crimson, pink
    pub const EXPLOSION_PALETTE: [u32; 4] = [0xff6b6b, 0xfeca57, 0xff4757, 0xff9ff3];
}

/// Per-level speed multiplier: `1 + step * (level - 1)` for a 1-based level
#[inline]
pub fn level_scale(level: u32, step: f32) -> f32 {
    1.0 + step * level.saturating_sub(1) as f32
}

/// Format a 0xRRGGBB colour as a CSS hex string
pub fn css_color(rgb: u32) -> String {
    format!("#{:06x}", rgb & 0x00ff_ffff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_scale_is_one_on_first_level() {
        assert_eq!(level_scale(1, 0.2), 1.0);
        assert!((level_scale(3, 0.2) - 1.4).abs() < 1e-6);
        // Level 0 is treated like level 1
        assert_eq!(level_scale(0, 0.15), 1.0);
    }

    #[test]
    fn css_color_pads() {
        assert_eq!(css_color(0xff6b6b), "#ff6b6b");
        assert_eq!(css_color(0x00000a), "#00000a");
    }
}
