//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Level time only advances through [`tick`]
//! - Stable iteration order (entity stores are kept in spawn order)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod damage;
pub mod entity;
pub mod explosion;
pub mod motion;
pub mod run;
pub mod spawner;
pub mod state;
pub mod tick;

pub use damage::{DamageMode, DamageModel, HitOutcome, InstantDeath, LivesPool};
pub use entity::{Aabb, BonusPickup, Lane, Obstacle, Player, Projectile};
pub use explosion::{Explosion, Particle};
pub use state::{
    EventQueue, GameEvent, GameOverCause, GameSession, HudState, RunPhase, RunState,
    ScheduledEvent, ScheduledKind, Snapshot, SpawnTimers,
};
pub use tick::{TickInput, sanitize_dt, tick};
