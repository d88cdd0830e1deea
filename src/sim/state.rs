//! Game session and core simulation types
//!
//! Everything the simulation mutates lives in one [`GameSession`] aggregate.
//! Subsystems take it by `&mut` and nothing else holds gameplay state.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::damage::DamageModel;
use super::entity::{BonusPickup, Lane, Obstacle, Player, Projectile};
use super::explosion::Explosion;
use crate::catalog::{Level, LevelCatalog, Theme};
use crate::consts::COMBO_WINDOW_MS;
use crate::error::Result;
use crate::settings::GameSettings;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Title screen, waiting for the player to start
    NotStarted,
    /// Level metadata shown, simulation frozen until acknowledged
    LevelIntro,
    /// Active gameplay
    Running,
    /// Game is paused
    Paused,
    /// Level cleared, waiting to continue
    LevelComplete,
    /// Run ended (terminal)
    GameOver,
    /// Every level cleared (terminal)
    Victory,
}

impl RunPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunPhase::NotStarted => "not_started",
            RunPhase::LevelIntro => "level_intro",
            RunPhase::Running => "running",
            RunPhase::Paused => "paused",
            RunPhase::LevelComplete => "level_complete",
            RunPhase::GameOver => "game_over",
            RunPhase::Victory => "victory",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunPhase::GameOver | RunPhase::Victory)
    }
}

/// Why the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    /// Drove into an obstacle
    Crash,
    /// Caught in a detonation
    Explosion,
}

/// Deferred work, keyed by level time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledKind {
    /// One-shot bonus pickup drop
    SpawnBonus,
    /// Delayed game over (lets the explosion play)
    GameOver(GameOverCause),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    /// Level time at which the event fires
    pub at_ms: f32,
    pub kind: ScheduledKind,
}

/// Deterministic replacement for wall-clock timeouts.
///
/// Events are advanced only by the level clock and are dropped wholesale on
/// level reset, so a stale event can never leak into another level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventQueue {
    /// Sorted by `at_ms`, insertion order kept for ties
    events: Vec<ScheduledEvent>,
}

impl EventQueue {
    pub fn schedule(&mut self, at_ms: f32, kind: ScheduledKind) {
        let idx = self.events.partition_point(|e| e.at_ms <= at_ms);
        self.events.insert(idx, ScheduledEvent { at_ms, kind });
    }

    /// Remove and return every event due at `now_ms`, earliest first
    pub fn take_due(&mut self, now_ms: f32) -> Vec<ScheduledKind> {
        let due = self.events.partition_point(|e| e.at_ms <= now_ms);
        self.events.drain(..due).map(|e| e.kind).collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledEvent> {
        self.events.iter()
    }
}

/// Something that happened during a tick, for audio/UI collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted,
    LevelIntro { level: u32 },
    LevelStarted { level: u32 },
    PauseToggled { paused: bool },
    Fired,
    ObstacleDestroyed { points: u64, combo: u32 },
    VolatileDetonated { points: u64, combo: u32 },
    ObstaclePassed { points: u64 },
    BonusCollected { lives: u32 },
    PlayerHit { volatile: bool, lives_left: u32 },
    LevelComplete { level: u32, reward: u64 },
    Victory { score: u64, total_reward: u64 },
    GameOver { cause: GameOverCause },
}

/// Score, lives and progression for the current run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub phase: RunPhase,
    /// 1-based level number
    pub current_level: u32,
    pub score: u64,
    pub total_reward: u64,
    pub lives: u32,
    pub combo: u32,
    /// Level time of the last scoring hit
    pub last_hit_ms: Option<f32>,
    pub current_phase_index: usize,
    /// Level clock, advanced only while running
    pub level_elapsed_ms: f32,
    /// Normal obstacles shot down or passed this level
    pub obstacles_cleared: u32,
    /// A fatal hit is waiting on its delayed game over
    pub game_over_pending: bool,
    pub game_over_cause: Option<GameOverCause>,
}

impl RunState {
    pub(crate) fn new(lives: u32) -> Self {
        Self {
            phase: RunPhase::NotStarted,
            current_level: 1,
            score: 0,
            total_reward: 0,
            lives,
            combo: 0,
            last_hit_ms: None,
            current_phase_index: 0,
            level_elapsed_ms: 0.0,
            obstacles_cleared: 0,
            game_over_pending: false,
            game_over_cause: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    pub fn is_paused(&self) -> bool {
        self.phase == RunPhase::Paused
    }

    /// Combo as shown to the player: zero once the window has lapsed
    pub fn live_combo(&self) -> u32 {
        match self.last_hit_ms {
            Some(last) if self.level_elapsed_ms - last < COMBO_WINDOW_MS => self.combo,
            _ => 0,
        }
    }

    /// Clear the per-level counters
    pub(crate) fn reset_level_counters(&mut self) {
        self.combo = 0;
        self.last_hit_ms = None;
        self.current_phase_index = 0;
        self.level_elapsed_ms = 0.0;
        self.obstacles_cleared = 0;
        self.game_over_pending = false;
    }
}

/// Accumulators advanced by elapsed level time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnTimers {
    pub obstacle_ms: f32,
    pub volatile_ms: f32,
    pub bonus_ms: f32,
    /// Counts down to zero; firing is allowed at or below zero
    pub fire_cooldown_ms: f32,
}

/// Values pushed to the HUD collaborator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudState {
    pub phase: RunPhase,
    pub level: u32,
    pub level_name: String,
    pub score: u64,
    pub total_reward: u64,
    pub lives: u32,
    pub combo: u32,
    pub level_elapsed_ms: f32,
    pub level_duration_ms: u32,
    pub obstacles_cleared: u32,
    pub target_obstacles: u32,
    pub game_over_cause: Option<GameOverCause>,
}

/// Read-only view handed to the renderer
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub phase: RunPhase,
    pub lane: &'a Lane,
    pub player: &'a Player,
    pub obstacles: &'a [Obstacle],
    pub projectiles: &'a [Projectile],
    pub bonuses: &'a [BonusPickup],
    pub explosions: &'a [Explosion],
}

/// Complete game session (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub settings: GameSettings,
    pub catalog: LevelCatalog,
    pub lane: Lane,
    pub run: RunState,
    pub player: Player,
    /// Entity stores, each in spawn (id) order
    pub obstacles: Vec<Obstacle>,
    pub projectiles: Vec<Projectile>,
    pub bonuses: Vec<BonusPickup>,
    pub explosions: Vec<Explosion>,
    pub timers: SpawnTimers,
    pub schedule: EventQueue,
    /// Events produced since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    pub rng: Pcg32,
    /// Next entity ID
    next_id: u32,
}

impl GameSession {
    /// Create a session in `NotStarted` after validating the configuration
    pub fn new(settings: GameSettings, catalog: LevelCatalog) -> Result<Self> {
        settings.validate(&catalog)?;

        let lane = settings.lane;
        let color = catalog
            .vehicle(&settings.vehicle_style)
            .map(|v| v.color)
            .unwrap_or(0xff6b6b);
        let lives = settings.damage_mode.starting_lives();

        Ok(Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            player: Player::new(&lane, color),
            run: RunState::new(lives),
            settings,
            catalog,
            lane,
            obstacles: Vec::new(),
            projectiles: Vec::new(),
            bonuses: Vec::new(),
            explosions: Vec::new(),
            timers: SpawnTimers::default(),
            schedule: EventQueue::default(),
            events: Vec::new(),
            next_id: 1,
        })
    }

    /// Session with default settings and the built-in catalog
    pub fn with_defaults() -> Result<Self> {
        Self::new(GameSettings::default(), LevelCatalog::builtin())
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn current_level(&self) -> &Level {
        self.catalog.level(self.run.current_level)
    }

    pub fn theme(&self) -> Option<&Theme> {
        self.catalog.theme(&self.current_level().theme)
    }

    pub fn volatile_count(&self) -> usize {
        self.obstacles.iter().filter(|o| o.is_volatile()).count()
    }

    /// Empty every entity store and per-level timer
    pub(crate) fn clear_level_state(&mut self) {
        self.obstacles.clear();
        self.projectiles.clear();
        self.bonuses.clear();
        self.explosions.clear();
        self.timers = SpawnTimers::default();
        self.schedule.clear();
        self.player = Player::new(&self.lane, self.player.color);
    }

    pub fn hud(&self) -> HudState {
        let level = self.current_level();
        HudState {
            phase: self.run.phase,
            level: self.run.current_level,
            level_name: level.name.clone(),
            score: self.run.score,
            total_reward: self.run.total_reward,
            lives: self.run.lives,
            combo: self.run.live_combo(),
            level_elapsed_ms: self.run.level_elapsed_ms,
            level_duration_ms: level.duration_ms,
            obstacles_cleared: self.run.obstacles_cleared,
            target_obstacles: level.target_obstacles,
            game_over_cause: self.run.game_over_cause,
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.run.phase,
            lane: &self.lane,
            player: &self.player,
            obstacles: &self.obstacles,
            projectiles: &self.projectiles,
            bonuses: &self.bonuses,
            explosions: &self.explosions,
        }
    }
}
