//! Level catalog
//!
//! Static, validated game data: obstacle types, themes, vehicle styles and the
//! ordered list of levels with their time phases. Loaded once (built-in or
//! JSON) and only read afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Obstacle type identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    Small,
    Medium,
    Large,
    Fast,
    Slow,
    /// Volatile: detonates on any destructive contact
    Tnt,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 6] = [
        ObstacleKind::Small,
        ObstacleKind::Medium,
        ObstacleKind::Large,
        ObstacleKind::Fast,
        ObstacleKind::Slow,
        ObstacleKind::Tnt,
    ];

    pub fn is_volatile(self) -> bool {
        self == ObstacleKind::Tnt
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ObstacleKind::Small => "small",
            ObstacleKind::Medium => "medium",
            ObstacleKind::Large => "large",
            ObstacleKind::Fast => "fast",
            ObstacleKind::Slow => "slow",
            ObstacleKind::Tnt => "tnt",
        }
    }
}

/// Immutable per-type obstacle parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleTypeSpec {
    pub width: f32,
    pub height: f32,
    /// Vertical pixels per tick before the level multiplier
    pub base_speed: f32,
    /// Multiplier on the level's horizontal drift speed
    #[serde(default = "default_horizontal_factor")]
    pub horizontal_factor: f32,
    pub color: u32,
    pub score: u64,
}

fn default_horizontal_factor() -> f32 {
    1.0
}

/// A time window within a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// Level time at which this phase becomes active
    pub start_offset_ms: u32,
    pub obstacle_spawn_interval_ms: u32,
    /// Obstacle mix, drawn uniformly
    pub obstacle_types: Vec<ObstacleKind>,
    /// Volatile (TNT) spawner
    #[serde(default)]
    pub volatile_spawn_interval_ms: u32,
    #[serde(default)]
    pub volatile_cap: u32,
    /// Phase-driven bonus spawner, only runs while live bonuses < cap
    #[serde(default)]
    pub bonus_spawn_interval_ms: u32,
    #[serde(default)]
    pub bonus_cap: u32,
}

/// Visual theme handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub description: String,
    pub background: u32,
    pub road: u32,
    pub road_alpha: f32,
    pub accent: u32,
}

/// Cosmetic player vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleStyle {
    pub id: String,
    pub name: String,
    pub glyph: String,
    pub color: u32,
}

/// A level definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    /// Key into the catalog's theme table
    pub theme: String,
    pub reward: u64,
    pub duration_ms: u32,
    pub phases: Vec<Phase>,
    /// Obstacles to clear (shot or passed) for early completion
    pub target_obstacles: u32,
}

impl Level {
    /// Active phase for the given level time
    pub fn current_phase(&self, elapsed_ms: f32) -> Option<(usize, &Phase)> {
        current_phase(self, elapsed_ms)
    }
}

/// Resolve the phase active at `elapsed_ms`: the last phase whose start offset
/// has been reached, falling back to the first phase.
///
/// Returns `None` only for a level with no phases, which a validated catalog
/// never contains.
pub fn current_phase(level: &Level, elapsed_ms: f32) -> Option<(usize, &Phase)> {
    level
        .phases
        .iter()
        .enumerate()
        .rev()
        .find(|(_, p)| p.start_offset_ms as f32 <= elapsed_ms)
        .or_else(|| level.phases.first().map(|p| (0, p)))
}

/// Raw catalog shape, as written in JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogData {
    pub obstacle_types: BTreeMap<ObstacleKind, ObstacleTypeSpec>,
    pub themes: BTreeMap<String, Theme>,
    #[serde(default)]
    pub vehicles: Vec<VehicleStyle>,
    pub levels: Vec<Level>,
}

/// Validated level catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CatalogData", into = "CatalogData")]
pub struct LevelCatalog {
    data: CatalogData,
}

impl TryFrom<CatalogData> for LevelCatalog {
    type Error = ConfigError;

    fn try_from(data: CatalogData) -> Result<Self> {
        Self::new(data)
    }
}

impl From<LevelCatalog> for CatalogData {
    fn from(catalog: LevelCatalog) -> Self {
        catalog.data
    }
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LevelCatalog {
    /// Validate and wrap catalog data
    pub fn new(data: CatalogData) -> Result<Self> {
        validate(&data)?;
        log::info!(
            "Level catalog loaded: {} levels, {} themes, {} vehicles",
            data.levels.len(),
            data.themes.len(),
            data.vehicles.len()
        );
        Ok(Self { data })
    }

    /// Parse and validate a JSON catalog
    pub fn from_json(json: &str) -> Result<Self> {
        let data: CatalogData = serde_json::from_str(json)?;
        Self::new(data)
    }

    /// The shipped seven-level campaign
    pub fn builtin() -> Self {
        Self {
            data: builtin_data(),
        }
    }

    pub fn level_count(&self) -> u32 {
        self.data.levels.len() as u32
    }

    /// Level by 1-based number, clamped into the catalog
    pub fn level(&self, number: u32) -> &Level {
        let count = self.data.levels.len();
        let index = (number as usize).clamp(1, count) - 1;
        if index + 1 != number as usize {
            log::warn!("Level {} out of range, clamped to {}", number, index + 1);
        }
        &self.data.levels[index]
    }

    pub fn is_last_level(&self, number: u32) -> bool {
        number >= self.level_count()
    }

    pub fn theme(&self, id: &str) -> Option<&Theme> {
        self.data.themes.get(id)
    }

    pub fn obstacle_type(&self, kind: ObstacleKind) -> Option<&ObstacleTypeSpec> {
        self.data.obstacle_types.get(&kind)
    }

    pub fn vehicle(&self, id: &str) -> Option<&VehicleStyle> {
        self.data.vehicles.iter().find(|v| v.id == id)
    }

    /// Widest obstacle in the type table (lane must fit it)
    pub fn widest_obstacle(&self) -> f32 {
        self.data
            .obstacle_types
            .values()
            .map(|t| t.width)
            .fold(0.0, f32::max)
    }
}

fn validate(data: &CatalogData) -> Result<()> {
    if data.levels.is_empty() {
        return Err(ConfigError::EmptyCatalog);
    }

    for (kind, spec) in &data.obstacle_types {
        if spec.width <= 0.0 || spec.height <= 0.0 || spec.base_speed <= 0.0 {
            return Err(ConfigError::InvalidSetting(format!(
                "obstacle type '{}' needs positive size and speed",
                kind.as_str()
            )));
        }
    }

    for (li, level) in data.levels.iter().enumerate() {
        let level_no = li + 1;
        if level.duration_ms == 0 {
            return Err(ConfigError::ZeroLevelField {
                level: level_no,
                field: "duration_ms",
            });
        }
        if level.target_obstacles == 0 {
            return Err(ConfigError::ZeroLevelField {
                level: level_no,
                field: "target_obstacles",
            });
        }
        if !data.themes.contains_key(&level.theme) {
            return Err(ConfigError::UnknownTheme {
                level: level_no,
                theme: level.theme.clone(),
            });
        }

        let Some(first) = level.phases.first() else {
            return Err(ConfigError::NoPhases { level: level_no });
        };
        if first.start_offset_ms != 0 {
            return Err(ConfigError::FirstPhaseOffset {
                level: level_no,
                offset_ms: first.start_offset_ms,
            });
        }

        let mut prev_offset = None;
        for (pi, phase) in level.phases.iter().enumerate() {
            if prev_offset.is_some_and(|prev| phase.start_offset_ms <= prev) {
                return Err(ConfigError::PhaseOrder {
                    level: level_no,
                    phase: pi,
                    offset_ms: phase.start_offset_ms,
                });
            }
            prev_offset = Some(phase.start_offset_ms);

            if phase.obstacle_types.is_empty() {
                return Err(ConfigError::EmptyObstacleSet {
                    level: level_no,
                    phase: pi,
                });
            }
            let zero = |field| ConfigError::ZeroInterval {
                level: level_no,
                phase: pi,
                field,
            };
            if phase.obstacle_spawn_interval_ms == 0 {
                return Err(zero("obstacle_spawn_interval_ms"));
            }
            if phase.volatile_cap > 0 && phase.volatile_spawn_interval_ms == 0 {
                return Err(zero("volatile_spawn_interval_ms"));
            }
            if phase.bonus_cap > 0 && phase.bonus_spawn_interval_ms == 0 {
                return Err(zero("bonus_spawn_interval_ms"));
            }

            let volatile_needed = (phase.volatile_cap > 0).then_some(ObstacleKind::Tnt);
            for kind in phase.obstacle_types.iter().copied().chain(volatile_needed) {
                if !data.obstacle_types.contains_key(&kind) {
                    return Err(ConfigError::InvalidSetting(format!(
                        "level {}, phase {}: obstacle type '{}' is not defined",
                        level_no,
                        pi,
                        kind.as_str()
                    )));
                }
            }
        }
    }

    Ok(())
}

fn obstacle(width: f32, height: f32, base_speed: f32, color: u32, score: u64) -> ObstacleTypeSpec {
    ObstacleTypeSpec {
        width,
        height,
        base_speed,
        horizontal_factor: 1.0,
        color,
        score,
    }
}

fn theme(name: &str, description: &str, background: u32, road: (u32, f32), accent: u32) -> Theme {
    Theme {
        name: name.to_string(),
        description: description.to_string(),
        background,
        road: road.0,
        road_alpha: road.1,
        accent,
    }
}

fn vehicle(id: &str, name: &str, glyph: &str, color: u32) -> VehicleStyle {
    VehicleStyle {
        id: id.to_string(),
        name: name.to_string(),
        glyph: glyph.to_string(),
        color,
    }
}

/// Phase-driven bonus spawner settings shared by all built-in phases
const BONUS_INTERVAL_MS: u32 = 20_000;
const BONUS_CAP: u32 = 1;

fn phase(
    start_offset_ms: u32,
    obstacle_spawn_interval_ms: u32,
    obstacle_types: &[ObstacleKind],
    volatile_spawn_interval_ms: u32,
    volatile_cap: u32,
) -> Phase {
    Phase {
        start_offset_ms,
        obstacle_spawn_interval_ms,
        obstacle_types: obstacle_types.to_vec(),
        volatile_spawn_interval_ms,
        volatile_cap,
        bonus_spawn_interval_ms: BONUS_INTERVAL_MS,
        bonus_cap: BONUS_CAP,
    }
}

fn level(
    name: &str,
    theme: &str,
    reward: u64,
    duration_ms: u32,
    target_obstacles: u32,
    phases: Vec<Phase>,
) -> Level {
    Level {
        name: name.to_string(),
        theme: theme.to_string(),
        reward,
        duration_ms,
        target_obstacles,
        phases,
    }
}

fn builtin_data() -> CatalogData {
    use ObstacleKind::*;

    let mut obstacle_types = BTreeMap::new();
    obstacle_types.insert(Small, obstacle(80.0, 25.0, 1.2, 0xff6b6b, 30));
    obstacle_types.insert(Medium, obstacle(120.0, 30.0, 1.0, 0xff6b6b, 50));
    obstacle_types.insert(Large, obstacle(180.0, 35.0, 0.8, 0xee5a6f, 70));
    obstacle_types.insert(
        Fast,
        ObstacleTypeSpec {
            horizontal_factor: 1.5,
            ..obstacle(100.0, 25.0, 1.5, 0xff4757, 60)
        },
    );
    obstacle_types.insert(Slow, obstacle(150.0, 30.0, 0.6, 0xff6b6b, 40));
    obstacle_types.insert(
        Tnt,
        ObstacleTypeSpec {
            horizontal_factor: 0.6,
            ..obstacle(40.0, 40.0, 0.8, 0xc44569, 50)
        },
    );

    let mut themes = BTreeMap::new();
    themes.insert(
        "training".to_string(),
        theme("Training", "Slow obstacles, learn the controls", 0x2d3436, (0x646464, 0.4), 0x4ecdc4),
    );
    themes.insert(
        "speed".to_string(),
        theme("Speed Trial", "Fast obstacles test your reflexes", 0x1a1a2e, (0xff6b6b, 0.3), 0xff6b6b),
    );
    themes.insert(
        "dense".to_string(),
        theme("Rush Hour", "Dense waves of obstacles", 0x16213e, (0xfeca57, 0.3), 0xfeca57),
    );
    themes.insert(
        "mixed".to_string(),
        theme("Mixed Traffic", "Every obstacle type at once", 0x2d1b3d, (0xff9ff3, 0.3), 0xff9ff3),
    );
    themes.insert(
        "wave".to_string(),
        theme("Wave Mode", "Obstacles arrive in rhythmic waves", 0x1e3a5f, (0x54a0ff, 0.3), 0x54a0ff),
    );
    themes.insert(
        "extreme".to_string(),
        theme("Extreme", "High speed and high density", 0x3d1a1a, (0xff4757, 0.4), 0xff4757),
    );
    themes.insert(
        "boss".to_string(),
        theme("Final Boss", "Every mechanic stacked together", 0x1a1a1a, (0xffd700, 0.4), 0xffd700),
    );

    let vehicles = vec![
        vehicle("sedan", "Red Sedan", "🚗", 0xff6b6b),
        vehicle("sports", "Sports Car", "🏎️", 0xfeca57),
        vehicle("suv", "SUV", "🚙", 0x4ecdc4),
        vehicle("taxi", "Taxi", "🚕", 0xff9ff3),
        vehicle("police", "Police", "🚓", 0x54a0ff),
    ];

    let levels = vec![
        level("Training", "training", 100, 30_000, 10, vec![
            phase(0, 2500, &[Medium, Slow], 6000, 1),
            phase(15_000, 2000, &[Medium, Small], 5000, 2),
        ]),
        level("Speed Trial", "speed", 200, 40_000, 15, vec![
            phase(0, 1800, &[Fast, Small], 4500, 2),
            phase(20_000, 1500, &[Fast, Medium], 4000, 3),
        ]),
        level("Rush Hour", "dense", 300, 50_000, 20, vec![
            phase(0, 1200, &[Small, Medium], 4000, 3),
            phase(25_000, 1000, &[Small, Medium, Large], 3500, 4),
        ]),
        level("Mixed Traffic", "mixed", 500, 60_000, 25, vec![
            phase(0, 1500, &[Medium, Fast], 3500, 4),
            phase(20_000, 1200, &[Small, Medium, Fast], 3000, 5),
            phase(40_000, 1000, &[Small, Medium, Large, Fast], 2500, 6),
        ]),
        level("Wave Mode", "wave", 1000, 70_000, 30, vec![
            phase(0, 1000, &[Medium, Large], 3000, 5),
            phase(23_000, 800, &[Fast, Medium], 2500, 6),
            phase(46_000, 600, &[Small, Fast, Large], 2000, 7),
        ]),
        level("Extreme", "extreme", 1500, 80_000, 35, vec![
            phase(0, 900, &[Fast, Small], 2500, 6),
            phase(26_000, 700, &[Fast, Medium, Small], 2000, 7),
            phase(52_000, 500, &[Fast, Small, Medium, Large], 1800, 8),
        ]),
        level("Final Boss", "boss", 2000, 90_000, 40, vec![
            phase(0, 800, &[Medium, Fast], 2200, 7),
            phase(30_000, 600, &[Fast, Small, Large], 1800, 8),
            phase(60_000, 400, &[Small, Fast, Medium, Large], 1500, 10),
        ]),
    ];

    CatalogData {
        obstacle_types,
        themes,
        vehicles,
        levels,
    }
}
