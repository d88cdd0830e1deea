//! Spawning: phase-driven obstacle, volatile and bonus timers, one-shot bonus
//! drops and the rate-limited fire action.

use glam::Vec2;
use rand::Rng;

use super::damage::DamageModel;
use super::entity::{BonusPickup, Obstacle, Projectile};
use super::state::{GameEvent, GameSession, ScheduledKind};
use crate::catalog::ObstacleKind;
use crate::consts::*;
use crate::level_scale;

/// Vertical speed gain per level
const LEVEL_SPEED_STEP: f32 = 0.2;
/// Horizontal drift gain per level
const LEVEL_DRIFT_STEP: f32 = 0.15;
const BONUS_SPEED_STEP: f32 = 0.15;
const BONUS_DRIFT_STEP: f32 = 0.1;

/// Copy of the active phase's rates (keeps the catalog borrow short)
#[derive(Debug, Clone, Copy)]
struct PhaseRates {
    index: usize,
    obstacle_interval: f32,
    volatile_interval: f32,
    volatile_cap: usize,
    bonus_interval: f32,
    bonus_cap: usize,
}

fn phase_rates(session: &GameSession) -> Option<PhaseRates> {
    let level = session.catalog.level(session.run.current_level);
    let (index, phase) = level.current_phase(session.run.level_elapsed_ms)?;
    Some(PhaseRates {
        index,
        obstacle_interval: phase.obstacle_spawn_interval_ms as f32,
        volatile_interval: phase.volatile_spawn_interval_ms as f32,
        volatile_cap: phase.volatile_cap as usize,
        bonus_interval: phase.bonus_spawn_interval_ms as f32,
        bonus_cap: phase.bonus_cap as usize,
    })
}

/// Advance the fire cooldown, fire if requested, and run the spawn timers
pub fn step_spawner(session: &mut GameSession, dt_ms: f32, fire: bool) {
    if session.timers.fire_cooldown_ms > 0.0 {
        session.timers.fire_cooldown_ms -= dt_ms;
    }
    if fire {
        try_fire(session);
    }

    let Some(rates) = phase_rates(session) else {
        log::warn!(
            "Level {} has no phase at {} ms, skipping spawns",
            session.run.current_level,
            session.run.level_elapsed_ms
        );
        return;
    };

    if rates.index != session.run.current_phase_index {
        log::info!(
            "Level {} entering phase {} at {:.0} ms",
            session.run.current_level,
            rates.index,
            session.run.level_elapsed_ms
        );
        session.run.current_phase_index = rates.index;
    }

    // Obstacles: hard reset after each spawn, remainder discarded
    session.timers.obstacle_ms += dt_ms;
    if session.timers.obstacle_ms >= rates.obstacle_interval {
        if let Some(kind) = pick_obstacle_kind(session) {
            spawn_obstacle(session, kind);
        }
        session.timers.obstacle_ms = 0.0;
    }

    // Volatile obstacles: timer only runs below the cap
    if session.volatile_count() < rates.volatile_cap {
        session.timers.volatile_ms += dt_ms;
        if session.timers.volatile_ms >= rates.volatile_interval {
            spawn_obstacle(session, ObstacleKind::Tnt);
            session.timers.volatile_ms = 0.0;
        }
    }

    // Bonus pickups: timer only runs below the cap
    if session.settings.damage_mode.offers_extra_lives() && session.bonuses.len() < rates.bonus_cap
    {
        session.timers.bonus_ms += dt_ms;
        if session.timers.bonus_ms >= rates.bonus_interval {
            spawn_bonus(session);
            session.timers.bonus_ms = 0.0;
        }
    }
}

/// Fire a projectile unless the cooldown is still running
pub fn try_fire(session: &mut GameSession) -> bool {
    if session.timers.fire_cooldown_ms > 0.0 {
        return false;
    }
    let id = session.next_entity_id();
    let muzzle = session.player.muzzle();
    session.projectiles.push(Projectile::new(id, muzzle));
    session.timers.fire_cooldown_ms = FIRE_COOLDOWN_MS;
    session.emit(GameEvent::Fired);
    true
}

/// Draw a kind uniformly from the active phase's obstacle set
fn pick_obstacle_kind(session: &mut GameSession) -> Option<ObstacleKind> {
    let level = session.catalog.level(session.run.current_level);
    let (_, phase) = level.current_phase(session.run.level_elapsed_ms)?;
    let types = &phase.obstacle_types;
    if types.is_empty() {
        return None;
    }
    let i = session.rng.random_range(0..types.len());
    Some(types[i])
}

/// Spawn one obstacle just above the lane at a random horizontal offset
pub fn spawn_obstacle(session: &mut GameSession, kind: ObstacleKind) -> Option<u32> {
    let Some(spec) = session.catalog.obstacle_type(kind).copied() else {
        log::warn!("Obstacle type '{}' missing from catalog", kind.as_str());
        return None;
    };

    let level = session.run.current_level;
    let lane = session.lane;
    let x = lane.x + session.rng.random::<f32>() * (lane.width - spec.width).max(0.0);
    let direction = if session.rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let id = session.next_entity_id();

    session.obstacles.push(Obstacle {
        id,
        kind,
        pos: Vec2::new(x, -spec.height),
        size: Vec2::new(spec.width, spec.height),
        speed_y: spec.base_speed * level_scale(level, LEVEL_SPEED_STEP),
        speed_x: level_scale(level, LEVEL_DRIFT_STEP) * spec.horizontal_factor,
        direction,
        lane,
        color: spec.color,
        score: spec.score,
    });
    log::debug!("Spawned {} obstacle #{} at x={:.0}", kind.as_str(), id, x);
    Some(id)
}

/// Spawn one bonus pickup just above the lane
pub fn spawn_bonus(session: &mut GameSession) -> u32 {
    let level = session.run.current_level;
    let lane = session.lane;
    let x = lane.x + session.rng.random::<f32>() * (lane.width - BONUS_SIZE).max(0.0);
    let direction = if session.rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let id = session.next_entity_id();

    session.bonuses.push(BonusPickup {
        id,
        pos: Vec2::new(x, -BONUS_SIZE),
        size: Vec2::splat(BONUS_SIZE),
        speed_y: BONUS_BASE_SPEED * level_scale(level, BONUS_SPEED_STEP),
        speed_x: BONUS_BASE_DRIFT * level_scale(level, BONUS_DRIFT_STEP),
        direction,
        lane,
        rotation: 0.0,
    });
    log::debug!("Spawned bonus #{} at x={:.0}", id, x);
    id
}

/// Queue the two one-shot bonus drops for the level about to start
pub fn schedule_level_bonuses(session: &mut GameSession) {
    if !session.settings.damage_mode.offers_extra_lives() {
        return;
    }
    for (lo, hi) in [FIRST_BONUS_WINDOW_MS, SECOND_BONUS_WINDOW_MS] {
        let at_ms = session.rng.random_range(lo..hi);
        session.schedule.schedule(at_ms, ScheduledKind::SpawnBonus);
        log::debug!("Bonus drop scheduled at {:.0} ms", at_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::RunPhase;

    fn running_session() -> GameSession {
        let mut session = GameSession::with_defaults().unwrap();
        session.run.phase = RunPhase::Running;
        session
    }

    #[test]
    fn obstacle_timer_hard_resets() {
        let mut session = running_session();
        // 2400 + 200 overshoots 2500; remainder must not carry over
        step_spawner(&mut session, 2400.0, false);
        assert!(session.obstacles.is_empty());
        step_spawner(&mut session, 200.0, false);
        assert_eq!(session.obstacles.len(), 1);
        assert_eq!(session.timers.obstacle_ms, 0.0);
        step_spawner(&mut session, 2400.0, false);
        assert_eq!(session.obstacles.len(), 1);
    }

    #[test]
    fn spawned_obstacle_uses_phase_types_and_level_scaling() {
        let mut session = running_session();
        session.run.current_level = 3;
        for _ in 0..20 {
            let kind = pick_obstacle_kind(&mut session).unwrap();
            assert!(matches!(kind, ObstacleKind::Small | ObstacleKind::Medium));
        }

        let id = spawn_obstacle(&mut session, ObstacleKind::Fast).unwrap();
        let o = session.obstacles.iter().find(|o| o.id == id).unwrap();
        assert!((o.speed_y - 1.5 * 1.4).abs() < 1e-5);
        assert!((o.speed_x - 1.3 * 1.5).abs() < 1e-5);
        assert!(o.direction == 1.0 || o.direction == -1.0);
        assert!(session.lane.contains(o.pos.x, o.size.x));
        assert_eq!(o.pos.y, -o.size.y);
    }

    #[test]
    fn volatile_spawner_respects_cap() {
        let mut session = running_session();
        // Level 1 phase 0: one TNT every 6000 ms, cap 1
        for _ in 0..20 {
            step_spawner(&mut session, 1000.0, false);
        }
        assert_eq!(session.volatile_count(), 1);
    }

    #[test]
    fn bonus_spawner_respects_cap_and_mode() {
        let mut session = running_session();
        for _ in 0..50 {
            step_spawner(&mut session, 1000.0, false);
        }
        assert_eq!(session.bonuses.len(), 1);

        let mut settings = session.settings.clone();
        settings.damage_mode = crate::sim::damage::DamageMode::InstantDeath;
        let mut session =
            GameSession::new(settings, crate::catalog::LevelCatalog::builtin()).unwrap();
        session.run.phase = RunPhase::Running;
        for _ in 0..50 {
            step_spawner(&mut session, 1000.0, false);
        }
        assert!(session.bonuses.is_empty());
    }

    #[test]
    fn fire_is_rate_limited() {
        let mut session = running_session();
        step_spawner(&mut session, 16.0, true);
        assert_eq!(session.projectiles.len(), 1);
        // 150 ms after the shot: still cooling down
        step_spawner(&mut session, 150.0, true);
        assert_eq!(session.projectiles.len(), 1);
        // 210 ms after the shot: ready again
        step_spawner(&mut session, 60.0, true);
        assert_eq!(session.projectiles.len(), 2);
        assert_eq!(session.timers.fire_cooldown_ms, FIRE_COOLDOWN_MS);
    }

    #[test]
    fn level_bonuses_land_in_their_windows() {
        let mut session = running_session();
        schedule_level_bonuses(&mut session);
        let times: Vec<f32> = session.schedule.iter().map(|e| e.at_ms).collect();
        assert_eq!(times.len(), 2);
        assert!((5_000.0..10_000.0).contains(&times[0]));
        assert!((15_000.0..25_000.0).contains(&times[1]));
    }
}
