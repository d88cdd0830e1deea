//! Collision detection and response
//!
//! Passes run in a fixed order each tick: shots against normal obstacles,
//! shots against volatile obstacles, shots against bonus pickups, then the
//! player against obstacles, pickups and volatiles. Every overlap test is a
//! strict AABB check, see [`Aabb::overlaps`](super::entity::Aabb::overlaps).

use super::damage::{DamageModel, HitOutcome};
use super::entity::Obstacle;
use super::explosion::Explosion;
use super::state::{GameEvent, GameOverCause, GameSession, RunState, ScheduledKind};
use crate::consts::*;

/// Record a scoring hit at the current level time and return the new combo
pub fn register_scoring_hit(run: &mut RunState) -> u32 {
    let now = run.level_elapsed_ms;
    run.combo = match run.last_hit_ms {
        Some(last) if now - last < COMBO_WINDOW_MS => run.combo + 1,
        _ => 1,
    };
    run.last_hit_ms = Some(now);
    run.combo
}

/// Extra points for a combo; nothing for a single hit
pub fn combo_bonus(combo: u32, per_step: u64) -> u64 {
    if combo > 1 { combo as u64 * per_step } else { 0 }
}

/// Resolve every collision for this tick
pub fn resolve_collisions(session: &mut GameSession) {
    shoot_obstacles(session, false);
    shoot_obstacles(session, true);
    shoot_bonuses(session);

    if session.run.game_over_pending || !session.run.is_running() {
        return;
    }
    if player_hits_obstacle(session) && !session.run.is_running() {
        return;
    }
    player_collects_bonus(session);
    player_hits_volatile(session);
}

/// Each shot removes at most one target, the first in spawn order
fn shoot_obstacles(session: &mut GameSession, volatile: bool) {
    let mut i = 0;
    while i < session.projectiles.len() {
        let shot = session.projectiles[i].bounds();
        let hit = session
            .obstacles
            .iter()
            .position(|o| o.is_volatile() == volatile && shot.overlaps(&o.bounds()));

        let Some(j) = hit else {
            i += 1;
            continue;
        };
        session.projectiles.remove(i);
        let obstacle = session.obstacles.remove(j);
        if volatile {
            detonate(session, &obstacle);
        } else {
            destroy(session, &obstacle);
        }
    }
}

fn destroy(session: &mut GameSession, obstacle: &Obstacle) {
    let combo = register_scoring_hit(&mut session.run);
    let points = obstacle.score + combo_bonus(combo, COMBO_BONUS_OBSTACLE);
    session.run.score += points;
    session.run.obstacles_cleared += 1;
    log::debug!("Obstacle #{} destroyed: +{} (combo {})", obstacle.id, points, combo);
    session.emit(GameEvent::ObstacleDestroyed { points, combo });
}

fn detonate(session: &mut GameSession, obstacle: &Obstacle) {
    let combo = register_scoring_hit(&mut session.run);
    let points = obstacle.score + combo_bonus(combo, COMBO_BONUS_VOLATILE);
    session.run.score += points;
    let explosion = Explosion::new(
        obstacle.bounds().center(),
        SHOT_EXPLOSION_RADIUS,
        &mut session.rng,
    );
    session.explosions.push(explosion);
    log::debug!("Volatile #{} detonated: +{} (combo {})", obstacle.id, points, combo);
    session.emit(GameEvent::VolatileDetonated { points, combo });
}

fn shoot_bonuses(session: &mut GameSession) {
    let mut i = 0;
    while i < session.projectiles.len() {
        let shot = session.projectiles[i].bounds();
        let Some(j) = session
            .bonuses
            .iter()
            .position(|b| shot.overlaps(&b.bounds()))
        else {
            i += 1;
            continue;
        };
        session.projectiles.remove(i);
        session.bonuses.remove(j);
        collect_bonus(session);
    }
}

fn collect_bonus(session: &mut GameSession) {
    session.settings.damage_mode.grant_life(&mut session.run.lives);
    log::info!("Bonus collected, lives: {}", session.run.lives);
    session.emit(GameEvent::BonusCollected {
        lives: session.run.lives,
    });
}

/// Returns true if a normal obstacle was hit
fn player_hits_obstacle(session: &mut GameSession) -> bool {
    let player = session.player.bounds();
    let Some(j) = session
        .obstacles
        .iter()
        .position(|o| !o.is_volatile() && player.overlaps(&o.bounds()))
    else {
        return false;
    };
    session.obstacles.remove(j);

    let outcome = session.settings.damage_mode.apply_hit(&mut session.run.lives);
    session.emit(GameEvent::PlayerHit {
        volatile: false,
        lives_left: session.run.lives,
    });
    match outcome {
        HitOutcome::Survived { lives_left } => {
            log::info!("Player hit an obstacle, {} lives left", lives_left);
        }
        HitOutcome::Fatal => session.trigger_game_over(GameOverCause::Crash),
    }
    true
}

fn player_collects_bonus(session: &mut GameSession) {
    let player = session.player.bounds();
    if let Some(j) = session
        .bonuses
        .iter()
        .position(|b| player.overlaps(&b.bounds()))
    {
        session.bonuses.remove(j);
        collect_bonus(session);
    }
}

fn player_hits_volatile(session: &mut GameSession) {
    let player = session.player.bounds();
    let Some(j) = session
        .obstacles
        .iter()
        .position(|o| o.is_volatile() && player.overlaps(&o.bounds()))
    else {
        return;
    };
    session.obstacles.remove(j);

    let explosion = Explosion::new(player.center(), CONTACT_EXPLOSION_RADIUS, &mut session.rng);
    session.explosions.push(explosion);

    let outcome = session.settings.damage_mode.apply_hit(&mut session.run.lives);
    session.emit(GameEvent::PlayerHit {
        volatile: true,
        lives_left: session.run.lives,
    });
    match outcome {
        HitOutcome::Survived { lives_left } => {
            log::info!("Player caught in a detonation, {} lives left", lives_left);
        }
        HitOutcome::Fatal => {
            // Let the explosion play before the run ends
            let at_ms = session.run.level_elapsed_ms + DETONATION_GAME_OVER_DELAY_MS;
            session.run.game_over_pending = true;
            session.run.game_over_cause = Some(GameOverCause::Explosion);
            session
                .schedule
                .schedule(at_ms, ScheduledKind::GameOver(GameOverCause::Explosion));
            log::info!("Fatal detonation, game over at {:.0} ms", at_ms);
        }
    }
}
