//! Per-tick movement, wall bounces and off-field culling
//!
//! Motion is expressed in pixels per tick and is not scaled by the frame
//! delta; only the timers in the spawner consume elapsed time.

use glam::Vec2;

use super::entity::Lane;
use super::explosion::step_explosions;
use super::state::{GameEvent, GameSession};
use crate::consts::*;

/// Drift sideways, reversing direction at the lane walls
fn drift(pos: &mut Vec2, width: f32, speed_x: f32, direction: &mut f32, lane: &Lane) {
    pos.x += speed_x * *direction;
    if pos.x < lane.x || pos.x + width > lane.right() {
        *direction = -*direction;
        pos.x = lane.clamp_x(pos.x, width);
    }
}

/// Move every entity one tick and cull whatever left the field
pub fn step_motion(session: &mut GameSession) {
    for shot in &mut session.projectiles {
        shot.pos.y -= shot.speed;
    }
    session.projectiles.retain(|p| p.pos.y + p.size.y >= 0.0);

    for obstacle in &mut session.obstacles {
        obstacle.pos.y += obstacle.speed_y;
        let lane = obstacle.lane;
        drift(
            &mut obstacle.pos,
            obstacle.size.x,
            obstacle.speed_x,
            &mut obstacle.direction,
            &lane,
        );
    }

    // Normal obstacles that make it past the bottom count as cleared
    let height = session.lane.height;
    let mut passed = 0u32;
    session.obstacles.retain(|o| {
        if o.pos.y <= height {
            return true;
        }
        if !o.is_volatile() {
            passed += 1;
        }
        false
    });
    for _ in 0..passed {
        session.run.score += PASS_SCORE;
        session.run.obstacles_cleared += 1;
        session.emit(GameEvent::ObstaclePassed { points: PASS_SCORE });
    }

    for bonus in &mut session.bonuses {
        bonus.pos.y += bonus.speed_y;
        bonus.rotation += BONUS_SPIN_PER_TICK;
        let lane = bonus.lane;
        drift(
            &mut bonus.pos,
            bonus.size.x,
            bonus.speed_x,
            &mut bonus.direction,
            &lane,
        );
    }
    session.bonuses.retain(|b| b.pos.y <= height);

    step_explosions(&mut session.explosions);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ObstacleKind;
    use crate::sim::entity::{Obstacle, Projectile};

    fn obstacle(kind: ObstacleKind, x: f32, y: f32, direction: f32) -> Obstacle {
        let lane = Lane::default();
        Obstacle {
            id: 1,
            kind,
            pos: Vec2::new(x, y),
            size: Vec2::new(80.0, 25.0),
            speed_y: 1.0,
            speed_x: 2.0,
            direction,
            lane,
            color: 0,
            score: 30,
        }
    }

    #[test]
    fn obstacle_bounces_off_lane_walls() {
        let mut session = GameSession::with_defaults().unwrap();
        session.obstacles.push(obstacle(ObstacleKind::Small, 519.0, 0.0, 1.0));
        session.obstacles.push(obstacle(ObstacleKind::Small, 201.0, 0.0, -1.0));
        step_motion(&mut session);

        let right = &session.obstacles[0];
        assert_eq!(right.direction, -1.0);
        assert_eq!(right.pos.x, 520.0);
        let left = &session.obstacles[1];
        assert_eq!(left.direction, 1.0);
        assert_eq!(left.pos.x, 200.0);
    }

    #[test]
    fn passing_obstacles_score_and_count() {
        let mut session = GameSession::with_defaults().unwrap();
        session.obstacles.push(obstacle(ObstacleKind::Small, 300.0, 499.5, 1.0));
        session.obstacles.push(obstacle(ObstacleKind::Tnt, 300.0, 499.5, 1.0));
        step_motion(&mut session);

        assert!(session.obstacles.is_empty());
        assert_eq!(session.run.score, PASS_SCORE);
        assert_eq!(session.run.obstacles_cleared, 1);
        assert_eq!(
            session.drain_events(),
            vec![GameEvent::ObstaclePassed { points: PASS_SCORE }]
        );
    }

    #[test]
    fn projectiles_leave_through_the_top() {
        let mut session = GameSession::with_defaults().unwrap();
        session.projectiles.push(Projectile::new(1, Vec2::new(300.0, -5.0)));
        session.projectiles.push(Projectile::new(2, Vec2::new(300.0, 100.0)));
        step_motion(&mut session);
        assert_eq!(session.projectiles.len(), 1);
        assert_eq!(session.projectiles[0].id, 2);
        assert_eq!(session.projectiles[0].pos.y, 92.0);
    }
}
