//! Demo mode: a simple AI that plays the game
//!
//! Produces the same boolean intents a human would, so the simulation stays
//! deterministic for a given seed.

use super::entity::Aabb;
use super::state::GameSession;
use super::tick::TickInput;

/// How far above the player an obstacle counts as a threat (px)
const DANGER_ZONE: f32 = 140.0;
/// Extra clearance kept when dodging (px)
const DODGE_MARGIN: f32 = 8.0;
/// Don't steer for offsets smaller than one step
const DEADZONE: f32 = 4.0;

fn same_column(a: &Aabb, b: &Aabb, margin: f32) -> bool {
    a.pos.x - margin < b.pos.x + b.size.x && a.pos.x + a.size.x + margin > b.pos.x
}

/// Replace the movement and fire intents in `input` with the AI's choice
pub fn autopilot_input(session: &GameSession, input: &TickInput) -> TickInput {
    let lane = &session.lane;
    let player = session.player.bounds();
    let player_x = player.center().x;

    // Shoot anything lined up above us
    let fire = session
        .obstacles
        .iter()
        .map(|o| o.bounds())
        .chain(session.bonuses.iter().map(|b| b.bounds()))
        .any(|b| b.pos.y < player.pos.y && same_column(&player, &b, 0.0));

    // Closest obstacle that will reach us soon
    let threat = session
        .obstacles
        .iter()
        .map(|o| o.bounds())
        .filter(|b| {
            b.pos.y + b.size.y > player.pos.y - DANGER_ZONE
                && b.pos.y < player.pos.y + player.size.y
                && same_column(&player, b, DODGE_MARGIN)
        })
        .max_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let target_x = if let Some(t) = threat {
        // Dodge toward whichever side has more room
        let left_room = t.pos.x - lane.x;
        let right_room = lane.right() - (t.pos.x + t.size.x);
        if left_room >= right_room {
            t.pos.x - DODGE_MARGIN - player.size.x / 2.0
        } else {
            t.pos.x + t.size.x + DODGE_MARGIN + player.size.x / 2.0
        }
    } else if let Some(bonus) = session.bonuses.iter().max_by(|a, b| {
        a.pos
            .y
            .partial_cmp(&b.pos.y)
            .unwrap_or(std::cmp::Ordering::Equal)
    }) {
        bonus.bounds().center().x
    } else {
        // Wander around the middle to avoid perfect loops
        let time_factor = session.run.level_elapsed_ms * 0.001;
        let offset = (time_factor.sin() * 0.3 + (time_factor * 0.7).sin() * 0.15) * lane.width;
        lane.center_x() + offset
    };

    TickInput {
        left: target_x < player_x - DEADZONE,
        right: target_x > player_x + DEADZONE,
        fire,
        ..input.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ObstacleKind;
    use crate::sim::entity::Obstacle;
    use glam::Vec2;

    fn add_obstacle(session: &mut GameSession, x: f32, y: f32) {
        let id = session.next_entity_id();
        session.obstacles.push(Obstacle {
            id,
            kind: ObstacleKind::Small,
            pos: Vec2::new(x, y),
            size: Vec2::new(80.0, 25.0),
            speed_y: 1.0,
            speed_x: 0.0,
            direction: 1.0,
            lane: session.lane,
            color: 0,
            score: 30,
        });
    }

    #[test]
    fn fires_at_obstacles_in_column() {
        let mut session = GameSession::with_defaults().unwrap();
        add_obstacle(&mut session, 360.0, 50.0);
        let input = autopilot_input(&session, &TickInput::default());
        assert!(input.fire);
    }

    #[test]
    fn dodges_close_threats() {
        let mut session = GameSession::with_defaults().unwrap();
        // Player spans 380..420; obstacle leans right of centre
        add_obstacle(&mut session, 390.0, 400.0);
        let input = autopilot_input(&session, &TickInput::default());
        assert!(input.left);
        assert!(!input.right);
    }

    #[test]
    fn keeps_one_shot_intents() {
        let session = GameSession::with_defaults().unwrap();
        let input = TickInput {
            pause: true,
            confirm: true,
            ..Default::default()
        };
        let out = autopilot_input(&session, &input);
        assert!(out.pause);
        assert!(out.confirm);
    }
}
