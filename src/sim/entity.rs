//! Entity types held by the session's entity stores

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::catalog::ObstacleKind;
use crate::consts::*;

/// The vertical corridor obstacles travel in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    /// Left edge
    pub x: f32,
    pub width: f32,
    /// Field height (entities past it are off-screen)
    pub height: f32,
}

impl Default for Lane {
    fn default() -> Self {
        Self {
            x: LANE_X,
            width: LANE_WIDTH,
            height: FIELD_HEIGHT,
        }
    }
}

impl Lane {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Clamp a left edge so an entity of `width` stays inside the lane
    pub fn clamp_x(&self, x: f32, width: f32) -> f32 {
        x.min(self.right() - width).max(self.x)
    }

    /// Whether an entity of `width` at `x` is fully inside the lane
    pub fn contains(&self, x: f32, width: f32) -> bool {
        x >= self.x && x + width <= self.right()
    }
}

/// Axis-aligned box (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Strict overlap: boxes that only share an edge do not collide
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.pos.x < other.pos.x + other.size.x
            && self.pos.x + self.size.x > other.pos.x
            && self.pos.y < other.pos.y + other.size.y
            && self.pos.y + self.size.y > other.pos.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// The player's vehicle, pinned to the bottom of the lane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal pixels per tick
    pub speed: f32,
    pub color: u32,
}

impl Player {
    /// Place the vehicle at the bottom centre of the lane
    pub fn new(lane: &Lane, color: u32) -> Self {
        let size = Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT);
        Self {
            pos: Vec2::new(
                lane.center_x() - size.x / 2.0,
                lane.height - size.y - PLAYER_BOTTOM_MARGIN,
            ),
            size,
            speed: PLAYER_SPEED,
            color,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Move left/right for one tick, staying inside the lane
    pub fn steer(&mut self, left: bool, right: bool, lane: &Lane) {
        if left {
            self.pos.x -= self.speed;
        }
        if right {
            self.pos.x += self.speed;
        }
        self.pos.x = lane.clamp_x(self.pos.x, self.size.x);
    }

    /// Where a fired projectile appears (top centre)
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0 - PROJECTILE_WIDTH / 2.0, self.pos.y)
    }
}

/// A descending obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Downward pixels per tick
    pub speed_y: f32,
    /// Sideways pixels per tick
    pub speed_x: f32,
    /// -1.0 (left) or +1.0 (right)
    pub direction: f32,
    pub lane: Lane,
    pub color: u32,
    pub score: u64,
}

impl Obstacle {
    pub fn is_volatile(&self) -> bool {
        self.kind.is_volatile()
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// A player shot, travelling straight up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Upward pixels per tick
    pub speed: f32,
}

impl Projectile {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            size: Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            speed: PROJECTILE_SPEED,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// An extra-life pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusPickup {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed_y: f32,
    pub speed_x: f32,
    pub direction: f32,
    pub lane: Lane,
    /// Cosmetic spin (radians)
    pub rotation: f32,
}

impl BonusPickup {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let right = Aabb::new(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        let below = Aabb::new(Vec2::new(0.0, 10.0), Vec2::new(10.0, 10.0));
        let inside = Aabb::new(Vec2::new(9.9, 9.9), Vec2::new(1.0, 1.0));
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn player_starts_bottom_centre_and_stays_in_lane() {
        let lane = Lane::default();
        let mut player = Player::new(&lane, 0xff6b6b);
        assert_eq!(player.pos, Vec2::new(380.0, 465.0));

        for _ in 0..200 {
            player.steer(true, false, &lane);
        }
        assert_eq!(player.pos.x, lane.x);

        for _ in 0..200 {
            player.steer(false, true, &lane);
        }
        assert_eq!(player.pos.x, lane.right() - player.size.x);
    }

    #[test]
    fn muzzle_is_top_centre() {
        let player = Player::new(&Lane::default(), 0);
        assert_eq!(player.muzzle(), Vec2::new(397.0, 465.0));
    }
}
