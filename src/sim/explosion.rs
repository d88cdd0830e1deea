//! Radial particle bursts
//!
//! Purely visual: explosions never affect gameplay, they only ride along in
//! the session so the renderer can draw them next to the entities.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0-1, decreases over time
    pub life: f32,
    /// Life lost per tick
    pub decay: f32,
    pub size: f32,
    pub color: u32,
}

/// One burst
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub origin: Vec2,
    /// 0-1, gates the centre glow
    pub life: f32,
    pub max_radius: f32,
    pub particles: Vec<Particle>,
}

impl Explosion {
    /// Spawn [`EXPLOSION_PARTICLES`] particles evenly around a circle
    pub fn new(origin: Vec2, max_radius: f32, rng: &mut impl Rng) -> Self {
        let count = EXPLOSION_PARTICLES;
        let particles = (0..count)
            .map(|i| {
                let jitter = (rng.random::<f32>() - 0.5) * 0.8;
                let angle = std::f32::consts::TAU * i as f32 / count as f32 + jitter;
                let speed: f32 = rng.random_range(3.0..8.0);
                Particle {
                    pos: origin,
                    vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                    life: 1.0,
                    decay: rng.random_range(0.015..0.04),
                    size: rng.random_range(4.0..10.0),
                    color: EXPLOSION_PALETTE[i % EXPLOSION_PALETTE.len()],
                }
            })
            .collect();

        Self {
            origin,
            life: 1.0,
            max_radius,
            particles,
        }
    }

    /// Centre glow radius for the current life
    pub fn glow_radius(&self) -> f32 {
        self.max_radius * 0.3 * (1.0 - self.life * 0.5)
    }

    /// Advance one tick
    pub fn step(&mut self) {
        self.life -= EXPLOSION_DECAY_PER_TICK;
        for particle in &mut self.particles {
            particle.pos += particle.vel;
            particle.vel *= PARTICLE_DRAG;
            particle.life -= particle.decay;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn is_finished(&self) -> bool {
        self.life <= 0.0
    }
}

/// Advance every explosion and drop the finished ones
pub fn step_explosions(explosions: &mut Vec<Explosion>) {
    for explosion in explosions.iter_mut() {
        explosion.step();
    }
    explosions.retain(|e| !e.is_finished());
}
