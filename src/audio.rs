//! Sound effect triggers
//!
//! The simulation only reports [`GameEvent`]s. This module maps them to
//! effects and hands them to a platform [`SoundSink`] with the mixed volume.

use crate::settings::GameSettings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Projectile fired
    Shoot,
    /// Obstacle shot down
    Hit,
    /// Volatile obstacle detonated
    Explosion,
    /// Player drove into an obstacle
    Crash,
    LevelComplete,
    Victory,
    GameOver,
    /// Chained hit, carries the combo count
    Combo(u32),
    /// Menu confirm, pause and pickups
    Button,
}

impl SoundEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Shoot => "shoot",
            SoundEffect::Hit => "hit",
            SoundEffect::Explosion => "explosion",
            SoundEffect::Crash => "crash",
            SoundEffect::LevelComplete => "level_complete",
            SoundEffect::Victory => "victory",
            SoundEffect::GameOver => "game_over",
            SoundEffect::Combo(_) => "combo",
            SoundEffect::Button => "button",
        }
    }
}

/// Effect to play for a simulation event, if any
pub fn effect_for(event: &GameEvent) -> Option<SoundEffect> {
    let effect = match *event {
        GameEvent::Fired => SoundEffect::Shoot,
        GameEvent::ObstacleDestroyed { combo, .. } if combo > 1 => SoundEffect::Combo(combo),
        GameEvent::ObstacleDestroyed { .. } => SoundEffect::Hit,
        GameEvent::VolatileDetonated { .. } => SoundEffect::Explosion,
        GameEvent::BonusCollected { .. } => SoundEffect::Button,
        GameEvent::PlayerHit { volatile: true, .. } => SoundEffect::Explosion,
        GameEvent::PlayerHit { volatile: false, .. } => SoundEffect::Crash,
        GameEvent::LevelComplete { .. } => SoundEffect::LevelComplete,
        GameEvent::Victory { .. } => SoundEffect::Victory,
        GameEvent::GameOver { .. } => SoundEffect::GameOver,
        GameEvent::PauseToggled { .. } | GameEvent::LevelStarted { .. } => SoundEffect::Button,
        GameEvent::RunStarted | GameEvent::LevelIntro { .. } | GameEvent::ObstaclePassed { .. } => {
            return None;
        }
    };
    Some(effect)
}

/// Platform audio backend
pub trait SoundSink {
    /// Play `effect` at `volume` (0.0 - 1.0)
    fn play_effect(&mut self, effect: SoundEffect, volume: f32);
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogSink;

impl SoundSink for LogSink {
    fn play_effect(&mut self, effect: SoundEffect, volume: f32) {
        match effect {
            SoundEffect::Combo(n) => log::debug!("sfx combo x{} @ {:.2}", n, volume),
            other => log::debug!("sfx {} @ {:.2}", other.as_str(), volume),
        }
    }
}

/// Audio manager for the game
pub struct AudioManager<S: SoundSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: SoundSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Manager with the volumes from `settings`
    pub fn from_settings(sink: S, settings: &GameSettings) -> Self {
        let mut audio = Self::new(sink);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play_effect(effect, vol);
    }

    /// Play the effects for a batch of simulation events
    pub fn play_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(effect_for) {
            self.play(effect);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
