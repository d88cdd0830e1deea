//! Platform abstraction layer
//!
//! The simulation never talks to a screen, speaker or keyboard directly.
//! A platform supplies these collaborators and [`GameLoop`] drives them:
//! - [`InputSource`]: boolean intents sampled once per frame
//! - [`Renderer`]: draws a read-only [`Snapshot`]
//! - [`HudSink`]: receives HUD values when they change
//! - [`SoundSink`](crate::audio::SoundSink): plays effects

pub mod clock;
pub mod headless;

pub use clock::{FrameClock, FrameSteps};
pub use headless::{AutoplayInput, HeadlessFrontend};

use crate::audio::{AudioManager, SoundSink};
use crate::catalog::Theme;
use crate::sim::{GameSession, HudState, Snapshot, TickInput, tick};

pub trait InputSource {
    fn poll(&mut self) -> TickInput;
}

impl<F: FnMut() -> TickInput> InputSource for F {
    fn poll(&mut self) -> TickInput {
        self()
    }
}

pub trait Renderer {
    fn render(&mut self, snapshot: &Snapshot<'_>, theme: &Theme);
}

pub trait HudSink {
    fn on_ui_update(&mut self, hud: &HudState);
}

/// Frame driver: samples input, ticks, then feeds audio, renderer and HUD
pub struct GameLoop<S: SoundSink> {
    pub session: GameSession,
    pub audio: AudioManager<S>,
    clock: FrameClock,
    /// Input carried to the next tick; one-shots stay set until consumed
    pending: TickInput,
    last_hud: Option<HudState>,
    frames: u64,
}

impl<S: SoundSink> GameLoop<S> {
    pub fn new(session: GameSession, sink: S) -> Self {
        let audio = AudioManager::from_settings(sink, &session.settings);
        let clock = FrameClock::new(session.settings.timestep);
        log::info!("Game loop using {} timestep", clock.mode().as_str());
        Self {
            session,
            audio,
            clock,
            pending: TickInput::default(),
            last_hud: None,
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame stamped `now_ms`
    pub fn frame(
        &mut self,
        now_ms: f64,
        input: &mut dyn InputSource,
        renderer: &mut dyn Renderer,
        hud: &mut dyn HudSink,
    ) {
        let polled = input.poll();
        self.pending.left = polled.left;
        self.pending.right = polled.right;
        self.pending.fire = polled.fire;
        self.pending.autopilot = polled.autopilot;
        self.pending.pause |= polled.pause;
        self.pending.confirm |= polled.confirm;

        let was_running = self.session.run.is_running();
        let steps = self.clock.advance(now_ms);
        for _ in 0..steps.count {
            tick(&mut self.session, &self.pending, steps.dt_ms);
            // Clear one-shot inputs after processing
            self.pending.pause = false;
            self.pending.confirm = false;
        }
        self.frames += 1;

        let events = self.session.drain_events();
        self.audio.play_events(&events);

        // Time spent before the run stopped is not carried into the next screen
        if was_running && !self.session.run.is_running() {
            self.clock.reset();
        }

        if let Some(theme) = self.session.theme() {
            renderer.render(&self.session.snapshot(), theme);
        }

        let state = self.session.hud();
        if self.last_hud.as_ref() != Some(&state) {
            hud.on_ui_update(&state);
            self.last_hud = Some(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{LogSink, SoundEffect};
    use crate::settings::TimestepMode;
    use crate::sim::RunPhase;

    #[derive(Default)]
    struct Counter {
        renders: u32,
        huds: Vec<HudState>,
    }

    impl Renderer for Counter {
        fn render(&mut self, _snapshot: &Snapshot<'_>, _theme: &Theme) {
            self.renders += 1;
        }
    }

    impl HudSink for Counter {
        fn on_ui_update(&mut self, hud: &HudState) {
            self.huds.push(hud.clone());
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<SoundEffect>);

    impl SoundSink for Recorder {
        fn play_effect(&mut self, effect: SoundEffect, _volume: f32) {
            self.0.push(effect);
        }
    }

    #[test]
    fn hud_is_pushed_only_on_change() {
        let mut game = GameLoop::new(GameSession::with_defaults().unwrap(), LogSink);
        let mut renderer = Counter::default();
        let mut hud = Counter::default();
        let mut idle = TickInput::default;

        for i in 0..5 {
            game.frame(i as f64 * 16.0, &mut idle, &mut renderer, &mut hud);
        }
        assert_eq!(renderer.renders, 5);
        assert_eq!(hud.huds.len(), 1);
        assert_eq!(hud.huds[0].phase, RunPhase::NotStarted);
    }

    #[test]
    fn one_shot_inputs_are_consumed_once() {
        let mut game = GameLoop::new(GameSession::with_defaults().unwrap(), Recorder::default());
        let mut renderer = Counter::default();
        let mut hud = Counter::default();
        let mut confirm = || TickInput {
            confirm: true,
            ..Default::default()
        };
        game.frame(0.0, &mut confirm, &mut renderer, &mut hud);
        assert_eq!(game.session.run.phase, RunPhase::LevelIntro);
        game.frame(16.0, &mut confirm, &mut renderer, &mut hud);
        assert_eq!(game.session.run.phase, RunPhase::Running);
        assert_eq!(game.audio.sink().0, vec![SoundEffect::Button]);
    }

    #[test]
    fn fixed_step_longer_than_default_frame_still_confirms() {
        let mut session = GameSession::with_defaults().unwrap();
        session.settings.timestep = TimestepMode::Fixed {
            step_ms: 1000.0 / 60.0,
        };
        let mut game = GameLoop::new(session, LogSink);
        let mut renderer = Counter::default();
        let mut hud = Counter::default();
        let mut confirm = || TickInput {
            confirm: true,
            ..Default::default()
        };

        let frame_ms = 1000.0 / 60.0;
        for i in 0..10 {
            game.frame(i as f64 * frame_ms, &mut confirm, &mut renderer, &mut hud);
        }
        assert_eq!(game.session.run.phase, RunPhase::Running);
        assert!(game.session.run.level_elapsed_ms > 0.0);

        // Pausing and resuming keeps stepping
        let mut pause = || TickInput {
            pause: true,
            ..Default::default()
        };
        game.frame(10.0 * frame_ms, &mut pause, &mut renderer, &mut hud);
        let mut idle = TickInput::default;
        for i in 11..20 {
            game.frame(i as f64 * frame_ms, &mut idle, &mut renderer, &mut hud);
        }
        assert!(game.session.run.is_paused());
        let frozen = game.session.run.level_elapsed_ms;
        for i in 20..30 {
            game.frame(i as f64 * frame_ms, &mut pause, &mut renderer, &mut hud);
            if game.session.run.is_running() {
                break;
            }
        }
        assert!(game.session.run.is_running());
        for i in 30..40 {
            game.frame(i as f64 * frame_ms, &mut idle, &mut renderer, &mut hud);
        }
        assert!(game.session.run.level_elapsed_ms > frozen);
    }
}
