//! Simulation tick
//!
//! Core game loop step: screen transitions, then spawning, motion, collisions
//! and the level-completion check, in that order.

use super::autopilot::autopilot_input;
use super::collision::resolve_collisions;
use super::motion::step_motion;
use super::spawner::{spawn_bonus, step_spawner};
use super::state::{GameSession, ScheduledKind};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Held fire (rate limited by the cooldown)
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start / continue / restart, depending on the screen
    pub confirm: bool,
    /// Demo mode - AI steers and fires
    pub autopilot: bool,
}

/// Clamp a frame delta into the range the simulation accepts
pub fn sanitize_dt(dt_ms: f32) -> f32 {
    if !dt_ms.is_finite() || dt_ms < 0.0 {
        log::warn!("Invalid frame delta {dt_ms}, using {DEFAULT_FRAME_MS} ms");
        return DEFAULT_FRAME_MS;
    }
    if dt_ms > MAX_FRAME_MS {
        log::debug!("Frame delta {dt_ms:.1} ms clamped to {MAX_FRAME_MS} ms");
        return MAX_FRAME_MS;
    }
    dt_ms
}

/// Advance the session by `dt_ms` of wall-clock time
pub fn tick(session: &mut GameSession, input: &TickInput, dt_ms: f32) {
    let dt = sanitize_dt(dt_ms);

    if input.pause {
        session.toggle_pause();
    }
    // A confirm that changes screens consumes the tick
    if input.confirm && session.acknowledge() {
        return;
    }
    if !session.run.is_running() {
        return;
    }

    let input = if input.autopilot {
        autopilot_input(session, input)
    } else {
        input.clone()
    };

    session.run.level_elapsed_ms += dt;

    for kind in session.schedule.take_due(session.run.level_elapsed_ms) {
        match kind {
            ScheduledKind::SpawnBonus => {
                spawn_bonus(session);
            }
            ScheduledKind::GameOver(cause) => session.resolve_pending_game_over(cause),
        }
    }
    if !session.run.is_running() {
        return;
    }

    let pending = session.run.game_over_pending;
    if !pending {
        let lane = session.lane;
        session.player.steer(input.left, input.right, &lane);
    }

    step_spawner(session, dt, input.fire && !pending);
    step_motion(session);
    resolve_collisions(session);
    session.check_level_complete();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{GameOverCause, RunPhase};

    fn running_session() -> GameSession {
        let mut session = GameSession::with_defaults().unwrap();
        session.start_run();
        session.acknowledge();
        session
    }

    #[test]
    fn test_confirm_walks_into_running() {
        let mut session = GameSession::with_defaults().unwrap();
        let confirm = TickInput {
            confirm: true,
            ..Default::default()
        };
        tick(&mut session, &confirm, 16.0);
        assert_eq!(session.run.phase, RunPhase::LevelIntro);
        tick(&mut session, &TickInput::default(), 16.0);
        assert_eq!(session.run.level_elapsed_ms, 0.0);
        tick(&mut session, &confirm, 16.0);
        assert_eq!(session.run.phase, RunPhase::Running);
        assert_eq!(session.run.level_elapsed_ms, 0.0);

        tick(&mut session, &TickInput::default(), 16.0);
        assert_eq!(session.run.level_elapsed_ms, 16.0);
    }

    #[test]
    fn test_tick_pause() {
        let mut session = running_session();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut session, &pause, 16.0);
        assert_eq!(session.run.phase, RunPhase::Paused);

        // Frozen while paused
        for _ in 0..10 {
            tick(&mut session, &TickInput::default(), 100.0);
        }
        assert_eq!(session.run.level_elapsed_ms, 0.0);

        // Unpausing resumes in the same tick
        tick(&mut session, &pause, 16.0);
        assert_eq!(session.run.phase, RunPhase::Running);
        assert_eq!(session.run.level_elapsed_ms, 16.0);
    }

    #[test]
    fn test_bad_deltas_are_sanitized() {
        assert_eq!(sanitize_dt(f32::NAN), DEFAULT_FRAME_MS);
        assert_eq!(sanitize_dt(-5.0), DEFAULT_FRAME_MS);
        assert_eq!(sanitize_dt(5_000.0), MAX_FRAME_MS);
        assert_eq!(sanitize_dt(33.0), 33.0);

        let mut session = running_session();
        tick(&mut session, &TickInput::default(), f32::INFINITY);
        assert_eq!(session.run.level_elapsed_ms, DEFAULT_FRAME_MS);
    }

    #[test]
    fn test_level_times_out() {
        let mut session = running_session();
        for _ in 0..300 {
            tick(&mut session, &TickInput::default(), 100.0);
            if !session.run.is_running() {
                break;
            }
        }
        // A stationary player may get crashed into before the clock runs out
        assert!(matches!(
            session.run.phase,
            RunPhase::LevelComplete | RunPhase::GameOver
        ));
    }

    #[test]
    fn test_delayed_game_over_fires_on_level_clock() {
        let mut session = running_session();
        session.run.lives = 0;
        session.run.game_over_pending = true;
        session.schedule.clear();
        session
            .schedule
            .schedule(300.0, ScheduledKind::GameOver(GameOverCause::Explosion));

        tick(&mut session, &TickInput::default(), 100.0);
        tick(&mut session, &TickInput::default(), 100.0);
        assert!(session.run.is_running());
        tick(&mut session, &TickInput::default(), 100.0);
        assert_eq!(session.run.phase, RunPhase::GameOver);
        assert_eq!(session.run.game_over_cause, Some(GameOverCause::Explosion));
    }

    #[test]
    fn test_determinism() {
        // Two sessions with same seed should produce identical results
        let mut a = running_session();
        let mut b = running_session();

        let inputs = [
            TickInput {
                left: true,
                fire: true,
                ..Default::default()
            },
            TickInput {
                autopilot: true,
                ..Default::default()
            },
            TickInput {
                right: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for i in 0..2_000 {
            let input = &inputs[i % inputs.len()];
            tick(&mut a, input, 16.0);
            tick(&mut b, input, 16.0);
        }

        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
