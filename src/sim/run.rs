//! Run state machine
//!
//! ```text
//! NotStarted -> LevelIntro -> Running <-> Paused
//!                   ^            |
//!                   |            +-> LevelComplete -> LevelIntro (next level)
//!                   |            +-> Victory   (last level cleared)
//!                   |            +-> GameOver
//! GameOver / Victory -> NotStarted on acknowledge
//! ```

use super::damage::DamageModel;
use super::spawner::schedule_level_bonuses;
use super::state::{GameEvent, GameOverCause, GameSession, RunPhase, RunState};

impl GameSession {
    /// Begin a new run from the title screen
    pub fn start_run(&mut self) {
        if self.run.phase != RunPhase::NotStarted {
            log::warn!("start_run ignored in phase {}", self.run.phase.as_str());
            return;
        }
        self.run = RunState::new(self.settings.damage_mode.starting_lives());
        log::info!(
            "Run started ({} mode, {} lives)",
            self.settings.damage_mode.as_str(),
            self.run.lives
        );
        self.emit(GameEvent::RunStarted);
        self.enter_level_intro(1);
    }

    /// Reset per-level state and show the intro for `level`
    fn enter_level_intro(&mut self, level: u32) {
        let count = self.catalog.level_count();
        let level = level.clamp(1, count.max(1));
        self.run.current_level = level;
        self.run.reset_level_counters();
        self.clear_level_state();
        schedule_level_bonuses(self);
        self.run.phase = RunPhase::LevelIntro;

        let info = self.current_level();
        log::info!(
            "Level {}: {} ({} s, target {})",
            level,
            info.name,
            info.duration_ms / 1000,
            info.target_obstacles
        );
        self.emit(GameEvent::LevelIntro { level });
    }

    /// Confirm action: advances whichever screen is showing
    ///
    /// Returns true if the phase changed.
    pub fn acknowledge(&mut self) -> bool {
        match self.run.phase {
            RunPhase::NotStarted => self.start_run(),
            RunPhase::LevelIntro => {
                self.run.phase = RunPhase::Running;
                log::info!("Level {} running", self.run.current_level);
                self.emit(GameEvent::LevelStarted {
                    level: self.run.current_level,
                });
            }
            RunPhase::LevelComplete => self.enter_level_intro(self.run.current_level + 1),
            RunPhase::GameOver | RunPhase::Victory => self.reset(),
            RunPhase::Running | RunPhase::Paused => return false,
        }
        true
    }

    /// Toggle between Running and Paused; ignored elsewhere
    pub fn toggle_pause(&mut self) {
        let paused = match self.run.phase {
            RunPhase::Running => {
                self.run.phase = RunPhase::Paused;
                true
            }
            RunPhase::Paused => {
                self.run.phase = RunPhase::Running;
                false
            }
            other => {
                log::debug!("Pause ignored in phase {}", other.as_str());
                return;
            }
        };
        log::info!("{}", if paused { "Paused" } else { "Resumed" });
        self.emit(GameEvent::PauseToggled { paused });
    }

    /// Back to the title screen with a fresh run
    pub fn reset(&mut self) {
        self.run = RunState::new(self.settings.damage_mode.starting_lives());
        self.clear_level_state();
        log::info!("Session reset");
    }

    /// Finish the level if its clock ran out or enough obstacles were cleared
    pub fn check_level_complete(&mut self) -> bool {
        if !self.run.is_running() || self.run.game_over_pending {
            return false;
        }
        let level = self.current_level();
        let timed_out = self.run.level_elapsed_ms >= level.duration_ms as f32;
        let cleared = self.run.obstacles_cleared >= level.target_obstacles;
        if !(timed_out || cleared) {
            return false;
        }
        self.complete_level();
        true
    }

    /// Award the level reward and move to LevelComplete (or Victory)
    pub fn complete_level(&mut self) {
        let number = self.run.current_level;
        let reward = self.current_level().reward;
        self.run.score += reward;
        self.run.total_reward += reward;

        if self.catalog.is_last_level(number) {
            self.run.phase = RunPhase::Victory;
            log::info!(
                "Victory! score {} total reward {}",
                self.run.score,
                self.run.total_reward
            );
            self.emit(GameEvent::Victory {
                score: self.run.score,
                total_reward: self.run.total_reward,
            });
        } else {
            self.run.phase = RunPhase::LevelComplete;
            log::info!("Level {} complete, reward {}", number, reward);
            self.emit(GameEvent::LevelComplete {
                level: number,
                reward,
            });
        }
    }

    /// Settle a delayed game over once its delay has elapsed
    ///
    /// Lives are evaluated now, not when the delay was scheduled: a pickup
    /// shot during the delay keeps the run alive.
    pub fn resolve_pending_game_over(&mut self, cause: GameOverCause) {
        self.run.game_over_pending = false;
        if self.run.lives > 0 {
            self.run.game_over_cause = None;
            log::info!("Game over averted, {} lives left", self.run.lives);
            return;
        }
        self.trigger_game_over(cause);
    }

    /// End the run immediately
    pub fn trigger_game_over(&mut self, cause: GameOverCause) {
        if self.run.phase.is_terminal() {
            return;
        }
        self.run.phase = RunPhase::GameOver;
        self.run.game_over_pending = false;
        self.run.game_over_cause = Some(cause);
        log::info!(
            "Game over ({:?}) on level {} with score {}",
            cause,
            self.run.current_level,
            self.run.score
        );
        self.emit(GameEvent::GameOver { cause });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> GameSession {
        GameSession::with_defaults().unwrap()
    }

    #[test]
    fn acknowledge_walks_the_screens() {
        let mut s = session();
        assert!(s.acknowledge());
        assert_eq!(s.run.phase, RunPhase::LevelIntro);
        assert_eq!(s.schedule.len(), 2);
        assert!(s.acknowledge());
        assert_eq!(s.run.phase, RunPhase::Running);
        assert!(!s.acknowledge());
        assert_eq!(
            s.drain_events(),
            vec![
                GameEvent::RunStarted,
                GameEvent::LevelIntro { level: 1 },
                GameEvent::LevelStarted { level: 1 },
            ]
        );
    }

    #[test]
    fn pause_only_toggles_while_playing() {
        let mut s = session();
        s.toggle_pause();
        assert_eq!(s.run.phase, RunPhase::NotStarted);
        s.acknowledge();
        s.acknowledge();
        s.toggle_pause();
        assert!(s.run.is_paused());
        assert!(!s.acknowledge());
        s.toggle_pause();
        assert!(s.run.is_running());
    }

    #[test]
    fn level_completes_once_with_reward() {
        let mut s = session();
        s.acknowledge();
        s.acknowledge();
        s.run.score = 40;
        s.run.obstacles_cleared = 10;
        assert!(s.check_level_complete());
        assert_eq!(s.run.phase, RunPhase::LevelComplete);
        assert_eq!(s.run.score, 140);
        assert_eq!(s.run.total_reward, 100);
        assert!(!s.check_level_complete());
        assert_eq!(s.run.score, 140);

        // Next level keeps score and lives
        s.acknowledge();
        assert_eq!(s.run.phase, RunPhase::LevelIntro);
        assert_eq!(s.run.current_level, 2);
        assert_eq!(s.run.score, 140);
        assert_eq!(s.run.obstacles_cleared, 0);
    }

    #[test]
    fn last_level_goes_straight_to_victory() {
        let mut s = session();
        s.acknowledge();
        s.run.current_level = s.catalog.level_count();
        s.acknowledge();
        s.run.level_elapsed_ms = 90_000.0;
        assert!(s.check_level_complete());
        assert_eq!(s.run.phase, RunPhase::Victory);
        assert_eq!(s.run.total_reward, 2000);

        s.acknowledge();
        assert_eq!(s.run.phase, RunPhase::NotStarted);
        assert_eq!(s.run.score, 0);
    }

    #[test]
    fn game_over_is_terminal_until_acknowledged() {
        let mut s = session();
        s.acknowledge();
        s.acknowledge();
        s.trigger_game_over(GameOverCause::Crash);
        s.trigger_game_over(GameOverCause::Explosion);
        assert_eq!(s.run.game_over_cause, Some(GameOverCause::Crash));
        s.toggle_pause();
        assert_eq!(s.run.phase, RunPhase::GameOver);
        s.acknowledge();
        assert_eq!(s.run.phase, RunPhase::NotStarted);
    }

    #[test]
    fn pending_game_over_rechecks_lives() {
        let mut s = session();
        s.acknowledge();
        s.acknowledge();
        s.run.game_over_pending = true;
        s.run.game_over_cause = Some(GameOverCause::Explosion);
        s.run.lives = 1;
        s.resolve_pending_game_over(GameOverCause::Explosion);
        assert!(s.run.is_running());
        assert!(!s.run.game_over_pending);
        assert_eq!(s.run.game_over_cause, None);

        s.run.game_over_pending = true;
        s.run.lives = 0;
        s.resolve_pending_game_over(GameOverCause::Explosion);
        assert_eq!(s.run.phase, RunPhase::GameOver);
        assert_eq!(s.run.game_over_cause, Some(GameOverCause::Explosion));
    }
}
