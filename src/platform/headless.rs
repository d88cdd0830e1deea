//! Headless frontend: logs instead of drawing

use super::{HudSink, InputSource, Renderer};
use crate::catalog::Theme;
use crate::css_color;
use crate::sim::{HudState, Snapshot, TickInput};

/// Frames between renderer log lines
const RENDER_LOG_INTERVAL: u64 = 600;

/// Logs a summary of what a real renderer and HUD would show
#[derive(Debug, Default)]
pub struct HeadlessFrontend {
    frames: u64,
}

impl Renderer for HeadlessFrontend {
    fn render(&mut self, snapshot: &Snapshot<'_>, theme: &Theme) {
        if self.frames % RENDER_LOG_INTERVAL == 0 {
            log::debug!(
                "[{}] {} obstacles, {} shots, {} bonuses, {} explosions, player x={:.0}, bg {}",
                theme.name,
                snapshot.obstacles.len(),
                snapshot.projectiles.len(),
                snapshot.bonuses.len(),
                snapshot.explosions.len(),
                snapshot.player.pos.x,
                css_color(theme.background)
            );
        }
        self.frames += 1;
    }
}

impl HudSink for HeadlessFrontend {
    fn on_ui_update(&mut self, hud: &HudState) {
        log::trace!(
            "HUD {} L{} score={} lives={} combo={} cleared={}/{} t={:.1}s",
            hud.phase.as_str(),
            hud.level,
            hud.score,
            hud.lives,
            hud.combo,
            hud.obstacles_cleared,
            hud.target_obstacles,
            hud.level_elapsed_ms / 1000.0
        );
    }
}

/// Lets the autopilot play and confirms every screen
#[derive(Debug, Default)]
pub struct AutoplayInput;

impl InputSource for AutoplayInput {
    fn poll(&mut self) -> TickInput {
        TickInput {
            confirm: true,
            autopilot: true,
            ..Default::default()
        }
    }
}
