//! Frame timing: turns wall-clock timestamps into simulation steps

use crate::consts::*;
use crate::settings::TimestepMode;
use crate::sim::sanitize_dt;

/// Ticks to run for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSteps {
    pub count: u32,
    pub dt_ms: f32,
}

#[derive(Debug, Clone)]
pub struct FrameClock {
    mode: TimestepMode,
    last_time_ms: Option<f64>,
    accumulator: f32,
}

impl FrameClock {
    pub fn new(mode: TimestepMode) -> Self {
        Self {
            mode,
            last_time_ms: None,
            accumulator: 0.0,
        }
    }

    pub fn mode(&self) -> TimestepMode {
        self.mode
    }

    /// Forget the previous timestamp; the next frame uses the default delta
    pub fn reset(&mut self) {
        self.last_time_ms = None;
        self.accumulator = 0.0;
    }

    /// Advance to the frame stamped `now_ms`
    pub fn advance(&mut self, now_ms: f64) -> FrameSteps {
        let raw = match self.last_time_ms {
            Some(last) => (now_ms - last) as f32,
            None => DEFAULT_FRAME_MS,
        };
        self.last_time_ms = Some(now_ms);
        let dt = sanitize_dt(raw);

        match self.mode {
            TimestepMode::Variable => FrameSteps {
                count: 1,
                dt_ms: dt,
            },
            TimestepMode::Fixed { step_ms } => {
                self.accumulator += dt;
                let mut count = 0;
                while self.accumulator >= step_ms && count < MAX_SUBSTEPS {
                    self.accumulator -= step_ms;
                    count += 1;
                }
                // Drop the backlog rather than spiral
                if count == MAX_SUBSTEPS {
                    self.accumulator = self.accumulator.min(step_ms);
                }
                FrameSteps {
                    count,
                    dt_ms: step_ms,
                }
            }
        }
    }
}
