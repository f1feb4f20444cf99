//! Per-frame advance
//!
//! Turns host frame timestamps into session clock time, fires due timers and
//! samples the kick trajectory.

use super::scheduler::{TimerHandle, TimerKind};
use super::session::GameSession;
use super::state::GamePhase;
use crate::consts::*;

impl GameSession {
    /// Advance to host time `now_ms` (e.g. a `requestAnimationFrame` timestamp).
    ///
    /// The clock only moves while a round is playing and unpaused, so a frozen
    /// clock also freezes the charge meter, the kick in flight and the
    /// feedback delay.
    pub fn advance(&mut self, now_ms: f64) {
        let dt = match self.last_frame_ms {
            Some(last) => (now_ms - last).clamp(0.0, MAX_FRAME_DELTA_MS),
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);

        if self.round.phase != GamePhase::Playing || self.paused {
            return;
        }
        self.clock_ms += dt;

        while let Some((handle, kind)) = self.scheduler.pop_due(self.clock_ms) {
            self.on_timer(handle, kind);
            if self.round.phase != GamePhase::Playing {
                return;
            }
        }

        self.sample_kick();
    }

    fn on_timer(&mut self, handle: TimerHandle, kind: TimerKind) {
        match kind {
            TimerKind::ElapsedSecond => {
                self.round.elapsed_secs += 1;
            }
            TimerKind::ChargeTick => {
                if self.charge_timer == Some(handle) {
                    self.kick.meter.charge();
                }
            }
            TimerKind::FeedbackDelay => {
                if self.feedback_timer == Some(handle) {
                    self.feedback_timer = None;
                    self.next_question();
                }
            }
        }
    }

    /// Move the ball along its arc; resolve once it lands
    fn sample_kick(&mut self) {
        let Some(kick) = &self.kick.animation else {
            return;
        };
        self.kick.ball = kick.position(self.clock_ms);
        if kick.is_complete(self.clock_ms) {
            if let Some(kick) = self.kick.animation.take() {
                self.resolve_kick(kick);
            }
        }
    }
}
