//! Soccer Math - an addition mini-game played by kicking a ball at the answer
//!
//! Core modules:
//! - `sim`: Deterministic round/question state machine, power meter and kick animation
//! - `audio`: Named audio cues with lazily constructed handles
//! - `effects`: Celebration burst collaborator
//! - `settings`: Player preferences and audio source configuration

pub mod audio;
pub mod effects;
pub mod settings;
pub mod sim;

pub use audio::{AudioConfig, AudioCue, AudioError, AudioRegistry};
pub use settings::{ConfigError, InputMode, Settings};
pub use sim::{GameEvent, GamePhase, GameSession, Snapshot};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Questions per round
    pub const QUESTION_COUNT: u32 = 10;
    /// Candidate answers shown per question
    pub const OPTION_COUNT: usize = 3;
    /// Operand range (inclusive)
    pub const OPERAND_MIN: u32 = 1;
    pub const OPERAND_MAX: u32 = 10;
    /// Distractors are drawn from answer ± this spread
    pub const DISTRACTOR_SPREAD: i32 = 5;

    /// Elapsed-time counter period (ms)
    pub const SECOND_MS: f64 = 1000.0;
    /// Power accumulation tick (25 Hz)
    pub const CHARGE_TICK_MS: f64 = 40.0;
    /// Power added per charge tick
    pub const CHARGE_STEP: f32 = 2.0;
    pub const POWER_MAX: f32 = 100.0;
    /// Tier thresholds (inclusive upper bounds)
    pub const NEAR_MAX_POWER: f32 = 33.0;
    pub const MID_MAX_POWER: f32 = 66.0;

    /// Kick flight time (ms)
    pub const KICK_DURATION_MS: f64 = 800.0;
    /// Feedback stays on screen this long before the next question (ms)
    pub const FEEDBACK_DELAY_MS: f64 = 1500.0;
    /// Largest frame delta fed to the clock (ms), keeps a stalled tab from skipping the round
    pub const MAX_FRAME_DELTA_MS: f64 = 250.0;
    /// Maximum back-to-back firings of one repeating timer per poll
    pub const MAX_CATCHUP: u32 = 8;

    /// Field coordinates are percentages of the pitch (0,0 top-left)
    pub const BALL_START: (f32, f32) = (50.0, 88.0);
    pub const NEAR_TARGET: (f32, f32) = (20.0, 52.0);
    pub const MID_TARGET: (f32, f32) = (50.0, 34.0);
    pub const FAR_TARGET: (f32, f32) = (80.0, 16.0);
    /// How far above the higher endpoint the arc's control point sits
    pub const ARC_HEIGHT: f32 = 30.0;

    /// Celebration burst defaults
    pub const CONFETTI_PARTICLES: u32 = 100;
    pub const CONFETTI_SPREAD: f32 = 70.0;
    pub const CONFETTI_ORIGIN: (f32, f32) = (0.5, 0.6);
}

/// Build a field point from a (x, y) constant
#[inline]
pub fn field_point(p: (f32, f32)) -> Vec2 {
    Vec2::new(p.0, p.1)
}

/// Evaluate a quadratic Bézier curve at `t` (clamped to [0, 1])
#[inline]
pub fn quadratic_bezier(p0: Vec2, p1: Vec2, p2: Vec2, t: f32) -> Vec2 {
    let t = t.clamp(0.0, 1.0);
    let u = 1.0 - t;
    p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bezier_endpoints() {
        let p0 = Vec2::new(0.0, 0.0);
        let p1 = Vec2::new(5.0, -10.0);
        let p2 = Vec2::new(10.0, 0.0);
        assert_eq!(quadratic_bezier(p0, p1, p2, 0.0), p0);
        assert_eq!(quadratic_bezier(p0, p1, p2, 1.0), p2);
    }

    #[test]
    fn test_bezier_midpoint() {
        let p0 = Vec2::new(0.0, 0.0);
        let p1 = Vec2::new(5.0, -10.0);
        let p2 = Vec2::new(10.0, 0.0);
        // B(0.5) = 0.25*p0 + 0.5*p1 + 0.25*p2
        let mid = quadratic_bezier(p0, p1, p2, 0.5);
        assert!((mid.x - 5.0).abs() < 1e-5);
        assert!((mid.y - -5.0).abs() < 1e-5);
    }

    #[test]
    fn test_bezier_clamps_parameter() {
        let p0 = Vec2::new(1.0, 2.0);
        let p1 = Vec2::new(3.0, 4.0);
        let p2 = Vec2::new(5.0, 6.0);
        assert_eq!(quadratic_bezier(p0, p1, p2, -1.0), p0);
        assert_eq!(quadratic_bezier(p0, p1, p2, 2.0), p2);
    }
}
