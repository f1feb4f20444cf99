//! Kick trajectory: a quadratic Bézier arc from the penalty spot to a tier target

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::power::Tier;
use crate::consts::*;
use crate::{field_point, quadratic_bezier};

/// Where the ball rests before a kick
pub fn ball_start() -> Vec2 {
    field_point(BALL_START)
}

/// Landing point for a tier
pub fn tier_target(tier: Tier) -> Vec2 {
    match tier {
        Tier::Near => field_point(NEAR_TARGET),
        Tier::Mid => field_point(MID_TARGET),
        Tier::Far => field_point(FAR_TARGET),
    }
}

/// Control point: horizontal midpoint, lifted above the higher endpoint
/// (field y grows downward)
pub fn arc_control(from: Vec2, to: Vec2) -> Vec2 {
    Vec2::new((from.x + to.x) / 2.0, from.y.min(to.y) - ARC_HEIGHT)
}

/// An in-flight kick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KickAnimation {
    /// Session clock time the kick started (ms)
    pub started_ms: f64,
    pub from: Vec2,
    pub control: Vec2,
    pub to: Vec2,
    pub tier: Tier,
    /// Option position and value that was kicked at
    pub selected_index: usize,
    pub selected_value: u32,
}

impl KickAnimation {
    pub fn new(started_ms: f64, selected_index: usize, selected_value: u32) -> Self {
        let tier = Tier::from_index(selected_index).unwrap_or_default();
        let from = ball_start();
        let to = tier_target(tier);
        Self {
            started_ms,
            from,
            control: arc_control(from, to),
            to,
            tier,
            selected_index,
            selected_value,
        }
    }

    /// Progress in [0, 1] at clock time `now_ms`
    pub fn progress(&self, now_ms: f64) -> f32 {
        ((now_ms - self.started_ms) / KICK_DURATION_MS).clamp(0.0, 1.0) as f32
    }

    /// Ball position at clock time `now_ms`
    pub fn position(&self, now_ms: f64) -> Vec2 {
        quadratic_bezier(self.from, self.control, self.to, self.progress(now_ms))
    }

    pub fn is_complete(&self, now_ms: f64) -> bool {
        now_ms - self.started_ms >= KICK_DURATION_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_kick_starts_at_spot_and_lands_on_target() {
        let kick = KickAnimation::new(1000.0, 2, 9);
        assert_eq!(kick.tier, Tier::Far);
        assert_eq!(kick.position(1000.0), ball_start());
        let end = kick.position(1000.0 + KICK_DURATION_MS);
        assert!((end - tier_target(Tier::Far)).length() < 1e-4);
    }

    #[test]
    fn test_progress_clamped() {
        let kick = KickAnimation::new(500.0, 0, 3);
        assert_eq!(kick.progress(0.0), 0.0);
        assert_eq!(kick.progress(900.0), 0.5);
        assert_eq!(kick.progress(10_000.0), 1.0);
        assert!(!kick.is_complete(1299.0));
        assert!(kick.is_complete(1300.0));
    }

    #[test]
    fn test_arc_rises_above_straight_line() {
        for tier in [Tier::Near, Tier::Mid, Tier::Far] {
            let kick = KickAnimation::new(0.0, tier.index(), 1);
            let mid = kick.position(KICK_DURATION_MS / 2.0);
            assert!(mid.y < (kick.from.y + kick.to.y) / 2.0);
            assert!((kick.control.x - (kick.from.x + kick.to.x) / 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_targets_get_farther_by_tier() {
        let start = ball_start();
        let near = (tier_target(Tier::Near) - start).length();
        let mid = (tier_target(Tier::Mid) - start).length();
        let far = (tier_target(Tier::Far) - start).length();
        assert!(near < mid && mid < far);
    }

    proptest! {
        #[test]
        fn prop_position_stays_in_hull_bounds(t in 0.0f64..2000.0, index in 0usize..3) {
            let kick = KickAnimation::new(0.0, index, 1);
            let p = kick.position(t);
            let min_x = kick.from.x.min(kick.to.x);
            let max_x = kick.from.x.max(kick.to.x);
            prop_assert!(p.x >= min_x - 1e-3 && p.x <= max_x + 1e-3);
            prop_assert!(p.y >= kick.control.y - 1e-3);
        }
    }
}
