//! Celebration burst shown on a correct answer
//!
//! The particle effect itself belongs to the page (a confetti script); the
//! game only fires it and never reads anything back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::field_point;

/// Parameters for one burst
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfettiBurst {
    pub particle_count: u32,
    /// Spread angle in degrees
    pub spread: f32,
    /// Origin in viewport fractions (0-1)
    pub origin: Vec2,
}

impl Default for ConfettiBurst {
    fn default() -> Self {
        Self {
            particle_count: CONFETTI_PARTICLES,
            spread: CONFETTI_SPREAD,
            origin: field_point(CONFETTI_ORIGIN),
        }
    }
}

/// Fire-and-forget celebration effect
pub trait Celebration {
    fn burst(&mut self, burst: &ConfettiBurst);
}

/// Logs bursts instead of drawing them
#[derive(Debug, Default)]
pub struct LogCelebration {
    pub fired: u32,
}

impl Celebration for LogCelebration {
    fn burst(&mut self, burst: &ConfettiBurst) {
        self.fired += 1;
        log::info!(
            "Celebration: {} particles, spread {}°",
            burst.particle_count,
            burst.spread
        );
    }
}

/// Calls the page's `confetti()` if one is loaded
#[cfg(target_arch = "wasm32")]
pub mod web {
    use wasm_bindgen::prelude::*;

    use super::{Celebration, ConfettiBurst};

    #[wasm_bindgen(inline_js = "
        export function fire_confetti(count, spread, x, y) {
            if (typeof window.confetti !== 'function') {
                return false;
            }
            window.confetti({ particleCount: count, spread: spread, origin: { x: x, y: y } });
            return true;
        }
    ")]
    extern "C" {
        fn fire_confetti(count: u32, spread: f32, x: f32, y: f32) -> bool;
    }

    #[derive(Debug, Default)]
    pub struct PageConfetti;

    impl Celebration for PageConfetti {
        fn burst(&mut self, burst: &ConfettiBurst) {
            if !fire_confetti(burst.particle_count, burst.spread, burst.origin.x, burst.origin.y) {
                log::debug!("confetti() not available on page");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_burst() {
        let burst = ConfettiBurst::default();
        assert_eq!(burst.particle_count, 100);
        assert_eq!(burst.origin, Vec2::new(0.5, 0.6));
    }

    #[test]
    fn test_log_celebration_counts() {
        let mut fx = LogCelebration::default();
        fx.burst(&ConfettiBurst::default());
        fx.burst(&ConfettiBurst::default());
        assert_eq!(fx.fired, 2);
    }
}
