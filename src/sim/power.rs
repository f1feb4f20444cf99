//! Charge-and-release power meter
//!
//! Power accumulates in fixed steps while the kick key is held and maps to
//! one of three tiers on release. Each tier selects the option at the same
//! display position.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Discrete kick distance bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Near,
    Mid,
    Far,
}

impl Tier {
    /// Tier for a power value: ≤33 near, ≤66 mid, otherwise far
    pub fn from_power(power: f32) -> Self {
        if power <= NEAR_MAX_POWER {
            Tier::Near
        } else if power <= MID_MAX_POWER {
            Tier::Mid
        } else {
            Tier::Far
        }
    }

    /// Tier for a display position
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Tier::Near),
            1 => Some(Tier::Mid),
            2 => Some(Tier::Far),
            _ => None,
        }
    }

    /// Display position of the option this tier selects
    pub fn index(&self) -> usize {
        match self {
            Tier::Near => 0,
            Tier::Mid => 1,
            Tier::Far => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Near => "near",
            Tier::Mid => "mid",
            Tier::Far => "far",
        }
    }
}

/// Power accumulated during a hold
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerMeter {
    power: f32,
    holding: bool,
}

impl PowerMeter {
    pub fn power(&self) -> f32 {
        self.power
    }

    pub fn is_holding(&self) -> bool {
        self.holding
    }

    /// Current tier (what a release right now would select)
    pub fn tier(&self) -> Tier {
        Tier::from_power(self.power)
    }

    /// Start a hold from zero. Returns false if a hold is already active.
    pub fn begin(&mut self) -> bool {
        if self.holding {
            return false;
        }
        self.power = 0.0;
        self.holding = true;
        true
    }

    /// One accumulation tick
    pub fn charge(&mut self) {
        if self.holding {
            self.power = (self.power + CHARGE_STEP).min(POWER_MAX);
        }
    }

    /// End the hold and return the tier it resolved to
    pub fn release(&mut self) -> Option<Tier> {
        if !self.holding {
            return None;
        }
        self.holding = false;
        Some(self.tier())
    }

    /// Drop any hold and zero the meter
    pub fn reset(&mut self) {
        self.power = 0.0;
        self.holding = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(Tier::from_power(0.0), Tier::Near);
        assert_eq!(Tier::from_power(33.0), Tier::Near);
        assert_eq!(Tier::from_power(34.0), Tier::Mid);
        assert_eq!(Tier::from_power(66.0), Tier::Mid);
        assert_eq!(Tier::from_power(67.0), Tier::Far);
        assert_eq!(Tier::from_power(100.0), Tier::Far);
    }

    #[test]
    fn test_immediate_release_is_near() {
        let mut meter = PowerMeter::default();
        assert!(meter.begin());
        assert_eq!(meter.release(), Some(Tier::Near));
        assert!(!meter.is_holding());
    }

    #[test]
    fn test_release_without_hold() {
        let mut meter = PowerMeter::default();
        assert_eq!(meter.release(), None);
    }

    #[test]
    fn test_begin_while_holding_is_ignored() {
        let mut meter = PowerMeter::default();
        meter.begin();
        meter.charge();
        assert!(!meter.begin());
        assert_eq!(meter.power(), CHARGE_STEP);
    }

    #[test]
    fn test_charge_without_hold_does_nothing() {
        let mut meter = PowerMeter::default();
        meter.charge();
        assert_eq!(meter.power(), 0.0);
    }

    #[test]
    fn test_tier_index_round_trip() {
        for i in 0..3 {
            assert_eq!(Tier::from_index(i).unwrap().index(), i);
        }
        assert_eq!(Tier::from_index(3), None);
    }

    proptest! {
        #[test]
        fn prop_power_monotonic_and_clamped(ticks in 0usize..200) {
            let mut meter = PowerMeter::default();
            meter.begin();
            let mut last = meter.power();
            for _ in 0..ticks {
                meter.charge();
                prop_assert!(meter.power() >= last);
                prop_assert!(meter.power() <= POWER_MAX);
                last = meter.power();
            }
        }
    }
}
