//! Round and kick state, plus the read-only snapshot handed to the front-end

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::kick::{KickAnimation, ball_start};
use super::power::{PowerMeter, Tier};
use super::question::Question;
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    /// Title screen, no round yet
    #[default]
    Menu,
    /// Round in progress (may be paused)
    Playing,
    /// All questions answered
    Finished,
}

/// Result shown after a kick lands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Feedback {
    #[default]
    None,
    Correct,
    /// Wrong answer, with the answer that was expected
    Incorrect { answer: u32 },
}

/// Progress through one round
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundState {
    pub phase: GamePhase,
    /// Zero-based; reaches QUESTION_COUNT when the round ends
    pub question_index: u32,
    /// Correct answers so far
    pub score: u32,
    /// Whole seconds spent playing (pauses excluded)
    pub elapsed_secs: u32,
    pub question: Option<Question>,
}

impl RoundState {
    pub fn reset(&mut self) {
        self.question_index = 0;
        self.score = 0;
        self.elapsed_secs = 0;
        self.question = None;
    }

    /// One-based number of the question on screen
    pub fn question_number(&self) -> u32 {
        (self.question_index + 1).min(QUESTION_COUNT)
    }
}

/// Per-question kick interaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KickState {
    pub meter: PowerMeter,
    pub animation: Option<KickAnimation>,
    pub ball: Vec2,
    pub feedback: Feedback,
    pub selected_index: Option<usize>,
}

impl Default for KickState {
    fn default() -> Self {
        Self {
            meter: PowerMeter::default(),
            animation: None,
            ball: ball_start(),
            feedback: Feedback::None,
            selected_index: None,
        }
    }
}

impl KickState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_kicking(&self) -> bool {
        self.animation.is_some()
    }
}

/// End-of-round summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub score: u32,
    pub question_count: u32,
    pub accuracy_percent: u32,
    pub elapsed_secs: u32,
    /// 0-3
    pub stars: u8,
}

impl RoundSummary {
    pub fn from_round(round: &RoundState) -> Self {
        let score = round.score.min(QUESTION_COUNT);
        Self {
            score,
            question_count: QUESTION_COUNT,
            accuracy_percent: score * 100 / QUESTION_COUNT,
            elapsed_secs: round.elapsed_secs,
            stars: star_rating(score),
        }
    }
}

/// Stars for a score out of ten
pub fn star_rating(score: u32) -> u8 {
    match score {
        9.. => 3,
        7..=8 => 2,
        4..=6 => 1,
        _ => 0,
    }
}

/// Read-only view of the session for rendering
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub phase: GamePhase,
    pub paused: bool,
    pub help_open: bool,
    pub question_number: u32,
    pub question_count: u32,
    pub question: Option<Question>,
    pub score: u32,
    pub elapsed_secs: u32,
    pub power: f32,
    pub tier: Tier,
    pub holding: bool,
    pub kicking: bool,
    pub kick_progress: f32,
    /// Ball position in field percent coordinates
    pub ball: Vec2,
    pub selected_index: Option<usize>,
    pub feedback: Feedback,
    pub summary: Option<RoundSummary>,
}

/// Format whole seconds as m:ss
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_rating() {
        assert_eq!(star_rating(0), 0);
        assert_eq!(star_rating(3), 0);
        assert_eq!(star_rating(4), 1);
        assert_eq!(star_rating(7), 2);
        assert_eq!(star_rating(9), 3);
        assert_eq!(star_rating(10), 3);
    }

    #[test]
    fn test_summary_from_round() {
        let round = RoundState {
            phase: GamePhase::Finished,
            question_index: QUESTION_COUNT,
            score: 8,
            elapsed_secs: 75,
            question: None,
        };
        let summary = RoundSummary::from_round(&round);
        assert_eq!(summary.accuracy_percent, 80);
        assert_eq!(summary.stars, 2);
        assert_eq!(summary.elapsed_secs, 75);
    }

    #[test]
    fn test_question_number_capped() {
        let mut round = RoundState::default();
        assert_eq!(round.question_number(), 1);
        round.question_index = QUESTION_COUNT;
        assert_eq!(round.question_number(), QUESTION_COUNT);
    }

    #[test]
    fn test_kick_state_reset_puts_ball_back() {
        let mut kick = KickState::default();
        kick.ball = Vec2::new(1.0, 1.0);
        kick.feedback = Feedback::Correct;
        kick.meter.begin();
        kick.reset();
        assert_eq!(kick.ball, ball_start());
        assert_eq!(kick.feedback, Feedback::None);
        assert!(!kick.meter.is_holding());
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(65), "1:05");
    }
}
