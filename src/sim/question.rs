//! Addition questions with three shuffled candidate answers

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// One addition problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub num1: u32,
    pub num2: u32,
    pub answer: u32,
    /// Candidate answers in display order (the answer appears exactly once)
    pub options: [u32; OPTION_COUNT],
}

impl Question {
    /// Build a question from fixed parts, checking the option invariants
    pub fn from_parts(num1: u32, num2: u32, options: [u32; OPTION_COUNT]) -> Option<Self> {
        let answer = num1 + num2;
        let occurrences = options.iter().filter(|&&o| o == answer).count();
        let distinct = options[0] != options[1] && options[0] != options[2] && options[1] != options[2];
        if occurrences != 1 || !distinct {
            return None;
        }
        Some(Self {
            num1,
            num2,
            answer,
            options,
        })
    }

    /// Generate a random question
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let num1 = rng.random_range(OPERAND_MIN..=OPERAND_MAX);
        let num2 = rng.random_range(OPERAND_MIN..=OPERAND_MAX);
        let answer = num1 + num2;

        let mut options = [answer; OPTION_COUNT];
        let mut filled = 1;
        while filled < OPTION_COUNT {
            let offset = rng.random_range(-DISTRACTOR_SPREAD..=DISTRACTOR_SPREAD);
            let candidate = answer as i32 + offset;
            // Positive and not already present (covers offset == 0)
            if candidate < 1 || options[..filled].contains(&(candidate as u32)) {
                continue;
            }
            options[filled] = candidate as u32;
            filled += 1;
        }
        options.shuffle(rng);

        Self {
            num1,
            num2,
            answer,
            options,
        }
    }

    /// Whether the option at `index` is the correct answer
    pub fn is_correct(&self, index: usize) -> bool {
        self.options.get(index) == Some(&self.answer)
    }

    /// Display position of the correct answer
    pub fn answer_index(&self) -> usize {
        self.options
            .iter()
            .position(|&o| o == self.answer)
            .unwrap_or(0)
    }
}
