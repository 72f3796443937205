//! Adaptive difficulty table.
//!
//! The server uses it to phrase the generation prompt and the client uses it
//! to preview the next round, so there is exactly one copy of the thresholds.

use super::QUESTIONS_PER_ROUND;

/// How many questions of each difficulty a round should contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyMix {
    pub easy: u8,
    pub medium: u8,
    pub hard: u8,
    pub challenge: u8,
}

impl DifficultyMix {
    pub fn total(&self) -> u8 {
        self.easy + self.medium + self.hard + self.challenge
    }
}

/// Difficulty bracket picked from the previous round's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyTier {
    /// No previous round.
    Opening,
    /// Ratio at or below 0.4.
    Recovery,
    /// Ratio at or below 0.8.
    Balanced,
    /// Anything higher.
    Stretch,
}

const RECOVERY_MAX_RATIO: f64 = 0.4;
const BALANCED_MAX_RATIO: f64 = 0.8;

impl DifficultyTier {
    pub fn for_last_score(last_round_score: Option<u32>) -> Self {
        let Some(score) = last_round_score else {
            return DifficultyTier::Opening;
        };

        let ratio = f64::from(score) / QUESTIONS_PER_ROUND as f64;
        if ratio <= RECOVERY_MAX_RATIO {
            DifficultyTier::Recovery
        } else if ratio <= BALANCED_MAX_RATIO {
            DifficultyTier::Balanced
        } else {
            DifficultyTier::Stretch
        }
    }

    pub fn mix(self) -> DifficultyMix {
        match self {
            DifficultyTier::Opening => DifficultyMix {
                easy: 2,
                medium: 2,
                hard: 1,
                challenge: 0,
            },
            DifficultyTier::Recovery => DifficultyMix {
                easy: 3,
                medium: 2,
                hard: 0,
                challenge: 0,
            },
            DifficultyTier::Balanced => DifficultyMix {
                easy: 1,
                medium: 3,
                hard: 1,
                challenge: 0,
            },
            DifficultyTier::Stretch => DifficultyMix {
                easy: 0,
                medium: 1,
                hard: 3,
                challenge: 1,
            },
        }
    }

    /// Short label for the client HUD.
    pub fn summary(self) -> &'static str {
        match self {
            DifficultyTier::Opening => "mixed warm-up",
            DifficultyTier::Recovery => "mostly Easy",
            DifficultyTier::Balanced => "mostly Medium",
            DifficultyTier::Stretch => "Hard and Challenge",
        }
    }
}

/// The feedback sentence embedded in the generation prompt.
pub fn difficulty_instruction(last_round_score: Option<u32>) -> String {
    let tier = DifficultyTier::for_last_score(last_round_score);
    let score = last_round_score.unwrap_or_default();

    match tier {
        DifficultyTier::Opening => "For this initial set, generate a mixed difficulty: 2 Easy, 2 Medium, and 1 Hard question. Ensure all keywords are covered if possible.".to_string(),
        DifficultyTier::Recovery => format!(
            "The user scored {score} out of {QUESTIONS_PER_ROUND}. Generate 3 Easy, 2 Medium, and 0 Hard questions."
        ),
        DifficultyTier::Balanced => format!(
            "The user scored {score} out of {QUESTIONS_PER_ROUND}. Generate 1 Easy, 3 Medium, and 1 Hard question."
        ),
        DifficultyTier::Stretch => format!(
            "The user scored {score} out of {QUESTIONS_PER_ROUND}. Generate 1 Medium, 3 Hard, and 1 Challenge question."
        ),
    }
}
