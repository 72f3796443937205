mod difficulty;
mod pet;
mod question;

pub use difficulty::{DifficultyMix, DifficultyTier, difficulty_instruction};
pub use pet::PetStage;
pub use question::{Difficulty, Question};

/// Number of questions the generator is asked for in every round.
pub const QUESTIONS_PER_ROUND: usize = 5;
