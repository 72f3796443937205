use std::fmt;

use serde::{Deserialize, Serialize};

/// Difficulty label attached to every question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Challenge,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Challenge,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Challenge => "Challenge",
        }
    }

    /// Numeric levels used by older decks (1 = Easy .. 4 = Challenge).
    pub fn from_level(level: u64) -> Option<Self> {
        match level {
            1 => Some(Difficulty::Easy),
            2 => Some(Difficulty::Medium),
            3 => Some(Difficulty::Hard),
            4 => Some(Difficulty::Challenge),
            _ => None,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single multiple-choice trivia question.
///
/// Field names match the JSON exchanged with the generator and the browser UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub question: String,
    pub answer: String,
    pub options: Vec<String>,
}

impl Question {
    pub fn is_correct(&self, option: &str) -> bool {
        option == self.answer
    }

    /// Whether `answer` is one of `options`. Generated questions are not
    /// rejected when this is false, only reported.
    pub fn answer_in_options(&self) -> bool {
        self.options.iter().any(|o| o == &self.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_serializes_as_label() {
        let json = serde_json::to_string(&Difficulty::Challenge).unwrap();
        assert_eq!(json, "\"Challenge\"");

        let parsed: Difficulty = serde_json::from_str("\"Hard\"").unwrap();
        assert_eq!(parsed, Difficulty::Hard);
        assert!(serde_json::from_str::<Difficulty>("\"Impossible\"").is_err());
    }

    #[test]
    fn test_difficulty_lookups() {
        assert_eq!(Difficulty::from_level(1), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_level(4), Some(Difficulty::Challenge));
        assert_eq!(Difficulty::from_level(0), None);
        assert_eq!(Difficulty::from_label(" medium "), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_label("extreme"), None);
    }

    #[test]
    fn test_question_answer_checks() {
        let q = Question {
            id: "1".to_string(),
            category: "Space".to_string(),
            difficulty: Difficulty::Easy,
            question: "Which planet is red?".to_string(),
            answer: "Mars".to_string(),
            options: vec!["Venus".to_string(), "Mars".to_string()],
        };
        assert!(q.is_correct("Mars"));
        assert!(!q.is_correct("mars"));
        assert!(q.answer_in_options());

        let broken = Question {
            answer: "Jupiter".to_string(),
            ..q
        };
        assert!(!broken.answer_in_options());
    }
}
