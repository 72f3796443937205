//! Fallback deck loading.
//!
//! Deck files come in two shapes: the legacy offline format with a numeric
//! difficulty and a `correct_index`, and questions saved straight from the
//! generator that already carry `answer`. Both are normalized to [`Question`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::models::{Difficulty, Question};

const BUNDLED_DECK: &str = include_str!("../../assets/questions.json");

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse deck: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("deck must contain at least one question")]
    Empty,
}

#[derive(Deserialize)]
struct RawEntry {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    difficulty: Option<Value>,
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    correct_index: Option<usize>,
}

impl RawEntry {
    fn normalize(self, index: usize) -> Question {
        let id = match self.id {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => index.to_string(),
        };

        let difficulty = match &self.difficulty {
            Some(Value::String(label)) => Difficulty::from_label(label),
            Some(Value::Number(n)) => n.as_u64().and_then(Difficulty::from_level),
            _ => None,
        }
        .unwrap_or(Difficulty::Medium);

        let answer = match self.answer {
            Some(answer) => answer,
            None => {
                let correct = self.correct_index.unwrap_or(0);
                self.options.get(correct).cloned().unwrap_or_default()
            }
        };

        Question {
            id,
            category: self.category.unwrap_or_else(|| "General".to_string()),
            difficulty,
            question: self.question.unwrap_or_default(),
            answer,
            options: self.options,
        }
    }
}

/// Parse deck JSON into normalized questions.
pub fn parse_deck(json: &str) -> Result<Vec<Question>, LoadError> {
    let entries: Vec<RawEntry> = serde_json::from_str(json)?;
    if entries.is_empty() {
        return Err(LoadError::Empty);
    }

    Ok(entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| entry.normalize(index))
        .collect())
}

/// Load a deck from a JSON file on disk.
pub fn load_deck_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, LoadError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let deck = parse_deck(&json)?;
    tracing::debug!(path = %path.display(), count = deck.len(), "loaded deck");
    Ok(deck)
}

/// The offline deck compiled into the binary.
pub fn bundled_deck() -> Vec<Question> {
    match parse_deck(BUNDLED_DECK) {
        Ok(deck) => deck,
        Err(err) => {
            tracing::error!(error = %err, "bundled deck is unusable");
            Vec::new()
        }
    }
}
