//! # pet-trivia
//!
//! A "virtual pet" trivia game: a small HTTP backend that asks a generative
//! model for questions, and a terminal client that plays rounds against it.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pet_trivia::server::{self, ServerConfig};
//! use pet_trivia::TriviaError;
//!
//! fn main() -> Result<(), TriviaError> {
//!     // Reads GEMINI_API_KEY and friends from the environment or `.env`
//!     let config = ServerConfig::from_env()?;
//!
//!     actix_web::rt::System::new().block_on(server::run(config))
//! }
//! ```

pub mod client;
pub mod data;
pub mod models;
pub mod protocol;
pub mod server;
pub mod terminal;

use std::io;

pub use data::{LoadError, bundled_deck, load_deck_from_json};
pub use models::{Difficulty, DifficultyTier, PetStage, Question};

/// Error type for running the backend or the client.
#[derive(Debug, thiserror::Error)]
pub enum TriviaError {
    /// Error loading a question deck.
    #[error("failed to load questions: {0}")]
    Load(#[from] LoadError),
    /// Missing or invalid backend configuration.
    #[error(transparent)]
    Config(#[from] server::ConfigError),
    /// The model client could not be created.
    #[error("model client error: {0}")]
    Model(#[from] server::ModelError),
    /// The trivia client could not be created.
    #[error("trivia client error: {0}")]
    Fetch(#[from] client::FetchError),
    /// IO error while serving or drawing.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
