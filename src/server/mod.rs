//! Trivia generation backend.
//!
//! Proxies `POST /api/generateTrivia` to a generative model and validates
//! what comes back.

mod config;
mod generate;
mod llm;
mod prompt;
mod server;

pub use config::{ConfigError, ModelIds, ServerConfig};
pub use generate::{GenerateError, generate_round, parse_round};
pub use llm::{GeminiClient, ModelError, TriviaModel};
pub use prompt::{build_prompt, trivia_schema};
pub use server::{AppState, configure, run};
