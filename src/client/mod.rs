//! Terminal trivia client.
//!
//! Drives game rounds with [`RoundController`], fetching questions from the
//! backend and falling back to the offline deck.

mod api;
mod client;
mod state;
mod timer;
mod ui;

pub use api::{FetchError, TriviaClient};
pub use client::{PlayOptions, run};
pub use state::{FetchRequest, GamePhase, OFFLINE_NOTICE, RoundController};
pub use timer::{Countdown, DEFAULT_ROUND_SECONDS};
