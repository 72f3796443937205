//! Round controller.
//!
//! Holds everything the player sees and every transition between
//! `Idle -> Playing -> Ended -> Playing`. It never performs I/O: starting a
//! round hands back a [`FetchRequest`] and the event loop reports the outcome
//! through [`RoundController::apply_fetch`].

use std::time::{Duration, Instant};

use crate::models::{DifficultyTier, PetStage, Question};
use crate::protocol::{GenerateTriviaRequest, validate_topic};

use super::timer::Countdown;

pub const OFFLINE_NOTICE: &str = "Live AI trivia unavailable; using offline deck.";
pub const FINISHED_MESSAGE: &str = "Mission complete! You finished every question.";
pub const MANUAL_END_MESSAGE: &str = "Nice work! You wrapped up this round.";
pub const TIME_UP_MESSAGE: &str = "Time's up! Thanks for playing.";
const MAX_KEYWORD_INPUT: usize = 120;

/// Phase of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Keyword menu, nothing played yet.
    Idle,
    /// A round is running (possibly still loading its questions).
    Playing,
    /// Round over, menu shown with the result.
    Ended,
}

/// A question fetch the event loop must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticket: u64,
    pub keywords: String,
    pub last_round_score: Option<u32>,
}

impl FetchRequest {
    pub fn to_request(&self) -> GenerateTriviaRequest {
        GenerateTriviaRequest {
            keywords: Some(self.keywords.clone()),
            last_round_score: self.last_round_score,
        }
    }
}

pub struct RoundController {
    phase: GamePhase,
    round: u32,
    questions: Vec<Question>,
    fallback: Vec<Question>,
    current_index: usize,
    highlighted: usize,
    selected_option: Option<String>,
    is_correct: Option<bool>,
    correct_count: u32,
    /// Score of the last finished round, sent with the next fetch.
    last_round_score: Option<u32>,
    /// Snapshot of `last_round_score` taken when the current round began.
    round_score_snapshot: Option<u32>,
    round_keywords: String,
    loading: bool,
    pending_ticket: Option<u64>,
    next_ticket: u64,
    question_error: Option<String>,
    keyword_input: String,
    keyword_error: Option<String>,
    end_message: String,
    muted: bool,
    countdown: Countdown,
}

impl RoundController {
    pub fn new(fallback: Vec<Question>, round_duration: Duration) -> Self {
        Self {
            phase: GamePhase::Idle,
            round: 0,
            questions: Vec::new(),
            fallback,
            current_index: 0,
            highlighted: 0,
            selected_option: None,
            is_correct: None,
            correct_count: 0,
            last_round_score: None,
            round_score_snapshot: None,
            round_keywords: String::new(),
            loading: false,
            pending_ticket: None,
            next_ticket: 1,
            question_error: None,
            keyword_input: String::new(),
            keyword_error: None,
            end_message: String::new(),
            muted: false,
            countdown: Countdown::new(round_duration),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The question on screen, only while playing.
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_playing() {
            self.questions.get(self.current_index)
        } else {
            None
        }
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn selected_option(&self) -> Option<&str> {
        self.selected_option.as_deref()
    }

    pub fn is_correct(&self) -> Option<bool> {
        self.is_correct
    }

    pub fn has_answered(&self) -> bool {
        self.selected_option.is_some()
    }

    pub fn has_more_questions(&self) -> bool {
        self.current_index + 1 < self.questions.len()
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    /// Denominator for the progress gauge; never zero.
    pub fn total_questions(&self) -> usize {
        let count = if self.questions.is_empty() {
            self.fallback.len()
        } else {
            self.questions.len()
        };
        count.max(1)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn question_error(&self) -> Option<&str> {
        self.question_error.as_deref()
    }

    pub fn keyword_input(&self) -> &str {
        &self.keyword_input
    }

    pub fn keyword_error(&self) -> Option<&str> {
        self.keyword_error.as_deref()
    }

    pub fn end_message(&self) -> &str {
        &self.end_message
    }

    pub fn round_keywords(&self) -> &str {
        &self.round_keywords
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn pet_stage(&self) -> PetStage {
        PetStage::for_correct_count(self.correct_count)
    }

    /// Difficulty bracket the next round will be generated with.
    pub fn next_tier(&self) -> DifficultyTier {
        DifficultyTier::for_last_score(self.last_round_score)
    }

    pub fn last_round_score(&self) -> Option<u32> {
        self.last_round_score
    }

    pub fn time_remaining(&self, now: Instant) -> Duration {
        self.countdown.remaining(now)
    }

    pub fn round_duration(&self) -> Duration {
        self.countdown.duration()
    }

    pub fn push_keyword_char(&mut self, c: char) {
        if self.is_playing() || self.keyword_input.chars().count() >= MAX_KEYWORD_INPUT {
            return;
        }
        self.keyword_input.push(c);
        self.keyword_error = None;
    }

    pub fn pop_keyword_char(&mut self) {
        if self.is_playing() {
            return;
        }
        self.keyword_input.pop();
        self.keyword_error = None;
    }

    /// Validate the menu input and start a round.
    pub fn submit_keywords(&mut self, now: Instant) -> Option<FetchRequest> {
        if self.is_playing() {
            return None;
        }

        match validate_topic(&self.keyword_input) {
            Ok(keywords) => {
                self.keyword_error = None;
                Some(self.begin_round(keywords, now))
            }
            Err(message) => {
                self.keyword_error = Some(message.to_string());
                None
            }
        }
    }

    fn begin_round(&mut self, keywords: String, now: Instant) -> FetchRequest {
        self.round_score_snapshot = self.last_round_score;
        self.phase = GamePhase::Playing;
        self.end_message.clear();
        self.round += 1;
        self.questions.clear();
        self.current_index = 0;
        self.correct_count = 0;
        self.reset_answer_state();
        self.countdown.start(now);
        self.round_keywords = keywords;

        tracing::info!(
            round = self.round,
            keywords = %self.round_keywords,
            last_round_score = ?self.round_score_snapshot,
            "round started"
        );

        self.issue_fetch()
    }

    fn issue_fetch(&mut self) -> FetchRequest {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.pending_ticket = Some(ticket);
        self.loading = true;
        self.question_error = None;

        FetchRequest {
            ticket,
            keywords: self.round_keywords.clone(),
            last_round_score: self.round_score_snapshot,
        }
    }

    /// Apply the outcome of a fetch. Returns false when the result was stale
    /// (a newer fetch was issued, or the round already ended).
    pub fn apply_fetch(&mut self, ticket: u64, result: Result<Vec<Question>, String>) -> bool {
        if self.pending_ticket != Some(ticket) || !self.is_playing() {
            tracing::debug!(ticket, "ignoring stale fetch result");
            return false;
        }

        self.pending_ticket = None;
        self.loading = false;

        let result = result.and_then(|questions| {
            if questions.is_empty() {
                Err("Invalid trivia data received".to_string())
            } else {
                Ok(questions)
            }
        });

        match result {
            Ok(questions) => {
                tracing::info!(count = questions.len(), "live questions loaded");
                self.load_questions(questions);
            }
            Err(message) => {
                tracing::warn!(error = %message, "live trivia fetch failed");
                if self.fallback.is_empty() {
                    self.question_error = Some(message);
                } else {
                    self.load_questions(self.fallback.clone());
                    self.question_error = Some(OFFLINE_NOTICE.to_string());
                }
            }
        }

        true
    }

    fn load_questions(&mut self, questions: Vec<Question>) {
        self.questions = questions;
        self.current_index = 0;
        self.correct_count = 0;
        self.reset_answer_state();
    }

    /// "Try again" after a failed fetch that left no questions.
    pub fn retry_fetch(&mut self) -> Option<FetchRequest> {
        let can_retry = self.is_playing()
            && !self.loading
            && self.questions.is_empty()
            && self.question_error.is_some();

        can_retry.then(|| self.issue_fetch())
    }

    pub fn highlight_next(&mut self) {
        let count = self.current_option_count();
        if count > 0 && !self.has_answered() {
            self.highlighted = (self.highlighted + 1) % count;
        }
    }

    pub fn highlight_previous(&mut self) {
        let count = self.current_option_count();
        if count > 0 && !self.has_answered() {
            self.highlighted = (self.highlighted + count - 1) % count;
        }
    }

    fn current_option_count(&self) -> usize {
        self.current_question().map_or(0, |q| q.options.len())
    }

    /// Answer with the highlighted option.
    pub fn select_highlighted(&mut self) -> Option<bool> {
        let option = self
            .current_question()?
            .options
            .get(self.highlighted)?
            .clone();
        self.select_option(&option)
    }

    /// Record an answer. Returns whether it was correct, or `None` when the
    /// selection was not accepted.
    pub fn select_option(&mut self, option: &str) -> Option<bool> {
        if self.loading || self.has_answered() {
            return None;
        }

        let correct = self.current_question()?.is_correct(option);
        self.selected_option = Some(option.to_string());
        self.is_correct = Some(correct);
        if correct {
            self.correct_count += 1;
        }

        Some(correct)
    }

    pub fn next_question(&mut self) {
        if !self.has_answered() {
            return;
        }

        if self.has_more_questions() {
            self.current_index += 1;
            self.reset_answer_state();
        } else {
            self.end_round_with(FINISHED_MESSAGE);
        }
    }

    pub fn end_round(&mut self) {
        if self.is_playing() {
            self.end_round_with(MANUAL_END_MESSAGE);
        }
    }

    /// Advance the countdown. Returns true if the round just timed out.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.is_playing() && self.countdown.is_expired(now) {
            self.end_round_with(TIME_UP_MESSAGE);
            return true;
        }
        false
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    fn end_round_with(&mut self, message: &str) {
        self.phase = GamePhase::Ended;
        self.end_message = message.to_string();
        self.reset_answer_state();
        self.keyword_input.clear();
        self.countdown.stop();
        self.pending_ticket = None;
        self.loading = false;
        self.last_round_score = Some(self.correct_count);

        tracing::info!(
            round = self.round,
            correct = self.correct_count,
            reason = message,
            "round ended"
        );
    }

    fn reset_answer_state(&mut self) {
        self.selected_option = None;
        self.is_correct = None;
        self.highlighted = 0;
    }
}
