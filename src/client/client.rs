//! Terminal front-end event loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tokio::sync::mpsc;

use crate::TriviaError;
use crate::models::Question;
use crate::terminal::TerminalSession;

use super::api::TriviaClient;
use super::state::{FetchRequest, GamePhase, RoundController};
use super::ui;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Settings for `pet-trivia play`.
pub struct PlayOptions {
    pub server_url: String,
    pub fallback_deck: Vec<Question>,
    pub round_duration: Duration,
    /// Skip the network and play the fallback deck directly.
    pub offline: bool,
}

/// Result of a fetch task, tagged with the ticket it answers.
struct FetchOutcome {
    ticket: u64,
    result: Result<Vec<Question>, String>,
}

/// What the event loop should do after a key press.
#[derive(Debug, PartialEq, Eq)]
enum InputAction {
    None,
    Quit,
    Fetch(FetchRequest),
    Answered { correct: bool },
}

/// Run the trivia game in the terminal.
pub async fn run(options: PlayOptions) -> Result<(), TriviaError> {
    let client = if options.offline {
        None
    } else {
        let client = TriviaClient::new(&options.server_url)?;
        tracing::info!(endpoint = client.endpoint(), "using live trivia backend");
        Some(Arc::new(client))
    };

    let mut controller = RoundController::new(options.fallback_deck, options.round_duration);
    let (tx, mut rx) = mpsc::unbounded_channel::<FetchOutcome>();
    let mut terminal = TerminalSession::start()?;

    loop {
        while let Ok(outcome) = rx.try_recv() {
            controller.apply_fetch(outcome.ticket, outcome.result);
        }

        let now = Instant::now();
        controller.tick(now);

        terminal.draw(|frame| ui::render(frame, &controller, now))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match handle_input(&mut controller, key.code, Instant::now()) {
            InputAction::None => {}
            InputAction::Quit => break,
            InputAction::Fetch(request) => spawn_fetch(client.clone(), request, tx.clone()),
            InputAction::Answered { correct } => {
                if correct && !controller.is_muted() {
                    terminal.bell()?;
                }
            }
        }
    }

    Ok(())
}

fn spawn_fetch(
    client: Option<Arc<TriviaClient>>,
    request: FetchRequest,
    tx: mpsc::UnboundedSender<FetchOutcome>,
) {
    tokio::spawn(async move {
        let result = match client {
            Some(client) => client
                .fetch_round(&request.to_request())
                .await
                .map_err(|err| err.to_string()),
            None => Err("offline mode".to_string()),
        };

        // the loop may have exited already
        let _ = tx.send(FetchOutcome {
            ticket: request.ticket,
            result,
        });
    });
}

fn handle_input(controller: &mut RoundController, key: KeyCode, now: Instant) -> InputAction {
    match controller.phase() {
        GamePhase::Idle | GamePhase::Ended => handle_menu_input(controller, key, now),
        GamePhase::Playing => handle_round_input(controller, key),
    }
}

fn handle_menu_input(controller: &mut RoundController, key: KeyCode, now: Instant) -> InputAction {
    match key {
        KeyCode::Esc => InputAction::Quit,
        KeyCode::Tab => {
            controller.toggle_mute();
            InputAction::None
        }
        KeyCode::Enter => controller
            .submit_keywords(now)
            .map_or(InputAction::None, InputAction::Fetch),
        KeyCode::Backspace => {
            controller.pop_keyword_char();
            InputAction::None
        }
        KeyCode::Char(c) => {
            controller.push_keyword_char(c);
            InputAction::None
        }
        _ => InputAction::None,
    }
}

fn handle_round_input(controller: &mut RoundController, key: KeyCode) -> InputAction {
    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            controller.highlight_previous();
            InputAction::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            controller.highlight_next();
            InputAction::None
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            if controller.has_answered() {
                controller.next_question();
                InputAction::None
            } else {
                controller
                    .select_highlighted()
                    .map_or(InputAction::None, |correct| InputAction::Answered { correct })
            }
        }
        KeyCode::Char('n') => {
            controller.next_question();
            InputAction::None
        }
        KeyCode::Char('e') => {
            controller.end_round();
            InputAction::None
        }
        KeyCode::Char('r') => controller
            .retry_fetch()
            .map_or(InputAction::None, InputAction::Fetch),
        KeyCode::Char('m') | KeyCode::Tab => {
            controller.toggle_mute();
            InputAction::None
        }
        KeyCode::Char('q') | KeyCode::Esc => InputAction::Quit,
        _ => InputAction::None,
    }
}
