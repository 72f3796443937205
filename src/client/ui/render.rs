//! Top-level layout: HUD, pet panel and the phase-specific main panel.

use std::time::Instant;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap};

use crate::client::state::{GamePhase, RoundController};

use super::{menu, quiz};

pub fn render(frame: &mut Frame, controller: &RoundController, now: Instant) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    let chunks = Layout::vertical([
        Constraint::Length(3), // HUD
        Constraint::Min(12),   // Pet + main panel
    ])
    .margin(1)
    .split(area);

    render_hud(frame, chunks[0], controller, now);

    let body = Layout::horizontal([Constraint::Length(24), Constraint::Min(30)]).split(chunks[1]);
    render_pet(frame, body[0], controller);

    match controller.phase() {
        GamePhase::Idle | GamePhase::Ended => menu::render(frame, body[1], controller),
        GamePhase::Playing => match controller.current_question() {
            Some(question) => quiz::render(frame, body[1], controller, question),
            None => render_waiting(frame, body[1], controller),
        },
    }
}

fn render_hud(frame: &mut Frame, area: Rect, controller: &RoundController, now: Instant) {
    let chunks = Layout::horizontal([
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(10),
    ])
    .split(area);

    let total = controller.total_questions();
    let score = controller.correct_count() as usize;
    let ratio = (score as f64 / total as f64).clamp(0.0, 1.0);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Score ")
                .title_style(Style::default().fg(Color::Cyan)),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(ratio)
        .label(format!("{score}/{total}"));
    frame.render_widget(gauge, chunks[0]);

    let remaining = controller.time_remaining(now).as_secs();
    let timer_color = match remaining {
        0..=10 if controller.is_playing() => Color::Red,
        11..=20 if controller.is_playing() => Color::Yellow,
        _ => Color::White,
    };
    let timer = Paragraph::new(format!("{remaining}s"))
        .alignment(Alignment::Center)
        .style(Style::default().fg(timer_color).bold())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Time "),
        );
    frame.render_widget(timer, chunks[1]);

    let (sound, sound_color) = if controller.is_muted() {
        ("muted", Color::DarkGray)
    } else {
        ("sound", Color::Green)
    };
    let mute = Paragraph::new(sound)
        .alignment(Alignment::Center)
        .fg(sound_color)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(mute, chunks[2]);
}

fn render_pet(frame: &mut Frame, area: Rect, controller: &RoundController) {
    let stage = controller.pet_stage();

    let mut lines: Vec<Line> = vec![Line::from("")];
    lines.extend(
        stage
            .art()
            .iter()
            .map(|row| Line::from(Span::styled(*row, Style::default().fg(Color::Yellow)))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        stage.name(),
        Style::default().fg(Color::Cyan).bold(),
    )));

    let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Pet ")
            .title_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(widget, area);
}

/// Playing, but no question to show yet: loading or a failed fetch.
fn render_waiting(frame: &mut Frame, area: Rect, controller: &RoundController) {
    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "PREPARING TRIVIA",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
    ];

    match controller.question_error() {
        Some(error) => {
            content.push(Line::from(Span::styled(
                "We hit a glitch fetching your question.",
                Style::default().fg(Color::Red).bold(),
            )));
            content.push(Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(Color::Red),
            )));
            content.push(Line::from(""));
            content.push(Line::from(Span::styled(
                "[R] Try again  ·  [E] End round  ·  [Q] Quit",
                Style::default().fg(Color::DarkGray),
            )));
        }
        None => {
            content.push(Line::from(Span::styled(
                "Summoning your first cosmic question...",
                Style::default().fg(Color::Yellow),
            )));
        }
    }

    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().padding(Padding::vertical(2)));
    frame.render_widget(widget, area);
}
