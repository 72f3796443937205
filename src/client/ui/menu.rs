//! Keyword menu, shown before the first round and after each one.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};

use crate::client::state::{GamePhase, RoundController};

pub fn render(frame: &mut Frame, area: Rect, controller: &RoundController) {
    let mut content = vec![Line::from("")];

    if controller.phase() == GamePhase::Ended {
        content.push(Line::from(Span::styled(
            "GAME OVER",
            Style::default().fg(Color::Cyan).bold(),
        )));
        content.push(Line::from(""));
        content.push(Line::from(Span::styled(
            controller.end_message().to_string(),
            Style::default().fg(Color::White),
        )));
        content.push(Line::from(Span::styled(
            format!(
                "Score: {}/{}",
                controller.correct_count(),
                controller.total_questions()
            ),
            Style::default().fg(Color::Green).bold(),
        )));
        content.push(Line::from(Span::styled(
            format!("Next round: {}", controller.next_tier().summary()),
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        content.push(Line::from(Span::styled(
            "TRIVIA CHALLENGE",
            Style::default().fg(Color::Cyan).bold(),
        )));
    }

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        "Type 1-3 keywords (comma separated) to set the topic.",
        Style::default().fg(Color::Gray),
    )));
    content.push(Line::from(""));
    content.push(Line::from(vec![
        Span::styled("Topic: ", Style::default().fg(Color::White)),
        Span::styled(
            controller.keyword_input().to_string(),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled("_", Style::default().fg(Color::Yellow)),
    ]));
    content.push(Line::from(""));

    match controller.keyword_error() {
        Some(err) => content.push(Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(Color::Red),
        ))),
        None => content.push(Line::from("")),
    }

    let start_label = if controller.phase() == GamePhase::Ended {
        "Play again"
    } else {
        "Start"
    };
    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        format!("[Enter] {start_label}  ·  [Tab] Mute  ·  [Esc] Quit"),
        Style::default().fg(Color::DarkGray),
    )));

    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Trivia Menu ")
                .title_style(Style::default().fg(Color::Cyan))
                .padding(Padding::horizontal(1)),
        );

    frame.render_widget(widget, area);
}
