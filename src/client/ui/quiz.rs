//! Question panel.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};

use crate::client::state::RoundController;
use crate::models::Question;

const OPTION_LABELS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

pub fn render(frame: &mut Frame, area: Rect, controller: &RoundController, question: &Question) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // Progress + category
        Constraint::Length(1), // Notice
        Constraint::Length(5), // Question text
        Constraint::Min(6),    // Options
        Constraint::Length(2), // Feedback
        Constraint::Length(1), // Controls
    ])
    .split(area);

    render_progress(frame, chunks[0], controller, question);
    render_notice(frame, chunks[1], controller);
    render_question_text(frame, chunks[2], &question.question);
    render_options(frame, chunks[3], controller, question);
    render_feedback(frame, chunks[4], controller, question);
    render_controls(frame, chunks[5], controller);
}

fn render_progress(frame: &mut Frame, area: Rect, controller: &RoundController, question: &Question) {
    let line = Line::from(vec![
        Span::styled(
            format!(
                "Question {} of {}",
                controller.current_index() + 1,
                controller.questions().len()
            ),
            Style::default().fg(Color::Cyan).bold(),
        ),
        Span::styled(
            format!("  ·  {}  ·  {}", question.category, question.difficulty),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_notice(frame: &mut Frame, area: Rect, controller: &RoundController) {
    if let Some(notice) = controller.question_error() {
        let widget = Paragraph::new(notice.to_string()).fg(Color::Yellow);
        frame.render_widget(widget, area);
    }
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text.to_string())
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .padding(Padding::horizontal(1)),
        );

    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, controller: &RoundController, question: &Question) {
    let selected = controller.selected_option();

    let lines: Vec<Line> = question
        .options
        .iter()
        .enumerate()
        .map(|(i, opt)| {
            let is_highlighted = selected.is_none() && i == controller.highlighted();
            let prefix = if is_highlighted { "> " } else { "  " };
            let label = OPTION_LABELS.get(i).copied().unwrap_or('?');

            // After answering, reveal the right option and mark a wrong pick.
            let style = match selected {
                Some(_) if question.is_correct(opt) => Style::default().fg(Color::Green).bold(),
                Some(pick) if pick == opt.as_str() => Style::default().fg(Color::Red).bold(),
                Some(_) => Style::default().fg(Color::DarkGray),
                None if is_highlighted => Style::default().fg(Color::Yellow).bold(),
                None => Style::default().fg(Color::White),
            };

            Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(format!("{label}) "), style),
                Span::styled(opt.clone(), style),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Options ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );

    frame.render_widget(widget, area);
}

fn render_feedback(frame: &mut Frame, area: Rect, controller: &RoundController, question: &Question) {
    let line = match controller.is_correct() {
        Some(true) => Line::from(Span::styled(
            "Correct! Your pet looks happier.",
            Style::default().fg(Color::Green).bold(),
        )),
        Some(false) => Line::from(Span::styled(
            format!("Not quite. The answer was {}.", question.answer),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(""),
    };

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_controls(frame: &mut Frame, area: Rect, controller: &RoundController) {
    let text = match (controller.has_answered(), controller.has_more_questions()) {
        (false, _) => "j/k or arrows to select  ·  Enter/Space to answer  ·  e end  ·  m mute  ·  q quit",
        (true, true) => "Enter/n next question  ·  e end  ·  m mute  ·  q quit",
        (true, false) => "Enter/n finish round  ·  m mute  ·  q quit",
    };

    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);

    frame.render_widget(widget, area);
}
