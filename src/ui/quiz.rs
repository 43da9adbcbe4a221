use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use crate::app::App;
use crate::session::{CORRECT_MARKER, Feedback, INCORRECT_MARKER};

use super::fit;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let question_text = match app.current_question() {
        Ok(question) => question.text.clone(),
        Err(_) => "Question unavailable".to_string(),
    };

    // Margin eats two columns on each side.
    let inner_width = area.width.saturating_sub(4);
    let fixed_rows = 7;
    let question_rows = fit::fit_height(
        &question_text,
        inner_width,
        1,
        area.height.saturating_sub(fixed_rows + 4).max(1),
    );

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(question_rows),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_header(frame, chunks[0]);
    render_question(frame, chunks[2], &question_text);
    render_input(frame, chunks[4], app);
    render_feedback(frame, chunks[6], app.session().feedback());
    render_controls(frame, chunks[7], app.session().has_answered());
}

fn render_header(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new(Span::styled(
        "TRIVIA QUIZ",
        Style::default().fg(Color::Cyan).bold(),
    ));
    frame.render_widget(widget, area);
}

fn render_question(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let locked = app.session().has_answered();
    let draft_style = if locked {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Yellow)
    };

    let mut spans = vec![
        Span::styled("Your answer: ", Style::default().fg(Color::Gray)),
        Span::styled(app.session().draft_answer(), draft_style),
    ];
    if !locked {
        spans.push(Span::styled("_", draft_style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_feedback(frame: &mut Frame, area: Rect, feedback: &Feedback) {
    let lines: Vec<Line> = match feedback {
        Feedback::None => vec![Line::from(Span::styled(
            "Type your answer, or say it to the assistant.",
            Style::default().fg(Color::DarkGray),
        ))],
        Feedback::Correct { comment } => {
            let mut lines = vec![Line::from(Span::styled(
                CORRECT_MARKER,
                Style::default().fg(Color::Green).bold(),
            ))];
            push_comment(&mut lines, comment);
            lines
        }
        Feedback::Incorrect {
            correct_answer,
            comment,
        } => {
            let mut lines = vec![Line::from(vec![
                Span::styled(INCORRECT_MARKER, Style::default().fg(Color::Red).bold()),
                Span::raw(" "),
                Span::styled(
                    correct_answer.as_str(),
                    Style::default().fg(Color::Yellow).bold(),
                ),
            ])];
            push_comment(&mut lines, comment);
            lines
        }
    };

    let widget = Paragraph::new(lines).wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

fn push_comment(lines: &mut Vec<Line>, comment: &str) {
    if !comment.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            comment.to_string(),
            Style::default().fg(Color::Gray),
        )));
    }
}

fn render_controls(frame: &mut Frame, area: Rect, answered: bool) {
    let text = if answered {
        "enter next question  ·  esc quit"
    } else {
        "enter check answer  ·  tab next question  ·  esc quit"
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
