use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use vokabel_lib::vocabulary::algorithm::decision_for_swipe;
use vokabel_lib::vocabulary::{SessionPhase, VocabularyEntry};

use super::app_state::TuiState;
use super::ui::{bucket_color, bucket_symbol};

pub fn draw(f: &mut Frame, area: Rect, state: &TuiState) {
    let Some(entry) = state.current() else {
        let block = Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray));
        let empty = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No words left to review.",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        f.render_widget(Paragraph::new(empty).alignment(Alignment::Center).block(block), area);
        return;
    };

    // Border follows the bucket the card is headed for, then where it is now
    let heading = match state.session.phase() {
        SessionPhase::Committing(direction) => Some(decision_for_swipe(direction).bucket),
        _ => state.drag_preview().map(|direction| decision_for_swipe(direction).bucket),
    };
    let border_style = match heading {
        Some(bucket) => Style::default().fg(bucket_color(bucket)).add_modifier(Modifier::BOLD),
        None => Style::default().fg(Color::Cyan),
    };

    let title = match heading.or(state.current_bucket) {
        Some(bucket) => format!(" {} ", bucket_symbol(bucket)),
        None => " new ".to_string(),
    };

    let side = if state.flipped { " English " } else { " Deutsch " };
    let block = Block::default()
        .title(title)
        .title_bottom(Line::from(side).right_aligned())
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines = if state.flipped {
        back_lines(entry)
    } else {
        front_lines(entry)
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn front_lines(entry: &VocabularyEntry) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from("")];
    lines.push(Line::from(Span::styled(
        entry.german.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )));

    let meta: Vec<&str> = [entry.part_of_speech.as_deref(), entry.pronunciation.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !meta.is_empty() {
        lines.push(Line::from(Span::styled(
            meta.join("  "),
            Style::default().fg(Color::DarkGray),
        )));
    }

    if let Some(example) = entry.german_example.as_deref() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            example.to_string(),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }
    lines
}

fn back_lines(entry: &VocabularyEntry) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from("")];
    lines.push(Line::from(Span::styled(
        entry.english.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )));

    if let Some(example) = entry.english_example.as_deref() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            example.to_string(),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }

    if let Some(notes) = entry.notes.as_deref() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            notes.to_string(),
            Style::default().fg(Color::Magenta),
        )));
    }
    lines
}
