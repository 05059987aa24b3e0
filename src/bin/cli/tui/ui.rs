use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use vokabel_lib::vocabulary::Bucket;

use super::app_state::TuiState;
use super::{card_widget, help_popup, status_bar};

pub fn draw(f: &mut Frame, state: &mut TuiState) {
    let size = f.area();

    // Main layout: counters + card + status bar
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(size);

    let counts_area = outer[0];
    let main_area = outer[1];
    let status_area = outer[2];

    // Card takes the middle of the screen
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(15),
            Constraint::Percentage(70),
            Constraint::Percentage(15),
        ])
        .split(main_area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(10),
            Constraint::Percentage(80),
            Constraint::Percentage(10),
        ])
        .split(columns[1]);
    let card_area = rows[1];

    // Save area for mouse hit-testing
    state.card_area = Some(card_area);

    draw_counts(f, counts_area, state);
    card_widget::draw(f, card_area, state);
    status_bar::draw(f, status_area, state);

    if state.show_help {
        help_popup::draw(f, size);
    }
}

fn draw_counts(f: &mut Frame, area: Rect, state: &TuiState) {
    let counts = state.session.counts();
    let unseen = counts.total_words.saturating_sub(counts.total_reviewed);

    let mut spans = vec![Span::raw(" ")];
    for bucket in Bucket::ALL {
        spans.push(Span::styled(
            format!("{} ", bucket_symbol(bucket)),
            Style::default().fg(bucket_color(bucket)),
        ));
        spans.push(Span::raw(format!("{}   ", counts.get(bucket))));
    }
    spans.push(Span::styled(
        format!("unseen {}", unseen),
        Style::default().fg(Color::DarkGray),
    ));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn bucket_color(bucket: Bucket) -> Color {
    match bucket {
        Bucket::DontKnow => Color::Red,
        Bucket::Learning => Color::Yellow,
        Bucket::Mastered => Color::Green,
    }
}

pub fn bucket_symbol(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::DontKnow => "\u{2190} don't know",
        Bucket::Learning => "\u{2192} learning",
        Bucket::Mastered => "\u{2191} mastered",
    }
}
