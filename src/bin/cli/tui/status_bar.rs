use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::app_state::{Mode, TuiState};

pub fn draw(f: &mut Frame, area: Rect, state: &TuiState) {
    // Show flash message if present
    if let Some(ref msg) = state.flash_message {
        let flash = Paragraph::new(format!(" {}", msg))
            .style(Style::default().bg(Color::Green).fg(Color::Black));
        f.render_widget(flash, area);
        return;
    }

    match state.mode {
        Mode::EditNotes => {
            let text = format!(" Notes: {}\u{2588}", state.input_text);
            let prompt = Paragraph::new(text)
                .style(Style::default().bg(Color::Blue).fg(Color::White));
            f.render_widget(prompt, area);
        }
        Mode::Deck => {
            let hints = if state.show_help {
                " Any key: close help  q: quit "
            } else {
                " h: don't know  l: learning  k: mastered  u: undo  Space: flip  n: notes  ?: help  q: quit "
            };

            let status = Paragraph::new(hints)
                .style(Style::default().bg(Color::DarkGray).fg(Color::White));
            f.render_widget(status, area);
        }
    }
}
