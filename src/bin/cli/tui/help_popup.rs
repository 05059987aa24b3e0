use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

const HELP: &[(&str, &str)] = &[
    ("h / \u{2190}", "don't know"),
    ("l / \u{2192}", "still learning"),
    ("k / \u{2191}", "mastered"),
    ("drag", "swipe the card with the mouse"),
    ("Space", "flip the card"),
    ("u", "undo the last swipe"),
    ("n", "edit notes"),
    ("?", "toggle this help"),
    ("q", "quit"),
];

pub fn draw(f: &mut Frame, area: Rect) {
    let width = 44u16.min(area.width);
    let height = (HELP.len() as u16 + 4).min(area.height);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let mut lines = vec![Line::from("")];
    lines.extend(HELP.iter().map(|(key, action)| {
        Line::from(vec![
            Span::styled(format!("  {:<9}", key), Style::default().fg(Color::Cyan)),
            Span::raw(*action),
        ])
    }));

    let block = Block::default()
        .title(" Swipe to sort your words ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(Clear, popup);
    f.render_widget(Paragraph::new(lines).block(block), popup);
}
