//! Key help modal drawn over the result screen

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Key bindings grouped by topic, in display order
const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("←/h  →/l", "Move within a row"),
            ("↑/k  ↓/j", "Move between rows"),
            ("q  Esc", "Quit"),
        ],
    ),
    (
        "Search",
        &[
            ("r", "Run the search again"),
            ("c", "Clear cached searches"),
            ("?", "Toggle this help"),
        ],
    ),
];

const MODAL_WIDTH: u16 = 44;

/// Renders the help modal centered on the frame
pub fn render(frame: &mut Frame) {
    let lines = binding_lines();
    let area = modal_area(frame.area(), MODAL_WIDTH, lines.len() as u16 + 2);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Keyboard Shortcuts ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .title_bottom(Line::styled(
            " Esc or ? to close ",
            Style::default().fg(Color::DarkGray),
        ));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// A bold title per section followed by its bindings, sections separated by a blank line
fn binding_lines() -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (index, (title, bindings)) in SECTIONS.iter().enumerate() {
        if index > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::styled(
            *title,
            Style::default().add_modifier(Modifier::BOLD),
        ));
        lines.extend(bindings.iter().map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("{:>10}", keys), Style::default().fg(Color::Yellow)),
                Span::raw("  "),
                Span::raw(*action),
            ])
        }));
    }
    lines
}

/// Centers a `width` x `height` box in `area`, shrinking it to fit
fn modal_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
