//! Result screen rendering
//!
//! Renders the search query, the recipe count, and either the loading
//! message, the error, or a two-column grid of result cards.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, GRID_COLUMNS};
use crate::data::{recipe_count, ImageResult};
use crate::fetch::FetchPhase;

/// Height of one result card including borders
const CARD_HEIGHT: u16 = 5;

/// Accent color of the application
const ACCENT: Color = Color::Rgb(255, 149, 0);

/// Renders the result screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Summary
            Constraint::Min(0),    // Body
            Constraint::Length(2), // Footer
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_summary(frame, app, chunks[1]);

    let state = app.state();
    match state.phase() {
        FetchPhase::Idle | FetchPhase::Loading => render_loading(frame, chunks[2]),
        FetchPhase::Failure => render_error(frame, state.error_message(), chunks[2]),
        FetchPhase::Success => render_grid(frame, app, chunks[2]),
    }

    render_footer(frame, app, chunks[3]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let query = if app.query.is_empty() {
        "(any recipe)".to_string()
    } else {
        app.query.clone()
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "Chefify ",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::raw(query),
    ]))
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(ACCENT)));

    frame.render_widget(header, area);
}

fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let summary = Paragraph::new(Line::from(vec![
        Span::styled("Total Recipes: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("{} with your ingredients", recipe_count(app.result_count()))),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));

    frame.render_widget(summary, area);
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "Sit tight while I prepare your recipe. It won't take time.",
            Style::default().fg(Color::Cyan),
        )),
        Line::from(Span::styled(
            "Thanks for waiting.",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let loading = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(loading, centered_band(area, 2));
}

fn render_error(frame: &mut Frame, message: Option<&str>, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            message.unwrap_or("Error: search failed").to_string(),
            Style::default().fg(Color::Red),
        )),
        Line::from(Span::styled(
            "Press r to try again",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let error = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(error, centered_band(area, 3));
}

fn render_grid(frame: &mut Frame, app: &App, area: Rect) {
    let images = app.state().images();
    if images.is_empty() {
        let empty = Paragraph::new("No recipes found. Try other options.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, centered_band(area, 1));
        return;
    }

    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    let selected_row = app.selected_index / GRID_COLUMNS;
    let first_row = selected_row.saturating_sub(visible_rows - 1);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
        .split(area);

    for (slot, row_area) in rows.iter().enumerate() {
        let row = first_row + slot;
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
            .split(*row_area);

        for (column, card_area) in columns.iter().enumerate() {
            let index = row * GRID_COLUMNS + column;
            if let Some(image) = images.get(index) {
                render_card(frame, image, index == app.selected_index, *card_area);
            }
        }
    }
}

fn render_card(frame: &mut Frame, image: &ImageResult, selected: bool, area: Rect) {
    let border_style = if selected {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let lines = vec![
        Line::from(Span::styled(
            image.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("Source: {}", image.source),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            image.image_url.clone(),
            Style::default().fg(Color::Blue),
        )),
    ];

    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(card, area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        "q quit  arrows move  r reload  c clear cache  ? help",
        Style::default().fg(Color::DarkGray),
    )];

    if let Some(status) = &app.status {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(status.clone(), Style::default().fg(Color::Green)));
    }

    let mut lines = vec![Line::from(spans)];
    if let Some(image) = app.selected_result() {
        lines.insert(
            0,
            Line::from(Span::styled(
                image.source_url(),
                Style::default().fg(Color::Cyan),
            )),
        );
    }

    frame.render_widget(Paragraph::new(lines), area);
}

/// Returns a full-width band of `height` rows centered vertically in `area`
fn centered_band(area: Rect, height: u16) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    chunks[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{create_test_app, loaded_app};
    use ratatui::{backend::TestBackend, Terminal};

    fn render_to_string(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[tokio::test]
    async fn test_renders_loading_message() {
        let (mut app, _temp_dir) = create_test_app(2);
        app.start();

        let content = render_to_string(&app, 80, 24);

        assert!(content.contains("Sit tight"), "Should show loading message");
        assert!(content.contains("Cuisine: Italian"), "Should show the query");
    }

    #[tokio::test]
    async fn test_renders_result_cards() {
        let (app, _temp_dir) = loaded_app(3).await;

        let content = render_to_string(&app, 100, 30);

        assert!(content.contains("3 recipes with your ingredients"));
        assert!(content.contains("recipe 0"));
        assert!(content.contains("recipe 1"));
        assert!(content.contains("Source: example.com"));
        assert!(content.contains("https://example.com"), "Footer shows source URL");
    }

    #[tokio::test]
    async fn test_single_result_uses_singular() {
        let (app, _temp_dir) = loaded_app(1).await;

        let content = render_to_string(&app, 100, 30);

        assert!(content.contains("1 recipe with your ingredients"));
    }

    #[tokio::test]
    async fn test_renders_empty_results() {
        let (app, _temp_dir) = loaded_app(0).await;

        let content = render_to_string(&app, 80, 24);

        assert!(content.contains("0 recipes"));
        assert!(content.contains("No recipes found"));
    }

    #[tokio::test]
    async fn test_scrolls_to_selected_card() {
        let (mut app, _temp_dir) = loaded_app(20).await;
        app.selected_index = 19;

        let content = render_to_string(&app, 100, 24);

        assert!(content.contains("recipe 19"));
        assert!(!content.contains("recipe 0 "), "First row is scrolled away");
    }
}
