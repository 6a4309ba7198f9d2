// UI module for rendering the TUI.
// Header with search and tag selector, the tile grid, status bar and help overlay.

mod tiles;

use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::state::LoadingState;

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search and tag bar
            Constraint::Min(1),    // Tile grid
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    draw_content(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);

    // Help overlay (rendered last, on top of everything)
    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Draw the search box and tag selector.
fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.state.catalog.is_loading() {
        " ecoview ⏳ "
    } else {
        " ecoview "
    };
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title)
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(32)])
        .split(inner);

    let search = &app.state.search;
    let mut search_line = vec![Span::styled("/ ", Style::default().fg(Color::Yellow))];
    if search.active {
        search_line.push(Span::raw(search.text.as_str()));
        search_line.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    } else if search.text.is_empty() {
        search_line.push(Span::styled(
            "press / to search",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        search_line.push(Span::raw(search.text.as_str()));
    }
    if search.is_pending() {
        search_line.push(Span::styled(" …", Style::default().fg(Color::DarkGray)));
    }
    let search_style = if search.active {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default()
    };
    frame.render_widget(
        Paragraph::new(Line::from(search_line)).style(search_style),
        chunks[0],
    );

    let tag = app.state.filter.tag.as_deref().unwrap_or("all");
    let tag_line = Line::from(vec![
        Span::styled("Tag ", Style::default().fg(Color::DarkGray)),
        Span::styled("◂ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            tiles::clip(tag, 20),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ▸", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("  ({})", app.state.tags.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(tag_line).alignment(Alignment::Right),
        chunks[1],
    );
}

/// Draw the main content area based on the loading state.
fn draw_content(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.state.catalog.is_loaded() {
        tiles::draw_catalog(frame, &mut app.state, area);
        return;
    }
    match &app.state.catalog {
        LoadingState::Idle => tiles::render_empty(frame, area, "Press r to load the catalogue"),
        LoadingState::Loading => tiles::render_loading(frame, area, "Loading catalogue"),
        LoadingState::Error(e) => tiles::render_error(frame, area, e),
        LoadingState::Loaded(_) => {}
    }
}

/// Draw the status bar with keybinding hints and item counts.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut hints = if app.state.search.active {
        vec![
            Span::raw(" type "),
            Span::styled("Search", Style::default().fg(Color::DarkGray)),
            Span::raw("  ↵ "),
            Span::styled("Apply", Style::default().fg(Color::DarkGray)),
            Span::raw("  Esc "),
            Span::styled("Clear", Style::default().fg(Color::DarkGray)),
        ]
    } else {
        vec![
            Span::raw(" ↑↓←→ "),
            Span::styled("Move", Style::default().fg(Color::DarkGray)),
            Span::raw("  / "),
            Span::styled("Search", Style::default().fg(Color::DarkGray)),
            Span::raw("  t/T "),
            Span::styled("Tag", Style::default().fg(Color::DarkGray)),
            Span::raw("  c "),
            Span::styled("Clear", Style::default().fg(Color::DarkGray)),
            Span::raw("  r "),
            Span::styled("Reload", Style::default().fg(Color::DarkGray)),
            Span::raw("  ? "),
            Span::styled("Help", Style::default().fg(Color::DarkGray)),
            Span::raw("  q "),
            Span::styled("Quit", Style::default().fg(Color::DarkGray)),
        ]
    };

    if let Some(notice) = &app.notice {
        hints.push(Span::styled(
            format!("  {}", notice),
            Style::default().fg(Color::Yellow),
        ));
    } else if let Some(status) = app.state.status() {
        let color = if app.state.catalog.error().is_some() {
            Color::Red
        } else {
            Color::Yellow
        };
        hints.push(Span::styled(
            format!("  {}", status),
            Style::default().fg(color),
        ));
    }

    if app.state.catalog.is_loaded() {
        hints.push(Span::styled(
            format!("  {}/{} projects", app.state.shown(), app.state.total()),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let status = Paragraph::new(Line::from(hints));
    frame.render_widget(status, area);
}

/// Draw the help overlay.
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    // Create a centered popup
    let popup_width = 50.min(area.width);
    let popup_height = 17.min(area.height);
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let shortcuts = [
        ("  ↑↓←→ or hjkl  ", "Move between tiles"),
        ("  PgUp/PgDn     ", "Previous/next category"),
        ("  Home/End g/G  ", "First/last tile"),
        ("  /             ", "Search (Enter apply, Esc clear)"),
        ("  t / T         ", "Next/previous tag"),
        ("  c             ", "Clear search and tag"),
        ("  r             ", "Reload, bypassing the cache"),
        ("  ?             ", "Show/hide this help"),
        ("  q             ", "Quit"),
    ];

    let mut help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
    ];
    help_text.extend(shortcuts.iter().map(|(keys, action)| {
        Line::from(vec![
            Span::styled(*keys, Style::default().fg(Color::Cyan)),
            Span::raw(*action),
        ])
    }));
    help_text.push(Line::from(""));
    help_text.push(Line::from(vec![
        Span::styled("Press ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::styled(" or ", Style::default().fg(Color::DarkGray)),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::styled(" to close", Style::default().fg(Color::DarkGray)),
    ]));

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .alignment(Alignment::Left);

    frame.render_widget(help_paragraph, popup_area);
}
