// Tile grid rendering for the catalogue pane.
// Draws group titles and rows of item tiles with loading and empty states.

use std::time::Instant;

use ratatui::{prelude::*, widgets::*};

use crate::effects::{EffectsConfig, Phase};
use crate::render::{CatalogView, GroupView, Logo, Social, TileView, sanitize_terminal};
use crate::state::catalogue::NO_MATCHES;
use crate::state::pane::COLUMNS;
use crate::state::{CatalogPane, CatalogueState, PaneRow};

/// Render a loading indicator.
pub fn render_loading(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(format!("⏳ {}...", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(text, area);
}

/// Render an error message.
pub fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let text = Paragraph::new(format!("❌ {}", error))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Red));
    frame.render_widget(text, area);
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(text, area);
}

/// Truncate to `max` characters, marking the cut with an ellipsis.
pub fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(max.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

/// Draw the visible rows of the catalogue pane.
pub fn draw_catalog(frame: &mut Frame, state: &mut CatalogueState, area: Rect) {
    let now = Instant::now();
    let pane = &mut state.pane;

    if *pane.view() == CatalogView::NoMatches {
        render_empty(frame, area, NO_MATCHES);
        return;
    }
    if pane.view().groups().is_empty() {
        render_empty(frame, area, "The catalogue is empty");
        return;
    }

    pane.scroll_to_selected(area.height);
    let rows = pane.rows();
    let mut y = area.y;
    for row in rows.iter().skip(pane.offset) {
        let height = row.height();
        if y + height > area.bottom() {
            break;
        }
        pane.mark_revealed(row.group(), now);

        let row_area = Rect::new(area.x, y, area.width, height);
        let group = &pane.view().groups()[row.group()];
        match *row {
            PaneRow::Header { .. } => draw_group_title(frame, group, row_area),
            PaneRow::Tiles { group: g, start, len } => {
                draw_tile_row(frame, pane, state.effects.as_ref(), g, start, len, row_area, now)
            }
        }
        y += height;
    }
}

fn draw_group_title(frame: &mut Frame, group: &GroupView, area: Rect) {
    let color = if group.frosted {
        Color::LightBlue
    } else {
        Color::LightRed
    };
    let title = Line::from(vec![
        Span::styled("── ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            sanitize_terminal(&group.title),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" ({})", group.tiles.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

#[allow(clippy::too_many_arguments)]
fn draw_tile_row(
    frame: &mut Frame,
    pane: &CatalogPane,
    effects: Option<&EffectsConfig>,
    group: usize,
    start: usize,
    len: usize,
    area: Rect,
    now: Instant,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, COLUMNS as u32); COLUMNS])
        .split(area);
    let frosted = pane.view().groups()[group].frosted;

    for (column, index) in (start..start + len).enumerate() {
        let Some(tile) = pane.view().tile(index) else {
            continue;
        };
        let phase = pane.tile_phase(index, group, now);
        let particles = pane.particles(index, effects, now);
        let look = TileLook {
            frosted,
            selected: pane.selected() == Some(index),
            tilted: pane.is_tilted(index),
            phase,
        };
        draw_tile(frame, tile, look, particles, columns[column]);
    }
}

#[derive(Debug, Clone, Copy)]
struct TileLook {
    frosted: bool,
    selected: bool,
    tilted: bool,
    phase: Phase,
}

fn draw_tile(
    frame: &mut Frame,
    tile: &TileView,
    look: TileLook,
    particles: Option<String>,
    area: Rect,
) {
    if look.phase == Phase::Hidden {
        let placeholder = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Black));
        frame.render_widget(placeholder, area);
        return;
    }

    let (border_type, border_color) = match look {
        TileLook { tilted: true, .. } => (BorderType::Thick, Color::Yellow),
        TileLook { selected: true, .. } => (BorderType::Plain, Color::Yellow),
        TileLook { frosted: true, .. } => (BorderType::Rounded, Color::LightBlue),
        _ => (BorderType::Plain, Color::Gray),
    };
    let fading = look.phase == Phase::FadingIn;
    let text_style = if fading {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(if fading {
            Color::DarkGray
        } else {
            border_color
        }))
        .title(Span::styled(
            format!(" {} ", sanitize_terminal(&tile.name)),
            text_style.add_modifier(Modifier::BOLD),
        ));
    if let Some(particles) = particles {
        block = block.title(
            Line::from(Span::styled(particles, Style::default().fg(Color::Yellow)))
                .alignment(Alignment::Right),
        );
    }

    let width = area.width.saturating_sub(2) as usize;
    let mut lines = vec![logo_line(&tile.logo, fading), social_line(tile, fading)];
    let tags = tile
        .tags
        .iter()
        .map(|t| format!("#{}", sanitize_terminal(t)))
        .collect::<Vec<_>>()
        .join(" ");
    lines.push(Line::from(Span::styled(
        clip(&tags, width),
        Style::default().fg(Color::DarkGray),
    )));
    if let Some(description) = &tile.description {
        lines.push(Line::from(Span::styled(
            clip(&sanitize_terminal(description), width * 2),
            text_style,
        )));
    }

    let body = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(body, area);
}

fn logo_line(logo: &Logo, fading: bool) -> Line<'static> {
    match logo {
        Logo::Image(_) => Line::from(Span::styled(
            "▣ logo",
            Style::default().fg(if fading { Color::DarkGray } else { Color::Cyan }),
        )),
        Logo::Avatar { initials, .. } => Line::from(Span::styled(
            format!(" {} ", initials),
            if fading {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Magenta)
                    .add_modifier(Modifier::BOLD)
            },
        )),
    }
}

fn social_line(tile: &TileView, fading: bool) -> Line<'static> {
    let spans: Vec<Span> = tile
        .socials
        .iter()
        .flat_map(|link| {
            let color = match (fading, link.kind) {
                (true, _) => Color::DarkGray,
                (false, Social::Discord) => Color::Magenta,
                (false, Social::Twitter) => Color::Cyan,
                (false, Social::Website) => Color::Green,
            };
            [
                Span::styled(link.kind.label(), Style::default().fg(color)),
                Span::raw(" "),
            ]
        })
        .collect();
    Line::from(spans)
}
