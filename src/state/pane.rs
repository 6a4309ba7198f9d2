// Terminal render target for the catalogue.
// Holds the current view, tile selection, scroll position and effect timing.

use std::time::Instant;

use crate::effects::{self, Burst, Decorations, EffectsConfig, Phase};
use crate::error::Result;
use crate::render::{CatalogView, RenderTarget};

/// Tiles per grid row.
pub const COLUMNS: usize = 3;
/// Terminal lines used by one row of tiles.
pub const TILE_HEIGHT: u16 = 7;
/// Terminal lines used by a group title.
pub const HEADER_HEIGHT: u16 = 1;

/// A laid-out line band of the pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneRow {
    Header { group: usize },
    Tiles { group: usize, start: usize, len: usize },
}

impl PaneRow {
    pub fn height(&self) -> u16 {
        match self {
            PaneRow::Header { .. } => HEADER_HEIGHT,
            PaneRow::Tiles { .. } => TILE_HEIGHT,
        }
    }

    pub fn group(&self) -> usize {
        match self {
            PaneRow::Header { group } | PaneRow::Tiles { group, .. } => *group,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CatalogPane {
    view: CatalogView,
    decorations: Decorations,
    selected: Option<usize>,
    /// First visible row.
    pub offset: usize,
    rendered_at: Instant,
    /// When each group first scrolled into view.
    revealed: Vec<Option<Instant>>,
    burst: Option<Burst>,
}

impl Default for CatalogPane {
    fn default() -> Self {
        Self {
            view: CatalogView::default(),
            decorations: Decorations::default(),
            selected: None,
            offset: 0,
            rendered_at: Instant::now(),
            revealed: Vec::new(),
            burst: None,
        }
    }
}

impl RenderTarget for CatalogPane {
    fn replace_content(&mut self, view: &CatalogView) -> Result<()> {
        let count = view.tile_count();
        self.selected = match self.selected {
            _ if count == 0 => None,
            Some(i) => Some(i.min(count - 1)),
            None => Some(0),
        };
        self.view = view.clone();
        self.decorations = Decorations::default();
        self.offset = 0;
        self.rendered_at = Instant::now();
        self.revealed = vec![None; view.groups().len()];
        self.burst = None;
        Ok(())
    }

    fn decorate(&mut self, decorations: &Decorations) {
        self.decorations = decorations.clone();
    }
}

impl CatalogPane {
    pub fn view(&self) -> &CatalogView {
        &self.view
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Group headers followed by their tile rows.
    pub fn rows(&self) -> Vec<PaneRow> {
        let mut rows = Vec::new();
        let mut start = 0;
        for (group, view) in self.view.groups().iter().enumerate() {
            rows.push(PaneRow::Header { group });
            for chunk in view.tiles.chunks(COLUMNS) {
                rows.push(PaneRow::Tiles {
                    group,
                    start,
                    len: chunk.len(),
                });
                start += chunk.len();
            }
        }
        rows
    }

    /// Select a tile, starting a particle burst when the selection moves.
    pub fn select(&mut self, index: usize, now: Instant) {
        let count = self.view.tile_count();
        if count == 0 {
            return;
        }
        let index = index.min(count - 1);
        if self.selected != Some(index) {
            self.selected = Some(index);
            self.burst = Some(Burst::new(index, now));
        }
    }

    pub fn select_next(&mut self, now: Instant) {
        let next = self.selected.map_or(0, |i| i + 1);
        self.select(next, now);
    }

    pub fn select_prev(&mut self, now: Instant) {
        let prev = self.selected.map_or(0, |i| i.saturating_sub(1));
        self.select(prev, now);
    }

    /// Move to the same column in the next (`down`) or previous tile row.
    pub fn select_vertical(&mut self, down: bool, now: Instant) {
        let Some(current) = self.selected else {
            return self.select(0, now);
        };
        let tile_rows: Vec<(usize, usize)> = self
            .rows()
            .into_iter()
            .filter_map(|row| match row {
                PaneRow::Tiles { start, len, .. } => Some((start, len)),
                PaneRow::Header { .. } => None,
            })
            .collect();
        let Some(position) = tile_rows
            .iter()
            .position(|(start, len)| (*start..start + len).contains(&current))
        else {
            return;
        };

        let target = if down {
            position + 1
        } else if position == 0 {
            return;
        } else {
            position - 1
        };
        if let Some((start, len)) = tile_rows.get(target) {
            let column = current - tile_rows[position].0;
            self.select(start + column.min(len - 1), now);
        }
    }

    /// Jump to the first tile of the next or previous group.
    pub fn select_group(&mut self, forward: bool, now: Instant) {
        let Some(current) = self.selected else {
            return self.select(0, now);
        };

        let groups = self.view.groups();
        let mut starts = Vec::with_capacity(groups.len());
        let mut start = 0;
        for group in groups {
            starts.push(start);
            start += group.tiles.len();
        }
        let group = starts.iter().rposition(|s| *s <= current).unwrap_or(0);

        let target = if forward {
            starts.get(group + 1).copied()
        } else if current > starts[group] {
            Some(starts[group])
        } else {
            group.checked_sub(1).map(|g| starts[g])
        };
        if let Some(index) = target {
            self.select(index, now);
        }
    }

    /// Adjust `offset` so the selected tile row fits in `height` lines.
    pub fn scroll_to_selected(&mut self, height: u16) {
        let rows = self.rows();
        let Some(selected) = self.selected else {
            self.offset = 0;
            return;
        };
        let Some(row) = rows.iter().position(|row| match row {
            PaneRow::Tiles { start, len, .. } => (*start..start + len).contains(&selected),
            PaneRow::Header { .. } => false,
        }) else {
            return;
        };

        // Keep the group title visible when scrolling up to its first row
        let top = if row > 0 && matches!(rows[row - 1], PaneRow::Header { .. }) {
            row - 1
        } else {
            row
        };
        if top < self.offset {
            self.offset = top;
        }
        while self.offset < row {
            let used: u16 = rows[self.offset..=row].iter().map(PaneRow::height).sum();
            if used <= height {
                break;
            }
            self.offset += 1;
        }
    }

    /// Record that `group` is on screen; the first sighting starts its entrance.
    pub fn mark_revealed(&mut self, group: usize, now: Instant) {
        if let Some(slot) = self.revealed.get_mut(group) {
            slot.get_or_insert(now);
        }
    }

    /// Entrance phase of a tile.
    pub fn tile_phase(&self, index: usize, group: usize, now: Instant) -> Phase {
        let Some(fx) = self.decorations.tile(index) else {
            return Phase::Shown;
        };
        let started = if fx.reveal {
            match self.revealed.get(group).copied().flatten() {
                Some(at) => at,
                None => return Phase::Hidden,
            }
        } else {
            self.rendered_at
        };
        effects::entrance_phase(fx, started, self.decorations.entrance, now)
    }

    /// Whether the selected tile is drawn tilted.
    pub fn is_tilted(&self, index: usize) -> bool {
        self.decorations.tilt.is_some() && self.selected == Some(index)
    }

    /// Particle glyphs to draw on `index`, if it is bursting.
    pub fn particles(
        &self,
        index: usize,
        config: Option<&EffectsConfig>,
        now: Instant,
    ) -> Option<String> {
        let config = config?;
        let burst = self.burst.filter(|b| b.tile == index)?;
        burst.particles(config, now)
    }
}
