// Catalogue browsing state.
// Owns the loaded catalogue, tag options, filters and the render target they feed.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::catalog::{Catalog, FilterState, filter_catalog};
use crate::effects::EffectsConfig;
use crate::error::EcoError;
use crate::render::{CatalogView, RenderTarget, render_pass};

use super::filters::save_filters;
use super::loading::LoadingState;
use super::pane::CatalogPane;
use super::search::SearchInput;

pub const NO_MATCHES: &str = "No matches";

#[derive(Debug)]
pub struct CatalogueState {
    pub catalog: LoadingState<Catalog>,
    /// Tag selector options.
    pub tags: Vec<String>,
    /// Filters applied to the current view.
    pub filter: FilterState,
    pub search: SearchInput,
    pub pane: CatalogPane,
    pub effects: Option<EffectsConfig>,
    filters_path: Option<PathBuf>,
    shown: usize,
}

impl CatalogueState {
    pub fn new(
        filter: FilterState,
        mut search: SearchInput,
        effects: Option<EffectsConfig>,
        filters_path: Option<PathBuf>,
    ) -> Self {
        search.set(filter.query.clone());
        Self {
            catalog: LoadingState::Idle,
            tags: Vec::new(),
            filter,
            search,
            pane: CatalogPane::default(),
            effects,
            filters_path,
            shown: 0,
        }
    }

    pub fn set_loading(&mut self) {
        self.catalog = LoadingState::Loading;
    }

    /// Install a freshly loaded catalogue and render it with the current filters.
    pub fn set_loaded(&mut self, catalog: Catalog) {
        self.tags = catalog.tags();
        // Adopt the catalogue's spelling so the tag selector can find it
        if let Some(tag) = self.filter.tag.take() {
            let wanted = tag.to_lowercase();
            match self.tags.iter().find(|t| t.to_lowercase() == wanted) {
                Some(known) => self.filter.tag = Some(known.clone()),
                None => info!(tag = %tag, "saved tag not in catalogue, dropping it"),
            }
        }
        self.catalog = LoadingState::Loaded(catalog);
        self.rerender();
    }

    /// Show a load failure and empty the display.
    pub fn set_error(&mut self, error: &EcoError) {
        let message = if error.is_load_failure() {
            format!("Failed to load data: {error}. Press r to retry.")
        } else {
            error.to_string()
        };
        warn!(error = %error, "catalogue load failed");
        self.catalog = LoadingState::Error(message);
        self.tags.clear();
        self.shown = 0;
        if let Err(e) = self.pane.replace_content(&CatalogView::default()) {
            warn!(error = %e, "failed to clear display");
        }
    }

    /// Apply debounced search text. Returns true when the view changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.flush_search(now, false)
    }

    /// Apply pending search text right away.
    pub fn commit_search(&mut self, now: Instant) -> bool {
        self.flush_search(now, true)
    }

    fn flush_search(&mut self, now: Instant, force: bool) -> bool {
        match self.search.take_ready(now, force) {
            Some(query) if query != self.filter.query => {
                debug!(query = %query, "applying search");
                self.filter.query = query;
                self.apply();
                true
            }
            _ => false,
        }
    }

    /// Step the tag selector; "all tags" sits before the first tag.
    pub fn cycle_tag(&mut self, forward: bool) {
        if self.tags.is_empty() {
            return;
        }
        let current = self
            .filter
            .tag
            .as_ref()
            .and_then(|tag| self.tags.iter().position(|t| t == tag));
        let last = self.tags.len() - 1;
        let next = match (current, forward) {
            (None, true) => Some(0),
            (None, false) => Some(last),
            (Some(i), true) if i == last => None,
            (Some(i), true) => Some(i + 1),
            (Some(0), false) => None,
            (Some(i), false) => Some(i - 1),
        };
        self.filter.tag = next.map(|i| self.tags[i].clone());
        self.apply();
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
        self.search.set("");
        self.apply();
    }

    fn apply(&mut self) {
        save_filters(self.filters_path.as_deref(), &self.filter);
        self.rerender();
    }

    fn rerender(&mut self) {
        let Some(catalog) = self.catalog.data() else {
            return;
        };
        let filtered = filter_catalog(catalog, &self.filter);
        match render_pass(&mut self.pane, &filtered, self.effects.as_ref()) {
            Ok(_) => self.shown = filtered.item_count(),
            Err(e) => warn!(error = %e, "render failed"),
        }
    }

    /// Items currently displayed.
    pub fn shown(&self) -> usize {
        self.shown
    }

    /// Items in the loaded catalogue.
    pub fn total(&self) -> usize {
        self.catalog.data().map_or(0, Catalog::item_count)
    }

    /// Status line message for the current state, if any.
    pub fn status(&self) -> Option<String> {
        match &self.catalog {
            LoadingState::Idle => None,
            LoadingState::Loading => Some("Loading catalogue...".to_string()),
            LoadingState::Error(message) => Some(message.clone()),
            LoadingState::Loaded(_) if *self.pane.view() == CatalogView::NoMatches => {
                Some(NO_MATCHES.to_string())
            }
            LoadingState::Loaded(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::state::filters::load_filters;

    fn acme() -> Catalog {
        Catalog::from_json(&json!({"DeFi": [{"name": "Acme", "tags": ["swap"]}]})).unwrap()
    }

    fn tagged() -> Catalog {
        Catalog::from_json(&json!({
            "DeFi": [{"name": "Acme", "tags": ["swap", "dex"]}],
            "Wallet": [{"name": "Keeper", "tags": ["wallet"]}]
        }))
        .unwrap()
    }

    fn state(filter: FilterState) -> CatalogueState {
        CatalogueState::new(filter, SearchInput::default(), None, None)
    }

    fn type_text(state: &mut CatalogueState, text: &str, now: Instant) {
        for c in text.chars() {
            state.search.push(c, now);
        }
    }

    #[test]
    fn test_search_no_matches_then_clear() {
        let mut state = state(FilterState::default());
        state.set_loaded(acme());

        let groups = state.pane.view().groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].title, "DeFi");
        assert_eq!(groups[0].tiles[0].name, "Acme");
        let original = state.pane.view().clone();
        assert_eq!(state.status(), None);

        let start = Instant::now();
        type_text(&mut state, "zzz", start);
        // Still inside the debounce window
        assert!(!state.tick(start + Duration::from_millis(50)));
        assert_eq!(*state.pane.view(), original);

        assert!(state.tick(start + Duration::from_millis(250)));
        assert_eq!(*state.pane.view(), CatalogView::NoMatches);
        assert_eq!(state.status().as_deref(), Some(NO_MATCHES));
        assert_eq!(state.shown(), 0);

        state.search.clear(start);
        assert!(state.commit_search(start));
        assert_eq!(*state.pane.view(), original);
        assert_eq!(state.shown(), 1);
    }

    #[test]
    fn test_cycle_tag_wraps_through_all() {
        let mut state = state(FilterState::default());
        state.set_loaded(tagged());
        assert_eq!(state.tags, ["dex", "swap", "wallet"]);

        state.cycle_tag(true);
        assert_eq!(state.filter.tag.as_deref(), Some("dex"));
        assert_eq!(state.shown(), 1);

        state.cycle_tag(false);
        assert_eq!(state.filter.tag, None);
        assert_eq!(state.shown(), 2);

        state.cycle_tag(false);
        assert_eq!(state.filter.tag.as_deref(), Some("wallet"));
        assert_eq!(state.pane.view().groups()[0].title, "Wallet");
    }

    #[test]
    fn test_saved_filters_rehydrate() {
        let mut state = state(FilterState::new("acme", Some("missing".to_string())));
        assert_eq!(state.search.text, "acme");
        state.set_loaded(tagged());

        assert_eq!(state.filter.tag, None);
        assert_eq!(state.shown(), 1);
        assert_eq!(state.total(), 2);
    }

    #[test]
    fn test_saved_tag_matches_case_insensitively() {
        let catalog = Catalog::from_json(&json!({
            "DeFi": [{"name": "Acme", "tags": ["DeFi"]}],
            "Wallet": [{"name": "Keeper", "tags": ["wallet"]}]
        }))
        .unwrap();
        let expected = filter_catalog(&catalog, &FilterState::new("", Some("defi".to_string())));

        let mut state = state(FilterState::new("", Some("defi".to_string())));
        state.set_loaded(catalog);

        assert_eq!(state.filter.tag.as_deref(), Some("DeFi"));
        assert_eq!(state.shown(), expected.item_count());
        assert_eq!(state.shown(), 1);

        // The selector continues from the restored tag
        state.cycle_tag(true);
        assert_eq!(state.filter.tag.as_deref(), Some("wallet"));
    }

    #[test]
    fn test_filters_persist_on_apply() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("filters.json");
        let mut state = CatalogueState::new(
            FilterState::default(),
            SearchInput::default(),
            None,
            Some(path.clone()),
        );
        state.set_loaded(tagged());
        state.cycle_tag(true);

        let saved = load_filters(Some(path.as_path()));
        assert_eq!(saved.tag.as_deref(), Some("dex"));

        state.clear_filters();
        assert_eq!(load_filters(Some(path.as_path())), FilterState::default());
    }

    #[test]
    fn test_load_error_empties_display() {
        let mut state = state(FilterState::default());
        state.set_loaded(acme());
        state.set_error(&EcoError::Fetch {
            url: "http://example.test/ecosystem.json".to_string(),
            status: 500,
        });

        assert!(state.pane.view().groups().is_empty());
        let status = state.status().unwrap();
        assert!(status.starts_with("Failed to load data"));
        assert!(status.contains("retry"));
        assert_eq!(state.total(), 0);
    }
}
