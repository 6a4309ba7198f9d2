// Persistence for the last-used search and tag.

use std::path::Path;

use tracing::{debug, warn};

use crate::cache;
use crate::catalog::FilterState;

/// Read saved filters. Missing or unreadable files yield empty filters.
pub fn load_filters(path: Option<&Path>) -> FilterState {
    let Some(path) = path else {
        return FilterState::default();
    };
    match cache::read_json::<FilterState>(path) {
        Ok(Some(state)) => {
            debug!(query = %state.query, tag = ?state.tag, "restored filters");
            state
        }
        Ok(None) => FilterState::default(),
        Err(e) => {
            warn!(error = %e, "ignoring saved filters");
            FilterState::default()
        }
    }
}

/// Save filters, logging failures. Empty filters remove the saved file.
pub fn save_filters(path: Option<&Path>, state: &FilterState) {
    let Some(path) = path else {
        return;
    };
    let result = if state.is_empty() {
        cache::delete(path)
    } else {
        cache::write_json(path, state)
    };
    if let Err(e) = result {
        warn!(error = %e, "failed to save filters");
    }
}
