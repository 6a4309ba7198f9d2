// Tag extraction for the tag selector.

use std::collections::BTreeSet;

use super::types::{Catalog, Item};

/// Distinct tags across `items`, sorted ascending.
pub fn extract_tags<'a>(items: impl IntoIterator<Item = &'a Item>) -> Vec<String> {
    items
        .into_iter()
        .flat_map(|item| item.tags.iter())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .cloned()
        .collect()
}

impl Catalog {
    /// Tag options for the whole catalogue.
    pub fn tags(&self) -> Vec<String> {
        extract_tags(self.items())
    }
}
