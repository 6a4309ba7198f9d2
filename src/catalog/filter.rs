// Search and tag filtering over catalogue items.

use serde::{Deserialize, Serialize};

use super::types::{Catalog, Category, Item};

/// Last-used search text and tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub tag: Option<String>,
}

impl FilterState {
    #[cfg(test)]
    pub fn new(query: impl Into<String>, tag: Option<String>) -> Self {
        Self {
            query: query.into(),
            tag,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty() && self.tag.as_deref().unwrap_or_default().is_empty()
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.tag = None;
    }
}

/// Items matching both `query` and `tag`, in input order.
///
/// An empty query or tag imposes no constraint. Tags match case-insensitively;
/// the query is a case-insensitive substring of name, description and tags.
pub fn filter<'a>(items: &'a [Item], query: &str, tag: &str) -> Vec<&'a Item> {
    let query = query.trim().to_lowercase();
    let tag = tag.trim();

    items
        .iter()
        .filter(|item| tag.is_empty() || item.has_tag(tag))
        .filter(|item| query.is_empty() || item.search_text().contains(&query))
        .collect()
}

/// Apply `state` to every category, dropping categories left empty.
pub fn filter_catalog(catalog: &Catalog, state: &FilterState) -> Catalog {
    let tag = state.tag.as_deref().unwrap_or_default();
    let categories = catalog
        .categories
        .iter()
        .filter_map(|category| {
            let items: Vec<Item> = filter(&category.items, &state.query, tag)
                .into_iter()
                .cloned()
                .collect();
            (!items.is_empty()).then(|| Category::new(&category.name, items))
        })
        .collect();
    Catalog::new(categories)
}
