// Catalogue data model.
// Normalizes the accepted ecosystem document shapes into one ordered category list.

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{EcoError, Result};

/// Category used when the document is a flat item list.
pub const DEFAULT_CATEGORY: &str = "Projects";

/// Categories drawn with the frosted glass card style.
const FROSTED_CATEGORIES: [&str; 6] = ["tool", "wallet", "other", "defi", "nft", "memecoin"];

const WEBSITE_FIELDS: &[&str] = &["url", "website", "homepage", "web"];
const DISCORD_FIELDS: &[&str] = &["discord", "discord_url", "discordUrl"];
const TWITTER_FIELDS: &[&str] = &["twitter", "x", "twitter_url", "twitterUrl"];
const LOGO_FIELDS: &[&str] = &["logo", "image", "icon"];
const DESCRIPTION_FIELDS: &[&str] = &["description", "desc"];

/// A single catalogued project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    pub name: String,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub url: Option<String>,
    pub discord: Option<String>,
    pub twitter: Option<String>,
    pub tags: Vec<String>,
}

impl Item {
    /// Build an item from a raw JSON object, resolving field aliases.
    pub fn from_object(fields: &Map<String, Value>) -> Self {
        let name = fields
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let tags = match fields.get("tags") {
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };

        Self {
            name,
            description: first_non_empty(fields, DESCRIPTION_FIELDS),
            logo: first_non_empty(fields, LOGO_FIELDS),
            url: first_non_empty(fields, WEBSITE_FIELDS),
            discord: first_non_empty(fields, DISCORD_FIELDS),
            twitter: first_non_empty(fields, TWITTER_FIELDS),
            tags,
        }
    }

    /// Lowercased text the search query is matched against.
    pub fn search_text(&self) -> String {
        let mut parts: Vec<&str> = vec![&self.name];
        if let Some(description) = &self.description {
            parts.push(description);
        }
        parts.extend(self.tags.iter().map(String::as_str));
        parts.join(" ").to_lowercase()
    }

    /// Whether any tag equals `tag`, ignoring case.
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == tag)
    }
}

/// First alias field holding a non-blank string.
fn first_non_empty(fields: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// A named, ordered group of items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub items: Vec<Item>,
}

impl Category {
    pub fn new(name: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }

    /// Whether this category uses the frosted card style.
    pub fn is_frosted(&self) -> bool {
        FROSTED_CATEGORIES.contains(&self.name.to_lowercase().as_str())
    }
}

/// Canonical catalogue: categories in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub categories: Vec<Category>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Normalize any accepted document shape.
    ///
    /// Accepts a category map, a bare item array, or `{"items": [...]}`.
    pub fn from_json(document: &Value) -> Result<Self> {
        match document {
            Value::Array(items) => Ok(Self::flat(items)),
            Value::Object(map) => {
                if map.len() == 1 {
                    if let Some(Value::Array(items)) = map.get("items") {
                        return Ok(Self::flat(items));
                    }
                }

                let categories = map
                    .iter()
                    .filter_map(|(name, value)| match value {
                        Value::Array(items) => Some(Category::new(name, parse_items(items))),
                        _ => {
                            warn!(category = %name, "skipping category that is not a list");
                            None
                        }
                    })
                    .collect();
                Ok(Self::new(categories))
            }
            other => Err(EcoError::Shape(format!(
                "expected an object or array, found {}",
                json_kind(other)
            ))),
        }
    }

    fn flat(items: &[Value]) -> Self {
        Self::new(vec![Category::new(DEFAULT_CATEGORY, parse_items(items))])
    }

    /// Total number of items across all categories.
    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    /// All items in category order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.categories.iter().flat_map(|c| c.items.iter())
    }
}

fn parse_items(values: &[Value]) -> Vec<Item> {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| match value {
            Value::Object(fields) => Some(Item::from_object(fields)),
            _ => {
                warn!(index, "skipping catalogue entry that is not an object");
                None
            }
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_map_keeps_document_order() {
        let doc = json!({
            "Wallet": [{"name": "Keeper"}],
            "DeFi": [{"name": "Acme"}, {"name": "Acme"}],
            "Bridge": []
        });

        let catalog = Catalog::from_json(&doc).unwrap();
        let names: Vec<&str> = catalog.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Wallet", "DeFi", "Bridge"]);
        // Duplicates are kept as separate items
        assert_eq!(catalog.categories[1].items.len(), 2);
        assert_eq!(catalog.item_count(), 3);
    }

    #[test]
    fn test_flat_shapes_normalize_to_default_category() {
        let array = json!([{"name": "Acme"}]);
        let wrapped = json!({"items": [{"name": "Acme"}]});

        let from_array = Catalog::from_json(&array).unwrap();
        let from_wrapped = Catalog::from_json(&wrapped).unwrap();

        assert_eq!(from_array, from_wrapped);
        assert_eq!(from_array.categories[0].name, DEFAULT_CATEGORY);
        assert_eq!(from_array.categories[0].items[0].name, "Acme");
    }

    #[test]
    fn test_items_key_next_to_other_categories_is_a_category() {
        let doc = json!({"items": [{"name": "A"}], "Tools": [{"name": "B"}]});
        let catalog = Catalog::from_json(&doc).unwrap();
        assert_eq!(catalog.categories.len(), 2);
        assert_eq!(catalog.categories[0].name, "items");
    }

    #[test]
    fn test_scalar_document_is_rejected() {
        let err = Catalog::from_json(&json!("nope")).unwrap_err();
        assert!(matches!(err, EcoError::Shape(_)));
    }

    #[test]
    fn test_non_list_category_and_non_object_entries_are_skipped() {
        let doc = json!({"DeFi": [{"name": "Acme"}, 42, "x"], "Meta": {"a": 1}});
        let catalog = Catalog::from_json(&doc).unwrap();
        assert_eq!(catalog.categories.len(), 1);
        assert_eq!(catalog.categories[0].items.len(), 1);
    }

    #[test]
    fn test_link_aliases_first_non_empty_wins() {
        let doc = json!({
            "name": "Acme",
            "url": "  ",
            "website": "https://acme.example",
            "homepage": "https://ignored.example",
            "x": "https://x.com/acme",
            "discordUrl": "https://discord.gg/acme",
            "image": "https://acme.example/logo.png",
            "desc": "Swaps things"
        });
        let Value::Object(fields) = doc else {
            unreachable!()
        };

        let item = Item::from_object(&fields);
        assert_eq!(item.url.as_deref(), Some("https://acme.example"));
        assert_eq!(item.twitter.as_deref(), Some("https://x.com/acme"));
        assert_eq!(item.discord.as_deref(), Some("https://discord.gg/acme"));
        assert_eq!(item.logo.as_deref(), Some("https://acme.example/logo.png"));
        assert_eq!(item.description.as_deref(), Some("Swaps things"));
    }

    #[test]
    fn test_missing_name_and_odd_tags() {
        let doc = json!({"tags": ["swap", 3, null, "dex"]});
        let Value::Object(fields) = doc else {
            unreachable!()
        };

        let item = Item::from_object(&fields);
        assert_eq!(item.name, "");
        assert_eq!(item.tags, ["swap", "dex"]);
    }

    #[test]
    fn test_frosted_categories() {
        assert!(Category::new("DeFi", vec![]).is_frosted());
        assert!(Category::new("wallet", vec![]).is_frosted());
        assert!(!Category::new("Infrastructure", vec![]).is_frosted());
    }
}
