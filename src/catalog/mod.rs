// Catalogue module.
// Data model, tag extraction and filtering for ecosystem documents.

pub mod filter;
pub mod tags;
pub mod types;

pub use filter::{FilterState, filter, filter_catalog};
pub use tags::extract_tags;
pub use types::{Catalog, Category, Item};
