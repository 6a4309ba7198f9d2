// State management module.
// Handles catalogue loading state, filters, search input and the tile pane.

pub mod catalogue;
pub mod filters;
pub mod loading;
pub mod pane;
pub mod search;

pub use catalogue::CatalogueState;
pub use filters::load_filters;
pub use loading::LoadingState;
pub use pane::{CatalogPane, PaneRow};
pub use search::SearchInput;
