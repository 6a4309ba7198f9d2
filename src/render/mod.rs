// Catalogue rendering.
// Turns a (filtered) catalogue into a structured view tree that targets draw.

pub mod html;

use reqwest::Url;
use tracing::warn;

use crate::catalog::{Catalog, Item};
use crate::effects::{self, Decorations, EffectsConfig};
use crate::error::Result;

pub use html::HtmlPage;

const AVATAR_BASE: &str = "https://ui-avatars.com/api/";

/// Social link kinds, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Social {
    Discord,
    Twitter,
    Website,
}

impl Social {
    pub fn label(&self) -> &'static str {
        match self {
            Social::Discord => "Discord",
            Social::Twitter => "Twitter",
            Social::Website => "Website",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialLink {
    pub kind: Social,
    pub url: String,
}

/// Tile logo: the item's own image or a generated avatar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Logo {
    Image(String),
    Avatar { url: String, initials: String },
}

/// One rendered item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileView {
    pub name: String,
    pub description: Option<String>,
    pub logo: Logo,
    pub socials: Vec<SocialLink>,
    pub tags: Vec<String>,
}

/// One rendered, non-empty category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupView {
    pub title: String,
    pub frosted: bool,
    pub tiles: Vec<TileView>,
}

/// Content of the display region after a render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogView {
    /// Nothing survived filtering.
    NoMatches,
    Groups(Vec<GroupView>),
}

impl Default for CatalogView {
    fn default() -> Self {
        CatalogView::Groups(Vec::new())
    }
}

impl CatalogView {
    pub fn groups(&self) -> &[GroupView] {
        match self {
            CatalogView::NoMatches => &[],
            CatalogView::Groups(groups) => groups,
        }
    }

    pub fn tile_count(&self) -> usize {
        self.groups().iter().map(|g| g.tiles.len()).sum()
    }

    /// Tile by its position across all groups.
    pub fn tile(&self, index: usize) -> Option<&TileView> {
        self.groups().iter().flat_map(|g| g.tiles.iter()).nth(index)
    }
}

/// A display region whose content is replaced on every render pass.
pub trait RenderTarget {
    fn replace_content(&mut self, view: &CatalogView) -> Result<()>;

    /// Receive effect decorations for the content just rendered.
    fn decorate(&mut self, _decorations: &Decorations) {}
}

/// Render `catalog` into its view tree, one group per non-empty category.
pub fn render_categorized(catalog: &Catalog) -> CatalogView {
    let groups: Vec<GroupView> = catalog
        .categories
        .iter()
        .filter(|category| !category.items.is_empty())
        .map(|category| GroupView {
            title: category.name.clone(),
            frosted: category.is_frosted(),
            tiles: category.items.iter().map(render_tile).collect(),
        })
        .collect();

    if groups.is_empty() {
        CatalogView::NoMatches
    } else {
        CatalogView::Groups(groups)
    }
}

/// Render into `target`, then attach effects. Effect failures are logged only.
pub fn render_pass(
    target: &mut impl RenderTarget,
    catalog: &Catalog,
    effects: Option<&EffectsConfig>,
) -> Result<CatalogView> {
    let view = render_categorized(catalog);
    target.replace_content(&view)?;

    if let Some(config) = effects {
        match effects::attach(&view, config) {
            Ok(decorations) => target.decorate(&decorations),
            Err(e) => warn!(error = %e, "effects disabled for this render pass"),
        }
    }
    Ok(view)
}

fn render_tile(item: &Item) -> TileView {
    let logo = match item.logo.as_deref().filter(|url| is_safe_url(url)) {
        Some(url) => Logo::Image(url.to_string()),
        None => avatar(&item.name),
    };

    let socials = [
        (Social::Discord, &item.discord),
        (Social::Twitter, &item.twitter),
        (Social::Website, &item.url),
    ]
    .into_iter()
    .filter_map(|(kind, url)| {
        let url = url.as_deref()?;
        is_safe_url(url).then(|| SocialLink {
            kind,
            url: url.to_string(),
        })
    })
    .collect();

    TileView {
        name: item.name.clone(),
        description: item.description.clone(),
        logo,
        socials,
        tags: item.tags.clone(),
    }
}

/// Generated avatar placeholder keyed by name.
fn avatar(name: &str) -> Logo {
    let url = Url::parse_with_params(
        AVATAR_BASE,
        &[("name", name), ("background", "random"), ("size", "128")],
    )
    .map(String::from)
    .unwrap_or_else(|_| AVATAR_BASE.to_string());

    Logo::Avatar {
        url,
        initials: initials(name),
    }
}

/// Up to two uppercase initials, "?" for names without letters or digits.
pub fn initials(name: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().find(|c| c.is_alphanumeric()))
        .flat_map(char::to_uppercase)
        .take(2)
        .collect();
    if initials.is_empty() {
        "?".to_string()
    } else {
        initials
    }
}

/// Links must be relative or use http(s); `javascript:` and friends are dropped.
pub fn is_safe_url(url: &str) -> bool {
    let url = url.trim();
    let scheme_end = url.find(':');
    let path_start = url.find(['/', '?', '#']);
    match (scheme_end, path_start) {
        (Some(colon), Some(path)) if colon > path => true,
        (Some(colon), _) => {
            let scheme = url[..colon].to_ascii_lowercase();
            scheme == "http" || scheme == "https"
        }
        (None, _) => true,
    }
}

/// Remove control characters so item text cannot drive the terminal.
pub fn sanitize_terminal(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\n' || c == '\t' { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::catalog::{FilterState, filter_catalog};

    fn acme_catalog() -> Catalog {
        Catalog::from_json(&json!({"DeFi": [{"name": "Acme", "tags": ["swap"]}]})).unwrap()
    }

    #[test]
    fn test_single_category_renders_one_tile() {
        let view = render_categorized(&acme_catalog());

        let groups = view.groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].title, "DeFi");
        assert!(groups[0].frosted);
        assert_eq!(groups[0].tiles.len(), 1);
        assert_eq!(groups[0].tiles[0].name, "Acme");
    }

    #[test]
    fn test_search_without_matches_then_clear_restores() {
        let catalog = acme_catalog();
        let original = render_categorized(&catalog);

        let none = filter_catalog(&catalog, &FilterState::new("zzz", None));
        assert_eq!(render_categorized(&none), CatalogView::NoMatches);
        assert_eq!(render_categorized(&none).tile_count(), 0);

        let cleared = filter_catalog(&catalog, &FilterState::default());
        assert_eq!(render_categorized(&cleared), original);
    }

    #[test]
    fn test_empty_categories_are_omitted() {
        let catalog = Catalog::from_json(&json!({
            "Empty": [],
            "Wallet": [{"name": "Keeper"}]
        }))
        .unwrap();

        let view = render_categorized(&catalog);
        assert_eq!(view.groups().len(), 1);
        assert_eq!(view.groups()[0].title, "Wallet");
        assert_eq!(view.tile(0).unwrap().name, "Keeper");
        assert!(view.tile(1).is_none());
    }

    #[test]
    fn test_socials_only_when_present() {
        let catalog = Catalog::from_json(&json!([{
            "name": "Acme",
            "twitter": "https://x.com/acme",
            "homepage": "https://acme.example",
            "discord": "javascript:alert(1)"
        }]))
        .unwrap();

        let view = render_categorized(&catalog);
        let tile = view.tile(0).unwrap();
        let kinds: Vec<Social> = tile.socials.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, [Social::Twitter, Social::Website]);
    }

    #[test]
    fn test_missing_logo_falls_back_to_avatar() {
        let view = render_categorized(&acme_catalog());
        let Logo::Avatar { url, initials } = &view.tile(0).unwrap().logo else {
            panic!("expected avatar");
        };
        assert!(url.starts_with(AVATAR_BASE));
        assert!(url.contains("name=Acme"));
        assert_eq!(initials, "A");
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("acme swap protocol"), "AS");
        assert_eq!(initials("  "), "?");
        assert_eq!(initials("$ Coin"), "C");
    }

    #[test]
    fn test_is_safe_url() {
        assert!(is_safe_url("https://acme.example"));
        assert!(is_safe_url("HTTP://acme.example"));
        assert!(is_safe_url("/logos/acme.png"));
        assert!(is_safe_url("logos/a:b.png"));
        assert!(!is_safe_url("javascript:alert(1)"));
        assert!(!is_safe_url(" data:text/html,hi"));
    }

    #[test]
    fn test_sanitize_terminal() {
        assert_eq!(sanitize_terminal("Acme\u{1b}[31m\nSwap"), "Acme[31m Swap");
    }

    #[derive(Default)]
    struct Recorder {
        views: Vec<CatalogView>,
        decorated: usize,
    }

    impl RenderTarget for Recorder {
        fn replace_content(&mut self, view: &CatalogView) -> Result<()> {
            self.views.push(view.clone());
            Ok(())
        }

        fn decorate(&mut self, _decorations: &Decorations) {
            self.decorated += 1;
        }
    }

    #[test]
    fn test_render_pass_survives_effect_failure() {
        let mut target = Recorder::default();
        let mut broken = EffectsConfig::default();
        broken.tilt.max_glare = -1.0;

        let view = render_pass(&mut target, &acme_catalog(), Some(&broken)).unwrap();
        assert_eq!(view.tile_count(), 1);
        assert_eq!(target.views.len(), 1);
        assert_eq!(target.decorated, 0);

        render_pass(&mut target, &acme_catalog(), Some(&EffectsConfig::default())).unwrap();
        assert_eq!(target.decorated, 1);
    }
}
