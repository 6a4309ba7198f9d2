// Command-line configuration.
// Parsed with clap; environment variables back the most common options.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::cache;
use crate::catalog::FilterState;
use crate::effects::EffectsConfig;
use crate::loader::Source;

/// Browse an ecosystem project catalogue in the terminal.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Catalogue URL (http/https) or local JSON file
    #[arg(env = "ECOVIEW_SOURCE", default_value = "ecosystem.json")]
    pub source: String,

    /// Seconds a cached catalogue is served before refetching
    #[arg(long, env = "ECOVIEW_TTL_SECS", default_value_t = 3600)]
    pub ttl_secs: u64,

    /// Ignore the cached catalogue (a fresh copy is still cached)
    #[arg(long)]
    pub refresh: bool,

    /// Neither read nor write the catalogue cache
    #[arg(long, conflicts_with = "refresh")]
    pub no_cache: bool,

    /// Delete the cached catalogue and saved filters before starting
    #[arg(long)]
    pub clear_cache: bool,

    /// Write the rendered catalogue as a static HTML page and exit
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Initial search text (overrides the saved search)
    #[arg(long)]
    pub query: Option<String>,

    /// Initial tag filter (overrides the saved tag)
    #[arg(long)]
    pub tag: Option<String>,

    /// Disable tilt, entrance and particle effects
    #[arg(long)]
    pub no_effects: bool,

    /// Quiet time after the last keystroke before the search runs
    #[arg(
        long,
        default_value_t = 200,
        value_parser = clap::value_parser!(u64).range(50..=1000)
    )]
    pub debounce_ms: u64,

    /// Log file (defaults to the cache directory)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn source(&self) -> Source {
        Source::parse(&self.source)
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Catalogue cache file, None when caching is disabled.
    pub fn cache_path(&self) -> Option<PathBuf> {
        if self.no_cache {
            None
        } else {
            cache::catalog_path()
        }
    }

    pub fn filters_path(&self) -> Option<PathBuf> {
        cache::filters_path()
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(cache::log_path)
    }

    pub fn effects(&self) -> Option<EffectsConfig> {
        (!self.no_effects).then(EffectsConfig::default)
    }

    /// Saved filters with command-line overrides applied.
    pub fn initial_filters(&self, saved: FilterState) -> FilterState {
        FilterState {
            query: self.query.clone().unwrap_or(saved.query),
            tag: match &self.tag {
                Some(tag) if tag.is_empty() => None,
                Some(tag) => Some(tag.clone()),
                None => saved.tag,
            },
        }
    }
}
