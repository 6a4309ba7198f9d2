// ecoview entry point.
// Parses the command line, sets up logging, then runs the TUI or an HTML export.

mod app;
mod cache;
mod catalog;
mod config;
mod effects;
mod error;
mod loader;
mod render;
mod state;
mod ui;

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::catalog::filter_catalog;
use crate::config::Config;
use crate::error::{EcoError, Result};
use crate::loader::{CatalogClient, DataLoader};
use crate::render::{HtmlPage, render_pass};
use crate::state::{CatalogueState, SearchInput, load_filters};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();
    init_logging(&config);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "ecoview failed");
            eprintln!("ecoview: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr when exporting; otherwise to a file so the TUI stays clean.
fn init_logging(config: &Config) {
    let default = if config.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    if config.export.is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return;
    }

    let file = config.log_path().and_then(|path| {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).ok()?;
        }
        OpenOptions::new().create(true).append(true).open(path).ok()
    });
    match file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        // No writable log location: drop log output rather than draw over the TUI
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::sink)
            .init(),
    }
}

async fn run(config: Config) -> Result<()> {
    if config.clear_cache {
        clear_cache([cache::catalog_path(), config.filters_path()].into_iter().flatten());
    }

    let filters_path = config.filters_path();
    let filter = config.initial_filters(load_filters(filters_path.as_deref()));
    let loader = DataLoader::new(CatalogClient::new()?, config.cache_path(), config.ttl());
    let source = config.source();

    if let Some(export) = &config.export {
        let catalog = loader.bypass_cache(config.refresh).load(&source).await?;
        let filtered = filter_catalog(&catalog, &filter);
        let mut page = HtmlPage::new(format!("Ecosystem: {source}"));
        render_pass(&mut page, &filtered, config.effects().as_ref())?;
        write_export(export, &page.to_html()?)?;
        info!(
            path = %export.display(),
            shown = filtered.item_count(),
            total = catalog.item_count(),
            "exported catalogue"
        );
        return Ok(());
    }

    let state = CatalogueState::new(
        filter,
        SearchInput::new(config.debounce()),
        config.effects(),
        filters_path,
    );
    let mut app = App::new(state, loader, source);
    app.start_load(config.refresh);

    let mut terminal = ratatui::init();
    // Blocking event loop
    let result = tokio::task::block_in_place(|| app.run(&mut terminal));
    ratatui::restore();
    result.map_err(EcoError::from)
}

/// Remove cached files. Failures are logged and the rest are still removed.
fn clear_cache(paths: impl IntoIterator<Item = PathBuf>) {
    for path in paths {
        match cache::delete(&path) {
            Ok(()) => info!(path = %path.display(), "cleared cache file"),
            Err(e) => warn!(error = %e, "failed to clear cache file"),
        }
    }
}

fn write_export(path: &Path, html: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, html).map_err(|e| {
        warn!(path = %path.display(), error = %e, "export write failed");
        EcoError::Io(e)
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_clear_cache_continues_past_failures() {
        let temp_dir = TempDir::new().unwrap();
        // A directory cannot be removed as a file
        let stuck = temp_dir.path().join("catalog.json");
        fs::create_dir(&stuck).unwrap();
        let filters = temp_dir.path().join("filters.json");
        fs::write(&filters, "{}").unwrap();

        clear_cache([stuck.clone(), filters.clone()]);

        assert!(stuck.exists());
        assert!(!filters.exists());
    }
}
