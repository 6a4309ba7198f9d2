// App state and main event loop.
// Owns the catalogue state, drives the background load, and handles keyboard input.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use tokio::sync::mpsc::{self, Receiver, error::TryRecvError};
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::loader::{DataLoader, Source};
use crate::state::CatalogueState;
use crate::ui;

const TICK: Duration = Duration::from_millis(50);

/// Main application state.
pub struct App {
    pub state: CatalogueState,
    pub source: Source,
    /// Whether the help overlay is shown.
    pub show_help: bool,
    /// Transient message for the status bar.
    pub notice: Option<String>,
    /// Whether the app should exit.
    pub should_quit: bool,
    loader: DataLoader,
    /// Result channel of the in-flight load, if any.
    pending_load: Option<Receiver<Result<Catalog>>>,
}

impl App {
    pub fn new(state: CatalogueState, loader: DataLoader, source: Source) -> Self {
        Self {
            state,
            source,
            show_help: false,
            notice: None,
            should_quit: false,
            loader,
            pending_load: None,
        }
    }

    /// Start loading the catalogue in the background.
    ///
    /// Only one load runs at a time; `refresh` skips the cache.
    pub fn start_load(&mut self, refresh: bool) {
        if self.is_loading() {
            self.notice = Some("Already loading".to_string());
            return;
        }

        let (tx, rx) = mpsc::channel(1);
        let loader = self.loader.clone().bypass_cache(refresh);
        let source = self.source.clone();
        info!(source = %source, refresh, "loading catalogue");
        tokio::spawn(async move {
            let result = loader.load(&source).await;
            let _ = tx.send(result).await;
        });

        self.pending_load = Some(rx);
        self.state.set_loading();
    }

    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
            self.on_tick(Instant::now());
        }
        Ok(())
    }

    /// Drain the load channel and apply debounced search.
    pub fn on_tick(&mut self, now: Instant) {
        self.poll_load();
        self.state.tick(now);
    }

    fn poll_load(&mut self) {
        let Some(rx) = self.pending_load.as_mut() else {
            return;
        };
        let outcome = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                warn!("load task ended without a result");
                self.pending_load = None;
                return;
            }
        };
        self.pending_load = None;

        match outcome {
            Ok(catalog) => {
                debug!(
                    categories = catalog.categories.len(),
                    items = catalog.item_count(),
                    "catalogue ready"
                );
                self.state.set_loaded(catalog);
            }
            Err(e) => self.state.set_error(&e),
        }
    }

    /// Handle keyboard and other events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key, Instant::now());
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        if self.state.search.active {
            self.handle_search_key(key, now);
            return;
        }

        self.notice = None;
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('/') => self.state.search.active = true,
            KeyCode::Char('t') => self.state.cycle_tag(true),
            KeyCode::Char('T') => self.state.cycle_tag(false),
            KeyCode::Char('c') => self.state.clear_filters(),
            KeyCode::Char('r') => self.start_load(true),
            KeyCode::Right | KeyCode::Char('l') => self.state.pane.select_next(now),
            KeyCode::Left | KeyCode::Char('h') => self.state.pane.select_prev(now),
            KeyCode::Down | KeyCode::Char('j') => self.state.pane.select_vertical(true, now),
            KeyCode::Up | KeyCode::Char('k') => self.state.pane.select_vertical(false, now),
            KeyCode::PageDown => self.state.pane.select_group(true, now),
            KeyCode::PageUp => self.state.pane.select_group(false, now),
            KeyCode::Home | KeyCode::Char('g') => self.state.pane.select(0, now),
            KeyCode::End | KeyCode::Char('G') => self.state.pane.select(usize::MAX, now),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char(c) => self.state.search.push(c, now),
            KeyCode::Backspace => self.state.search.backspace(now),
            KeyCode::Enter => {
                self.state.search.active = false;
                self.state.commit_search(now);
            }
            KeyCode::Esc => {
                self.state.search.active = false;
                self.state.search.clear(now);
                self.state.commit_search(now);
            }
            _ => {}
        }
    }
}
