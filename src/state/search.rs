// Debounced search input.
// Keystrokes edit the pending text; the filter runs once input has been quiet for the debounce window.

use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
pub struct SearchInput {
    /// Text as typed, possibly not yet applied.
    pub text: String,
    /// Whether keystrokes go to the search box.
    pub active: bool,
    /// When the text last changed without being applied.
    dirty_since: Option<Instant>,
    debounce: Duration,
}

impl Default for SearchInput {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl SearchInput {
    pub fn new(debounce: Duration) -> Self {
        Self {
            text: String::new(),
            active: false,
            dirty_since: None,
            debounce,
        }
    }

    /// Replace the text without scheduling a filter run.
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.dirty_since = None;
    }

    pub fn push(&mut self, c: char, now: Instant) {
        self.text.push(c);
        self.dirty_since = Some(now);
    }

    pub fn backspace(&mut self, now: Instant) {
        if self.text.pop().is_some() {
            self.dirty_since = Some(now);
        }
    }

    pub fn clear(&mut self, now: Instant) {
        if !self.text.is_empty() {
            self.text.clear();
            self.dirty_since = Some(now);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.dirty_since.is_some()
    }

    /// Text to apply now: immediately when `force`, otherwise once the
    /// debounce window has passed since the last keystroke.
    pub fn take_ready(&mut self, now: Instant, force: bool) -> Option<String> {
        let since = self.dirty_since?;
        if force || now.saturating_duration_since(since) >= self.debounce {
            self.dirty_since = None;
            Some(self.text.clone())
        } else {
            None
        }
    }
}
