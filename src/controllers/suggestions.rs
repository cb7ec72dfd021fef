use std::time::Duration;

use tokio::time::Instant;

use crate::api::{self, ApiClient};
use crate::error::Result;
use crate::models::{FilterState, FilterVocabulary};

use super::sequence::{RequestSequence, RequestToken};

/// Trailing-edge debounce: fires once, `delay` after the last `touch`.
#[derive(Clone, Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, deadline: None }
    }

    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SuggestionPanel {
    #[default]
    Hidden,
    Showing(Vec<String>),
}

#[derive(Clone, Debug)]
pub struct SuggestionState {
    text: String,
    panel: SuggestionPanel,
    debounce: Debouncer,
    sequence: RequestSequence,
}

impl SuggestionState {
    pub fn new(delay: Duration) -> Self {
        Self {
            text: String::new(),
            panel: SuggestionPanel::Hidden,
            debounce: Debouncer::new(delay),
            sequence: RequestSequence::new(),
        }
    }

    /// A keystroke in the search box. Clearing the box hides the panel at once.
    pub fn on_input(&mut self, text: &str, now: Instant) {
        self.text = text.to_string();
        if text.trim().is_empty() {
            self.panel = SuggestionPanel::Hidden;
            self.debounce.cancel();
            self.sequence.invalidate();
        } else {
            self.debounce.touch(now);
        }
    }

    /// The lookup to issue once the input has been idle long enough.
    pub fn poll(&mut self, now: Instant) -> Option<(RequestToken, String)> {
        if !self.debounce.fire(now) {
            return None;
        }
        self.issue()
    }

    /// Like `poll` but without waiting for the idle period.
    pub fn flush(&mut self) -> Option<(RequestToken, String)> {
        self.debounce.cancel();
        self.issue()
    }

    fn issue(&mut self) -> Option<(RequestToken, String)> {
        let query = self.text.trim();
        if query.is_empty() {
            return None;
        }
        let query = query.to_string();
        Some((self.sequence.issue(), query))
    }

    /// Apply a finished lookup. Returns whether the panel changed.
    pub fn finish(&mut self, token: RequestToken, result: Result<Vec<String>>) -> bool {
        if !self.sequence.is_current(token) {
            tracing::debug!(?token, "Dropping stale suggestions");
            return false;
        }
        match result {
            Ok(list) if list.is_empty() => {
                self.panel = SuggestionPanel::Hidden;
                true
            }
            Ok(list) => {
                self.panel = SuggestionPanel::Showing(list);
                true
            }
            Err(e) => {
                tracing::warn!(%e, "Error fetching suggestions");
                false
            }
        }
    }

    /// Pick a suggestion: it becomes the search text, the panel closes and
    /// the returned filters are what the catalog should load next.
    pub fn select(&mut self, suggestion: &str, vocabulary: &FilterVocabulary, current: &FilterState) -> FilterState {
        self.text = suggestion.to_string();
        self.panel = SuggestionPanel::Hidden;
        self.debounce.cancel();
        self.sequence.invalidate();
        select_suggestion(suggestion, vocabulary, current)
    }

    /// Click outside the panel.
    pub fn dismiss(&mut self) {
        self.panel = SuggestionPanel::Hidden;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn panel(&self) -> &SuggestionPanel {
        &self.panel
    }

    pub fn suggestions(&self) -> &[String] {
        match &self.panel {
            SuggestionPanel::Showing(list) => list,
            SuggestionPanel::Hidden => &[],
        }
    }

    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }
}

/// Filters implied by a chosen suggestion. A suggestion naming a known type
/// or brand (ignoring case) selects it; otherwise the current choice stays.
pub fn select_suggestion(suggestion: &str, vocabulary: &FilterVocabulary, current: &FilterState) -> FilterState {
    let car_type = vocabulary
        .match_type(suggestion)
        .map(str::to_string)
        .unwrap_or_else(|| current.car_type.clone());
    let brand = vocabulary
        .match_brand(suggestion)
        .map(str::to_string)
        .unwrap_or_else(|| current.brand.clone());
    FilterState {
        search: suggestion.to_string(),
        car_type,
        brand,
    }
}

pub struct SuggestionController {
    api: ApiClient,
    state: SuggestionState,
}

impl SuggestionController {
    pub fn new(api: ApiClient, delay: Duration) -> Self {
        Self {
            api,
            state: SuggestionState::new(delay),
        }
    }

    pub fn state(&self) -> &SuggestionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SuggestionState {
        &mut self.state
    }

    pub fn input(&mut self, text: &str) {
        self.state.on_input(text, Instant::now());
    }

    /// Wait out the debounce window, then run the lookup if one is due.
    pub async fn settle(&mut self) -> bool {
        if let Some(deadline) = self.state.debounce_deadline() {
            tokio::time::sleep_until(deadline).await;
        }
        match self.state.poll(Instant::now()) {
            Some((token, query)) => self.fetch(token, &query).await,
            None => false,
        }
    }

    /// Immediate lookup for `text`, used where there are no keystrokes to debounce.
    pub async fn lookup(&mut self, text: &str) -> &[String] {
        self.input(text);
        if let Some((token, query)) = self.state.flush() {
            self.fetch(token, &query).await;
        }
        self.state.suggestions()
    }

    async fn fetch(&mut self, token: RequestToken, query: &str) -> bool {
        let result = api::load_suggestions(&self.api, query).await;
        self.state.finish(token, result)
    }
}
