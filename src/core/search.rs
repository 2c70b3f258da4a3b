//! # Global search
//!
//! Keyword search across tutors, courses, books, and subjects, with
//! debounced type-ahead suggestions. Filters ride along as optional query
//! parameters; in the terminal they are entered inline as `key:value`
//! tokens (`piano country:DE rating:4.5 price:20-60`) and parsed here.
//!
//! Suggestion fetches are debounced (~300 ms of keyboard silence) and
//! generation-tagged the same way slot fetches are, so a slow response for
//! an earlier keystroke cannot overwrite newer suggestions.

use std::time::{Duration, Instant};

use log::debug;

use crate::api::types::{GlobalSearchResults, SearchSuggestion};

/// A submitted search: mandatory keyword plus optional filters, all
/// serialized as query parameters only when present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub keyword: String,
    pub country: Option<String>,
    pub subject: Option<String>,
    pub level: Option<String>,
    pub rating: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl SearchQuery {
    /// Parses the inline filter syntax. Unrecognized `key:value` tokens and
    /// plain words both count toward the keyword.
    pub fn parse(input: &str) -> Self {
        let mut query = SearchQuery::default();
        let mut keyword_parts: Vec<&str> = Vec::new();

        for token in input.split_whitespace() {
            let Some((key, value)) = token.split_once(':') else {
                keyword_parts.push(token);
                continue;
            };
            match key {
                "country" => query.country = Some(value.to_string()),
                "subject" => query.subject = Some(value.to_string()),
                "level" => query.level = Some(value.to_string()),
                "rating" => query.rating = value.parse().ok(),
                "price" => {
                    let (min, max) = value.split_once('-').unwrap_or((value, ""));
                    query.min_price = min.parse().ok();
                    query.max_price = max.parse().ok();
                }
                _ => keyword_parts.push(token),
            }
        }

        query.keyword = keyword_parts.join(" ");
        query
    }

    /// Query parameters in the backend's naming. Absent filters are omitted
    /// entirely, never sent empty.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("keyword", self.keyword.clone())];
        if let Some(country) = &self.country {
            params.push(("country", country.clone()));
        }
        if let Some(subject) = &self.subject {
            params.push(("subject", subject.clone()));
        }
        if let Some(level) = &self.level {
            params.push(("level", level.clone()));
        }
        if let Some(rating) = self.rating {
            params.push(("rating", rating.to_string()));
        }
        if let Some(min) = self.min_price {
            params.push(("minPrice", min.to_string()));
        }
        if let Some(max) = self.max_price {
            params.push(("maxPrice", max.to_string()));
        }
        params
    }
}

/// Coalesces rapid keystrokes into one suggestion fetch. The event loop
/// calls [`Debouncer::take_ready`] on every tick; the fetch fires after
/// `delay` of keyboard silence.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// A keystroke happened; restart the quiet period.
    pub fn note(&mut self, text: String, now: Instant) {
        self.pending = Some((text, now));
    }

    /// Returns the pending text once the quiet period has elapsed.
    pub fn take_ready(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, since)) if now.duration_since(*since) >= self.delay => {
                self.pending.take().map(|(text, _)| text)
            }
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

/// Search screen state: the last submitted query's results plus the live
/// suggestion list.
#[derive(Default)]
pub struct SearchState {
    pub query: Option<SearchQuery>,
    pub results: Option<GlobalSearchResults>,
    pub loading: bool,
    pub error: Option<String>,
    pub suggestions: Vec<SearchSuggestion>,
    suggest_generation: u64,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and records a submission. An empty keyword is rejected
    /// locally - no request is issued for it.
    pub fn submit(&mut self, input: &str) -> Result<SearchQuery, &'static str> {
        let query = SearchQuery::parse(input);
        if query.keyword.is_empty() {
            return Err("Please enter a search keyword.");
        }
        self.query = Some(query.clone());
        self.loading = true;
        Ok(query)
    }

    pub fn apply_results(&mut self, outcome: Result<GlobalSearchResults, String>) {
        self.loading = false;
        match outcome {
            Ok(results) => {
                self.results = Some(results);
                self.error = None;
            }
            // Previous results stay visible, same as every other slice.
            Err(message) => self.error = Some(message),
        }
    }

    /// Registers an outgoing suggestion fetch and returns its generation.
    pub fn begin_suggest(&mut self) -> u64 {
        self.suggest_generation += 1;
        self.suggest_generation
    }

    /// Applies a suggestion response unless a newer fetch was issued since.
    pub fn apply_suggestions(
        &mut self,
        generation: u64,
        outcome: Result<Vec<SearchSuggestion>, String>,
    ) -> bool {
        if generation != self.suggest_generation {
            debug!("discarding stale suggestions (generation {generation})");
            return false;
        }
        // Failed suggestion fetches just leave the list as-is; suggestions
        // are best-effort.
        if let Ok(suggestions) = outcome {
            self.suggestions = suggestions;
        }
        true
    }

    pub fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.suggest_generation += 1;
    }
}
