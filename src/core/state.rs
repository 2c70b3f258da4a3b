//! # Application State
//!
//! Core business state for the Tutorly client. This module contains domain
//! logic only - no TUI-specific types. Presentation state lives in the `tui`
//! module.
//!
//! ```text
//! App
//! ├── backend: Arc<dyn TutoringBackend>   // REST API handle
//! ├── store: Store                        // per-resource slices
//! ├── screen: Screen                      // current screen
//! ├── booking: Option<AvailabilityFlow>   // active booking screen instance
//! ├── booking_tutor: Option<Tutor>        // tutor being booked
//! ├── reschedule: Option<RescheduleFlow>  // reschedule overlay
//! ├── cancel: CancelState                 // confirm gate + in-flight guard
//! ├── search: SearchState                 // results + suggestions
//! ├── handoff: Option<BookingHandoff>     // payload parked for payment
//! ├── status_message: String              // status bar text
//! └── alert: Option<String>               // blocking validation/error alert
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use std::sync::Arc;

use crate::api::TutoringBackend;
use crate::api::types::Tutor;
use crate::core::booking::{AvailabilityFlow, BookingHandoff};
use crate::core::search::SearchState;
use crate::core::sessions::{CancelState, RescheduleFlow};
use crate::core::store::Store;

/// Top-level screens. Transient per-screen state (selection, flows) is
/// dropped when the owning screen closes; only the store slices persist
/// across navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Sessions,
    Search,
    Booking,
    Notifications,
}

pub struct App {
    pub backend: Arc<dyn TutoringBackend>,
    pub store: Store,
    pub screen: Screen,
    pub booking: Option<AvailabilityFlow>,
    pub booking_tutor: Option<Tutor>,
    pub reschedule: Option<RescheduleFlow>,
    pub cancel: CancelState,
    pub search: SearchState,
    pub handoff: Option<BookingHandoff>,
    pub status_message: String,
    pub alert: Option<String>,
    /// Page size for sessions/notifications fetches (from config).
    pub page_size: u32,
}

impl App {
    /// Tutors currently listed on the search screen: the last search's
    /// hits, or the browse catalog before any search was submitted.
    pub fn visible_tutors(&self) -> &[Tutor] {
        match &self.search.results {
            Some(results) => &results.tutors.result,
            None => &self.store.tutors.items,
        }
    }

    pub fn new(backend: Arc<dyn TutoringBackend>, page_size: u32) -> Self {
        Self {
            backend,
            store: Store::new(),
            screen: Screen::Sessions,
            booking: None,
            booking_tutor: None,
            reschedule: None,
            cancel: CancelState::new(),
            search: SearchState::new(),
            handoff: None,
            status_message: String::from("Welcome to Tutorly!"),
            alert: None,
            page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::api::types::{GlobalSearchResults, Tutor};
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert_eq!(app.status_message, "Welcome to Tutorly!");
        assert!(app.booking.is_none());
        assert!(app.alert.is_none());
        assert_eq!(app.screen, super::Screen::Sessions);
    }

    #[test]
    fn test_visible_tutors_prefers_search_hits() {
        let mut app = test_app();
        let tutor = |id: i64, name: &str| Tutor {
            id,
            name: name.to_string(),
            country: "UK".to_string(),
            subjects: vec![],
            rating: 4.5,
            hourly_rate: 25.0,
            bio: None,
        };

        // Before any search, the browse catalog shows.
        app.store.tutors.fulfill(vec![tutor(1, "catalog")]);
        assert_eq!(app.visible_tutors()[0].name, "catalog");

        // After a search, the hits replace the catalog view.
        let mut results = GlobalSearchResults::default();
        results.tutors.result.push(tutor(2, "hit"));
        app.search.results = Some(results);
        assert_eq!(app.visible_tutors()[0].name, "hit");
    }
}
