//! # Actions
//!
//! Everything that can happen in the client becomes an `Action`.
//! User picks a date? That's `Action::SelectDate`.
//! A slot fetch resolves? That's `Action::SlotsFetched`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns the `Effect` the caller must run. No I/O happens
//! here - fetches are spawned by the event loop, which sends the results
//! back in as new actions.
//!
//! ```text
//! State + Action  →  update()  →  Effect (side effect to run)
//! ```
//!
//! This makes everything testable: apply actions, assert on state and the
//! returned effects, no server required.

use chrono::NaiveDate;
use log::{debug, info};

use crate::api::types::{
    AvailableSlots, CancelOutcome, Course, Notification, PageRequest, Paged, Profile,
    RescheduleOutcome, RescheduleRequest, SearchSuggestion, Subject, Tutor, UserSession,
};
use crate::api::GlobalSearchResults;
use crate::core::booking::{AvailabilityFlow, BookingKind, SlotFetch};
use crate::core::search::SearchQuery;
use crate::core::sessions::{refund_message, replace_session, RescheduleFlow};
use crate::core::state::{App, Screen};

/// Which availability machine a slot fetch belongs to. The booking screen
/// and the reschedule overlay each run their own instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowTarget {
    Booking,
    Reschedule,
}

#[derive(Debug)]
pub enum Action {
    Quit,
    SwitchScreen(Screen),
    DismissAlert,

    // Sessions screen
    RefreshSessions,
    SessionsFetched(Result<Paged<UserSession>, String>),
    RequestCancel(i64),
    ConfirmCancel,
    DismissCancel,
    CancelDone {
        session_id: i64,
        outcome: Result<CancelOutcome, String>,
    },
    OpenReschedule(i64),
    CloseReschedule,
    SubmitReschedule,
    RescheduleDone(Result<RescheduleOutcome, String>),

    // Booking screen
    OpenBooking {
        tutor: Tutor,
        kind: BookingKind,
    },
    TutorDetailsFetched(Result<Tutor, String>),
    CloseBooking,
    SelectDate {
        target: FlowTarget,
        date: NaiveDate,
    },
    SelectSlot {
        target: FlowTarget,
        index: usize,
    },
    SlotsFetched {
        target: FlowTarget,
        generation: u64,
        outcome: Result<AvailableSlots, String>,
    },
    ContinueBooking,
    DismissHandoff,

    // Search screen
    SubmitSearch(String),
    SearchFetched(Result<GlobalSearchResults, String>),
    QueueSuggestions(String),
    SuggestionsFetched {
        generation: u64,
        outcome: Result<Vec<SearchSuggestion>, String>,
    },
    ClearSuggestions,

    // Notifications screen
    RefreshNotifications,
    LoadMoreNotifications,
    NotificationsFetched {
        append: bool,
        outcome: Result<Paged<Notification>, String>,
    },

    // Catalog + profile
    RefreshCatalog,
    TutorsFetched(Result<Paged<Tutor>, String>),
    CoursesFetched(Result<Paged<Course>, String>),
    SubjectsFetched(Result<Vec<Subject>, String>),
    RefreshProfile,
    ProfileFetched(Result<Profile, String>),
}

/// Side effect the event loop must run after an `update()`.
#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    Quit,
    FetchSessions,
    FetchSlots {
        target: FlowTarget,
        fetch: SlotFetch,
    },
    FetchTutorDetails {
        tutor_id: i64,
    },
    SubmitCancel {
        session_id: i64,
    },
    SubmitReschedule(RescheduleRequest),
    FetchSearch(SearchQuery),
    FetchSuggestions {
        generation: u64,
        keyword: String,
    },
    FetchNotifications {
        page: PageRequest,
        append: bool,
    },
    FetchCatalog {
        page: PageRequest,
    },
    FetchProfile,
    /// Write the profile slice to the disk cache.
    PersistProfile,
}

fn flow_mut<'a>(app: &'a mut App, target: FlowTarget) -> Option<&'a mut AvailabilityFlow> {
    match target {
        FlowTarget::Booking => app.booking.as_mut(),
        FlowTarget::Reschedule => app.reschedule.as_mut().map(|r| &mut r.availability),
    }
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Quit => Effect::Quit,

        Action::SwitchScreen(screen) => {
            app.screen = screen;
            Effect::None
        }

        Action::DismissAlert => {
            app.alert = None;
            Effect::None
        }

        // --------------------------------------------------------------
        // Sessions
        // --------------------------------------------------------------
        Action::RefreshSessions => {
            app.store.sessions.begin();
            Effect::FetchSessions
        }

        Action::SessionsFetched(outcome) => {
            match outcome {
                Ok(page) => app.store.sessions.fulfill(page.result),
                Err(message) => app.store.sessions.reject(message),
            }
            Effect::None
        }

        Action::RequestCancel(session_id) => {
            let cancellable = app
                .store
                .sessions
                .items
                .iter()
                .any(|s| s.id == session_id && s.status == crate::api::SessionStatus::Scheduled);
            if cancellable && app.cancel.request(session_id) {
                debug!("cancel confirmation requested for session {session_id}");
            }
            Effect::None
        }

        Action::ConfirmCancel => match app.cancel.confirm() {
            Some(session_id) => {
                info!("cancel confirmed for session {session_id}");
                Effect::SubmitCancel { session_id }
            }
            None => Effect::None,
        },

        Action::DismissCancel => {
            app.cancel.dismiss();
            Effect::None
        }

        Action::CancelDone {
            session_id,
            outcome,
        } => {
            app.cancel.finish(session_id);
            match outcome {
                Ok(cancelled) => {
                    app.status_message =
                        refund_message(cancelled.refund_eligible, cancelled.refund_processed)
                            .to_string();
                    replace_session(&mut app.store.sessions.items, cancelled.session);
                }
                Err(message) => app.alert = Some(message),
            }
            Effect::None
        }

        Action::OpenReschedule(session_id) => {
            if let Some(session) = app
                .store
                .sessions
                .items
                .iter()
                .find(|s| s.id == session_id)
            {
                app.reschedule = Some(RescheduleFlow::new(session.clone()));
            }
            Effect::None
        }

        Action::CloseReschedule => {
            // Discards the transient date/slot selection with the overlay.
            app.reschedule = None;
            Effect::None
        }

        Action::SubmitReschedule => {
            let Some(flow) = app.reschedule.as_mut() else {
                return Effect::None;
            };
            if flow.submitting {
                return Effect::None;
            }
            match flow.validate() {
                Ok(request) => {
                    flow.submitting = true;
                    Effect::SubmitReschedule(request)
                }
                Err(message) => {
                    app.alert = Some(message.to_string());
                    Effect::None
                }
            }
        }

        Action::RescheduleDone(outcome) => match outcome {
            Ok(done) => {
                app.reschedule = None;
                app.status_message = done.message;
                // Parent refresh: reload the sessions list.
                app.store.sessions.begin();
                Effect::FetchSessions
            }
            Err(message) => {
                if let Some(flow) = app.reschedule.as_mut() {
                    flow.submitting = false;
                }
                app.alert = Some(message);
                Effect::None
            }
        },

        // --------------------------------------------------------------
        // Booking
        // --------------------------------------------------------------
        Action::OpenBooking { tutor, kind } => {
            let tutor_id = tutor.id;
            app.booking = Some(AvailabilityFlow::new(tutor_id, kind));
            app.booking_tutor = Some(tutor);
            app.handoff = None;
            app.screen = Screen::Booking;
            // Refresh the tutor from the details endpoint; the search hit
            // may carry a stale rate.
            Effect::FetchTutorDetails { tutor_id }
        }

        Action::TutorDetailsFetched(outcome) => {
            match outcome {
                Ok(tutor)
                    if app.booking.as_ref().is_some_and(|f| f.tutor_id == tutor.id) =>
                {
                    app.booking_tutor = Some(tutor);
                }
                Ok(tutor) => debug!("tutor details for {} arrived after close", tutor.id),
                // Details are a freshness upgrade only; the listing copy
                // stays usable on failure.
                Err(message) => debug!("tutor details fetch failed: {message}"),
            }
            Effect::None
        }

        Action::CloseBooking => {
            // Unmount: the selection does not survive the screen.
            app.booking = None;
            app.booking_tutor = None;
            app.handoff = None;
            app.screen = Screen::Search;
            Effect::None
        }

        Action::SelectDate { target, date } => match flow_mut(app, target) {
            Some(flow) => {
                let fetch = flow.select_date(date);
                Effect::FetchSlots { target, fetch }
            }
            None => Effect::None,
        },

        Action::SelectSlot { target, index } => {
            if let Some(flow) = flow_mut(app, target) {
                flow.select_slot(index);
            }
            Effect::None
        }

        Action::SlotsFetched {
            target,
            generation,
            outcome,
        } => {
            if let Some(flow) = flow_mut(app, target) {
                flow.apply_outcome(generation, outcome);
            }
            Effect::None
        }

        Action::ContinueBooking => {
            let (Some(flow), Some(tutor)) = (app.booking.as_ref(), app.booking_tutor.clone())
            else {
                return Effect::None;
            };
            match flow.handoff(tutor) {
                Some(handoff) => {
                    info!(
                        "booking hand-off: tutor {} on {} at {}",
                        handoff.tutor.id, handoff.selected_date, handoff.selected_time
                    );
                    app.status_message = String::from("Proceeding to payment...");
                    app.handoff = Some(handoff);
                }
                None => {
                    app.alert = Some("Please select a date and time slot.".to_string());
                }
            }
            Effect::None
        }

        Action::DismissHandoff => {
            app.handoff = None;
            Effect::None
        }

        // --------------------------------------------------------------
        // Search
        // --------------------------------------------------------------
        Action::SubmitSearch(input) => match app.search.submit(&input) {
            Ok(query) => Effect::FetchSearch(query),
            Err(message) => {
                app.alert = Some(message.to_string());
                Effect::None
            }
        },

        Action::SearchFetched(outcome) => {
            app.search.apply_results(outcome);
            Effect::None
        }

        Action::QueueSuggestions(keyword) => {
            if keyword.trim().is_empty() {
                app.search.clear_suggestions();
                return Effect::None;
            }
            let generation = app.search.begin_suggest();
            Effect::FetchSuggestions {
                generation,
                keyword,
            }
        }

        Action::SuggestionsFetched {
            generation,
            outcome,
        } => {
            app.search.apply_suggestions(generation, outcome);
            Effect::None
        }

        Action::ClearSuggestions => {
            app.search.clear_suggestions();
            Effect::None
        }

        // --------------------------------------------------------------
        // Notifications
        // --------------------------------------------------------------
        Action::RefreshNotifications => {
            app.store.notifications.begin();
            Effect::FetchNotifications {
                page: PageRequest::first(app.page_size),
                append: false,
            }
        }

        Action::LoadMoreNotifications => {
            let feed = &mut app.store.notifications;
            if !feed.has_more || feed.loading {
                return Effect::None;
            }
            let page = PageRequest {
                limit: app.page_size,
                offset: feed.next_offset(),
            };
            feed.begin();
            Effect::FetchNotifications { page, append: true }
        }

        Action::NotificationsFetched { append, outcome } => {
            match outcome {
                Ok(page) => app.store.notifications.fulfill(page, append),
                Err(message) => app.store.notifications.reject(message),
            }
            Effect::None
        }

        // --------------------------------------------------------------
        // Catalog + profile
        // --------------------------------------------------------------
        Action::RefreshCatalog => {
            app.store.tutors.begin();
            app.store.courses.begin();
            app.store.subjects.begin();
            Effect::FetchCatalog {
                page: PageRequest::first(app.page_size),
            }
        }

        Action::TutorsFetched(outcome) => {
            match outcome {
                Ok(page) => app.store.tutors.fulfill(page.result),
                Err(message) => app.store.tutors.reject(message),
            }
            Effect::None
        }

        Action::CoursesFetched(outcome) => {
            match outcome {
                Ok(page) => app.store.courses.fulfill(page.result),
                Err(message) => app.store.courses.reject(message),
            }
            Effect::None
        }

        Action::SubjectsFetched(outcome) => {
            match outcome {
                Ok(subjects) => app.store.subjects.fulfill(subjects),
                Err(message) => app.store.subjects.reject(message),
            }
            Effect::None
        }

        Action::RefreshProfile => {
            app.store.profile.begin();
            Effect::FetchProfile
        }

        Action::ProfileFetched(outcome) => match outcome {
            Ok(profile) => {
                app.store.profile.fulfill(profile);
                Effect::PersistProfile
            }
            Err(message) => {
                app.store.profile.reject(message);
                Effect::None
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{SessionStatus, TimeSlot};
    use crate::test_support::test_app;

    fn scheduled_session(id: i64) -> UserSession {
        UserSession {
            id,
            tutor_id: 7,
            session_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            start_time: "10:00".to_string(),
            end_time: "11:00".to_string(),
            duration: 60,
            amount: 30.0,
            status: SessionStatus::Scheduled,
            notes: None,
        }
    }

    fn tutor() -> Tutor {
        Tutor {
            id: 7,
            name: "Ada".to_string(),
            country: "UK".to_string(),
            subjects: vec![],
            rating: 4.9,
            hourly_rate: 30.0,
            bio: None,
        }
    }

    fn slots_for(date: &str) -> AvailableSlots {
        AvailableSlots {
            tutor_id: 7,
            date: date.parse().unwrap(),
            session_duration: 60,
            buffer_time: 10,
            total_slots: 1,
            slots: vec![TimeSlot {
                start: "10:00".to_string(),
                end: "11:00".to_string(),
                availability_id: 1,
                day_of_week: "SATURDAY".to_string(),
                session_duration: 60,
                buffer_time: 10,
                price: 30.0,
            }],
        }
    }

    #[test]
    fn test_continue_without_selection_alerts_and_stays_local() {
        let mut app = test_app();
        update(
            &mut app,
            Action::OpenBooking {
                tutor: tutor(),
                kind: BookingKind::Regular,
            },
        );
        let effect = update(&mut app, Action::ContinueBooking);
        assert_eq!(effect, Effect::None);
        assert!(app.alert.is_some());
        assert!(app.handoff.is_none());
    }

    #[test]
    fn test_booking_happy_path_parks_handoff() {
        let mut app = test_app();
        update(
            &mut app,
            Action::OpenBooking {
                tutor: tutor(),
                kind: BookingKind::Regular,
            },
        );

        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let effect = update(
            &mut app,
            Action::SelectDate {
                target: FlowTarget::Booking,
                date,
            },
        );
        let Effect::FetchSlots { fetch, .. } = effect else {
            panic!("expected a slot fetch");
        };

        update(
            &mut app,
            Action::SlotsFetched {
                target: FlowTarget::Booking,
                generation: fetch.generation,
                outcome: Ok(slots_for("2024-06-01")),
            },
        );
        update(
            &mut app,
            Action::SelectSlot {
                target: FlowTarget::Booking,
                index: 0,
            },
        );
        update(&mut app, Action::ContinueBooking);

        let handoff = app.handoff.as_ref().expect("hand-off parked");
        assert_eq!(handoff.selected_time, "10:00");
        assert_eq!(handoff.selected_duration, 60);
        assert!(app.alert.is_none());
    }

    #[test]
    fn test_open_booking_refreshes_tutor_details() {
        let mut app = test_app();
        let effect = update(
            &mut app,
            Action::OpenBooking {
                tutor: tutor(),
                kind: BookingKind::Regular,
            },
        );
        assert_eq!(effect, Effect::FetchTutorDetails { tutor_id: 7 });

        let mut fresh = tutor();
        fresh.hourly_rate = 35.0;
        update(&mut app, Action::TutorDetailsFetched(Ok(fresh)));
        assert_eq!(app.booking_tutor.as_ref().unwrap().hourly_rate, 35.0);

        // A failure keeps the listing copy.
        update(
            &mut app,
            Action::TutorDetailsFetched(Err("network error: timeout".to_string())),
        );
        assert!(app.booking_tutor.is_some());
    }

    #[test]
    fn test_stale_tutor_details_after_close_are_dropped() {
        let mut app = test_app();
        update(
            &mut app,
            Action::OpenBooking {
                tutor: tutor(),
                kind: BookingKind::Regular,
            },
        );
        update(&mut app, Action::CloseBooking);
        update(&mut app, Action::TutorDetailsFetched(Ok(tutor())));
        assert!(app.booking_tutor.is_none());
    }

    #[test]
    fn test_close_booking_discards_selection() {
        let mut app = test_app();
        update(
            &mut app,
            Action::OpenBooking {
                tutor: tutor(),
                kind: BookingKind::Trial,
            },
        );
        update(&mut app, Action::CloseBooking);
        assert!(app.booking.is_none());
        assert!(app.booking_tutor.is_none());
        assert_eq!(app.screen, Screen::Search);
    }

    #[test]
    fn test_cancel_requires_confirm_before_network() {
        let mut app = test_app();
        app.store.sessions.fulfill(vec![scheduled_session(5)]);

        // The request alone never produces a network effect.
        assert_eq!(update(&mut app, Action::RequestCancel(5)), Effect::None);
        assert_eq!(app.cancel.pending, Some(5));

        assert_eq!(
            update(&mut app, Action::ConfirmCancel),
            Effect::SubmitCancel { session_id: 5 }
        );

        // While in flight, a second request is swallowed.
        assert_eq!(update(&mut app, Action::RequestCancel(5)), Effect::None);
        assert_eq!(update(&mut app, Action::ConfirmCancel), Effect::None);
    }

    #[test]
    fn test_cancel_done_maps_refund_and_replaces_session() {
        let mut app = test_app();
        app.store.sessions.fulfill(vec![scheduled_session(5), scheduled_session(6)]);
        app.cancel.request(5);
        app.cancel.confirm();

        let mut cancelled = scheduled_session(5);
        cancelled.status = SessionStatus::Cancelled;
        update(
            &mut app,
            Action::CancelDone {
                session_id: 5,
                outcome: Ok(CancelOutcome {
                    message: "ok".to_string(),
                    refund_eligible: true,
                    refund_processed: false,
                    session: cancelled,
                }),
            },
        );

        assert!(app.status_message.contains("eligible for a refund"));
        assert_eq!(app.store.sessions.items[0].status, SessionStatus::Cancelled);
        assert_eq!(app.store.sessions.items[1].status, SessionStatus::Scheduled);
        assert!(!app.cancel.is_in_flight(5));
    }

    #[test]
    fn test_cancel_ignored_for_non_scheduled_sessions() {
        let mut app = test_app();
        let mut done = scheduled_session(9);
        done.status = SessionStatus::Completed;
        app.store.sessions.fulfill(vec![done]);

        update(&mut app, Action::RequestCancel(9));
        assert_eq!(app.cancel.pending, None);
    }

    #[test]
    fn test_reschedule_submit_without_selection_is_rejected_locally() {
        let mut app = test_app();
        app.store.sessions.fulfill(vec![scheduled_session(5)]);
        update(&mut app, Action::OpenReschedule(5));

        let effect = update(&mut app, Action::SubmitReschedule);
        assert_eq!(effect, Effect::None);
        assert!(app.alert.is_some());
        assert!(app.reschedule.is_some());
    }

    #[test]
    fn test_reschedule_success_closes_flow_and_refreshes() {
        let mut app = test_app();
        app.store.sessions.fulfill(vec![scheduled_session(5)]);
        update(&mut app, Action::OpenReschedule(5));

        let outcome = RescheduleOutcome {
            message: "Session rescheduled.".to_string(),
            session: scheduled_session(5),
            old_schedule: crate::api::SessionSchedule {
                session_date: "2024-06-01".parse().unwrap(),
                start_time: "10:00".to_string(),
                end_time: "11:00".to_string(),
            },
            new_schedule: crate::api::SessionSchedule {
                session_date: "2024-06-02".parse().unwrap(),
                start_time: "14:00".to_string(),
                end_time: "15:00".to_string(),
            },
        };
        let effect = update(&mut app, Action::RescheduleDone(Ok(outcome)));
        assert_eq!(effect, Effect::FetchSessions);
        assert!(app.reschedule.is_none());
        assert_eq!(app.status_message, "Session rescheduled.");
    }

    #[test]
    fn test_sessions_fetch_failure_keeps_items() {
        let mut app = test_app();
        app.store.sessions.fulfill(vec![scheduled_session(5)]);

        update(&mut app, Action::RefreshSessions);
        update(
            &mut app,
            Action::SessionsFetched(Err("network error: timeout".to_string())),
        );

        assert_eq!(app.store.sessions.items.len(), 1);
        assert_eq!(
            app.store.sessions.error.as_deref(),
            Some("network error: timeout")
        );
    }

    #[test]
    fn test_empty_search_submit_is_rejected_locally() {
        let mut app = test_app();
        let effect = update(&mut app, Action::SubmitSearch("  ".to_string()));
        assert_eq!(effect, Effect::None);
        assert!(app.alert.is_some());
    }

    #[test]
    fn test_queue_suggestions_empty_keyword_clears() {
        let mut app = test_app();
        app.search.begin_suggest();
        let effect = update(&mut app, Action::QueueSuggestions(" ".to_string()));
        assert_eq!(effect, Effect::None);
        assert!(app.search.suggestions.is_empty());
    }

    #[test]
    fn test_load_more_uses_current_length_as_offset() {
        let mut app = test_app();
        app.store.notifications.fulfill(
            Paged {
                result: vec![
                    Notification {
                        id: 1,
                        title: "a".to_string(),
                        body: "b".to_string(),
                        is_read: false,
                        created_at: "2024-06-01T10:00:00Z".to_string(),
                    },
                ],
                total: 3,
            },
            false,
        );

        let effect = update(&mut app, Action::LoadMoreNotifications);
        match effect {
            Effect::FetchNotifications { page, append } => {
                assert!(append);
                assert_eq!(page.offset, 1);
            }
            other => panic!("unexpected effect: {:?}", other),
        }

        // A second load-more while the first is in flight is swallowed.
        assert_eq!(update(&mut app, Action::LoadMoreNotifications), Effect::None);
    }

    #[test]
    fn test_profile_fetch_persists_on_success_only() {
        let mut app = test_app();
        let profile = Profile {
            id: 1,
            name: "Sam".to_string(),
            email: "s@t.u".to_string(),
            role: "student".to_string(),
            country: None,
        };
        assert_eq!(
            update(&mut app, Action::ProfileFetched(Ok(profile))),
            Effect::PersistProfile
        );
        assert_eq!(
            update(
                &mut app,
                Action::ProfileFetched(Err("network error: offline".to_string()))
            ),
            Effect::None
        );
        // Stale-on-error: the fetched profile survives the failure.
        assert_eq!(app.store.profile.profile.as_ref().unwrap().name, "Sam");
    }
}
