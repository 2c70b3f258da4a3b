//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI, and
//! translates keyboard events into `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm. The core
//! never blocks on the network: every fetch runs on a tokio task that sends
//! its result back into the loop as an action over an mpsc channel. The
//! loop owns the `App` exclusively, so all state mutation is serialized
//! through `update()` - no locks.
//!
//! ## Redraw strategy
//!
//! The loop polls input with a short timeout and only redraws after an
//! event, an incoming action, or a debouncer firing. The poll timeout also
//! serves as the tick that drives the suggestion debouncer.

pub mod component;
pub mod components;
pub mod event;
mod ui;

use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use log::{debug, info, warn};

use crate::api::{HttpBackend, TutoringBackend};
use crate::core::action::{Action, Effect, FlowTarget, update};
use crate::core::config::ResolvedConfig;
use crate::core::profile;
use crate::core::search::Debouncer;
use crate::core::state::{App, Screen};
use crate::tui::components::{
    FeedEvent, NotificationFeedState, SearchEvent, SearchPanelState, SessionListEvent,
    SessionListState, SlotPickerEvent, SlotPickerState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic).
pub struct TuiState {
    pub sessions: SessionListState,
    pub search: SearchPanelState,
    pub booking_picker: SlotPickerState,
    pub resched_picker: SlotPickerState,
    pub notifications: NotificationFeedState,
    pub debouncer: Debouncer,
    today: NaiveDate,
}

impl TuiState {
    pub fn new(today: NaiveDate, debounce: Duration) -> Self {
        Self {
            sessions: SessionListState::new(),
            search: SearchPanelState::new(),
            booking_picker: SlotPickerState::new(today),
            resched_picker: SlotPickerState::new(today),
            notifications: NotificationFeedState::new(),
            debouncer: Debouncer::new(debounce),
            today,
        }
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let token = config
        .token
        .clone()
        .expect("API token must be set (config file, TUTORLY_TOKEN env var, or ~/.tutorly/token)");
    let backend: Arc<dyn TutoringBackend> =
        Arc::new(HttpBackend::new(config.base_url.clone(), token));

    let mut app = App::new(backend, config.page_size);
    // Hydrate the one persisted slice before the first fetch resolves.
    app.store.profile.hydrate(profile::load_cached_profile());

    let mut tui = TuiState::new(
        Local::now().date_naive(),
        Duration::from_millis(config.suggest_debounce_ms),
    );

    let mut terminal = ratatui::init();

    // Channel for actions from background fetch tasks
    let (tx, rx) = mpsc::channel();

    // Initial fetches for every slice.
    for action in [
        Action::RefreshSessions,
        Action::RefreshNotifications,
        Action::RefreshCatalog,
        Action::RefreshProfile,
    ] {
        let effect = update(&mut app, action);
        run_effect(&app, effect, &tx);
    }

    let mut needs_redraw = true;
    'main: loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        // Short poll doubles as the debouncer tick.
        let first_event = poll_event_timeout(Duration::from_millis(250));
        if first_event.is_some() {
            needs_redraw = true;
        }

        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if matches!(event, TuiEvent::Resize) {
                continue;
            }
            if matches!(event, TuiEvent::ForceQuit) {
                break 'main;
            }
            for action in route_event(&app, &mut tui, &event) {
                let effect = update(&mut app, action);
                if effect == Effect::Quit {
                    break 'main;
                }
                run_effect(&app, effect, &tx);
            }
        }

        // Fire the suggestion fetch once typing has been quiet long enough.
        if app.screen == Screen::Search && app.alert.is_none() && app.reschedule.is_none() {
            if let Some(keyword) = tui.debouncer.take_ready(Instant::now()) {
                let effect = update(&mut app, Action::QueueSuggestions(keyword));
                run_effect(&app, effect, &tx);
                needs_redraw = true;
            }
        }

        // Handle background task actions (fetch results)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            if effect == Effect::Quit {
                break 'main;
            }
            run_effect(&app, effect, &tx);
        }
    }

    ratatui::restore();
    Ok(())
}

/// Translates one terminal event into core actions, respecting overlay
/// precedence: alert > payment hand-off > cancel confirm > reschedule >
/// the active screen.
fn route_event(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Vec<Action> {
    if app.alert.is_some() {
        return match event {
            TuiEvent::Submit | TuiEvent::Escape => vec![Action::DismissAlert],
            _ => vec![],
        };
    }

    if app.handoff.is_some() {
        return match event {
            TuiEvent::Submit | TuiEvent::Escape => vec![Action::DismissHandoff],
            _ => vec![],
        };
    }

    if app.cancel.pending.is_some() {
        return match event {
            TuiEvent::InputChar('y') => vec![Action::ConfirmCancel],
            TuiEvent::InputChar('n') | TuiEvent::Escape => vec![Action::DismissCancel],
            _ => vec![],
        };
    }

    if let Some(flow) = &app.reschedule {
        let slot_count = flow.availability.slots().len();
        return match tui.resched_picker.handle_event(event, slot_count) {
            Some(SlotPickerEvent::PickDate(date)) => vec![Action::SelectDate {
                target: FlowTarget::Reschedule,
                date,
            }],
            Some(SlotPickerEvent::PickSlot(index)) => vec![Action::SelectSlot {
                target: FlowTarget::Reschedule,
                index,
            }],
            Some(SlotPickerEvent::Continue) => vec![Action::SubmitReschedule],
            Some(SlotPickerEvent::Back) => vec![Action::CloseReschedule],
            None => vec![],
        };
    }

    // Global keys
    match event {
        TuiEvent::NextScreen => {
            let next = match app.screen {
                Screen::Sessions => Screen::Search,
                Screen::Search => Screen::Notifications,
                Screen::Notifications | Screen::Booking => Screen::Sessions,
            };
            return vec![Action::SwitchScreen(next)];
        }
        TuiEvent::Refresh => {
            return match app.screen {
                Screen::Sessions => vec![Action::RefreshSessions],
                Screen::Search => vec![Action::RefreshCatalog],
                Screen::Notifications => vec![Action::RefreshNotifications],
                Screen::Booking => vec![],
            };
        }
        _ => {}
    }

    match app.screen {
        Screen::Sessions => {
            if *event == TuiEvent::InputChar('q') {
                return vec![Action::Quit];
            }
            let count = app.store.sessions.items.len();
            match tui.sessions.handle_event(event, count) {
                Some(SessionListEvent::Cancel(index)) => session_id_at(app, index)
                    .map(Action::RequestCancel)
                    .into_iter()
                    .collect(),
                Some(SessionListEvent::Reschedule(index)) => match session_id_at(app, index) {
                    Some(id) => {
                        tui.resched_picker = SlotPickerState::new(tui.today);
                        vec![Action::OpenReschedule(id)]
                    }
                    None => vec![],
                },
                None => vec![],
            }
        }

        Screen::Search => {
            let tutor_count = app.visible_tutors().len();
            match tui.search.handle_event(event, tutor_count) {
                Some(SearchEvent::Changed(text)) => {
                    tui.debouncer.note(text, Instant::now());
                    vec![]
                }
                Some(SearchEvent::Submitted(text)) => {
                    tui.debouncer.clear();
                    vec![Action::ClearSuggestions, Action::SubmitSearch(text)]
                }
                Some(SearchEvent::Book(index)) => open_booking(app, tui, index, false),
                Some(SearchEvent::Trial(index)) => open_booking(app, tui, index, true),
                None => vec![],
            }
        }

        Screen::Booking => {
            if *event == TuiEvent::InputChar('q') {
                return vec![Action::Quit];
            }
            let Some(flow) = &app.booking else {
                return vec![];
            };
            match tui.booking_picker.handle_event(event, flow.slots().len()) {
                Some(SlotPickerEvent::PickDate(date)) => vec![Action::SelectDate {
                    target: FlowTarget::Booking,
                    date,
                }],
                Some(SlotPickerEvent::PickSlot(index)) => vec![Action::SelectSlot {
                    target: FlowTarget::Booking,
                    index,
                }],
                Some(SlotPickerEvent::Continue) => vec![Action::ContinueBooking],
                Some(SlotPickerEvent::Back) => vec![Action::CloseBooking],
                None => vec![],
            }
        }

        Screen::Notifications => {
            if *event == TuiEvent::InputChar('q') {
                return vec![Action::Quit];
            }
            let count = app.store.notifications.items.len();
            match tui.notifications.handle_event(event, count) {
                Some(FeedEvent::LoadMore) => vec![Action::LoadMoreNotifications],
                None => vec![],
            }
        }
    }
}

fn session_id_at(app: &App, index: usize) -> Option<i64> {
    app.store.sessions.items.get(index).map(|s| s.id)
}

fn open_booking(app: &App, tui: &mut TuiState, index: usize, trial: bool) -> Vec<Action> {
    let Some(tutor) = app.visible_tutors().get(index).cloned() else {
        return vec![];
    };
    tui.booking_picker = SlotPickerState::new(tui.today);
    let kind = if trial {
        crate::core::booking::BookingKind::Trial
    } else {
        crate::core::booking::BookingKind::Regular
    };
    vec![Action::OpenBooking { tutor, kind }]
}

/// Runs one side effect: spawns the fetch on a tokio task that reports back
/// through the action channel. Requests are never cancelled - superseded
/// responses are discarded by generation inside the flows.
fn run_effect(app: &App, effect: Effect, tx: &mpsc::Sender<Action>) {
    match effect {
        Effect::None | Effect::Quit => {}

        Effect::FetchSessions => {
            let backend = app.backend.clone();
            let page = crate::api::PageRequest::first(app.page_size);
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = backend
                    .my_sessions(page, None)
                    .await
                    .map_err(|e| e.to_string());
                send(&tx, Action::SessionsFetched(outcome));
            });
        }

        Effect::FetchSlots { target, fetch } => {
            info!(
                "fetching slots: tutor {} on {} (generation {})",
                fetch.tutor_id, fetch.date, fetch.generation
            );
            let backend = app.backend.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = backend
                    .available_slots(fetch.tutor_id, fetch.date)
                    .await
                    .map_err(|e| e.to_string());
                send(
                    &tx,
                    Action::SlotsFetched {
                        target,
                        generation: fetch.generation,
                        outcome,
                    },
                );
            });
        }

        Effect::FetchTutorDetails { tutor_id } => {
            let backend = app.backend.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = backend
                    .tutor_details(tutor_id)
                    .await
                    .map_err(|e| e.to_string());
                send(&tx, Action::TutorDetailsFetched(outcome));
            });
        }

        Effect::SubmitCancel { session_id } => {
            info!("cancelling session {session_id}");
            let backend = app.backend.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = backend
                    .cancel_session(session_id)
                    .await
                    .map_err(|e| e.to_string());
                send(
                    &tx,
                    Action::CancelDone {
                        session_id,
                        outcome,
                    },
                );
            });
        }

        Effect::SubmitReschedule(request) => {
            info!("rescheduling session {}", request.session_id);
            let backend = app.backend.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = backend
                    .reschedule_session(&request)
                    .await
                    .map_err(|e| e.to_string());
                send(&tx, Action::RescheduleDone(outcome));
            });
        }

        Effect::FetchSearch(query) => {
            let backend = app.backend.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = backend
                    .global_search(&query)
                    .await
                    .map_err(|e| e.to_string());
                send(&tx, Action::SearchFetched(outcome));
            });
        }

        Effect::FetchSuggestions {
            generation,
            keyword,
        } => {
            let backend = app.backend.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = backend
                    .search_suggestions(&keyword)
                    .await
                    .map_err(|e| e.to_string());
                send(
                    &tx,
                    Action::SuggestionsFetched {
                        generation,
                        outcome,
                    },
                );
            });
        }

        Effect::FetchNotifications { page, append } => {
            let backend = app.backend.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = backend.notifications(page).await.map_err(|e| e.to_string());
                send(&tx, Action::NotificationsFetched { append, outcome });
            });
        }

        Effect::FetchCatalog { page } => {
            for fetch in [CatalogFetch::Tutors, CatalogFetch::Courses, CatalogFetch::Subjects] {
                let backend = app.backend.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let action = match fetch {
                        CatalogFetch::Tutors => Action::TutorsFetched(
                            backend.tutors(page).await.map_err(|e| e.to_string()),
                        ),
                        CatalogFetch::Courses => Action::CoursesFetched(
                            backend.courses(page).await.map_err(|e| e.to_string()),
                        ),
                        CatalogFetch::Subjects => Action::SubjectsFetched(
                            backend.subjects().await.map_err(|e| e.to_string()),
                        ),
                    };
                    send(&tx, action);
                });
            }
        }

        Effect::FetchProfile => {
            let backend = app.backend.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = backend.me().await.map_err(|e| e.to_string());
                send(&tx, Action::ProfileFetched(outcome));
            });
        }

        Effect::PersistProfile => {
            if let Some(p) = &app.store.profile.profile {
                profile::store_cached_profile(p);
            }
        }
    }
}

#[derive(Clone, Copy)]
enum CatalogFetch {
    Tutors,
    Courses,
    Subjects,
}

fn send(tx: &mpsc::Sender<Action>, action: Action) {
    if tx.send(action).is_err() {
        warn!("action channel closed: receiver dropped");
    }
}
