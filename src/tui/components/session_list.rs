//! # Session List Component
//!
//! The "My sessions" screen: one row per booking with date, time range,
//! price, and status. Emits cancel/reschedule intents for the highlighted
//! row; the confirmation gate itself lives in `core::sessions`.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::api::types::{SessionStatus, UserSession};
use crate::core::store::ResourceState;
use crate::tui::event::TuiEvent;

pub struct SessionListState {
    pub cursor: usize,
    pub list_state: ListState,
}

impl SessionListState {
    pub fn new() -> Self {
        Self {
            cursor: 0,
            list_state: ListState::default(),
        }
    }

    pub fn handle_event(&mut self, event: &TuiEvent, count: usize) -> Option<SessionListEvent> {
        match event {
            TuiEvent::CursorUp => {
                self.cursor = self.cursor.saturating_sub(1);
                self.list_state.select(Some(self.cursor));
                None
            }
            TuiEvent::CursorDown => {
                if count > 0 {
                    self.cursor = (self.cursor + 1).min(count - 1);
                    self.list_state.select(Some(self.cursor));
                }
                None
            }
            TuiEvent::InputChar('c') => Some(SessionListEvent::Cancel(self.cursor)),
            TuiEvent::InputChar('r') => Some(SessionListEvent::Reschedule(self.cursor)),
            _ => None,
        }
    }
}

/// Intents emitted for the highlighted row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionListEvent {
    Cancel(usize),
    Reschedule(usize),
}

pub struct SessionList<'a> {
    state: &'a mut SessionListState,
    sessions: &'a ResourceState<UserSession>,
}

impl<'a> SessionList<'a> {
    pub fn new(state: &'a mut SessionListState, sessions: &'a ResourceState<UserSession>) -> Self {
        Self { state, sessions }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" My Sessions ")
            .title_bottom(Line::from(" ↑↓ select  c cancel  r reschedule ").centered());

        if self.sessions.loading && self.sessions.items.is_empty() {
            let loading = Paragraph::new("Loading sessions...")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(loading, area);
            return;
        }

        if self.sessions.items.is_empty() {
            let empty = Paragraph::new("No sessions booked yet.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = self
            .sessions
            .items
            .iter()
            .map(|session| ListItem::new(session_line(session)))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }
}

fn status_color(status: SessionStatus) -> Color {
    match status {
        SessionStatus::Scheduled => Color::Cyan,
        SessionStatus::Completed => Color::Green,
        SessionStatus::Cancelled => Color::DarkGray,
    }
}

fn session_line(session: &UserSession) -> Line<'_> {
    Line::from(vec![
        Span::raw(format!(
            "{}  {} – {}  {:>3} min  ${:>6.2}  ",
            session.session_date,
            session.start_time,
            session.end_time,
            session.duration,
            session.amount,
        )),
        Span::styled(
            format!("{:?}", session.status).to_uppercase(),
            Style::default().fg(status_color(session.status)),
        ),
    ])
}
