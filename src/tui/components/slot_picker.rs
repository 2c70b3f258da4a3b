//! # Slot Picker Component
//!
//! The booking screen's date strip + slot list. Left/Right taps a date
//! (every tap fetches that date's slots), Up/Down moves the slot highlight,
//! Enter picks the highlighted slot. The component only emits intents; the
//! availability machine in `core::booking` owns the actual state.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `SlotPickerState` lives in `TuiState`
//! - `SlotPicker` is created each frame with borrowed state

use chrono::{Duration, NaiveDate};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::api::types::{TimeSlot, Tutor};
use crate::core::booking::{AvailabilityFlow, AvailabilityState};
use crate::tui::event::TuiEvent;

/// Days shown on the date strip.
const DATE_STRIP_DAYS: i64 = 14;

/// Persistent state for one picker instance.
pub struct SlotPickerState {
    pub dates: Vec<NaiveDate>,
    pub date_cursor: usize,
    pub slot_cursor: usize,
    pub list_state: ListState,
}

impl SlotPickerState {
    /// Builds the strip starting at `today`.
    pub fn new(today: NaiveDate) -> Self {
        let dates = (0..DATE_STRIP_DAYS).map(|i| today + Duration::days(i)).collect();
        Self {
            dates,
            date_cursor: 0,
            slot_cursor: 0,
            list_state: ListState::default(),
        }
    }

    /// Handle a key event, returning an intent for the flow.
    pub fn handle_event(&mut self, event: &TuiEvent, slot_count: usize) -> Option<SlotPickerEvent> {
        match event {
            TuiEvent::CursorLeft => {
                self.date_cursor = self.date_cursor.saturating_sub(1);
                self.reset_slots();
                Some(SlotPickerEvent::PickDate(self.dates[self.date_cursor]))
            }
            TuiEvent::CursorRight => {
                self.date_cursor = (self.date_cursor + 1).min(self.dates.len() - 1);
                self.reset_slots();
                Some(SlotPickerEvent::PickDate(self.dates[self.date_cursor]))
            }
            TuiEvent::CursorUp => {
                self.slot_cursor = self.slot_cursor.saturating_sub(1);
                self.list_state.select(Some(self.slot_cursor));
                None
            }
            TuiEvent::CursorDown => {
                if slot_count > 0 {
                    self.slot_cursor = (self.slot_cursor + 1).min(slot_count - 1);
                    self.list_state.select(Some(self.slot_cursor));
                }
                None
            }
            TuiEvent::Submit => {
                if slot_count > 0 {
                    Some(SlotPickerEvent::PickSlot(self.slot_cursor))
                } else {
                    None
                }
            }
            TuiEvent::InputChar('c') => Some(SlotPickerEvent::Continue),
            TuiEvent::Escape => Some(SlotPickerEvent::Back),
            _ => None,
        }
    }

    fn reset_slots(&mut self) {
        self.slot_cursor = 0;
        self.list_state.select(None);
    }
}

/// Intents emitted by the picker.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotPickerEvent {
    PickDate(NaiveDate),
    PickSlot(usize),
    Continue,
    Back,
}

/// Transient render wrapper.
pub struct SlotPicker<'a> {
    state: &'a mut SlotPickerState,
    flow: &'a AvailabilityFlow,
    tutor: Option<&'a Tutor>,
    /// Label for the confirm action ("Continue" or "Submit").
    confirm_label: &'a str,
}

impl<'a> SlotPicker<'a> {
    pub fn new(
        state: &'a mut SlotPickerState,
        flow: &'a AvailabilityFlow,
        tutor: Option<&'a Tutor>,
        confirm_label: &'a str,
    ) -> Self {
        Self {
            state,
            flow,
            tutor,
            confirm_label,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [strip_area, slots_area, summary_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .areas(area);

        self.render_date_strip(frame, strip_area);
        self.render_slots(frame, slots_area);
        self.render_summary(frame, summary_area);
    }

    fn render_date_strip(&self, frame: &mut Frame, area: Rect) {
        let picked = self.flow.selection.date;
        let spans: Vec<Span> = self
            .state
            .dates
            .iter()
            .enumerate()
            .flat_map(|(i, date)| {
                let label = date.format(" %a %d ").to_string();
                let style = if i == self.state.date_cursor {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else if picked == Some(*date) {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::Gray)
                };
                [Span::styled(label, style), Span::raw(" ")]
            })
            .collect();

        let title = match self.tutor {
            Some(t) => format!(" Book {} ", t.name),
            None => " Pick a date ".to_string(),
        };
        let strip = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(strip, area);
    }

    fn render_slots(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(" Slots ");

        // The empty and failed cases render identically; the failure reason
        // stays in the flow state.
        let placeholder_text = match &self.flow.state {
            AvailabilityState::NoDateSelected => Some("Pick a date to see available slots."),
            AvailabilityState::FetchingSlots { .. } => Some("Loading slots..."),
            AvailabilityState::NoSlotsForDate { .. } => Some("No slots available for this date."),
            AvailabilityState::SlotsReady { .. } => None,
        };

        if let Some(text) = placeholder_text {
            let placeholder = Paragraph::new(text)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(placeholder, area);
            return;
        }

        let picked = self.flow.selection.time_slot.as_ref();
        let items: Vec<ListItem> = self
            .flow
            .slots()
            .iter()
            .map(|slot| ListItem::new(slot_line(slot, picked)))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect) {
        let selection = &self.flow.selection;
        let text = match (&selection.date, &selection.time_slot) {
            (Some(date), Some(slot)) => format!(
                "{} at {} ({} min, ${:.2})   [c] {}",
                date,
                slot.start,
                selection.duration.unwrap_or(slot.session_duration),
                slot.price,
                self.confirm_label,
            ),
            (Some(_), None) => "Pick a time slot.".to_string(),
            _ => "No selection yet.".to_string(),
        };
        let style = if self.flow.can_continue() {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let summary = Paragraph::new(text)
            .style(style)
            .block(Block::default().borders(Borders::ALL).title(" Selection "));
        frame.render_widget(summary, area);
    }
}

fn slot_line<'a>(slot: &'a TimeSlot, picked: Option<&TimeSlot>) -> Line<'a> {
    let marker = if picked == Some(slot) { "● " } else { "  " };
    Line::from(vec![
        Span::styled(marker, Style::default().fg(Color::Cyan)),
        Span::raw(format!(
            "{} – {}   {} min   ${:.2}",
            slot.start, slot.end, slot.session_duration, slot.price
        )),
    ])
}
