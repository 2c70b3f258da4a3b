//! # Search Panel Component
//!
//! Keyword input with inline `key:value` filters, a suggestion line fed by
//! the debounced type-ahead, and the four result buckets. Focus toggles
//! between the input and the tutor results (Esc/Down); from the results a
//! tutor can be opened for regular or trial booking.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::api::types::Tutor;
use crate::core::search::SearchState;
use crate::tui::component::EventHandler;
use crate::tui::components::input_line::{InputEvent, InputLine};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Input,
    Results,
}

pub struct SearchPanelState {
    pub input: InputLine,
    focus: Focus,
    pub result_cursor: usize,
    pub list_state: ListState,
}

impl SearchPanelState {
    pub fn new() -> Self {
        Self {
            input: InputLine::new(),
            focus: Focus::Input,
            result_cursor: 0,
            list_state: ListState::default(),
        }
    }

    pub fn handle_event(&mut self, event: &TuiEvent, tutor_count: usize) -> Option<SearchEvent> {
        match self.focus {
            Focus::Input => {
                // Down moves into the results once there are any.
                if *event == TuiEvent::CursorDown && tutor_count > 0 {
                    self.focus = Focus::Results;
                    self.result_cursor = 0;
                    self.list_state.select(Some(0));
                    return None;
                }
                match self.input.handle_event(event)? {
                    InputEvent::Changed(text) => Some(SearchEvent::Changed(text)),
                    InputEvent::Submitted(text) => Some(SearchEvent::Submitted(text)),
                }
            }
            Focus::Results => match event {
                TuiEvent::Escape => {
                    self.focus = Focus::Input;
                    self.list_state.select(None);
                    None
                }
                TuiEvent::CursorUp => {
                    if self.result_cursor == 0 {
                        self.focus = Focus::Input;
                        self.list_state.select(None);
                    } else {
                        self.result_cursor -= 1;
                        self.list_state.select(Some(self.result_cursor));
                    }
                    None
                }
                TuiEvent::CursorDown => {
                    if tutor_count > 0 {
                        self.result_cursor = (self.result_cursor + 1).min(tutor_count - 1);
                        self.list_state.select(Some(self.result_cursor));
                    }
                    None
                }
                TuiEvent::Submit => Some(SearchEvent::Book(self.result_cursor)),
                TuiEvent::InputChar('t') => Some(SearchEvent::Trial(self.result_cursor)),
                _ => None,
            },
        }
    }

    pub fn in_results(&self) -> bool {
        self.focus == Focus::Results
    }
}

/// Intents emitted by the panel. `Book`/`Trial` index into the tutors
/// bucket of the current results.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    Changed(String),
    Submitted(String),
    Book(usize),
    Trial(usize),
}

pub struct SearchPanel<'a> {
    state: &'a mut SearchPanelState,
    search: &'a SearchState,
    /// Rows shown below the input: search hits, or the browse catalog
    /// before the first search.
    tutors: &'a [Tutor],
    /// One-line summary of the non-tutor buckets.
    summary: &'a str,
}

impl<'a> SearchPanel<'a> {
    pub fn new(
        state: &'a mut SearchPanelState,
        search: &'a SearchState,
        tutors: &'a [Tutor],
        summary: &'a str,
    ) -> Self {
        Self {
            state,
            search,
            tutors,
            summary,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [input_area, suggest_area, results_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .areas(area);

        let focused = self.state.focus == Focus::Input;
        self.state.input.render(
            frame,
            input_area,
            "Search (filters: country: subject: level: rating: price:min-max)",
            focused,
        );

        self.render_suggestions(frame, suggest_area);
        self.render_results(frame, results_area);
    }

    fn render_suggestions(&self, frame: &mut Frame, area: Rect) {
        if self.search.suggestions.is_empty() {
            return;
        }
        let spans: Vec<Span> = self
            .search
            .suggestions
            .iter()
            .take(6)
            .flat_map(|s| {
                [
                    Span::styled(s.label.clone(), Style::default().fg(Color::Cyan)),
                    Span::styled(
                        format!(" ({}) ", s.category),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]
            })
            .collect();
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_results(&mut self, frame: &mut Frame, area: Rect) {
        let title = if self.search.results.is_some() {
            " Results "
        } else {
            " Browse tutors "
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_bottom(Line::from(" ↓ into results  Enter book  t trial ").centered());

        if self.tutors.is_empty() {
            let hint = if self.search.loading {
                "Searching..."
            } else if self.search.results.is_some() {
                "No tutors matched. Try a broader keyword."
            } else {
                "Type a keyword and press Enter."
            };
            let empty = Paragraph::new(hint)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        // Only tutors are bookable from here; the other buckets are
        // summarized in one trailing line.
        let mut items: Vec<ListItem> = self
            .tutors
            .iter()
            .map(|tutor| {
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{:<24}", tutor.name)),
                    Span::styled(
                        format!(
                            "{}  ★{:.1}  ${:.0}/h",
                            tutor.country, tutor.rating, tutor.hourly_rate
                        ),
                        Style::default().fg(Color::Gray),
                    ),
                ]))
            })
            .collect();
        items.push(ListItem::new(Span::styled(
            self.summary.to_string(),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(state: &mut SearchPanelState, s: &str) -> Option<SearchEvent> {
        let mut last = None;
        for c in s.chars() {
            last = state.handle_event(&TuiEvent::InputChar(c), 0);
        }
        last
    }

    #[test]
    fn test_typing_emits_changed() {
        let mut state = SearchPanelState::new();
        let event = type_str(&mut state, "pia");
        assert_eq!(event, Some(SearchEvent::Changed("pia".to_string())));
    }

    #[test]
    fn test_enter_submits_input_text() {
        let mut state = SearchPanelState::new();
        type_str(&mut state, "piano country:DE");
        assert_eq!(
            state.handle_event(&TuiEvent::Submit, 0),
            Some(SearchEvent::Submitted("piano country:DE".to_string()))
        );
    }

    #[test]
    fn test_down_enters_results_only_with_tutors() {
        let mut state = SearchPanelState::new();
        state.handle_event(&TuiEvent::CursorDown, 0);
        assert!(!state.in_results());
        state.handle_event(&TuiEvent::CursorDown, 2);
        assert!(state.in_results());
    }

    #[test]
    fn test_book_and_trial_from_results() {
        let mut state = SearchPanelState::new();
        state.handle_event(&TuiEvent::CursorDown, 2);
        state.handle_event(&TuiEvent::CursorDown, 2);
        assert_eq!(
            state.handle_event(&TuiEvent::Submit, 2),
            Some(SearchEvent::Book(1))
        );
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('t'), 2),
            Some(SearchEvent::Trial(1))
        );
    }

    #[test]
    fn test_up_from_first_result_returns_to_input() {
        let mut state = SearchPanelState::new();
        state.handle_event(&TuiEvent::CursorDown, 2);
        assert!(state.in_results());
        state.handle_event(&TuiEvent::CursorUp, 2);
        assert!(!state.in_results());
    }
}
