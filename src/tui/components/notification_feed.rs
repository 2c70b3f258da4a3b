//! # Notification Feed Component
//!
//! Scrollable notification list with offset-based "load more". Bodies are
//! wrapped to the pane width; unread entries render bold.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::core::notifications::NotificationFeed;
use crate::tui::event::TuiEvent;

pub struct NotificationFeedState {
    pub cursor: usize,
    pub list_state: ListState,
}

impl NotificationFeedState {
    pub fn new() -> Self {
        Self {
            cursor: 0,
            list_state: ListState::default(),
        }
    }

    pub fn handle_event(&mut self, event: &TuiEvent, count: usize) -> Option<FeedEvent> {
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
            TuiEvent::InputChar('m') => Some(FeedEvent::LoadMore),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedEvent {
    LoadMore,
}

pub struct NotificationList<'a> {
    state: &'a mut NotificationFeedState,
    feed: &'a NotificationFeed,
}

impl<'a> NotificationList<'a> {
    pub fn new(state: &'a mut NotificationFeedState, feed: &'a NotificationFeed) -> Self {
        Self { state, feed }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let footer = if self.feed.loading {
            " loading... ".to_string()
        } else if self.feed.has_more {
            format!(" m load more ({}/{}) ", self.feed.items.len(), self.feed.total)
        } else {
            format!(" all {} loaded ", self.feed.items.len())
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Notifications ")
            .title_bottom(Line::from(footer).centered());

        if self.feed.items.is_empty() {
            let empty = Paragraph::new("No notifications.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let wrap_width = area.width.saturating_sub(4).max(16) as usize;
        let items: Vec<ListItem> = self
            .feed
            .items
            .iter()
            .map(|n| {
                let title_style = if n.is_read {
                    Style::default().fg(Color::Gray)
                } else {
                    Style::default().add_modifier(Modifier::BOLD)
                };
                let mut lines = vec![Line::from(vec![
                    Span::styled(n.title.clone(), title_style),
                    Span::styled(
                        format!("  {}", n.created_at),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])];
                for wrapped in textwrap::wrap(&n.body, wrap_width) {
                    lines.push(Line::from(Span::raw(wrapped.into_owned())));
                }
                ListItem::new(lines)
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_m_requests_more() {
        let mut state = NotificationFeedState::new();
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('m'), 0),
            Some(FeedEvent::LoadMore)
        );
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut state = NotificationFeedState::new();
        state.handle_event(&TuiEvent::CursorDown, 1);
        state.handle_event(&TuiEvent::CursorDown, 1);
        assert_eq!(state.cursor, 0);
        state.handle_event(&TuiEvent::CursorUp, 1);
        assert_eq!(state.cursor, 0);
    }
}
