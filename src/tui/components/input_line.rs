//! # Input Line Component
//!
//! Single-line text input used by the search screen. Holds its own text and
//! cursor; emits `Changed` on every edit (feeding the suggestion debouncer)
//! and `Submitted` on Enter.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::EventHandler;
use crate::tui::event::TuiEvent;

#[derive(Debug, PartialEq)]
pub enum InputEvent {
    Changed(String),
    Submitted(String),
}

#[derive(Default)]
pub struct InputLine {
    text: String,
    /// Cursor position as a char index into `text`.
    cursor: usize,
}

impl InputLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn byte_index(&self) -> usize {
        self.text
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, title: &str, focused: bool) {
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let input = Paragraph::new(self.text.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(format!(" {title} ")),
        );
        frame.render_widget(input, area);

        if focused {
            let prefix: String = self.text.chars().take(self.cursor).collect();
            let x = area.x + 1 + prefix.width() as u16;
            frame.set_cursor_position((x.min(area.x + area.width.saturating_sub(2)), area.y + 1));
        }
    }
}

impl EventHandler for InputLine {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<InputEvent> {
        match event {
            TuiEvent::InputChar(c) => {
                let at = self.byte_index();
                self.text.insert(at, *c);
                self.cursor += 1;
                Some(InputEvent::Changed(self.text.clone()))
            }
            TuiEvent::Backspace => {
                if self.cursor == 0 {
                    return None;
                }
                self.cursor -= 1;
                let at = self.byte_index();
                self.text.remove(at);
                Some(InputEvent::Changed(self.text.clone()))
            }
            TuiEvent::CursorLeft => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            TuiEvent::CursorRight => {
                self.cursor = (self.cursor + 1).min(self.text.chars().count());
                None
            }
            TuiEvent::Submit => Some(InputEvent::Submitted(self.text.clone())),
            _ => None,
        }
    }
}
