//! Screen layout and dispatch: tab bar on top, the active screen in the
//! middle, status bar at the bottom, and modal overlays (cancel confirm,
//! reschedule, payment hand-off, alert) on top of everything.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::core::booking::BookingKind;
use crate::core::sessions::RescheduleFlow;
use crate::core::state::{App, Screen};
use crate::tui::TuiState;
use crate::tui::components::{NotificationList, SearchPanel, SessionList, SlotPicker};

const TABS: [(Screen, &str); 4] = [
    (Screen::Sessions, "Sessions"),
    (Screen::Search, "Search"),
    (Screen::Booking, "Booking"),
    (Screen::Notifications, "Notifications"),
];

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    let [tab_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_tabs(frame, tab_area, app);

    match app.screen {
        Screen::Sessions => {
            SessionList::new(&mut tui.sessions, &app.store.sessions).render(frame, main_area);
        }
        Screen::Search => {
            let summary = match &app.search.results {
                Some(results) => format!(
                    "{} courses, {} books, {} subjects also matched",
                    results.courses.result.len(),
                    results.books.result.len(),
                    results.subjects.result.len(),
                ),
                None => format!(
                    "catalog: {} courses, {} subjects",
                    app.store.courses.items.len(),
                    app.store.subjects.items.len(),
                ),
            };
            SearchPanel::new(&mut tui.search, &app.search, app.visible_tutors(), &summary)
                .render(frame, main_area);
        }
        Screen::Booking => match &app.booking {
            Some(flow) => {
                let label = match flow.kind {
                    BookingKind::Trial => "Book trial",
                    BookingKind::Regular => "Continue",
                };
                SlotPicker::new(
                    &mut tui.booking_picker,
                    flow,
                    app.booking_tutor.as_ref(),
                    label,
                )
                .render(frame, main_area);
            }
            None => {
                let hint = Paragraph::new("Open a tutor from the Search screen to book.")
                    .style(Style::default().fg(Color::DarkGray))
                    .block(Block::default().borders(Borders::ALL).title(" Booking "));
                frame.render_widget(hint, main_area);
            }
        },
        Screen::Notifications => {
            NotificationList::new(&mut tui.notifications, &app.store.notifications)
                .render(frame, main_area);
        }
    }

    draw_status(frame, status_area, app);

    // Overlays, innermost last.
    if let Some(flow) = &app.reschedule {
        draw_reschedule(frame, tui, flow);
    }
    if let Some(session_id) = app.cancel.pending {
        draw_cancel_confirm(frame, session_id);
    }
    if let Some(handoff) = &app.handoff {
        draw_handoff(frame, handoff);
    }
    if let Some(alert) = &app.alert {
        draw_alert(frame, alert);
    }
}

fn draw_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans: Vec<Span> = vec![Span::styled(
        " tutorly ",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    for (screen, label) in TABS {
        let style = if app.screen == screen {
            Style::default().fg(Color::White).add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {label} "), style));
        spans.push(Span::raw(" "));
    }
    if let Some(profile) = &app.store.profile.profile {
        spans.push(Span::styled(
            format!("  {}", profile.name),
            Style::default().fg(Color::Gray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App) {
    let left = Span::raw(format!(" {}", app.status_message));
    let hints = Span::styled(
        "Tab screens  Ctrl+R refresh  q quit ",
        Style::default().fg(Color::DarkGray),
    );
    let pad = (area.width as usize)
        .saturating_sub(app.status_message.len() + 1)
        .saturating_sub(hints.content.len());
    let line = Line::from(vec![left, Span::raw(" ".repeat(pad)), hints]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_reschedule(frame: &mut Frame, tui: &mut TuiState, flow: &RescheduleFlow) {
    let overlay = centered_rect(80, 70, frame.area());
    frame.render_widget(Clear, overlay);

    let title = format!(
        " Reschedule: {} {} – {} ",
        flow.session.session_date, flow.session.start_time, flow.session.end_time
    );
    let footer = if flow.submitting {
        " submitting... "
    } else {
        " ←→ date  ↑↓ slot  Enter pick  c submit  Esc close "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(title)
        .title_bottom(Line::from(footer).centered())
        .padding(Padding::horizontal(1));
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    SlotPicker::new(&mut tui.resched_picker, &flow.availability, None, "Submit")
        .render(frame, inner);
}

fn draw_cancel_confirm(frame: &mut Frame, session_id: i64) {
    let overlay = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, overlay);

    let text = format!("Cancel session #{session_id}?\nRefunds follow the cancellation policy.");
    let confirm = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Confirm cancellation ")
                .title_bottom(Line::from(" y confirm  n keep ").centered()),
        );
    frame.render_widget(confirm, overlay);
}

fn draw_handoff(frame: &mut Frame, handoff: &crate::core::booking::BookingHandoff) {
    let overlay = centered_rect(60, 40, frame.area());
    frame.render_widget(Clear, overlay);

    let kind = match handoff.kind {
        BookingKind::Trial => "Trial session",
        BookingKind::Regular => "Session",
    };
    let lines = vec![
        Line::from(format!("{kind} with {}", handoff.tutor.name)),
        Line::from(format!(
            "{} at {} ({} min)",
            handoff.selected_date, handoff.selected_time, handoff.selected_duration
        )),
        Line::from(format!("${:.2}", handoff.selected_slot.price)),
        Line::from(""),
        Line::from(Span::styled(
            "Handing off to payment...",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let pane = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green))
                .title(" Payment ")
                .title_bottom(Line::from(" Enter done ").centered()),
        );
    frame.render_widget(pane, overlay);
}

fn draw_alert(frame: &mut Frame, message: &str) {
    let overlay = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, overlay);

    let alert = Paragraph::new(message.to_string())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Notice ")
                .title_bottom(Line::from(" Enter OK ").centered()),
        );
    frame.render_widget(alert, overlay);
}

/// Compute a centered rect using percentage of the outer rect.
fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}
