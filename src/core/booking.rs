//! # Availability selection flow
//!
//! The stateful flow behind every booking screen: pick a date, fetch that
//! date's open slots, pick a slot (which fixes duration and price), and hand
//! the completed selection forward to payment. Trial booking, regular
//! booking, and reschedule all run one instance of this machine.
//!
//! ```text
//! NoDateSelected ──date──▶ FetchingSlots ──non-empty──▶ SlotsReady
//!       ▲                      │   │
//!       │                 empty│   │failure
//!       │                      ▼   ▼
//!       └──────date──────  NoSlotsForDate
//! ```
//!
//! Every date pick issues exactly one fetch and invalidates any slot chosen
//! for the previous date. Fetches are never aborted; instead each carries a
//! per-flow generation number and `apply_outcome` drops results from
//! superseded generations, so a slow stale response can never overwrite a
//! newer slot list.

use chrono::NaiveDate;
use log::debug;

use crate::api::types::{AvailableSlots, TimeSlot, Tutor};

/// Which booking screen owns the flow. Carried through to the payment
/// hand-off; the machine itself behaves identically for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingKind {
    Trial,
    Regular,
}

/// Where the flow currently is. `NoSlotsForDate` keeps the failure reason
/// when there was one - a failed fetch and a genuinely open-slot-free date
/// render the same, but the distinction is not thrown away.
#[derive(Debug, Clone, PartialEq)]
pub enum AvailabilityState {
    NoDateSelected,
    FetchingSlots {
        date: NaiveDate,
    },
    SlotsReady {
        date: NaiveDate,
        slots: Vec<TimeSlot>,
    },
    NoSlotsForDate {
        date: NaiveDate,
        reason: Option<String>,
    },
}

/// The user's transient picks. Lives only as long as the screen; never
/// persisted. `duration` is always derived from the chosen slot's
/// `session_duration`, never set independently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingSelection {
    pub date: Option<NaiveDate>,
    pub time_slot: Option<TimeSlot>,
    pub duration: Option<u32>,
}

/// A slot fetch the flow wants issued. The generation ties the eventual
/// response back to the date pick that requested it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotFetch {
    pub generation: u64,
    pub tutor_id: i64,
    pub date: NaiveDate,
}

/// Everything handed to the payment screen once the selection is complete.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingHandoff {
    pub tutor: Tutor,
    pub selected_date: NaiveDate,
    pub selected_time: String,
    pub selected_duration: u32,
    pub selected_slot: TimeSlot,
    pub kind: BookingKind,
}

pub struct AvailabilityFlow {
    pub tutor_id: i64,
    pub kind: BookingKind,
    pub state: AvailabilityState,
    pub selection: BookingSelection,
    generation: u64,
}

impl AvailabilityFlow {
    pub fn new(tutor_id: i64, kind: BookingKind) -> Self {
        Self {
            tutor_id,
            kind,
            state: AvailabilityState::NoDateSelected,
            selection: BookingSelection::default(),
            generation: 0,
        }
    }

    /// The user picked a date. Clears any slot chosen for the previous date,
    /// supersedes any in-flight fetch, and returns the one fetch to issue.
    pub fn select_date(&mut self, date: NaiveDate) -> SlotFetch {
        self.generation += 1;
        self.selection = BookingSelection {
            date: Some(date),
            time_slot: None,
            duration: None,
        };
        self.state = AvailabilityState::FetchingSlots { date };
        SlotFetch {
            generation: self.generation,
            tutor_id: self.tutor_id,
            date,
        }
    }

    /// A slot fetch resolved. Returns false (and changes nothing) when the
    /// result belongs to a superseded date pick.
    pub fn apply_outcome(
        &mut self,
        generation: u64,
        outcome: Result<AvailableSlots, String>,
    ) -> bool {
        if generation != self.generation {
            debug!(
                "discarding stale slot response (generation {} < {})",
                generation, self.generation
            );
            return false;
        }

        let date = match self.state {
            AvailabilityState::FetchingSlots { date } => date,
            // A resolution with the current generation implies we are still
            // fetching; anything else means the flow was reset.
            _ => return false,
        };

        self.state = match outcome {
            Ok(available) if !available.slots.is_empty() => AvailabilityState::SlotsReady {
                date,
                slots: available.slots,
            },
            Ok(_) => AvailabilityState::NoSlotsForDate { date, reason: None },
            Err(reason) => AvailabilityState::NoSlotsForDate {
                date,
                reason: Some(reason),
            },
        };
        true
    }

    /// The user tapped a slot. Only meaningful in `SlotsReady`; records the
    /// slot and derives the duration from it.
    pub fn select_slot(&mut self, index: usize) -> bool {
        let AvailabilityState::SlotsReady { slots, .. } = &self.state else {
            return false;
        };
        let Some(slot) = slots.get(index) else {
            return false;
        };
        self.selection.duration = Some(slot.session_duration);
        self.selection.time_slot = Some(slot.clone());
        true
    }

    /// Slots for the current date, in backend order (the client never sorts,
    /// dedups, or resolves overlaps). Empty unless `SlotsReady`.
    pub fn slots(&self) -> &[TimeSlot] {
        match &self.state {
            AvailabilityState::SlotsReady { slots, .. } => slots,
            _ => &[],
        }
    }

    /// Continue/Book is enabled iff date, slot, and duration are all set.
    pub fn can_continue(&self) -> bool {
        self.selection.date.is_some()
            && self.selection.time_slot.is_some()
            && self.selection.duration.is_some()
    }

    /// Builds the payment hand-off. None until the selection is complete.
    pub fn handoff(&self, tutor: Tutor) -> Option<BookingHandoff> {
        let date = self.selection.date?;
        let slot = self.selection.time_slot.clone()?;
        let duration = self.selection.duration?;
        Some(BookingHandoff {
            tutor,
            selected_date: date,
            selected_time: slot.start.clone(),
            selected_duration: duration,
            selected_slot: slot,
            kind: self.kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn slot(start: &str, end: &str, duration: u32, price: f64) -> TimeSlot {
        TimeSlot {
            start: start.to_string(),
            end: end.to_string(),
            availability_id: 1,
            day_of_week: "SATURDAY".to_string(),
            session_duration: duration,
            buffer_time: 10,
            price,
        }
    }

    fn available(d: &str, slots: Vec<TimeSlot>) -> AvailableSlots {
        AvailableSlots {
            tutor_id: 7,
            date: date(d),
            session_duration: 60,
            buffer_time: 10,
            total_slots: slots.len() as u32,
            slots,
        }
    }

    #[test]
    fn test_initial_state_disables_continue() {
        let flow = AvailabilityFlow::new(7, BookingKind::Regular);
        assert_eq!(flow.state, AvailabilityState::NoDateSelected);
        assert!(!flow.can_continue());
    }

    #[test]
    fn test_date_pick_issues_one_fetch() {
        let mut flow = AvailabilityFlow::new(7, BookingKind::Regular);
        let fetch = flow.select_date(date("2024-06-01"));
        assert_eq!(fetch.tutor_id, 7);
        assert_eq!(fetch.date, date("2024-06-01"));
        assert!(matches!(flow.state, AvailabilityState::FetchingSlots { .. }));
    }

    #[test]
    fn test_booking_scenario_end_to_end() {
        let mut flow = AvailabilityFlow::new(7, BookingKind::Regular);
        let fetch = flow.select_date(date("2024-06-01"));

        let applied = flow.apply_outcome(
            fetch.generation,
            Ok(available("2024-06-01", vec![slot("10:00", "11:00", 60, 30.0)])),
        );
        assert!(applied);
        assert!(!flow.can_continue());

        assert!(flow.select_slot(0));
        assert_eq!(flow.selection.duration, Some(60));
        assert_eq!(flow.selection.time_slot.as_ref().unwrap().price, 30.0);
        assert!(flow.can_continue());

        let tutor = Tutor {
            id: 7,
            name: "Ada".to_string(),
            country: "UK".to_string(),
            subjects: vec!["math".to_string()],
            rating: 4.9,
            hourly_rate: 30.0,
            bio: None,
        };
        let handoff = flow.handoff(tutor).unwrap();
        assert_eq!(handoff.selected_date, date("2024-06-01"));
        assert_eq!(handoff.selected_time, "10:00");
        assert_eq!(handoff.selected_duration, 60);
        assert_eq!(handoff.selected_slot.end, "11:00");
        assert_eq!(handoff.kind, BookingKind::Regular);
    }

    #[test]
    fn test_new_date_clears_previous_slot_and_duration() {
        let mut flow = AvailabilityFlow::new(7, BookingKind::Regular);
        let fetch = flow.select_date(date("2024-06-01"));
        flow.apply_outcome(
            fetch.generation,
            Ok(available("2024-06-01", vec![slot("10:00", "11:00", 60, 30.0)])),
        );
        flow.select_slot(0);
        assert!(flow.can_continue());

        flow.select_date(date("2024-06-02"));
        assert_eq!(flow.selection.date, Some(date("2024-06-02")));
        assert!(flow.selection.time_slot.is_none());
        assert!(flow.selection.duration.is_none());
        assert!(!flow.can_continue());
    }

    #[test]
    fn test_stale_generation_is_discarded() {
        let mut flow = AvailabilityFlow::new(7, BookingKind::Regular);
        let first = flow.select_date(date("2024-06-01"));
        let second = flow.select_date(date("2024-06-02"));

        // Newer request resolves first.
        assert!(flow.apply_outcome(
            second.generation,
            Ok(available("2024-06-02", vec![slot("14:00", "15:00", 60, 25.0)])),
        ));

        // The slow first response arrives late and must not overwrite.
        assert!(!flow.apply_outcome(
            first.generation,
            Ok(available("2024-06-01", vec![slot("10:00", "11:00", 60, 30.0)])),
        ));

        match &flow.state {
            AvailabilityState::SlotsReady { date: d, slots } => {
                assert_eq!(*d, date("2024-06-02"));
                assert_eq!(slots[0].start, "14:00");
            }
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[test]
    fn test_empty_result_lands_in_no_slots_without_reason() {
        let mut flow = AvailabilityFlow::new(7, BookingKind::Trial);
        let fetch = flow.select_date(date("2024-06-01"));
        flow.apply_outcome(fetch.generation, Ok(available("2024-06-01", vec![])));
        assert_eq!(
            flow.state,
            AvailabilityState::NoSlotsForDate {
                date: date("2024-06-01"),
                reason: None,
            }
        );
        assert!(flow.slots().is_empty());
    }

    #[test]
    fn test_failed_fetch_keeps_the_reason() {
        let mut flow = AvailabilityFlow::new(7, BookingKind::Regular);
        let fetch = flow.select_date(date("2024-06-01"));
        flow.apply_outcome(fetch.generation, Err("network error: timeout".to_string()));
        match &flow.state {
            AvailabilityState::NoSlotsForDate { reason, .. } => {
                assert_eq!(reason.as_deref(), Some("network error: timeout"));
            }
            other => panic!("unexpected state: {:?}", other),
        }
        // A failed fetch still allows retry by re-picking the date.
        let retry = flow.select_date(date("2024-06-01"));
        assert!(retry.generation > fetch.generation);
    }

    #[test]
    fn test_slot_pick_outside_ready_state_is_ignored() {
        let mut flow = AvailabilityFlow::new(7, BookingKind::Regular);
        assert!(!flow.select_slot(0));

        let fetch = flow.select_date(date("2024-06-01"));
        assert!(!flow.select_slot(0)); // still fetching

        flow.apply_outcome(
            fetch.generation,
            Ok(available("2024-06-01", vec![slot("10:00", "11:00", 60, 30.0)])),
        );
        assert!(!flow.select_slot(5)); // out of range
        assert!(flow.selection.time_slot.is_none());
    }

    #[test]
    fn test_slots_keep_backend_order() {
        let mut flow = AvailabilityFlow::new(7, BookingKind::Regular);
        let fetch = flow.select_date(date("2024-06-01"));
        flow.apply_outcome(
            fetch.generation,
            Ok(available(
                "2024-06-01",
                vec![
                    slot("16:00", "17:00", 60, 30.0),
                    slot("09:00", "10:00", 60, 30.0),
                ],
            )),
        );
        let starts: Vec<&str> = flow.slots().iter().map(|s| s.start.as_str()).collect();
        assert_eq!(starts, vec!["16:00", "09:00"]);
    }
}
