//! # Cancel and reschedule flows
//!
//! Cancel: a confirmation step is mandatory before any network call, and a
//! session with a cancel already in flight cannot be cancelled again until
//! that call resolves. The `{refundEligible, refundProcessed}` pair from the
//! response maps to exactly three fixed messages.
//!
//! Reschedule: wraps an [`AvailabilityFlow`] to pick the new date/slot;
//! submission is validated locally (date and slot both set) before a request
//! is issued. Success closes the flow and the caller refreshes the sessions
//! list; failure surfaces a single-string alert.

use std::collections::HashSet;

use crate::api::types::{RescheduleRequest, UserSession};
use crate::core::booking::{AvailabilityFlow, BookingKind};

/// Maps the cancel response's refund booleans to the message shown to the
/// user. Pure - there are no other states.
pub fn refund_message(refund_eligible: bool, refund_processed: bool) -> &'static str {
    match (refund_eligible, refund_processed) {
        (true, true) => "Your session has been cancelled. Refund has been processed.",
        (true, false) => {
            "Your session has been cancelled. You are eligible for a refund and it will be processed shortly."
        }
        (false, _) => "Your session has been cancelled. No refund applicable.",
    }
}

/// Replaces the entry matching `updated.id` in place. No other entries are
/// touched; an unknown id is a no-op.
pub fn replace_session(items: &mut [UserSession], updated: UserSession) {
    if let Some(entry) = items.iter_mut().find(|s| s.id == updated.id) {
        *entry = updated;
    }
}

/// Confirmation gate and in-flight guard for session cancellation.
#[derive(Debug, Default)]
pub struct CancelState {
    /// Session awaiting the user's explicit confirmation, if any.
    pub pending: Option<i64>,
    /// Sessions whose cancel request is in flight.
    in_flight: HashSet<i64>,
}

impl CancelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks for confirmation. Ignored while a cancel for the same session is
    /// already in flight.
    pub fn request(&mut self, session_id: i64) -> bool {
        if self.in_flight.contains(&session_id) {
            return false;
        }
        self.pending = Some(session_id);
        true
    }

    /// The user confirmed. Moves the pending session into the in-flight set
    /// and returns it - only then may a network call be issued.
    pub fn confirm(&mut self) -> Option<i64> {
        let session_id = self.pending.take()?;
        self.in_flight.insert(session_id);
        Some(session_id)
    }

    pub fn dismiss(&mut self) {
        self.pending = None;
    }

    /// The cancel call resolved (either way).
    pub fn finish(&mut self, session_id: i64) {
        self.in_flight.remove(&session_id);
    }

    pub fn is_in_flight(&self, session_id: i64) -> bool {
        self.in_flight.contains(&session_id)
    }
}

/// Reschedule of one existing session, reusing the availability machine for
/// the new date/slot pick.
pub struct RescheduleFlow {
    pub session: UserSession,
    pub availability: AvailabilityFlow,
    pub submitting: bool,
}

impl RescheduleFlow {
    pub fn new(session: UserSession) -> Self {
        let availability = AvailabilityFlow::new(session.tutor_id, BookingKind::Regular);
        Self {
            session,
            availability,
            submitting: false,
        }
    }

    /// Local validation: date and slot must both be picked, otherwise the
    /// submit is rejected with a user-facing message and no request is made.
    pub fn validate(&self) -> Result<RescheduleRequest, &'static str> {
        let selection = &self.availability.selection;
        let (Some(date), Some(slot)) = (selection.date, selection.time_slot.as_ref()) else {
            return Err("Please select a new date and time slot.");
        };
        Ok(RescheduleRequest {
            session_id: self.session.id,
            new_session_date: date,
            new_start_time: slot.start.clone(),
            new_end_time: slot.end.clone(),
        })
    }
}
