//! Wire types for the Tutorly REST API.
//!
//! Every response body is parsed into one of these structs at the HTTP
//! boundary - nothing downstream ever touches raw JSON. Field names follow
//! the backend's camelCase convention via serde renames; dates are ISO
//! (`2024-06-01`) and times are the backend's `HH:MM` strings, which are
//! forwarded as-is (the client never does time arithmetic on them).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One bookable slot for a (tutor, date) pair, produced server-side.
/// Immutable once fetched; the client only caches the list for the
/// currently selected date.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub start: String,
    pub end: String,
    pub availability_id: i64,
    pub day_of_week: String,
    /// Minutes. Picking this slot fixes the booking duration.
    pub session_duration: u32,
    /// Minutes of server-enforced gap after the slot.
    pub buffer_time: u32,
    pub price: f64,
}

/// Response of `GET tutor-availability/available-slots/{tutorId}/{date}`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSlots {
    pub tutor_id: i64,
    pub date: NaiveDate,
    pub session_duration: u32,
    pub buffer_time: u32,
    pub total_slots: u32,
    pub slots: Vec<TimeSlot>,
}

/// Server-owned booking status. The client never computes transitions;
/// it only reflects what cancel/reschedule responses return.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Scheduled,
    Completed,
    Cancelled,
}

/// A confirmed booking as returned by the sessions endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub id: i64,
    pub tutor_id: i64,
    pub session_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub duration: u32,
    pub amount: f64,
    pub status: SessionStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Body of `PATCH sessions/reschedule`.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleRequest {
    pub session_id: i64,
    pub new_session_date: NaiveDate,
    pub new_start_time: String,
    pub new_end_time: String,
}

/// The date/time triple echoed back as `oldSchedule`/`newSchedule`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSchedule {
    pub session_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
}

/// Response of `PATCH sessions/reschedule`.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleOutcome {
    pub message: String,
    pub session: UserSession,
    pub old_schedule: SessionSchedule,
    pub new_schedule: SessionSchedule,
}

/// Body of `PATCH sessions/cancel`.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    pub session_id: i64,
}

/// Response of `PATCH sessions/cancel`. Refund computation is entirely
/// server-side; the two booleans are only mapped to display messages.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CancelOutcome {
    pub message: String,
    pub refund_eligible: bool,
    pub refund_processed: bool,
    pub session: UserSession,
}

/// Offset/limit pagination envelope (`my-sessions`, `notifications`,
/// and the collection endpoints all use it).
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Paged<T> {
    pub result: Vec<T>,
    pub total: u64,
}

/// Offset/limit pair for paged requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u32,
    pub offset: u32,
}

impl PageRequest {
    pub fn first(limit: u32) -> Self {
        Self { limit, offset: 0 }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tutor {
    pub id: i64,
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub subjects: Vec<String>,
    pub rating: f64,
    pub hourly_rate: f64,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub subject: String,
    pub level: String,
    pub price: f64,
    pub tutor_id: i64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Subject {
    pub id: i64,
    pub name: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub subject: Option<String>,
}

/// One bucket of `GET global-search`. The backend wraps each category's
/// hits in its own `{result: []}` object.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SearchBucket<T> {
    #[serde(default = "Vec::new")]
    pub result: Vec<T>,
}

// Manual `Default` avoids the `T: Default` bound that `#[derive(Default)]`
// would add; an empty bucket is just an empty `result` vector.
impl<T> Default for SearchBucket<T> {
    fn default() -> Self {
        SearchBucket { result: Vec::new() }
    }
}

/// Response of `GET global-search`.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct GlobalSearchResults {
    #[serde(default)]
    pub tutors: SearchBucket<Tutor>,
    #[serde(default)]
    pub courses: SearchBucket<Course>,
    #[serde(default)]
    pub books: SearchBucket<Book>,
    #[serde(default)]
    pub subjects: SearchBucket<Subject>,
}

impl GlobalSearchResults {
    /// Total hits across all four buckets.
    pub fn hit_count(&self) -> usize {
        self.tutors.result.len()
            + self.courses.result.len()
            + self.books.result.len()
            + self.subjects.result.len()
    }
}

/// One entry of `GET global-search/suggestions`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SearchSuggestion {
    pub label: String,
    pub category: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: String,
}

/// The authenticated user, `GET users/me`. The only resource persisted
/// across restarts (see `core::profile`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub country: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_slot_parses_backend_fields() {
        let json = r#"{
            "start": "10:00",
            "end": "11:00",
            "availabilityId": 42,
            "dayOfWeek": "SATURDAY",
            "sessionDuration": 60,
            "bufferTime": 15,
            "price": 30.0
        }"#;
        let slot: TimeSlot = serde_json::from_str(json).unwrap();
        assert_eq!(slot.start, "10:00");
        assert_eq!(slot.availability_id, 42);
        assert_eq!(slot.session_duration, 60);
        assert_eq!(slot.price, 30.0);
    }

    #[test]
    fn test_session_status_wire_format() {
        let s: SessionStatus = serde_json::from_str(r#""SCHEDULED""#).unwrap();
        assert_eq!(s, SessionStatus::Scheduled);
        assert_eq!(
            serde_json::to_string(&SessionStatus::Cancelled).unwrap(),
            r#""CANCELLED""#
        );
    }

    #[test]
    fn test_reschedule_request_serializes_camel_case() {
        let req = RescheduleRequest {
            session_id: 7,
            new_session_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            new_start_time: "10:00".to_string(),
            new_end_time: "11:00".to_string(),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains(r#""sessionId":7"#));
        assert!(json.contains(r#""newSessionDate":"2024-06-01""#));
        assert!(json.contains(r#""newStartTime":"10:00""#));
    }

    #[test]
    fn test_global_search_tolerates_missing_buckets() {
        let json = r#"{"tutors": {"result": []}}"#;
        let results: GlobalSearchResults = serde_json::from_str(json).unwrap();
        assert_eq!(results.hit_count(), 0);
        assert!(results.books.result.is_empty());
    }

    #[test]
    fn test_user_session_notes_optional() {
        let json = r#"{
            "id": 1, "tutorId": 2, "sessionDate": "2024-06-01",
            "startTime": "10:00", "endTime": "11:00",
            "duration": 60, "amount": 30.0, "status": "SCHEDULED"
        }"#;
        let session: UserSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.notes, None);
        assert_eq!(session.status, SessionStatus::Scheduled);
    }
}
