use std::fmt;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::types::{
    AvailableSlots, CancelOutcome, Course, GlobalSearchResults, Notification, PageRequest, Paged,
    Profile, RescheduleOutcome, RescheduleRequest, SearchSuggestion, Subject, Tutor, UserSession,
};
use crate::core::search::SearchQuery;

/// Errors that can occur while talking to the platform API.
/// Variants carry enough info to determine retryability (future use).
#[derive(Debug)]
pub enum ApiError {
    /// Client misconfigured (missing token, bad base URL). Not retryable.
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused). Retryable.
    Network(String),
    /// API returned an error response. Retryable if status >= 500 or 429.
    Api { status: u16, message: String },
    /// Failed to parse the response body. Not retryable.
    Parse(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Config(msg) => write!(f, "config error: {msg}"),
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// The platform API surface the client consumes.
///
/// One production implementation exists (`HttpBackend`); tests substitute a
/// stub so flows can be exercised without a server. Implementations must not
/// panic on failure - every error funnels through `ApiError`.
#[async_trait]
pub trait TutoringBackend: Send + Sync {
    /// Returns the name of the backend (for logs).
    fn name(&self) -> &str;

    /// Open slots for one tutor on one date.
    async fn available_slots(
        &self,
        tutor_id: i64,
        date: NaiveDate,
    ) -> Result<AvailableSlots, ApiError>;

    /// The authenticated user's bookings, optionally filtered to one date.
    async fn my_sessions(
        &self,
        page: PageRequest,
        date: Option<NaiveDate>,
    ) -> Result<Paged<UserSession>, ApiError>;

    async fn reschedule_session(
        &self,
        request: &RescheduleRequest,
    ) -> Result<RescheduleOutcome, ApiError>;

    async fn cancel_session(&self, session_id: i64) -> Result<CancelOutcome, ApiError>;

    /// Keyword search across tutors, courses, books, and subjects.
    async fn global_search(&self, query: &SearchQuery) -> Result<GlobalSearchResults, ApiError>;

    async fn search_suggestions(&self, keyword: &str) -> Result<Vec<SearchSuggestion>, ApiError>;

    async fn notifications(&self, page: PageRequest) -> Result<Paged<Notification>, ApiError>;

    async fn tutors(&self, page: PageRequest) -> Result<Paged<Tutor>, ApiError>;

    async fn courses(&self, page: PageRequest) -> Result<Paged<Course>, ApiError>;

    async fn subjects(&self) -> Result<Vec<Subject>, ApiError>;

    async fn tutor_details(&self, tutor_id: i64) -> Result<Tutor, ApiError>;

    async fn course_details(&self, course_id: i64) -> Result<Course, ApiError>;

    async fn me(&self) -> Result<Profile, ApiError>;
}
