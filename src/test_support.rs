//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::api::backend::{ApiError, TutoringBackend};
use crate::api::types::{
    AvailableSlots, CancelOutcome, Course, GlobalSearchResults, Notification, PageRequest, Paged,
    Profile, RescheduleOutcome, RescheduleRequest, SearchSuggestion, Subject, Tutor, UserSession,
};
use crate::core::search::SearchQuery;

/// A backend stub for tests that never touch the network. Reads resolve to
/// empty collections; writes fail - reducer tests feed results in as
/// actions instead of calling through.
pub struct StubBackend;

#[async_trait]
impl TutoringBackend for StubBackend {
    fn name(&self) -> &str {
        "stub"
    }

    async fn available_slots(
        &self,
        tutor_id: i64,
        date: NaiveDate,
    ) -> Result<AvailableSlots, ApiError> {
        Ok(AvailableSlots {
            tutor_id,
            date,
            session_duration: 0,
            buffer_time: 0,
            total_slots: 0,
            slots: vec![],
        })
    }

    async fn my_sessions(
        &self,
        _page: PageRequest,
        _date: Option<NaiveDate>,
    ) -> Result<Paged<UserSession>, ApiError> {
        Ok(Paged {
            result: vec![],
            total: 0,
        })
    }

    async fn reschedule_session(
        &self,
        _request: &RescheduleRequest,
    ) -> Result<RescheduleOutcome, ApiError> {
        Err(ApiError::Network("stub backend".to_string()))
    }

    async fn cancel_session(&self, _session_id: i64) -> Result<CancelOutcome, ApiError> {
        Err(ApiError::Network("stub backend".to_string()))
    }

    async fn global_search(&self, _query: &SearchQuery) -> Result<GlobalSearchResults, ApiError> {
        Ok(GlobalSearchResults::default())
    }

    async fn search_suggestions(&self, _keyword: &str) -> Result<Vec<SearchSuggestion>, ApiError> {
        Ok(vec![])
    }

    async fn notifications(&self, _page: PageRequest) -> Result<Paged<Notification>, ApiError> {
        Ok(Paged {
            result: vec![],
            total: 0,
        })
    }

    async fn tutors(&self, _page: PageRequest) -> Result<Paged<Tutor>, ApiError> {
        Ok(Paged {
            result: vec![],
            total: 0,
        })
    }

    async fn courses(&self, _page: PageRequest) -> Result<Paged<Course>, ApiError> {
        Ok(Paged {
            result: vec![],
            total: 0,
        })
    }

    async fn subjects(&self) -> Result<Vec<Subject>, ApiError> {
        Ok(vec![])
    }

    async fn tutor_details(&self, _tutor_id: i64) -> Result<Tutor, ApiError> {
        Err(ApiError::Network("stub backend".to_string()))
    }

    async fn course_details(&self, _course_id: i64) -> Result<Course, ApiError> {
        Err(ApiError::Network("stub backend".to_string()))
    }

    async fn me(&self) -> Result<Profile, ApiError> {
        Err(ApiError::Network("stub backend".to_string()))
    }
}

/// Creates a test App with a StubBackend.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(Arc::new(StubBackend), 20)
}
