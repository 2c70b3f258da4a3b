//! HTTP implementation of [`TutoringBackend`] over the platform's REST API.
//!
//! All requests share the same discipline: attach `Authorization: Bearer`
//! and a client-generated `X-Request-Id`, send, map non-2xx to
//! `ApiError::Api`, and parse the body into a typed DTO. No timeouts are
//! configured and in-flight requests are never aborted; the flows that care
//! about stale responses discard them by generation instead (see
//! `core::booking`).

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::backend::{ApiError, TutoringBackend};
use super::types::{
    AvailableSlots, CancelOutcome, CancelRequest, Course, GlobalSearchResults, Notification,
    PageRequest, Paged, Profile, RescheduleOutcome, RescheduleRequest, SearchSuggestion, Subject,
    Tutor, UserSession,
};
use crate::core::search::SearchQuery;

pub struct HttpBackend {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: String, token: String) -> Self {
        Self {
            base_url,
            token,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Checks the status and parses the body, mapping failures into the
    /// `ApiError` taxonomy. The error body is surfaced as a single string -
    /// the UI never parses it further.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        debug!("response status: {}", status);

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("API error: {} - {}", status, message);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| {
            warn!("response parse failed: {} (body {} bytes)", e, body.len());
            ApiError::Parse(e.to_string())
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!("GET {} ({} params)", url, query.len());

        let response = self
            .client
            .get(&url)
            .query(query)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("X-Request-Id", uuid::Uuid::new_v4().to_string())
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Self::decode(response).await
    }

    async fn patch_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!("PATCH {}", url);

        let response = self
            .client
            .patch(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("X-Request-Id", uuid::Uuid::new_v4().to_string())
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Self::decode(response).await
    }
}

fn page_params(page: PageRequest) -> Vec<(&'static str, String)> {
    vec![
        ("limit", page.limit.to_string()),
        ("offset", page.offset.to_string()),
    ]
}

#[async_trait]
impl TutoringBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn available_slots(
        &self,
        tutor_id: i64,
        date: NaiveDate,
    ) -> Result<AvailableSlots, ApiError> {
        self.get_json(
            &format!("tutor-availability/available-slots/{tutor_id}/{date}"),
            &[],
        )
        .await
    }

    async fn my_sessions(
        &self,
        page: PageRequest,
        date: Option<NaiveDate>,
    ) -> Result<Paged<UserSession>, ApiError> {
        let mut params = page_params(page);
        if let Some(date) = date {
            params.push(("date", date.to_string()));
        }
        self.get_json("sessions/my-sessions", &params).await
    }

    async fn reschedule_session(
        &self,
        request: &RescheduleRequest,
    ) -> Result<RescheduleOutcome, ApiError> {
        self.patch_json("sessions/reschedule", request).await
    }

    async fn cancel_session(&self, session_id: i64) -> Result<CancelOutcome, ApiError> {
        self.patch_json("sessions/cancel", &CancelRequest { session_id })
            .await
    }

    async fn global_search(&self, query: &SearchQuery) -> Result<GlobalSearchResults, ApiError> {
        self.get_json("global-search", &query.query_params()).await
    }

    async fn search_suggestions(&self, keyword: &str) -> Result<Vec<SearchSuggestion>, ApiError> {
        self.get_json(
            "global-search/suggestions",
            &[("keyword", keyword.to_string())],
        )
        .await
    }

    async fn notifications(&self, page: PageRequest) -> Result<Paged<Notification>, ApiError> {
        self.get_json("notifications", &page_params(page)).await
    }

    async fn tutors(&self, page: PageRequest) -> Result<Paged<Tutor>, ApiError> {
        self.get_json("tutor-details", &page_params(page)).await
    }

    async fn courses(&self, page: PageRequest) -> Result<Paged<Course>, ApiError> {
        self.get_json("course", &page_params(page)).await
    }

    async fn subjects(&self) -> Result<Vec<Subject>, ApiError> {
        self.get_json("subjects", &[]).await
    }

    async fn tutor_details(&self, tutor_id: i64) -> Result<Tutor, ApiError> {
        self.get_json(&format!("tutor-details/{tutor_id}"), &[]).await
    }

    async fn course_details(&self, course_id: i64) -> Result<Course, ApiError> {
        self.get_json(&format!("course/{course_id}"), &[]).await
    }

    async fn me(&self) -> Result<Profile, ApiError> {
        self.get_json("users/me", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let backend = HttpBackend::new("https://api.example.com/v1/".to_string(), "t".to_string());
        assert_eq!(
            backend.url("sessions/my-sessions"),
            "https://api.example.com/v1/sessions/my-sessions"
        );
    }

    #[test]
    fn test_slot_path_embeds_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let path = format!("tutor-availability/available-slots/{}/{}", 7, date);
        assert_eq!(path, "tutor-availability/available-slots/7/2024-06-01");
    }

    #[test]
    fn test_page_params() {
        let params = page_params(PageRequest {
            limit: 20,
            offset: 40,
        });
        assert_eq!(params[0], ("limit", "20".to_string()));
        assert_eq!(params[1], ("offset", "40".to_string()));
    }
}
