pub mod backend;
pub mod http;
pub mod types;

pub use backend::{ApiError, TutoringBackend};
pub use http::HttpBackend;
pub use types::{
    AvailableSlots, Book, CancelOutcome, CancelRequest, Course, GlobalSearchResults, Notification,
    PageRequest, Paged, Profile, RescheduleOutcome, RescheduleRequest, SearchBucket,
    SearchSuggestion, SessionSchedule, SessionStatus, Subject, TimeSlot, Tutor, UserSession,
};
