//! # Resource slices
//!
//! One [`ResourceState`] per server resource, all obeying the same contract:
//! a fetch replaces `items` wholesale on success and clears any prior error;
//! a rejection clears `loading` and records the message while leaving the
//! previous `items` untouched (stale-on-error). Nothing merges, dedups, or
//! paginates - the notification feed is the one exception and lives in
//! `core::notifications`.
//!
//! Slices are only mutated from `update()` in action.rs, which the event
//! loop invokes serially. No locking is needed.

use crate::api::types::{Course, Subject, Tutor, UserSession};
use crate::core::notifications::NotificationFeed;
use crate::core::profile::ProfileSlice;

/// Cache of exactly the last successful fetch of one resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

impl<T> ResourceState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fetch was dispatched.
    pub fn begin(&mut self) {
        self.loading = true;
    }

    /// The fetch resolved: replace the whole list, clear any prior error.
    pub fn fulfill(&mut self, items: Vec<T>) {
        self.items = items;
        self.loading = false;
        self.error = None;
    }

    /// The fetch failed: keep the stale items, record the message.
    pub fn reject(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }
}

/// Every slice the client keeps across screens. Owned by `App` and threaded
/// through the reducer - there are no module-level store singletons.
#[derive(Default)]
pub struct Store {
    pub tutors: ResourceState<Tutor>,
    pub courses: ResourceState<Course>,
    pub subjects: ResourceState<Subject>,
    pub sessions: ResourceState<UserSession>,
    pub notifications: NotificationFeed,
    pub profile: ProfileSlice,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }
}
