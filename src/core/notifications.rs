//! # Notification feed
//!
//! The one slice with incremental pagination: "load more" appends the next
//! offset page to the list, a plain refresh replaces it. `has_more` is
//! recomputed after every fulfillment as `items.len() < total`.

use crate::api::types::{Notification, Paged};

#[derive(Debug, Default)]
pub struct NotificationFeed {
    pub items: Vec<Notification>,
    pub loading: bool,
    pub error: Option<String>,
    pub total: u64,
    pub has_more: bool,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) {
        self.loading = true;
    }

    /// Offset for the next "load more" page.
    pub fn next_offset(&self) -> u32 {
        self.items.len() as u32
    }

    /// A page arrived. Appends only when the dispatch explicitly asked for
    /// more; otherwise replaces the list wholesale.
    pub fn fulfill(&mut self, page: Paged<Notification>, append: bool) {
        if append {
            self.items.extend(page.result);
        } else {
            self.items = page.result;
        }
        self.total = page.total;
        self.has_more = (self.items.len() as u64) < self.total;
        self.loading = false;
        self.error = None;
    }

    /// Same stale-on-error policy as every other slice.
    pub fn reject(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(id: i64) -> Notification {
        Notification {
            id,
            title: format!("note {id}"),
            body: "body".to_string(),
            is_read: false,
            created_at: "2024-06-01T10:00:00Z".to_string(),
        }
    }

    fn page(ids: &[i64], total: u64) -> Paged<Notification> {
        Paged {
            result: ids.iter().copied().map(notification).collect(),
            total,
        }
    }

    #[test]
    fn test_refresh_replaces_list() {
        let mut feed = NotificationFeed::new();
        feed.fulfill(page(&[1, 2], 5), false);
        feed.fulfill(page(&[3, 4], 5), false);
        assert_eq!(feed.items.len(), 2);
        assert_eq!(feed.items[0].id, 3);
    }

    #[test]
    fn test_load_more_appends_and_length_is_monotonic() {
        let mut feed = NotificationFeed::new();
        feed.fulfill(page(&[1, 2], 5), false);
        let mut last_len = feed.items.len();

        for ids in [&[3, 4][..], &[5][..]] {
            feed.fulfill(page(ids, 5), true);
            assert!(feed.items.len() >= last_len);
            last_len = feed.items.len();
        }

        let ids: Vec<i64> = feed.items.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_has_more_flips_exactly_at_total() {
        let mut feed = NotificationFeed::new();
        feed.fulfill(page(&[1, 2], 3), false);
        assert!(feed.has_more);
        assert_eq!(feed.next_offset(), 2);

        feed.fulfill(page(&[3], 3), true);
        assert!(!feed.has_more);
        assert_eq!(feed.items.len() as u64, feed.total);
    }

    #[test]
    fn test_reject_keeps_items() {
        let mut feed = NotificationFeed::new();
        feed.fulfill(page(&[1], 1), false);
        feed.begin();
        feed.reject("API error (HTTP 500): oops".to_string());
        assert_eq!(feed.items.len(), 1);
        assert!(feed.error.is_some());
        assert!(!feed.loading);
    }
}
