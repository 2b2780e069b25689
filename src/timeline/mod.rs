//! Remote timeline access for feedsweep
//!
//! This module defines the trait and types for talking to the remote
//! social-timeline service:
//! - `Item` is a single posted record with an id and creation timestamp
//! - `TimelineClient` is the interface the scheduler consumes
//! - `HttpTimelineClient` is the reqwest-backed implementation
//!
//! The scheduler only ever needs two operations: list the recent timeline
//! and delete one item by id. Everything else the remote API offers is out
//! of scope.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub mod error;
pub mod http;
#[cfg(test)]
pub mod mock;

pub use error::TimelineError;
pub use http::HttpTimelineClient;

/// Timestamp format used by the remote service for `created_at`,
/// e.g. `Wed Aug 27 09:15:00 +0000 2025`.
pub const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// A single posted item on the remote timeline.
///
/// Two items with the same `id` are the same logical entity; the retention
/// cache holds at most one entry per id. `created_at` is assigned once by
/// the remote service and never changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    /// Unique identifier, stable for the lifetime of the remote record
    pub id: u64,
    /// Creation timestamp in `CREATED_AT_FORMAT`
    pub created_at: String,
    /// Post body, carried only for logging
    #[serde(default)]
    pub text: String,
}

impl Item {
    /// Creates a new item
    pub fn new(id: u64, created_at: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            created_at: created_at.into(),
            text: text.into(),
        }
    }

    /// Parses `created_at` against the fixed service format.
    ///
    /// Returns `None` when the timestamp does not parse; callers treat that
    /// as "age unknown" rather than an error.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_str(&self.created_at, CREATED_AT_FORMAT)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    /// Age of the item relative to `now`, or `None` if the timestamp is
    /// unparseable.
    pub fn age(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.timestamp().map(|t| now.signed_duration_since(t))
    }
}

/// Interface to the remote timeline service.
///
/// Implementations must be Send + Sync so the scheduler can hold them
/// across await points.
#[async_trait::async_trait]
pub trait TimelineClient: Send + Sync {
    /// Fetches the user's recent timeline.
    async fn list_timeline(&self) -> Result<Vec<Item>, TimelineError>;

    /// Deletes a single item by id on the remote service.
    async fn delete_item(&self, id: u64) -> Result<(), TimelineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_parses_service_format() {
        let item = Item::new(1, "Wed Aug 27 09:15:00 +0000 2025", "hello");
        let ts = item.timestamp().unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-08-27T09:15:00+00:00");
    }

    #[test]
    fn test_timestamp_honors_offset() {
        let item = Item::new(1, "Wed Aug 27 09:15:00 +0200 2025", "");
        let ts = item.timestamp().unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-08-27T07:15:00+00:00");
    }

    #[test]
    fn test_timestamp_unparseable_is_none() {
        let item = Item::new(1, "2025-08-27T09:15:00Z", "");
        assert!(item.timestamp().is_none());

        let empty = Item::new(2, "", "");
        assert!(empty.timestamp().is_none());
    }

    #[test]
    fn test_age_relative_to_now() {
        let created = Utc::now() - Duration::days(3);
        let item = Item::new(1, created.format(CREATED_AT_FORMAT).to_string(), "");

        let age = item.age(Utc::now()).unwrap();
        assert!(age >= Duration::days(3));
        assert!(age < Duration::days(3) + Duration::minutes(1));
    }

    #[test]
    fn test_age_unknown_for_bad_timestamp() {
        let item = Item::new(1, "not a timestamp", "");
        assert!(item.age(Utc::now()).is_none());
    }

    #[test]
    fn test_item_deserializes_without_text() {
        let item: Item =
            serde_json::from_str(r#"{"id": 5, "created_at": "Wed Aug 27 09:15:00 +0000 2025"}"#)
                .unwrap();
        assert_eq!(item.id, 5);
        assert!(item.text.is_empty());
    }
}
