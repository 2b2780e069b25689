//! Mock timeline client for testing
//!
//! Allows configuring the items returned by `list_timeline`, simulating
//! list failures, and failing deletes for specific ids, without making any
//! network calls.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::timeline::{Item, TimelineClient, TimelineError};

/// Mock client with configurable responses and call tracking
#[derive(Clone, Default)]
pub struct MockTimelineClient {
    /// Items returned by `list_timeline`
    items: Arc<Mutex<Vec<Item>>>,
    /// Error to return from `list_timeline` instead of the items
    list_error: Arc<Mutex<Option<TimelineError>>>,
    /// Ids whose deletes fail
    failing_deletes: Arc<Mutex<HashSet<u64>>>,
    /// Ids successfully deleted so far, in call order
    deleted: Arc<Mutex<Vec<u64>>>,
    /// Number of `list_timeline` calls
    list_calls: Arc<Mutex<usize>>,
}

impl MockTimelineClient {
    /// Creates a mock with an empty timeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the items returned by `list_timeline`
    pub fn set_items(&self, items: Vec<Item>) {
        *self.items.lock().unwrap() = items;
    }

    /// Makes `list_timeline` return the given error
    pub fn set_list_error(&self, error: TimelineError) {
        *self.list_error.lock().unwrap() = Some(error);
    }

    /// Makes `delete_item` fail for the given id
    pub fn fail_delete(&self, id: u64) {
        self.failing_deletes.lock().unwrap().insert(id);
    }

    /// Ids deleted so far
    pub fn deleted(&self) -> Vec<u64> {
        self.deleted.lock().unwrap().clone()
    }

    /// Number of `list_timeline` calls so far
    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl TimelineClient for MockTimelineClient {
    async fn list_timeline(&self) -> Result<Vec<Item>, TimelineError> {
        *self.list_calls.lock().unwrap() += 1;
        if let Some(err) = self.list_error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.items.lock().unwrap().clone())
    }

    async fn delete_item(&self, id: u64) -> Result<(), TimelineError> {
        if self.failing_deletes.lock().unwrap().contains(&id) {
            return Err(TimelineError::Api {
                status: 500,
                message: format!("delete failed for item {}", id),
            });
        }
        self.deleted.lock().unwrap().push(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_configured_items() {
        let mock = MockTimelineClient::new();
        mock.set_items(vec![Item::new(1, "Wed Aug 27 09:15:00 +0000 2025", "hi")]);

        let items = mock.list_timeline().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(mock.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_list_error() {
        let mock = MockTimelineClient::new();
        mock.set_list_error(TimelineError::Timeout);

        assert_eq!(mock.list_timeline().await.unwrap_err(), TimelineError::Timeout);
    }

    #[tokio::test]
    async fn test_mock_failing_delete() {
        let mock = MockTimelineClient::new();
        mock.fail_delete(7);

        assert!(mock.delete_item(7).await.is_err());
        assert!(mock.delete_item(8).await.is_ok());
        assert_eq!(mock.deleted(), vec![8]);
    }
}
