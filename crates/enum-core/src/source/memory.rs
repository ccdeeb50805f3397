// # Memory Subscriber Source
//
// In-memory implementation of SubscriberSource.
//
// ## When to Use
//
// - Testing environments
// - Embedding the engine in a host that already holds its subscribers
// - Reconciling a one-off list handed over by an API call

use std::sync::Arc;
use tokio::sync::RwLock;
use async_trait::async_trait;

use crate::traits::subscriber_source::{SubscriberRecord, SubscriberSource};
use crate::Error;

/// In-memory subscriber source
///
/// Subscribers are kept in insertion order; pages are contiguous slices of
/// that order.
///
/// # Example
///
/// ```rust,no_run
/// use enum_core::source::MemorySubscriberSource;
/// use enum_core::traits::{SubscriberRecord, SubscriberSource};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let source = MemorySubscriberSource::new();
///     source.push(SubscriberRecord::new(1, Some("+491721234567"), None)).await;
///
///     let page = source.get_page(0, 100).await?;
///     assert_eq!(page.len(), 1);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySubscriberSource {
    inner: Arc<RwLock<Vec<SubscriberRecord>>>,
}

impl MemorySubscriberSource {
    /// Create a new empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source holding `subscribers`
    pub fn from_records(subscribers: Vec<SubscriberRecord>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(subscribers)),
        }
    }

    /// Append a subscriber
    pub async fn push(&self, subscriber: SubscriberRecord) {
        self.inner.write().await.push(subscriber);
    }

    /// Get the number of subscribers
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the source is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

/// Slice one page out of `subscribers`; out-of-range pages are empty
pub(crate) fn page_of(subscribers: &[SubscriberRecord], page: usize, page_size: usize) -> Vec<SubscriberRecord> {
    let Some(start) = page.checked_mul(page_size) else {
        return Vec::new();
    };
    if start >= subscribers.len() {
        return Vec::new();
    }
    let end = start.saturating_add(page_size).min(subscribers.len());
    subscribers[start..end].to_vec()
}

#[async_trait]
impl SubscriberSource for MemorySubscriberSource {
    async fn get_page(&self, page: usize, page_size: usize) -> Result<Vec<SubscriberRecord>, Error> {
        let guard = self.inner.read().await;
        Ok(page_of(&guard, page, page_size))
    }
}
