// # Subscriber Source Trait
//
// Defines the read-only paging interface over the subscriber population used
// by the reconciliation sweep.
//
// ## Implementations
//
// - In-memory: `MemorySubscriberSource`
// - JSON export on disk: `FileSubscriberSource`
// - Database-backed sources live with the host application
//
// ## Usage
//
// ```rust,ignore
// use enum_core::SubscriberSource;
//
// let mut page = 0;
// loop {
//     let batch = source.get_page(page, 100).await?;
//     if batch.is_empty() {
//         break;
//     }
//     page += 1;
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The subset of a subscriber the engine reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriberRecord {
    /// Stable identifier, used in diagnostics only
    #[serde(alias = "ims_subscriber_id")]
    pub subscriber_id: u64,

    /// Primary MSISDN, raw as stored
    #[serde(default)]
    pub msisdn: Option<String>,

    /// Additional MSISDNs, comma-separated, raw as stored
    #[serde(default)]
    pub msisdn_list: Option<String>,
}

impl SubscriberRecord {
    /// Create a new subscriber record
    pub fn new(subscriber_id: u64, msisdn: Option<&str>, msisdn_list: Option<&str>) -> Self {
        Self {
            subscriber_id,
            msisdn: msisdn.map(str::to_string),
            msisdn_list: msisdn_list.map(str::to_string),
        }
    }
}

/// Trait for subscriber stores
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// ## Paging Contract
///
/// - `page` is 0-based
/// - Pages are returned in a stable order
/// - An empty page means the end of the population
#[async_trait]
pub trait SubscriberSource: Send + Sync {
    /// Fetch one page of subscribers
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<SubscriberRecord>)`: Up to `page_size` subscribers (empty at the end)
    /// - `Err(Error)`: The store could not be read
    async fn get_page(
        &self,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<SubscriberRecord>, crate::Error>;
}
