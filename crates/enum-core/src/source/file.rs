// # File Subscriber Source
//
// Subscriber source backed by a JSON export of the subscriber store.
//
// ## Purpose
//
// Lets the daemon run a reconciliation sweep without a live connection to
// the subscriber database: the store is exported, the sweep reads the file.
//
// ## File Format
//
// Either a bare array, or a versioned envelope:
//
// ```json
// {
//   "version": "1.0",
//   "subscribers": [
//     { "ims_subscriber_id": 1, "msisdn": "491721234567", "msisdn_list": "491721234568" }
//   ]
// }
// ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;

use crate::Error;
use crate::source::memory::page_of;
use crate::traits::subscriber_source::{SubscriberRecord, SubscriberSource};

/// Export file format version
const EXPORT_FILE_VERSION: &str = "1.0";

/// Subscriber source reading a JSON export
///
/// The file is read once on construction and again on [`reload`](Self::reload).
/// Paging works on the loaded snapshot, so a sweep sees a consistent population
/// even if the file is replaced mid-sweep.
///
/// # Example
///
/// ```rust,no_run
/// use enum_core::source::FileSubscriberSource;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let source = FileSubscriberSource::new("/var/lib/enum/subscribers.json").await?;
///     println!("{} subscribers", source.len().await);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FileSubscriberSource {
    path: PathBuf,
    subscribers: Arc<RwLock<Vec<SubscriberRecord>>>,
}

/// Serializable export file format
#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
enum ExportFileFormat {
    Envelope {
        version: String,
        subscribers: Vec<SubscriberRecord>,
    },
    Bare(Vec<SubscriberRecord>),
}

impl FileSubscriberSource {
    /// Load a subscriber export
    ///
    /// Unlike a state file there is nothing to recover from: a missing or
    /// unparsable export is an error.
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let subscribers = Self::load(&path).await?;

        tracing::debug!(
            "Loaded {} subscribers from {}",
            subscribers.len(),
            path.display()
        );

        Ok(Self {
            path,
            subscribers: Arc::new(RwLock::new(subscribers)),
        })
    }

    /// Re-read the export file, replacing the loaded snapshot
    ///
    /// On error the previous snapshot is kept.
    pub async fn reload(&self) -> Result<usize, Error> {
        let subscribers = Self::load(&self.path).await?;
        let count = subscribers.len();
        *self.subscribers.write().await = subscribers;
        tracing::info!("Reloaded {} subscribers from {}", count, self.path.display());
        Ok(count)
    }

    /// Get the number of loaded subscribers
    pub async fn len(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// Check if no subscribers are loaded
    pub async fn is_empty(&self) -> bool {
        self.subscribers.read().await.is_empty()
    }

    /// Path of the export file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(path: &Path) -> Result<Vec<SubscriberRecord>, Error> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            Error::subscriber_source(format!(
                "Failed to read subscriber export {}: {}",
                path.display(),
                e
            ))
        })?;

        let export: ExportFileFormat = serde_json::from_str(&content).map_err(|e| {
            Error::subscriber_source(format!(
                "Failed to parse subscriber export {}: {}",
                path.display(),
                e
            ))
        })?;

        match export {
            ExportFileFormat::Envelope { version, subscribers } => {
                if version != EXPORT_FILE_VERSION {
                    tracing::warn!(
                        "Subscriber export version mismatch: expected {}, got {}. \
                        Attempting to load anyway.",
                        EXPORT_FILE_VERSION,
                        version
                    );
                }
                Ok(subscribers)
            }
            ExportFileFormat::Bare(subscribers) => Ok(subscribers),
        }
    }
}

#[async_trait]
impl SubscriberSource for FileSubscriberSource {
    async fn get_page(&self, page: usize, page_size: usize) -> Result<Vec<SubscriberRecord>, Error> {
        let guard = self.subscribers.read().await;
        Ok(page_of(&guard, page, page_size))
    }
}
