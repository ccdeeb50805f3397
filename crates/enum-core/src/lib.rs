// # enum-core
//
// Core library for keeping ENUM (RFC 6116) NAPTR records in authoritative
// DNS backends consistent with the MSISDNs of subscribers.
//
// ## Architecture Overview
//
// - **msisdn**: Normalizes raw phone numbers and parses "primary + list" fields
// - **record**: Builds ENUM names and NAPTR record-set changes
// - **ZoneTransport**: Trait for submitting record-set changes to one backend zone
// - **SubscriberSource**: Trait for paging through the subscriber population
// - **EnumEngine**: Create / delete / update fan-out and the reconciliation sweep
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Engine logic is separate from backend implementations
// 2. **Ordered Fan-Out**: Endpoints and domains are processed in configured order
// 3. **Values, Not State**: Every operation returns a report value; the engine keeps nothing
// 4. **Library-First**: The daemon is a thin wrapper around this crate

pub mod msisdn;
pub mod record;
pub mod traits;
pub mod engine;
pub mod config;
pub mod error;
pub mod source;

// Re-export core types for convenience
pub use traits::{SubscriberSource, ZoneTransport};
pub use engine::{EnumEngine, ReconcileReport, SyncReport, SyncStatus, UpdateReport};
pub use config::{EndpointConfig, EnumConfig, ReconcileConfig};
pub use error::{Error, Result};
pub use msisdn::MsisdnSet;
pub use source::{FileSubscriberSource, MemorySubscriberSource};
