//! Core traits for the ENUM sync system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`ZoneTransport`]: Submit record-set changes to a DNS management backend
//! - [`SubscriberSource`]: Page through the subscriber population

pub mod zone_transport;
pub mod subscriber_source;

pub use zone_transport::ZoneTransport;
pub use subscriber_source::{SubscriberRecord, SubscriberSource};
