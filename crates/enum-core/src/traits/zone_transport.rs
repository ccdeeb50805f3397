// # Zone Transport Trait
//
// Defines the interface for submitting record-set changes to one zone of one
// DNS management backend.
//
// ## Implementations
//
// - PowerDNS HTTP API: `enum-provider-powerdns` crate
//
// ## Usage
//
// ```rust,ignore
// use enum_core::ZoneTransport;
// use enum_core::record::RrsetChange;
//
// let changes = vec![RrsetChange::delete("491721234567", "e164.arpa")];
// transport.apply(&endpoint, "e164.arpa", &changes).await?;
// ```

use async_trait::async_trait;

use crate::config::EndpointConfig;
use crate::record::RrsetChange;

/// Trait for DNS management backends
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// ## Contract
///
/// - One call submits **all** `changes` for the zone in a single request
/// - Success means the backend accepted the whole batch
/// - Any other outcome is an `Err` whose `Display` is a human-readable
///   detail (status code and response body, or the transport failure text)
/// - No retry and no backoff: a failed call is final for that attempt
/// - No state kept between calls
#[async_trait]
pub trait ZoneTransport: Send + Sync {
    /// Apply record-set changes to `zone` on `endpoint`
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Backend to talk to (URL, credentials)
    /// - `zone`: Zone name exactly as configured
    /// - `changes`: Record-set mutations, submitted together
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Backend accepted the changes
    /// - `Err(Error)`: Non-success status or transport failure
    async fn apply(
        &self,
        endpoint: &EndpointConfig,
        zone: &str,
        changes: &[RrsetChange],
    ) -> Result<(), crate::Error>;

    /// Get the transport name (for logging/debugging)
    fn transport_name(&self) -> &'static str;
}
