// # PowerDNS Zone Transport
//
// This crate provides the PowerDNS implementation of `ZoneTransport` for the
// ENUM sync system.
//
// ## Scope
//
// - One PATCH request per (endpoint, zone) batch handed over by the engine
// - HTTP timeout of 10 seconds
// - Status 200 and 204 are success; everything else is an API error with the
//   response body kept verbatim
// - Dry-run mode: log the intended request, send nothing
// - No retry, no caching, no background tasks: failure policy belongs to
//   `EnumEngine`
//
// ## Security Requirements
//
// - API key NEVER appears in logs or Debug output
//
// ## API Reference
//
// - PowerDNS Authoritative HTTP API: https://doc.powerdns.com/authoritative/http-api/
// - Patch zone: PATCH `/api/v1/servers/:server_id/zones/:zone_id`

use async_trait::async_trait;
use enum_core::config::EndpointConfig;
use enum_core::record::RrsetChange;
use enum_core::traits::ZoneTransport;
use enum_core::{Error, Result};
use serde::Serialize;
use std::time::Duration;

/// HTTP timeout for API requests (10 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Header carrying the PowerDNS API key
const API_KEY_HEADER: &str = "X-API-Key";

/// PATCH request body
#[derive(Debug, Serialize)]
struct ZonePatch<'a> {
    rrsets: &'a [RrsetChange],
}

/// PowerDNS zone transport
///
/// Stateless apart from the pooled HTTP client; endpoint URL and API key come
/// with every call, so one transport serves every configured endpoint.
///
/// # Dry-Run Mode
///
/// When `dry_run` is true the transport logs the URL and payload it would
/// send and reports success without touching the network.
pub struct PowerDnsTransport {
    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, log the PATCH instead of sending it
    dry_run: bool,
}

impl std::fmt::Debug for PowerDnsTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PowerDnsTransport")
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl PowerDnsTransport {
    /// Create a new PowerDNS transport
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built
    /// (for example when no TLS backend is available).
    pub fn new(dry_run: bool) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, dry_run })
    }

    /// Create a transport that sends requests
    pub fn new_live() -> Result<Self> {
        Self::new(false)
    }

    /// Create a transport that only logs what it would send
    pub fn new_dry_run() -> Result<Self> {
        Self::new(true)
    }

    /// Whether this transport is in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

/// Zone endpoint URL for `endpoint` and `zone`
///
/// A trailing slash on the configured URL is ignored.
pub fn zone_url(endpoint: &EndpointConfig, zone: &str) -> String {
    format!(
        "{}/api/v1/servers/{}/zones/{}",
        endpoint.url.trim_end_matches('/'),
        endpoint.server_id,
        zone
    )
}

#[async_trait]
impl ZoneTransport for PowerDnsTransport {
    /// Send one PATCH carrying every change for `zone`
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Status 200 or 204 (or dry-run)
    /// - `Err(Error::Api)`: Any other status; body kept verbatim
    /// - `Err(Error::Request)`: No response (connect failure, timeout, ...)
    async fn apply(&self, endpoint: &EndpointConfig, zone: &str, changes: &[RrsetChange]) -> Result<()> {
        let url = zone_url(endpoint, zone);
        let payload = ZonePatch { rrsets: changes };

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PATCH request to {} with payload: {}",
                url,
                serde_json::to_string(&payload)?
            );
            return Ok(());
        }

        tracing::debug!("PATCH {} ({} rrsets)", url, changes.len());

        let response = self
            .client
            .patch(&url)
            .header(API_KEY_HEADER, &endpoint.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::request(e.to_string()))?;

        let status = response.status().as_u16();
        match status {
            200 | 204 => Ok(()),
            _ => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read error response".to_string());
                Err(Error::api(status, body))
            }
        }
    }

    fn transport_name(&self) -> &'static str {
        "powerdns"
    }
}
