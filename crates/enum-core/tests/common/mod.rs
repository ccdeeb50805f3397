//! Test doubles and common utilities for engine contract tests
//!
//! This module provides minimal test doubles that record how the engine
//! drives its collaborators without talking to a real backend.

#![allow(dead_code)]

use enum_core::config::{EndpointConfig, EnumConfig};
use enum_core::error::{Error, Result};
use enum_core::record::{to_enum_name, RrsetChange};
use enum_core::traits::{SubscriberRecord, SubscriberSource, ZoneTransport};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One recorded transport call
#[derive(Debug, Clone)]
pub struct TransportCall {
    pub endpoint: String,
    pub zone: String,
    pub changes: Vec<RrsetChange>,
}

/// A mock ZoneTransport that tracks calls and fails on demand
pub struct MockTransport {
    /// Call counter for apply()
    apply_call_count: Arc<AtomicUsize>,
    /// Recorded calls, in order
    calls: Arc<Mutex<Vec<TransportCall>>>,
    /// (endpoint name, zone) pairs that fail
    failing_targets: Vec<(String, String)>,
    /// MSISDNs whose presence in a batch makes the call fail
    failing_msisdns: Vec<String>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            apply_call_count: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(Mutex::new(Vec::new())),
            failing_targets: Vec::new(),
            failing_msisdns: Vec::new(),
        }
    }

    /// Fail every call to `zone` on the endpoint named `endpoint`
    pub fn failing_on(mut self, endpoint: &str, zone: &str) -> Self {
        self.failing_targets
            .push((endpoint.to_string(), zone.to_string()));
        self
    }

    /// Fail every call whose batch contains `msisdn`
    pub fn failing_for_msisdn(mut self, msisdn: &str) -> Self {
        self.failing_msisdns.push(msisdn.to_string());
        self
    }

    /// Get the number of times apply() was called
    pub fn apply_call_count(&self) -> usize {
        self.apply_call_count.load(Ordering::SeqCst)
    }

    /// Get the recorded calls
    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Create a new MockTransport that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            apply_call_count: Arc::clone(&other.apply_call_count),
            calls: Arc::clone(&other.calls),
            failing_targets: other.failing_targets.clone(),
            failing_msisdns: other.failing_msisdns.clone(),
        }
    }
}

#[async_trait::async_trait]
impl ZoneTransport for MockTransport {
    async fn apply(&self, endpoint: &EndpointConfig, zone: &str, changes: &[RrsetChange]) -> Result<()> {
        self.apply_call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(TransportCall {
            endpoint: endpoint.display_name().to_string(),
            zone: zone.to_string(),
            changes: changes.to_vec(),
        });

        let target_fails = self
            .failing_targets
            .iter()
            .any(|(e, z)| e == endpoint.display_name() && z == zone);
        let msisdn_fails = self.failing_msisdns.iter().any(|m| {
            let name = format!("{}.", to_enum_name(m, zone));
            changes.iter().any(|c| c.name == name)
        });

        if target_fails || msisdn_fails {
            return Err(Error::api(500, "Internal Server Error"));
        }
        Ok(())
    }

    fn transport_name(&self) -> &'static str {
        "mock"
    }
}

/// A subscriber source that counts page requests
pub struct CountingSource {
    subscribers: Vec<SubscriberRecord>,
    /// Sizes of the pages handed out, in request order
    served: Arc<Mutex<Vec<usize>>>,
    /// Page index at which get_page() fails
    fail_at_page: Option<usize>,
    /// Serve the same non-empty page forever
    endless: bool,
}

impl CountingSource {
    /// `count` subscribers with ids 1..=count and one MSISDN each
    pub fn with_subscribers(count: u64) -> Self {
        Self {
            subscribers: (1..=count).map(subscriber).collect(),
            served: Arc::new(Mutex::new(Vec::new())),
            fail_at_page: None,
            endless: false,
        }
    }

    /// Fail with a source error when `page` is requested
    pub fn failing_at_page(mut self, page: usize) -> Self {
        self.fail_at_page = Some(page);
        self
    }

    /// Never return an empty page
    pub fn endless(mut self) -> Self {
        self.endless = true;
        self
    }

    /// Number of get_page() calls
    pub fn page_requests(&self) -> usize {
        self.served.lock().unwrap().len()
    }

    /// Sizes of the pages served, in order
    pub fn served_sizes(&self) -> Vec<usize> {
        self.served.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SubscriberSource for CountingSource {
    async fn get_page(&self, page: usize, page_size: usize) -> Result<Vec<SubscriberRecord>> {
        if self.fail_at_page == Some(page) {
            return Err(Error::subscriber_source("database connection lost"));
        }

        let batch: Vec<SubscriberRecord> = if self.endless {
            self.subscribers.iter().take(page_size).cloned().collect()
        } else {
            self.subscribers
                .iter()
                .skip(page * page_size)
                .take(page_size)
                .cloned()
                .collect()
        };

        self.served.lock().unwrap().push(batch.len());
        Ok(batch)
    }
}

/// MSISDN used for subscriber `id`
pub fn msisdn_for(id: u64) -> String {
    format!("4917200{:05}", id)
}

/// Subscriber `id` with its MSISDN
pub fn subscriber(id: u64) -> SubscriberRecord {
    SubscriberRecord::new(id, Some(msisdn_for(id).as_str()), None)
}

/// Endpoint named `name` serving `domains`
pub fn endpoint(name: &str, domains: &[&str]) -> EndpointConfig {
    let mut endpoint = EndpointConfig::new(
        format!("http://{}.example.org:8081", name),
        "test-key",
        "ims.mnc001.mcc001.3gppnetwork.org",
    )
    .with_name(name);
    for domain in domains {
        endpoint = endpoint.with_domain(*domain);
    }
    endpoint
}

/// Enabled config with one endpoint `ns1` serving `e164.arpa`
pub fn minimal_config() -> EnumConfig {
    EnumConfig::new()
        .with_enabled(true)
        .with_endpoint(endpoint("ns1", &["e164.arpa"]))
}

/// Enabled config with `ns1` and `ns2`, each serving two zones
pub fn two_endpoint_config() -> EnumConfig {
    EnumConfig::new()
        .with_enabled(true)
        .with_endpoint(endpoint("ns1", &["e164.arpa", "e164.example.org"]))
        .with_endpoint(endpoint("ns2", &["e164.arpa", "e164.example.org"]))
}
