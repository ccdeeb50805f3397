//! Core ENUM engine
//!
//! The EnumEngine is responsible for:
//! - Parsing subscriber MSISDN fields into a number set
//! - Fanning record-set changes out to every endpoint and domain
//! - Aggregating per-target outcomes into one report
//! - Enforcing the strict/lenient failure policy
//! - Driving the paginated reconciliation sweep (see [`reconcile`])
//!
//! ## Architecture
//!
//! ```text
//!  create / delete / update          reconcile_all
//!            │                            │
//!            ▼                            ▼
//!     ┌──────────────┐           ┌──────────────────┐
//!     │  EnumEngine  │◀──create──│ SubscriberSource │
//!     └──────────────┘           └──────────────────┘
//!            │
//!            │  for endpoint in endpoints
//!            │    for domain in endpoint.domains
//!            ▼
//!     ┌──────────────┐
//!     │ZoneTransport │──── one PATCH per (endpoint, domain)
//!     └──────────────┘
//! ```
//!
//! ## Failure Policy
//!
//! Every failed attempt is recorded in the report. In strict mode the first
//! failure additionally ends the call with [`Error::StrictMode`]; later
//! endpoints and domains are not attempted.
//!
//! Update runs its delete phase before its create phase. A strict-mode abort
//! during the delete phase propagates immediately, so the create phase of
//! that update is not attempted.

pub mod reconcile;
pub mod report;

pub use report::{
    DomainOutcome, EndpointReport, ReconcileReport, SubscriberOutcome, SyncReport, SyncStatus,
    UpdateReport,
};

use crate::config::{EndpointConfig, EnumConfig};
use crate::error::{Error, Result};
use crate::msisdn::{self, MsisdnSet};
use crate::record::{NaptrRule, RrsetChange};
use crate::traits::ZoneTransport;
use tracing::{debug, error, info};

/// Log target for every engine event
pub const LOG_TARGET: &str = "enum";

/// Record-set operation applied to every (endpoint, domain) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncOp {
    Create,
    Delete,
}

impl SyncOp {
    fn name(self) -> &'static str {
        match self {
            SyncOp::Create => "create",
            SyncOp::Delete => "delete",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            SyncOp::Create => "creation",
            SyncOp::Delete => "deletion",
        }
    }

    fn past(self) -> &'static str {
        match self {
            SyncOp::Create => "created",
            SyncOp::Delete => "deleted",
        }
    }
}

/// Core ENUM engine
///
/// Holds the validated configuration and the transport. It keeps no state
/// between calls: every operation returns a fresh report value.
///
/// ## Ordering
///
/// Endpoints are processed in configured order, domains within an endpoint
/// in configured order, and MSISDNs within a batch in parsed order. Strict
/// mode relies on this: the *first* failing pair aborts the rest.
pub struct EnumEngine {
    /// Transport used for every backend call
    transport: Box<dyn ZoneTransport>,

    /// Validated configuration
    config: EnumConfig,

    /// NAPTR order/preference derived from the configuration
    rule: NaptrRule,
}

impl EnumEngine {
    /// Create a new ENUM engine
    ///
    /// # Parameters
    ///
    /// - `transport`: Backend transport implementation
    /// - `config`: ENUM configuration (validated here, once)
    pub fn new(transport: Box<dyn ZoneTransport>, config: EnumConfig) -> Result<Self> {
        config.validate()?;

        if config.enabled {
            info!(
                target: LOG_TARGET,
                "ENUM engine using {} transport for {} endpoint(s)",
                transport.transport_name(),
                config.endpoints.len()
            );
        } else {
            info!(target: LOG_TARGET, "ENUM management is disabled");
        }

        let rule = NaptrRule::new(config.naptr_order, config.naptr_preference);

        Ok(Self {
            transport,
            config,
            rule,
        })
    }

    /// The configuration this engine was built with
    pub fn config(&self) -> &EnumConfig {
        &self.config
    }

    /// Whether ENUM management is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Publish NAPTR records for a subscriber's MSISDNs on every endpoint
    ///
    /// # Parameters
    ///
    /// - `msisdn`: Primary MSISDN
    /// - `msisdn_list`: Comma-separated additional MSISDNs
    ///
    /// # Returns
    ///
    /// - `Ok(SyncReport)`: `disabled`, `no_msisdns`, `ok` or `partial`
    /// - `Err(Error::StrictMode)`: Strict mode is on and an attempt failed
    pub async fn create(&self, msisdn: Option<&str>, msisdn_list: Option<&str>) -> Result<SyncReport> {
        self.run_operation(SyncOp::Create, msisdn, msisdn_list).await
    }

    /// Remove NAPTR records for a subscriber's MSISDNs on every endpoint
    ///
    /// Same return contract as [`EnumEngine::create`].
    pub async fn delete(&self, msisdn: Option<&str>, msisdn_list: Option<&str>) -> Result<SyncReport> {
        self.run_operation(SyncOp::Delete, msisdn, msisdn_list).await
    }

    /// Bring ENUM records in line with a change of a subscriber's MSISDNs
    ///
    /// Numbers only in the old set are deleted, numbers only in the new set
    /// are created. Numbers in both are left alone.
    ///
    /// # Returns
    ///
    /// - `Ok(UpdateReport)`: `disabled`, `ok` or `partial` (errors of both phases merged)
    /// - `Err(Error::StrictMode)`: Strict mode is on and an attempt failed;
    ///   a delete-phase abort skips the create phase
    pub async fn update(
        &self,
        old_msisdn: Option<&str>,
        old_msisdn_list: Option<&str>,
        new_msisdn: Option<&str>,
        new_msisdn_list: Option<&str>,
    ) -> Result<UpdateReport> {
        if !self.config.enabled {
            debug!(target: LOG_TARGET, "ENUM management is disabled, skipping update");
            return Ok(UpdateReport::with_status(SyncStatus::Disabled));
        }

        let old_set = msisdn::parse_all(old_msisdn, old_msisdn_list);
        let new_set = msisdn::parse_all(new_msisdn, new_msisdn_list);

        let to_delete = old_set.difference(&new_set);
        let to_create = new_set.difference(&old_set);

        info!(target: LOG_TARGET, "ENUM update: delete {}, create {}", to_delete, to_create);

        let mut report = UpdateReport::with_status(SyncStatus::Ok);

        if !to_delete.is_empty() {
            let phase = self.fan_out(SyncOp::Delete, &to_delete).await?;
            report.deleted = to_delete.into_vec();
            report.errors.extend(phase.errors.iter().cloned());
            report.delete = Some(phase);
        }

        if !to_create.is_empty() {
            let phase = self.fan_out(SyncOp::Create, &to_create).await?;
            report.created = to_create.into_vec();
            report.errors.extend(phase.errors.iter().cloned());
            report.create = Some(phase);
        }

        if !report.errors.is_empty() {
            report.status = SyncStatus::Partial;
        }

        Ok(report)
    }

    /// Shared entry for create and delete: disabled check, parse, fan out
    async fn run_operation(
        &self,
        op: SyncOp,
        msisdn: Option<&str>,
        msisdn_list: Option<&str>,
    ) -> Result<SyncReport> {
        // Must stay the first check: a disabled engine touches nothing
        if !self.config.enabled {
            debug!(target: LOG_TARGET, "ENUM management is disabled, skipping {}", op.name());
            return Ok(SyncReport::with_status(SyncStatus::Disabled));
        }

        let msisdns = msisdn::parse_all(msisdn, msisdn_list);
        if msisdns.is_empty() {
            debug!(target: LOG_TARGET, "No MSISDNs provided for ENUM {}", op.noun());
            return Ok(SyncReport::with_status(SyncStatus::NoMsisdns));
        }

        self.fan_out(op, &msisdns).await
    }

    /// Apply `op` for `msisdns` to every (endpoint, domain) pair in order
    async fn fan_out(&self, op: SyncOp, msisdns: &MsisdnSet) -> Result<SyncReport> {
        info!(target: LOG_TARGET, "ENUM {} for MSISDNs: {}", op.noun(), msisdns);

        let mut report = SyncReport::with_status(SyncStatus::Ok);

        for endpoint in &self.config.endpoints {
            let endpoint_name = endpoint.display_name();
            let mut endpoint_report = EndpointReport::new(endpoint_name);

            for domain in &endpoint.domains {
                let changes = self.build_changes(op, msisdns, endpoint, domain);
                let result = self.transport.apply(endpoint, domain, &changes).await;

                endpoint_report.domains.push(DomainOutcome {
                    domain: domain.clone(),
                    success: result.is_ok(),
                    msisdns: msisdns.clone(),
                });

                match result {
                    Ok(()) => {
                        info!(target: LOG_TARGET, "ENUM entries {} on {}/{}", op.past(), endpoint_name, domain);
                    }
                    Err(e) => {
                        let detail = format!("{}/{}: {}", endpoint_name, domain, e);
                        error!(target: LOG_TARGET, "ENUM {} failed - {}", op.name(), detail);
                        report.errors.push(detail.clone());

                        if self.config.strict_mode {
                            return Err(Error::strict_mode(op.noun(), detail));
                        }
                    }
                }
            }

            report.endpoints.push(endpoint_report);
        }

        if !report.errors.is_empty() {
            report.status = SyncStatus::Partial;
        }

        Ok(report)
    }

    /// Build the record-set changes for one (endpoint, domain) pair
    fn build_changes(
        &self,
        op: SyncOp,
        msisdns: &MsisdnSet,
        endpoint: &EndpointConfig,
        domain: &str,
    ) -> Vec<RrsetChange> {
        msisdns
            .iter()
            .map(|m| match op {
                SyncOp::Create => RrsetChange::replace(
                    m,
                    domain,
                    &endpoint.sip_domain,
                    self.rule,
                    self.config.naptr_ttl,
                ),
                SyncOp::Delete => RrsetChange::delete(m, domain),
            })
            .collect()
    }
}
