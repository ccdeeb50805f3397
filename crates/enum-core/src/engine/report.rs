//! Report values returned by engine operations
//!
//! All reports serialize to JSON so an API layer can hand them back to its
//! callers unchanged.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::msisdn::MsisdnSet;
use crate::traits::SubscriberRecord;

/// Overall verdict of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Engine administratively disabled; nothing was attempted
    Disabled,
    /// Input contained no usable MSISDN; nothing was attempted
    NoMsisdns,
    /// Every attempt succeeded
    Ok,
    /// At least one attempt failed, the rest were still made
    Partial,
    /// The operation (or sweep) was aborted
    Error,
}

impl SyncStatus {
    /// Whether a subscriber with this outcome counts as reconciled
    pub fn is_success(self) -> bool {
        matches!(self, SyncStatus::Ok | SyncStatus::Disabled | SyncStatus::NoMsisdns)
    }
}

/// Outcome of one (endpoint, domain) attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainOutcome {
    pub domain: String,
    pub success: bool,
    pub msisdns: MsisdnSet,
}

/// Outcomes for every domain of one endpoint, in configured order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointReport {
    pub name: String,
    pub domains: Vec<DomainOutcome>,
}

impl EndpointReport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domains: Vec::new(),
        }
    }

    /// Look up the outcome for `domain`
    pub fn domain(&self, domain: &str) -> Option<&DomainOutcome> {
        self.domains.iter().find(|d| d.domain == domain)
    }
}

/// Result of a create or delete call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub status: SyncStatus,
    pub endpoints: Vec<EndpointReport>,
    /// `<endpoint>/<domain>: <detail>` for every failed attempt
    pub errors: Vec<String>,
}

impl SyncReport {
    pub(crate) fn with_status(status: SyncStatus) -> Self {
        Self {
            status,
            endpoints: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Look up the report for an endpoint by display name
    pub fn endpoint(&self, name: &str) -> Option<&EndpointReport> {
        self.endpoints.iter().find(|e| e.name == name)
    }

    /// Number of (endpoint, domain) attempts made
    pub fn attempts(&self) -> usize {
        self.endpoints.iter().map(|e| e.domains.len()).sum()
    }
}

/// Result of an update call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateReport {
    pub status: SyncStatus,
    /// MSISDNs submitted for deletion
    pub deleted: Vec<String>,
    /// MSISDNs submitted for creation
    pub created: Vec<String>,
    /// Errors of both phases, delete phase first
    pub errors: Vec<String>,
    /// Per-endpoint detail of the delete phase, when it ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<SyncReport>,
    /// Per-endpoint detail of the create phase, when it ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create: Option<SyncReport>,
}

impl UpdateReport {
    pub(crate) fn with_status(status: SyncStatus) -> Self {
        Self {
            status,
            deleted: Vec::new(),
            created: Vec::new(),
            errors: Vec::new(),
            delete: None,
            create: None,
        }
    }
}

/// Per-subscriber line of a reconciliation report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriberOutcome {
    pub subscriber_id: u64,
    pub msisdn: Option<String>,
    pub status: SyncStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl SubscriberOutcome {
    pub(crate) fn new(subscriber: &SubscriberRecord, status: SyncStatus, errors: Vec<String>) -> Self {
        Self {
            subscriber_id: subscriber.subscriber_id,
            msisdn: subscriber.msisdn.clone(),
            status,
            errors,
        }
    }
}

/// Result of a reconciliation sweep
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    pub status: SyncStatus,
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Pages requested from the source, including the final empty one
    pub pages: usize,
    /// The sweep stopped on request before reaching the end
    pub cancelled: bool,
    /// The sweep stopped at the page ceiling
    pub page_limit_reached: bool,
    pub subscribers: Vec<SubscriberOutcome>,
    /// Outcomes dropped once `subscribers` hit the configured limit
    pub subscribers_omitted: usize,
    pub errors: Vec<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    report_limit: usize,
}

impl ReconcileReport {
    pub(crate) fn disabled() -> Self {
        let mut report = Self::started(0);
        report.status = SyncStatus::Disabled;
        report.started_at = None;
        report
    }

    pub(crate) fn started(report_limit: usize) -> Self {
        Self {
            status: SyncStatus::Ok,
            processed: 0,
            succeeded: 0,
            failed: 0,
            pages: 0,
            cancelled: false,
            page_limit_reached: false,
            subscribers: Vec::new(),
            subscribers_omitted: 0,
            errors: Vec::new(),
            started_at: Some(Utc::now()),
            finished_at: None,
            report_limit,
        }
    }

    pub(crate) fn push_outcome(&mut self, outcome: SubscriberOutcome) {
        if self.subscribers.len() < self.report_limit {
            self.subscribers.push(outcome);
        } else {
            self.subscribers_omitted += 1;
        }
    }

    /// Settle the final status. A sweep-level error outranks subscriber failures.
    pub(crate) fn finish(&mut self) {
        if self.status != SyncStatus::Error && self.failed > 0 {
            self.status = SyncStatus::Partial;
        }
        self.finished_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(serde_json::to_value(SyncStatus::NoMsisdns).unwrap(), "no_msisdns");
        assert_eq!(serde_json::to_value(SyncStatus::Partial).unwrap(), "partial");
    }

    #[test]
    fn test_success_statuses() {
        assert!(SyncStatus::Ok.is_success());
        assert!(SyncStatus::Disabled.is_success());
        assert!(SyncStatus::NoMsisdns.is_success());
        assert!(!SyncStatus::Partial.is_success());
        assert!(!SyncStatus::Error.is_success());
    }

    #[test]
    fn test_outcome_list_is_bounded() {
        let mut report = ReconcileReport::started(2);
        let subscriber = SubscriberRecord::new(1, Some("111"), None);

        for _ in 0..5 {
            report.push_outcome(SubscriberOutcome::new(&subscriber, SyncStatus::Ok, Vec::new()));
        }

        assert_eq!(report.subscribers.len(), 2);
        assert_eq!(report.subscribers_omitted, 3);
    }

    #[test]
    fn test_finish_keeps_error_status() {
        let mut report = ReconcileReport::started(10);
        report.failed = 1;
        report.status = SyncStatus::Error;
        report.finish();
        assert_eq!(report.status, SyncStatus::Error);

        let mut report = ReconcileReport::started(10);
        report.failed = 1;
        report.finish();
        assert_eq!(report.status, SyncStatus::Partial);
        assert!(report.finished_at.is_some());
    }

    #[test]
    fn test_disabled_report() {
        let report = ReconcileReport::disabled();
        assert_eq!(report.status, SyncStatus::Disabled);
        assert_eq!(report.processed, 0);
        assert!(report.started_at.is_none());
    }
}
