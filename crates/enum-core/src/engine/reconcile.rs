//! Reconciliation sweep
//!
//! Pages through the whole subscriber population and re-asserts every
//! subscriber's current MSISDNs with `create`. There is no previous state to
//! diff against, so the sweep relies on REPLACE being idempotent.
//!
//! ## Guarantees
//!
//! - One subscriber's failure never stops the sweep
//! - A source failure ends the sweep with status `error`, never a panic or `Err`
//! - The page ceiling ends the sweep with a warning
//! - A shutdown signal stops further page fetches; counters stay consistent

use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use super::report::{ReconcileReport, SubscriberOutcome, SyncStatus};
use super::{EnumEngine, LOG_TARGET};
use crate::error::Result;
use crate::traits::{SubscriberRecord, SubscriberSource};

impl EnumEngine {
    /// Reconcile ENUM records for every subscriber in `source`
    ///
    /// Always returns a report; failures are recorded in it.
    pub async fn reconcile_all(&self, source: &dyn SubscriberSource) -> ReconcileReport {
        self.reconcile_all_with_shutdown(source, None).await
    }

    /// Reconcile with an optional shutdown signal
    ///
    /// The signal is checked before each page is fetched. The subscriber
    /// being processed when it fires is finished, its page is finished, and
    /// no further page is requested.
    ///
    /// # Parameters
    ///
    /// - `source`: Subscriber population to sweep
    /// - `shutdown_rx`: Optional oneshot receiver; sending `()` cancels the sweep
    pub async fn reconcile_all_with_shutdown(
        &self,
        source: &dyn SubscriberSource,
        mut shutdown_rx: Option<oneshot::Receiver<()>>,
    ) -> ReconcileReport {
        if !self.config.enabled {
            info!(target: LOG_TARGET, "ENUM management is disabled, skipping reconciliation");
            return ReconcileReport::disabled();
        }

        info!(target: LOG_TARGET, "Starting ENUM reconciliation");

        let mut report = ReconcileReport::started(self.config.reconcile.report_limit);

        if let Err(e) = self.sweep(source, &mut report, &mut shutdown_rx).await {
            report.status = SyncStatus::Error;
            report.errors.push(format!("Reconciliation failed: {}", e));
            error!(target: LOG_TARGET, "ENUM reconciliation failed: {}", e);
        }

        report.finish();

        info!(
            target: LOG_TARGET,
            "ENUM reconciliation complete: {} processed, {} succeeded, {} failed",
            report.processed, report.succeeded, report.failed
        );

        report
    }

    /// Page loop. Only source errors escape; subscriber failures are recorded.
    async fn sweep(
        &self,
        source: &dyn SubscriberSource,
        report: &mut ReconcileReport,
        shutdown_rx: &mut Option<oneshot::Receiver<()>>,
    ) -> Result<()> {
        let page_size = self.config.reconcile.page_size;
        let max_pages = self.config.reconcile.max_pages;

        for page in 0..max_pages {
            if shutdown_requested(shutdown_rx) {
                warn!(target: LOG_TARGET, "Reconciliation cancelled before page {}", page);
                report.cancelled = true;
                return Ok(());
            }

            let subscribers = source.get_page(page, page_size).await?;
            report.pages += 1;

            if subscribers.is_empty() {
                debug!(target: LOG_TARGET, "Page {} is empty, reconciliation finished", page);
                return Ok(());
            }

            debug!(target: LOG_TARGET, "Reconciling page {} ({} subscribers)", page, subscribers.len());

            for subscriber in &subscribers {
                self.reconcile_subscriber(subscriber, report).await;
            }
        }

        warn!(target: LOG_TARGET, "Reconciliation stopped at page {}", max_pages);
        report.page_limit_reached = true;
        Ok(())
    }

    /// Re-assert one subscriber and fold the outcome into the report
    async fn reconcile_subscriber(&self, subscriber: &SubscriberRecord, report: &mut ReconcileReport) {
        report.processed += 1;

        let result = self
            .create(subscriber.msisdn.as_deref(), subscriber.msisdn_list.as_deref())
            .await;

        match result {
            Ok(sync) if sync.status.is_success() => {
                report.succeeded += 1;
                report.push_outcome(SubscriberOutcome::new(subscriber, SyncStatus::Ok, Vec::new()));
            }
            Ok(sync) => {
                report.failed += 1;
                report.push_outcome(SubscriberOutcome::new(subscriber, SyncStatus::Partial, sync.errors));
            }
            Err(e) => {
                report.failed += 1;
                report
                    .errors
                    .push(format!("Subscriber {}: {}", subscriber.subscriber_id, e));
                report.push_outcome(SubscriberOutcome::new(
                    subscriber,
                    SyncStatus::Error,
                    vec![e.to_string()],
                ));
            }
        }
    }
}

/// Non-blocking check of the shutdown signal. A dropped sender is not a signal.
fn shutdown_requested(shutdown_rx: &mut Option<oneshot::Receiver<()>>) -> bool {
    match shutdown_rx {
        Some(rx) => rx.try_recv().is_ok(),
        None => false,
    }
}
