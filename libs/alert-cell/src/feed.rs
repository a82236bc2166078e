use std::collections::HashMap;

use tracing::warn;

use shared_models::{Alert, AlertSeverity, ApiError};

use crate::models::{AckFailurePolicy, AlertFilter, FeedScope, FEED_LOAD_ERROR};

/// Snapshot taken when an acknowledgement starts, used to undo it.
#[derive(Debug, Clone)]
struct PendingAck {
    previous: Alert,
    index: usize,
}

/// Working set of alerts behind the alert page.
///
/// A fetch replaces the whole set. The active filter is always re-applied
/// locally, whether or not the source already filtered. Acknowledgement is
/// optimistic: the local copy changes before the remote call resolves, and
/// `policy` decides what a failed call does to it.
#[derive(Debug, Clone)]
pub struct AlertFeed {
    scope: FeedScope,
    filter: AlertFilter,
    policy: AckFailurePolicy,
    alerts: Vec<Alert>,
    in_flight: HashMap<String, PendingAck>,
    loading: bool,
    error: Option<String>,
}

impl AlertFeed {
    pub fn new(scope: FeedScope, filter: AlertFilter) -> Self {
        Self {
            scope,
            filter,
            policy: AckFailurePolicy::default(),
            alerts: Vec::new(),
            in_flight: HashMap::new(),
            loading: true,
            error: None,
        }
    }

    pub fn with_policy(mut self, policy: AckFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn scope(&self) -> &FeedScope {
        &self.scope
    }

    pub fn filter(&self) -> AlertFilter {
        self.filter
    }

    pub fn policy(&self) -> AckFailurePolicy {
        self.policy
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn get(&self, alert_id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == alert_id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns whether the filter actually changed, in which case the
    /// caller should refetch.
    pub fn set_filter(&mut self, filter: AlertFilter) -> bool {
        if self.filter == filter {
            return false;
        }
        self.filter = filter;
        self.loading = true;
        self.retain_admitted();
        true
    }

    pub fn apply_fetch(&mut self, result: Result<Vec<Alert>, ApiError>) {
        self.loading = false;
        match result {
            Ok(alerts) => {
                self.alerts = alerts;
                self.retain_admitted();
                self.error = None;
            }
            Err(err) => {
                warn!("Alert refresh failed: {}", err);
                self.error = Some(FEED_LOAD_ERROR.to_string());
            }
        }
    }

    pub fn is_acknowledging(&self, alert_id: &str) -> bool {
        self.in_flight.contains_key(alert_id)
    }

    /// Applies the optimistic half of an acknowledgement.
    ///
    /// Returns `false` (and changes nothing) when the alert is unknown,
    /// already acknowledged, or already being acknowledged.
    pub fn begin_acknowledge(&mut self, alert_id: &str) -> bool {
        if self.is_acknowledging(alert_id) {
            return false;
        }
        let Some(index) = self.alerts.iter().position(|a| a.id == alert_id) else {
            return false;
        };
        if self.alerts[index].acknowledged {
            return false;
        }

        let previous = self.alerts[index].clone();
        self.in_flight
            .insert(alert_id.to_string(), PendingAck { previous, index });

        self.alerts[index].acknowledged = true;
        self.retain_admitted();
        true
    }

    /// Settles an acknowledgement started with [`begin_acknowledge`].
    ///
    /// [`begin_acknowledge`]: AlertFeed::begin_acknowledge
    pub fn finish_acknowledge(&mut self, alert_id: &str, result: Result<Alert, ApiError>) {
        let Some(pending) = self.in_flight.remove(alert_id) else {
            return;
        };

        match result {
            Ok(confirmed) => {
                if let Some(slot) = self.alerts.iter_mut().find(|a| a.id == alert_id) {
                    // The acknowledge endpoint does not join the patient name.
                    let patient_name = slot.patient_name.take().or(confirmed.patient_name);
                    *slot = Alert {
                        acknowledged: true,
                        patient_name,
                        ..confirmed
                    };
                }
            }
            Err(err) => match self.policy {
                AckFailurePolicy::KeepOptimistic => {
                    warn!(
                        "Acknowledging alert {} failed, keeping local state until next refresh: {}",
                        alert_id, err
                    );
                }
                AckFailurePolicy::Rollback => {
                    warn!("Acknowledging alert {} failed, rolling back: {}", alert_id, err);
                    self.restore(pending);
                }
            },
        }
    }

    fn restore(&mut self, pending: PendingAck) {
        let PendingAck { previous, index } = pending;
        if let Some(slot) = self.alerts.iter_mut().find(|a| a.id == previous.id) {
            *slot = previous;
        } else if self.filter.admits(previous.acknowledged) {
            let at = index.min(self.alerts.len());
            self.alerts.insert(at, previous);
        }
    }

    fn retain_admitted(&mut self) {
        let filter = self.filter;
        self.alerts.retain(|a| filter.admits(a.acknowledged));
    }

    pub fn unacknowledged_count(&self) -> usize {
        self.alerts.iter().filter(|a| !a.acknowledged).count()
    }

    pub fn unacknowledged_with(&self, severity: AlertSeverity) -> usize {
        self.alerts
            .iter()
            .filter(|a| !a.acknowledged && a.severity == severity)
            .count()
    }

    pub fn critical_count(&self) -> usize {
        self.unacknowledged_with(AlertSeverity::Critical)
    }

    pub fn warning_count(&self) -> usize {
        self.unacknowledged_with(AlertSeverity::Warning)
    }
}
