use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, RwLock, RwLockReadGuard};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::feed::AlertFeed;
use crate::models::AlertFilter;
use crate::services::AlertSource;

/// Drives an [`AlertFeed`] from an [`AlertSource`].
#[derive(Clone)]
pub struct AlertMonitor {
    source: Arc<dyn AlertSource>,
    feed: Arc<RwLock<AlertFeed>>,
    revision: Arc<watch::Sender<u64>>,
}

impl AlertMonitor {
    pub fn new(source: Arc<dyn AlertSource>, feed: AlertFeed) -> Self {
        Self {
            source,
            feed: Arc::new(RwLock::new(feed)),
            revision: Arc::new(watch::channel(0).0),
        }
    }

    /// Yields a new revision after every settled refresh or acknowledgement.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    pub async fn feed(&self) -> RwLockReadGuard<'_, AlertFeed> {
        self.feed.read().await
    }

    /// Fetches the full set and replaces the working set with it.
    pub async fn refresh(&self) {
        let (scope, filter) = {
            let feed = self.feed.read().await;
            (feed.scope().clone(), feed.filter())
        };

        let result = self.source.fetch(&scope, filter).await;
        self.feed.write().await.apply_fetch(result);
        self.bump();
    }

    /// Switches the filter and refetches when it changed.
    pub async fn set_filter(&self, filter: AlertFilter) {
        let changed = self.feed.write().await.set_filter(filter);
        if changed {
            self.refresh().await;
        }
    }

    /// Optimistically acknowledges an alert, then settles it with the
    /// service's answer. Returns `false` if there was nothing to do.
    pub async fn acknowledge(&self, alert_id: &str) -> bool {
        if !self.feed.write().await.begin_acknowledge(alert_id) {
            debug!("Alert {} needs no acknowledgement", alert_id);
            return false;
        }

        let result = self.source.acknowledge(alert_id).await;
        self.feed.write().await.finish_acknowledge(alert_id, result);
        self.bump();
        true
    }

    /// Refreshes now and then every `period` until the returned handle is
    /// stopped or dropped.
    pub fn start_polling(&self, period: Duration) -> PollerHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let monitor = self.clone();

        let task = tokio::spawn(async move {
            info!("Alert polling started (every {:?})", period);

            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => {
                        tokio::select! {
                            biased;
                            _ = shutdown_rx.changed() => break,
                            _ = monitor.refresh() => {}
                        }
                    }
                }
            }

            info!("Alert polling stopped");
        });

        PollerHandle {
            shutdown: shutdown_tx,
            task: Some(task),
        }
    }
}

/// Owns the polling task. Stopping (or dropping) it cancels any refresh in
/// progress and guarantees no further fetch is issued.
pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
