//! Retention sweep
//!
//! Deletes every stored object older than the retention window. Sweeps are
//! best-effort: a failed list or delete is logged and the next sweep simply
//! recomputes from whatever the store holds at that point.

use crate::scheduler::{Scheduler, TaskHandle};
use blinkdrop_storage::BlobStore;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Objects returned by the listing.
    pub scanned: usize,
    /// Objects older than the cutoff.
    pub expired: usize,
    /// Objects the store confirmed deleted.
    pub deleted: usize,
}

#[derive(Clone)]
pub struct RetentionSweeper {
    store: Arc<dyn BlobStore>,
    retention_window: Duration,
}

impl RetentionSweeper {
    pub fn new(store: Arc<dyn BlobStore>, retention_window: Duration) -> Self {
        Self {
            store,
            retention_window,
        }
    }

    pub async fn sweep(&self) -> SweepReport {
        self.sweep_at(Utc::now()).await
    }

    /// Sweep using `now` as the current time.
    pub async fn sweep_at(&self, now: DateTime<Utc>) -> SweepReport {
        let mut report = SweepReport::default();

        let window = match chrono::Duration::from_std(self.retention_window) {
            Ok(window) => window,
            Err(e) => {
                error!(error = %e, "Retention window out of range, skipping sweep");
                return report;
            }
        };
        let cutoff = now - window;

        let objects = match self.store.list().await {
            Ok(objects) => objects,
            Err(e) => {
                error!(error = %e, "Failed to list objects for retention sweep");
                return report;
            }
        };
        report.scanned = objects.len();

        let expired: Vec<String> = objects
            .into_iter()
            .filter(|object| object.last_modified < cutoff)
            .map(|object| object.key)
            .collect();
        report.expired = expired.len();

        if expired.is_empty() {
            debug!(scanned = report.scanned, "Retention sweep found nothing to delete");
            return report;
        }

        match self.store.delete_many(&expired).await {
            Ok(deleted) => {
                report.deleted = deleted;
                info!(
                    scanned = report.scanned,
                    expired = report.expired,
                    deleted = report.deleted,
                    cutoff = %cutoff,
                    "Retention sweep completed"
                );
            }
            Err(e) => {
                error!(
                    error = %e,
                    expired = report.expired,
                    "Failed to delete expired objects"
                );
            }
        }

        report
    }

    /// Schedule a sweep every `interval`.
    pub fn start(&self, scheduler: &Scheduler, interval: Duration) -> TaskHandle {
        let sweeper = self.clone();
        scheduler.run_every("retention-sweep", interval, move || {
            let sweeper = sweeper.clone();
            async move {
                sweeper.sweep().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use blinkdrop_core::{ObjectSummary, StoredObject};
    use blinkdrop_storage::{PutObject, StorageBackend, StorageError, StorageResult};
    use std::sync::Mutex;

    /// Store whose listing carries caller-chosen timestamps.
    #[derive(Default)]
    struct FakeStore {
        objects: Mutex<Vec<ObjectSummary>>,
        fail_list: bool,
        fail_delete: bool,
    }

    impl FakeStore {
        fn with_ages(now: DateTime<Utc>, ages_minutes: &[i64]) -> Self {
            let objects = ages_minutes
                .iter()
                .enumerate()
                .map(|(i, age)| ObjectSummary {
                    key: format!("{:04x}", i),
                    last_modified: now - chrono::Duration::minutes(*age),
                    size: 16,
                })
                .collect();
            Self {
                objects: Mutex::new(objects),
                ..Default::default()
            }
        }

        fn keys(&self) -> Vec<String> {
            self.objects
                .lock()
                .unwrap()
                .iter()
                .map(|o| o.key.clone())
                .collect()
        }
    }

    #[async_trait]
    impl BlobStore for FakeStore {
        async fn put(&self, _object: PutObject) -> StorageResult<()> {
            unimplemented!("not used by the sweeper")
        }

        async fn get(&self, key: &str) -> StorageResult<StoredObject> {
            Err(StorageError::NotFound(key.to_string()))
        }

        async fn list(&self) -> StorageResult<Vec<ObjectSummary>> {
            if self.fail_list {
                return Err(StorageError::ListFailed("unreachable".to_string()));
            }
            Ok(self.objects.lock().unwrap().clone())
        }

        async fn delete_many(&self, keys: &[String]) -> StorageResult<usize> {
            if self.fail_delete {
                return Err(StorageError::DeleteFailed("denied".to_string()));
            }
            let mut objects = self.objects.lock().unwrap();
            let before = objects.len();
            objects.retain(|o| !keys.contains(&o.key));
            Ok(before - objects.len())
        }

        fn backend_type(&self) -> StorageBackend {
            StorageBackend::Memory
        }
    }

    fn sweeper(store: Arc<FakeStore>) -> RetentionSweeper {
        RetentionSweeper::new(store, Duration::from_secs(30 * 60))
    }

    #[tokio::test]
    async fn deletes_only_objects_older_than_window() {
        let now = Utc::now();
        let store = Arc::new(FakeStore::with_ages(now, &[10, 31, 45]));

        let report = sweeper(store.clone()).sweep_at(now).await;

        assert_eq!(
            report,
            SweepReport {
                scanned: 3,
                expired: 2,
                deleted: 2
            }
        );
        assert_eq!(store.keys(), vec!["0000"]);
    }

    #[tokio::test]
    async fn object_exactly_at_cutoff_is_kept() {
        let now = Utc::now();
        let store = Arc::new(FakeStore::with_ages(now, &[30]));

        let report = sweeper(store.clone()).sweep_at(now).await;

        assert_eq!(report.expired, 0);
        assert_eq!(store.keys().len(), 1);
    }

    #[tokio::test]
    async fn empty_store_is_a_noop() {
        let store = Arc::new(FakeStore::default());
        let report = sweeper(store).sweep().await;
        assert_eq!(report, SweepReport::default());
    }

    #[tokio::test]
    async fn list_failure_is_swallowed() {
        let store = Arc::new(FakeStore {
            fail_list: true,
            ..Default::default()
        });
        let report = sweeper(store).sweep().await;
        assert_eq!(report, SweepReport::default());
    }

    #[tokio::test]
    async fn delete_failure_is_swallowed() {
        let now = Utc::now();
        let mut store = FakeStore::with_ages(now, &[45]);
        store.fail_delete = true;
        let store = Arc::new(store);

        let report = sweeper(store.clone()).sweep_at(now).await;
        assert_eq!(report.expired, 1);
        assert_eq!(report.deleted, 0);
        assert_eq!(store.keys().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn scheduled_sweep_runs_every_interval() {
        let scheduler = Scheduler::new();
        let store = Arc::new(FakeStore::with_ages(Utc::now(), &[60]));
        sweeper(store.clone()).start(&scheduler, Duration::from_secs(1800));

        tokio::time::sleep(Duration::from_secs(1799)).await;
        assert_eq!(store.keys().len(), 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(store.keys().is_empty());

        scheduler.shutdown().await;
    }
}
