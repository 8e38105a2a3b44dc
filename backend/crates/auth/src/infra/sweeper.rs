//! Expired Session Sweeper
//!
//! Background task that deletes expired sessions on a fixed period, so
//! abandoned sessions do not pile up between restarts.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::domain::repository::SessionStore;

/// Default interval between sweeps (10 minutes)
pub const DEFAULT_SWEEP_PERIOD: Duration = Duration::from_secs(600);

/// Handle to a running sweeper task.
///
/// Dropping the handle also stops the task, but only [`shutdown`](Self::shutdown)
/// waits for an in-flight sweep to finish.
pub struct SessionSweeper {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SessionSweeper {
    /// Sweep `store` every `period`, starting immediately.
    ///
    /// # Panics
    /// If `period` is zero.
    pub fn spawn<R>(store: Arc<R>, period: Duration) -> Self
    where
        R: SessionStore + Send + Sync + 'static,
    {
        let (stop, mut stopped) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = stopped.changed() => break,
                    _ = ticker.tick() => sweep(store.as_ref()).await,
                }
            }

            tracing::debug!("Session sweeper stopped");
        });

        tracing::info!(period_secs = period.as_secs(), "Session sweeper started");

        Self { stop, task }
    }

    /// Signal the task to stop and wait for it.
    pub async fn shutdown(self) {
        // Err only if the task already exited.
        let _ = self.stop.send(true);
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Session sweeper task failed");
        }
    }
}

async fn sweep<R: SessionStore + Sync>(store: &R) {
    if let Err(e) = store.cleanup_expired().await {
        // Transient; the next tick retries.
        tracing::warn!(error = %e, "Expired session sweep failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::session::SessionRecord;
    use crate::infra::memory::MemoryAuthRepository;

    #[tokio::test]
    async fn test_sweeper_purges_expired_sessions() {
        let repo = MemoryAuthRepository::new();
        let live = SessionRecord::new(Duration::from_secs(60));
        repo.save(&live).await.unwrap();
        repo.save(&SessionRecord::new(Duration::ZERO)).await.unwrap();

        let sweeper = SessionSweeper::spawn(Arc::new(repo.clone()), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(repo.session_count().await, 1);

        // Sessions expiring after the first sweep are caught by a later one
        repo.save(&SessionRecord::new(Duration::ZERO)).await.unwrap();
        assert_eq!(repo.session_count().await, 2);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(repo.session_count().await, 1);
        assert!(repo.load(&live.session_id).await.unwrap().is_some());

        sweeper.shutdown().await;
    }

    #[tokio::test]
    async fn test_sweeper_survives_store_outage() {
        let repo = MemoryAuthRepository::new();
        repo.set_unavailable(true);

        let sweeper = SessionSweeper::spawn(Arc::new(repo.clone()), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(30)).await;

        repo.set_unavailable(false);
        repo.save(&SessionRecord::new(Duration::ZERO)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(repo.session_count().await, 0);

        sweeper.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_stops_sweeping() {
        let repo = MemoryAuthRepository::new();
        let sweeper = SessionSweeper::spawn(Arc::new(repo.clone()), Duration::from_millis(10));
        sweeper.shutdown().await;

        repo.save(&SessionRecord::new(Duration::ZERO)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(repo.session_count().await, 1);
    }
}
