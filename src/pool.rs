//! # Worker Pool Module
//!
//! Fixed-size worker pools that keep download and link-extraction work on
//! separate sets of workers.
//!
//! ## Overview
//!
//! A [`WorkerPool`] owns a number of long-lived tokio tasks that pull boxed
//! jobs from a shared unbounded channel, so submission never blocks the
//! caller and neither pool can starve the other. The crawler runs two of
//! them: one sized for downloads, one sized for extraction.
//!
//! ## Shutdown
//!
//! [`close`](WorkerPool::close) stops accepting jobs by dropping the
//! sending half of the channel; workers drain what is already queued, then
//! exit. The call waits up to a grace period for the workers to finish and
//! logs (rather than propagates) a failure to drain in time, aborting the
//! stragglers. Closing an already-closed pool is a no-op.

use futures_util::future::BoxFuture;
use kanal::{unbounded_async, AsyncReceiver, AsyncSender};
use parking_lot::Mutex;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, error, trace, warn};

/// A unit of work runnable on a pool worker.
pub(crate) type Job = BoxFuture<'static, ()>;

struct PoolInner {
    tx: AsyncSender<Job>,
    workers: JoinSet<()>,
}

/// Fixed-size pool of tokio worker tasks fed by an unbounded MPMC channel.
pub(crate) struct WorkerPool {
    name: &'static str,
    inner: Mutex<Option<PoolInner>>,
}

impl WorkerPool {
    /// Starts a pool with `size` workers. The name only labels log output.
    pub(crate) fn new(name: &'static str, size: usize) -> Self {
        let (tx, rx) = unbounded_async();
        let mut workers = JoinSet::new();
        for id in 0..size {
            workers.spawn(worker_loop(name, id, rx.clone()));
        }
        debug!(pool = name, size, "worker pool started");
        Self {
            name,
            inner: Mutex::new(Some(PoolInner { tx, workers })),
        }
    }

    /// Queues a job and returns without waiting for it to run.
    ///
    /// Jobs submitted after [`close`](Self::close) are dropped; any barrier
    /// registrations they captured arrive through their drop, so a session
    /// racing a shutdown terminates rather than hanging.
    pub(crate) async fn submit(&self, job: Job) {
        let tx = match &*self.inner.lock() {
            Some(inner) => inner.tx.clone(),
            None => {
                warn!(pool = self.name, "job submitted to closed pool, dropping");
                return;
            }
        };
        if tx.send(job).await.is_err() {
            warn!(pool = self.name, "pool channel closed, job dropped");
        }
    }

    /// Stops accepting jobs and waits up to `grace` for queued and in-flight
    /// jobs to finish. Idempotent; a drain timeout is logged, not returned.
    pub(crate) async fn close(&self, grace: Duration) {
        let Some(PoolInner { tx, mut workers }) = self.inner.lock().take() else {
            debug!(pool = self.name, "pool already closed");
            return;
        };
        drop(tx);

        let drained = tokio::time::timeout(grace, async {
            while let Some(joined) = workers.join_next().await {
                if let Err(e) = joined {
                    error!(pool = self.name, error = %e, "pool worker failed");
                }
            }
        })
        .await;

        match drained {
            Ok(()) => debug!(pool = self.name, "worker pool drained"),
            Err(_) => {
                warn!(
                    pool = self.name,
                    grace_ms = grace.as_millis() as u64,
                    "worker pool did not drain within grace period, aborting"
                );
                workers.abort_all();
            }
        }
    }
}

async fn worker_loop(pool: &'static str, id: usize, rx: AsyncReceiver<Job>) {
    trace!(pool, worker = id, "worker started");
    while let Ok(job) = rx.recv().await {
        job.await;
    }
    trace!(pool, worker = id, "worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn runs_submitted_jobs() {
        let pool = WorkerPool::new("test", 2);
        let ran = Arc::new(AtomicUsize::new(0));
        for _ in 0..16 {
            let ran = Arc::clone(&ran);
            pool.submit(Box::pin(async move {
                ran.fetch_add(1, Ordering::SeqCst);
            }))
            .await;
        }
        pool.close(Duration::from_secs(1)).await;
        assert_eq!(ran.load(Ordering::SeqCst), 16);
    }

    #[tokio::test]
    async fn concurrency_is_bounded_by_pool_size() {
        let pool = WorkerPool::new("bounded", 2);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        for _ in 0..10 {
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            pool.submit(Box::pin(async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                running.fetch_sub(1, Ordering::SeqCst);
            }))
            .await;
        }
        pool.close(Duration::from_secs(5)).await;
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn close_is_idempotent_and_rejects_late_jobs() {
        let pool = WorkerPool::new("closing", 1);
        pool.close(Duration::from_millis(100)).await;
        pool.close(Duration::from_millis(100)).await;
        // Late submission is dropped without panicking.
        pool.submit(Box::pin(async {})).await;
    }
}
