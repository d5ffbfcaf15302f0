//! Per-host admission control for download work.
//!
//! Every origin host gets its own [`HostGate`], created lazily by the crawl
//! session on the first URL seen for that host. The gate holds a FIFO of
//! queued download jobs and an `available` slot counter; jobs are handed to
//! the download pool only while a slot is free, so no more than `per_host`
//! downloads ever run concurrently against one host no matter how large the
//! download pool is.
//!
//! A job's slot is released when the job completes, whether it succeeded,
//! recorded an error, or panicked (panics are caught and logged), and the
//! release immediately re-drains the queue so no queued job is stranded.

use crate::pool::{Job, WorkerPool};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, trace};

struct GateState {
    queue: VecDeque<Job>,
    available: usize,
}

/// FIFO admission gate bounding concurrent downloads for one host.
pub(crate) struct HostGate {
    host: String,
    pool: Arc<WorkerPool>,
    state: Mutex<GateState>,
}

impl HostGate {
    pub(crate) fn new(host: String, per_host: usize, pool: Arc<WorkerPool>) -> Arc<Self> {
        Arc::new(Self {
            host,
            pool,
            state: Mutex::new(GateState {
                queue: VecDeque::new(),
                available: per_host,
            }),
        })
    }

    /// Enqueues a download job and starts it immediately if a slot is free.
    pub(crate) async fn submit(self: Arc<Self>, job: Job) {
        self.state.lock().queue.push_back(job);
        self.drain().await;
    }

    /// Hands queued jobs to the download pool while slots are available.
    ///
    /// Boxed because the completion wrapper re-enters `drain` to start the
    /// next queued job for this host.
    fn drain(self: Arc<Self>) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            loop {
                let job = {
                    let mut state = self.state.lock();
                    if state.available == 0 {
                        return;
                    }
                    let Some(job) = state.queue.pop_front() else {
                        return;
                    };
                    state.available -= 1;
                    job
                };

                trace!(host = %self.host, "admitting download job");
                let gate = Arc::clone(&self);
                let wrapped: Job = Box::pin(async move {
                    if AssertUnwindSafe(job).catch_unwind().await.is_err() {
                        error!(host = %gate.host, "download job panicked, slot released");
                    }
                    gate.state.lock().available += 1;
                    gate.drain().await;
                });
                self.pool.submit(wrapped).await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn big_pool() -> Arc<WorkerPool> {
        Arc::new(WorkerPool::new("downloads", 16))
    }

    #[tokio::test]
    async fn never_exceeds_per_host_limit() {
        let pool = big_pool();
        let gate = HostGate::new("example.com".into(), 3, Arc::clone(&pool));
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        for _ in 0..20 {
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            Arc::clone(&gate).submit(Box::pin(async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                running.fetch_sub(1, Ordering::SeqCst);
            }))
            .await;
        }

        pool.close(Duration::from_secs(5)).await;
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn all_queued_jobs_eventually_run() {
        let pool = big_pool();
        let gate = HostGate::new("example.com".into(), 1, Arc::clone(&pool));
        let ran = Arc::new(AtomicUsize::new(0));

        for _ in 0..10 {
            let ran = Arc::clone(&ran);
            Arc::clone(&gate).submit(Box::pin(async move {
                ran.fetch_add(1, Ordering::SeqCst);
            }))
            .await;
        }

        pool.close(Duration::from_secs(5)).await;
        assert_eq!(ran.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn jobs_for_one_host_run_in_submission_order() {
        let pool = big_pool();
        let gate = HostGate::new("example.com".into(), 1, Arc::clone(&pool));
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..8 {
            let order = Arc::clone(&order);
            Arc::clone(&gate).submit(Box::pin(async move {
                order.lock().push(i);
            }))
            .await;
        }

        pool.close(Duration::from_secs(5)).await;
        assert_eq!(*order.lock(), (0..8).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn panicking_job_releases_its_slot() {
        let pool = big_pool();
        let gate = HostGate::new("example.com".into(), 1, Arc::clone(&pool));
        let ran = Arc::new(AtomicUsize::new(0));

        Arc::clone(&gate).submit(Box::pin(async {
            panic!("fetch blew up");
        }))
        .await;
        let ran_clone = Arc::clone(&ran);
        Arc::clone(&gate).submit(Box::pin(async move {
            ran_clone.fetch_add(1, Ordering::SeqCst);
        }))
        .await;

        pool.close(Duration::from_secs(5)).await;
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }
}
