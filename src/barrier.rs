//! Rendezvous barrier for level-synchronized crawling.
//!
//! A crawl level dispatches a dynamically discovered number of download and
//! extraction units; the orchestrator must block until every one of them has
//! finished before advancing to the next level. The [`RendezvousBarrier`]
//! tracks that outstanding count: registering a party increments it,
//! arriving decrements it, and [`await_zero`](RendezvousBarrier::await_zero)
//! suspends until it reaches zero.
//!
//! Registration is witnessed by a [`Registration`] guard whose drop performs
//! the arrival, so a registration can never be arrived twice or forgotten,
//! even if the task holding it panics.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Notify;

/// Countdown rendezvous point with dynamic registration.
///
/// The orchestrator takes its own registration before dispatching a level's
/// work and releases it only once dispatch is complete, so the pending count
/// cannot transiently touch zero while work is still being registered.
#[derive(Debug)]
pub(crate) struct RendezvousBarrier {
    pending: Mutex<usize>,
    zero: Notify,
}

impl RendezvousBarrier {
    /// Creates an open barrier with no registered parties.
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            pending: Mutex::new(0),
            zero: Notify::new(),
        })
    }

    /// Registers one party. The returned guard arrives exactly once, either
    /// explicitly via [`Registration::arrive`] or when dropped.
    pub(crate) fn register(self: &Arc<Self>) -> Registration {
        *self.pending.lock() += 1;
        Registration {
            barrier: Arc::clone(self),
        }
    }

    /// Suspends until every registered party has arrived.
    pub(crate) async fn await_zero(&self) {
        loop {
            let notified = self.zero.notified();
            tokio::pin!(notified);
            // Register interest before checking, otherwise a final arrival
            // between the check and the await would be lost.
            notified.as_mut().enable();
            if *self.pending.lock() == 0 {
                return;
            }
            notified.await;
        }
    }

    #[cfg(test)]
    fn pending(&self) -> usize {
        *self.pending.lock()
    }
}

/// Witness of one barrier registration; arrives on drop.
#[derive(Debug)]
pub(crate) struct Registration {
    barrier: Arc<RendezvousBarrier>,
}

impl Registration {
    /// Arrives at the barrier, consuming the registration.
    pub(crate) fn arrive(self) {}
}

impl Drop for Registration {
    fn drop(&mut self) {
        let mut pending = self.barrier.pending.lock();
        *pending -= 1;
        if *pending == 0 {
            drop(pending);
            self.barrier.zero.notify_waiters();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn await_zero_returns_immediately_when_nothing_registered() {
        let barrier = RendezvousBarrier::new();
        barrier.await_zero().await;
    }

    #[tokio::test]
    async fn await_zero_blocks_until_all_parties_arrive() {
        let barrier = RendezvousBarrier::new();
        let own = barrier.register();

        let mut workers = Vec::new();
        for _ in 0..8 {
            let reg = barrier.register();
            workers.push(tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                reg.arrive();
            }));
        }
        assert_eq!(barrier.pending(), 9);

        own.arrive();
        tokio::time::timeout(Duration::from_secs(1), barrier.await_zero())
            .await
            .expect("barrier should open once all workers arrive");
        assert_eq!(barrier.pending(), 0);

        for worker in workers {
            worker.await.unwrap();
        }
    }

    #[tokio::test]
    async fn orchestrator_registration_masks_transient_zero() {
        let barrier = RendezvousBarrier::new();
        let own = barrier.register();

        // A party registering and arriving while the orchestrator still
        // holds its registration must not open the barrier.
        barrier.register().arrive();
        assert_eq!(barrier.pending(), 1);

        let waiter = {
            let barrier = Arc::clone(&barrier);
            tokio::spawn(async move { barrier.await_zero().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        own.arrive();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .unwrap();
    }

    #[tokio::test]
    async fn dropped_registration_counts_as_arrival() {
        let barrier = RendezvousBarrier::new();
        let reg = barrier.register();
        drop(reg);
        barrier.await_zero().await;
    }
}
