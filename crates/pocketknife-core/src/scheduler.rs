// crates/pocketknife-core/src/scheduler.rs
//
// Concurrent fetch scheduler.
//
// A fixed pool of N tokio worker tasks drains a shared queue holding one
// index per address entry. Each worker runs the fetch task for its entry and
// sends the result down an mpsc channel to a single collector. At most N
// fetch tasks are in flight at any instant. A failed fetch is just another
// result; nothing is cancelled and the scheduler returns only once every
// entry has a result.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::classifier::AddressEntry;
use crate::error::{FetchError, TreasuryError};
use crate::fetch::{fetch_entry, FetchResult};
use crate::traits::ChainQuery;

/// Default size of the worker pool.
pub const DEFAULT_MAX_WORKERS: usize = 10;

/// Dispatches fetch tasks over a bounded worker pool.
pub struct FetchScheduler<C: ChainQuery + 'static> {
    client: Arc<C>,
    max_workers: usize,
}

impl<C: ChainQuery + 'static> FetchScheduler<C> {
    /// Create a scheduler with at most `max_workers` concurrent fetch tasks.
    ///
    /// # Errors
    /// Returns `TreasuryError::Config` if `max_workers` is zero.
    pub fn new(client: Arc<C>, max_workers: usize) -> Result<Self, TreasuryError> {
        if max_workers == 0 {
            return Err(TreasuryError::Config(
                "max_workers must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            client,
            max_workers,
        })
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Fetch every entry and return one result per entry.
    ///
    /// Results come back in completion order; `FetchResult::index` carries
    /// the classifier position for re-sorting.
    pub async fn run(&self, entries: Vec<AddressEntry>) -> Vec<FetchResult> {
        let total = entries.len();
        if total == 0 {
            return Vec::new();
        }

        let entries = Arc::new(entries);
        let queue: Arc<Mutex<VecDeque<usize>>> = Arc::new(Mutex::new((0..total).collect()));
        let (tx, mut rx) = mpsc::unbounded_channel::<FetchResult>();

        let workers = self.max_workers.min(total);
        tracing::debug!("Spawning {} fetch workers for {} addresses", workers, total);

        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let client = Arc::clone(&self.client);
            let entries = Arc::clone(&entries);
            let queue = Arc::clone(&queue);
            let tx = tx.clone();

            handles.push(tokio::spawn(async move {
                loop {
                    let next = queue.lock().await.pop_front();
                    let Some(index) = next else {
                        break;
                    };

                    let entry = entries[index].clone();
                    let result = run_isolated(Arc::clone(&client), index, entry).await;
                    if tx.send(result).is_err() {
                        tracing::debug!("Worker {}: collector closed, stopping", worker_id);
                        break;
                    }
                }
            }));
        }
        // Only the workers hold senders now; the channel closes when the
        // last worker exits.
        drop(tx);

        let mut results = Vec::with_capacity(total);
        while let Some(result) = rx.recv().await {
            log_completion(&result, results.len() + 1, total);
            results.push(result);
        }

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!("Fetch worker terminated abnormally: {}", e);
            }
        }

        // Task panics are caught per entry, so this only triggers if a worker
        // itself died. Every entry is still accounted for exactly once.
        if results.len() < total {
            let seen: HashSet<usize> = results.iter().map(|r| r.index).collect();
            for (index, entry) in entries.iter().enumerate() {
                if !seen.contains(&index) {
                    results.push(FetchResult {
                        index,
                        entry: entry.clone(),
                        outcome: Err(FetchError::Internal(
                            "fetch task aborted before completing".to_string(),
                        )),
                    });
                }
            }
        }

        results
    }
}

/// Run one fetch task on its own tokio task so a panic stays with the entry
/// that caused it. The calling worker survives and keeps draining the queue.
async fn run_isolated<C: ChainQuery + 'static>(
    client: Arc<C>,
    index: usize,
    entry: AddressEntry,
) -> FetchResult {
    let task_entry = entry.clone();
    let task = tokio::spawn(async move { fetch_entry(client.as_ref(), index, task_entry).await });

    match task.await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(
                "Fetch task for {} ({}) terminated abnormally: {}",
                entry.address,
                entry.role,
                e
            );
            FetchResult {
                index,
                entry,
                outcome: Err(FetchError::Internal(format!("fetch task panicked: {}", e))),
            }
        }
    }
}

fn log_completion(result: &FetchResult, completed: usize, total: usize) {
    match &result.outcome {
        Ok(_) => tracing::debug!(
            "{} {}/{}: {}... done",
            result.entry.role.title(),
            completed,
            total,
            result.entry.address
        ),
        Err(e) => tracing::warn!(
            "{} {}/{}: {} failed: {}",
            result.entry.role.title(),
            completed,
            total,
            result.entry.address,
            e
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;
    use crate::role::Role;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Stub client that tracks how many calls are in flight at once.
    #[derive(Default)]
    struct GaugeClient {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    impl GaugeClient {
        async fn enter(&self) {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl ChainQuery for GaugeClient {
        async fn get_liquid_balance(&self, address: &str) -> Result<Amount, FetchError> {
            self.enter().await;
            if address.starts_with("bad") {
                return Err(FetchError::Network("connection refused".to_string()));
            }
            Ok(Amount::from_base_units(1))
        }

        async fn get_stake(&self, _address: &str, _role: Role) -> Result<Amount, FetchError> {
            self.enter().await;
            Ok(Amount::from_base_units(2))
        }

        async fn get_commission(&self, _address: &str) -> Result<Amount, FetchError> {
            self.enter().await;
            Ok(Amount::zero())
        }

        async fn get_rewards(&self, _address: &str) -> Result<Amount, FetchError> {
            self.enter().await;
            Ok(Amount::zero())
        }
    }

    fn entries(n: usize, role: Role) -> Vec<AddressEntry> {
        (0..n)
            .map(|i| AddressEntry::new(format!("pokt1addr{}", i), role))
            .collect()
    }

    #[test]
    fn test_zero_workers_rejected() {
        let result = FetchScheduler::new(Arc::new(GaugeClient::default()), 0);
        assert!(matches!(result, Err(TreasuryError::Config(_))));
    }

    #[tokio::test]
    async fn test_empty_input_returns_immediately() {
        let client = Arc::new(GaugeClient::default());
        let scheduler = FetchScheduler::new(Arc::clone(&client), 4).unwrap();
        assert!(scheduler.run(Vec::new()).await.is_empty());
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_worker_bound_respected() {
        for max_workers in [1, 3, 8] {
            let client = Arc::new(GaugeClient::default());
            let scheduler = FetchScheduler::new(Arc::clone(&client), max_workers).unwrap();
            let results = scheduler.run(entries(40, Role::NodeStake)).await;

            assert_eq!(results.len(), 40);
            let peak = client.peak.load(Ordering::SeqCst);
            assert!(peak >= 1);
            assert!(
                peak <= max_workers,
                "peak {} exceeded bound {}",
                peak,
                max_workers
            );
            // liquid + stake per node entry
            assert_eq!(client.calls.load(Ordering::SeqCst), 80);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_one_result_per_entry() {
        let client = Arc::new(GaugeClient::default());
        let scheduler = FetchScheduler::new(client, 5).unwrap();
        let results = scheduler.run(entries(23, Role::Liquid)).await;

        let mut indices: Vec<usize> = results.iter().map(|r| r.index).collect();
        indices.sort();
        assert_eq!(indices, (0..23).collect::<Vec<_>>());
        for r in &results {
            assert_eq!(r.entry.address, format!("pokt1addr{}", r.index));
        }
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_batch() {
        let mut batch = entries(6, Role::Liquid);
        batch[1].address = "bad1".to_string();
        batch[4].address = "bad4".to_string();

        let scheduler = FetchScheduler::new(Arc::new(GaugeClient::default()), 2).unwrap();
        let results = scheduler.run(batch).await;

        assert_eq!(results.len(), 6);
        let failed: Vec<usize> = {
            let mut v: Vec<usize> = results
                .iter()
                .filter(|r| !r.is_ok())
                .map(|r| r.index)
                .collect();
            v.sort();
            v
        };
        assert_eq!(failed, vec![1, 4]);
    }

    /// Stub client that panics on one address.
    struct PanickyClient;

    #[async_trait]
    impl ChainQuery for PanickyClient {
        async fn get_liquid_balance(&self, address: &str) -> Result<Amount, FetchError> {
            if address == "boom" {
                panic!("decoder blew up on {}", address);
            }
            Ok(Amount::from_base_units(7))
        }

        async fn get_stake(&self, _address: &str, _role: Role) -> Result<Amount, FetchError> {
            Ok(Amount::zero())
        }

        async fn get_commission(&self, _address: &str) -> Result<Amount, FetchError> {
            Ok(Amount::zero())
        }

        async fn get_rewards(&self, _address: &str) -> Result<Amount, FetchError> {
            Ok(Amount::zero())
        }
    }

    #[tokio::test]
    async fn test_panic_affects_only_its_entry() {
        let batch: Vec<AddressEntry> = ["a", "boom", "b", "c"]
            .iter()
            .map(|a| AddressEntry::new(*a, Role::Liquid))
            .collect();

        let scheduler = FetchScheduler::new(Arc::new(PanickyClient), 1).unwrap();
        let mut results = scheduler.run(batch).await;
        results.sort_by_key(|r| r.index);

        assert_eq!(results.len(), 4);
        assert!(matches!(results[1].outcome, Err(FetchError::Internal(_))));
        assert_eq!(results[1].entry.address, "boom");
        for i in [0, 2, 3] {
            let components = results[i].outcome.as_ref().unwrap();
            assert_eq!(components.liquid.base_units, 7);
        }
    }

    #[tokio::test]
    async fn test_more_workers_than_entries() {
        let scheduler = FetchScheduler::new(Arc::new(GaugeClient::default()), 50).unwrap();
        let results = scheduler.run(entries(3, Role::AppStake)).await;
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.is_ok()));
    }
}
