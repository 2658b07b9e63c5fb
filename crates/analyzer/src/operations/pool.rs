use super::task::{process_wallet, RetryPolicy, TaskOutcome};
use alloy::primitives::Address;
use futures::stream::{self, Stream, StreamExt};
use shared::scoring::ScorerFactory;
use tokio_util::sync::CancellationToken;

/// Runs wallet tasks with at most `workers` in flight at once.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Dispatches one task per address and yields outcomes in completion
    /// order. Once `cancel` fires no new task is started; tasks already
    /// running still report their outcome.
    pub fn dispatch<'a>(
        &self,
        addresses: Vec<Address>,
        factory: &'a dyn ScorerFactory,
        policy: &'a RetryPolicy,
        cancel: CancellationToken,
    ) -> impl Stream<Item = TaskOutcome> + 'a {
        stream::iter(addresses)
            .take_until(cancel.cancelled_owned())
            .map(move |address| process_wallet(address, factory, policy))
            .buffer_unordered(self.workers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shared::models::{Score, WalletData};
    use shared::scoring::{CreditScorer, ScorerError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Sleeps `address[19]` seconds inside `fetch_wallet_data` and tracks
    /// how many fetches overlap.
    #[derive(Default)]
    struct SlowFactory {
        in_flight: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    struct SlowScorer {
        in_flight: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CreditScorer for SlowScorer {
        async fn fetch_wallet_data(
            &self,
            address: Address,
        ) -> Result<Option<WalletData>, ScorerError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(u64::from(address[19]))).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(Some(WalletData::default()))
        }

        async fn predict_score(&self, _wallet_data: &WalletData) -> Result<Score, ScorerError> {
            Ok(500.0)
        }
    }

    #[async_trait]
    impl ScorerFactory for SlowFactory {
        async fn verify_endpoint(&self) -> Result<u64, ScorerError> {
            Ok(1)
        }

        async fn connect(&self) -> Result<Box<dyn CreditScorer>, ScorerError> {
            Ok(Box::new(SlowScorer {
                in_flight: self.in_flight.clone(),
                peak: self.peak.clone(),
            }))
        }
    }

    fn address_with_delay(secs: u8) -> Address {
        let mut bytes = [0x11u8; 20];
        bytes[19] = secs;
        Address::from(bytes)
    }

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 1,
            retry_delay: Duration::from_secs(1),
            attempt_timeout: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_respects_worker_bound() {
        let factory = SlowFactory::default();
        let policy = policy();
        let pool = WorkerPool::new(3);
        let addresses: Vec<Address> = (1..=10).map(address_with_delay).collect();

        let outcomes: Vec<TaskOutcome> = pool
            .dispatch(addresses, &factory, &policy, CancellationToken::new())
            .collect()
            .await;

        assert_eq!(outcomes.len(), 10);
        assert_eq!(factory.peak.load(Ordering::SeqCst), 3);
        assert!(outcomes
            .iter()
            .all(|o| matches!(o, TaskOutcome::Scored { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_yields_in_completion_order() {
        let factory = SlowFactory::default();
        let policy = policy();
        let pool = WorkerPool::new(3);
        let slow = address_with_delay(5);
        let medium = address_with_delay(3);
        let fast = address_with_delay(1);

        let outcomes: Vec<TaskOutcome> = pool
            .dispatch(
                vec![slow, medium, fast],
                &factory,
                &policy,
                CancellationToken::new(),
            )
            .collect()
            .await;

        let order: Vec<String> = outcomes.iter().map(|o| o.address().to_string()).collect();
        assert_eq!(
            order,
            vec![fast.to_checksum(None), medium.to_checksum(None), slow.to_checksum(None)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_pool_starts_nothing() {
        let factory = SlowFactory::default();
        let policy = policy();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcomes: Vec<TaskOutcome> = WorkerPool::new(2)
            .dispatch(vec![address_with_delay(1)], &factory, &policy, cancel)
            .collect()
            .await;

        assert!(outcomes.is_empty());
        assert_eq!(factory.peak.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_stops_after_cancel() {
        let factory = SlowFactory::default();
        let policy = policy();
        let cancel = CancellationToken::new();
        let outcomes = WorkerPool::new(1).dispatch(
            vec![address_with_delay(1), address_with_delay(2), address_with_delay(3)],
            &factory,
            &policy,
            cancel.clone(),
        );
        tokio::pin!(outcomes);

        let first = outcomes.next().await.unwrap();
        assert_eq!(first.address(), address_with_delay(1).to_checksum(None));

        // nothing is in flight between outcomes with one worker
        cancel.cancel();
        assert!(outcomes.next().await.is_none());
        assert_eq!(factory.peak.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_at_least_one_worker() {
        assert_eq!(WorkerPool::new(0).workers(), 1);
    }
}
