use crate::report::render_report;
use alloy::primitives::Address;
use log::{debug, warn};
use shared::models::Score;
use shared::scoring::{ScorerError, ScorerFactory};
use shared::web3::address::checksummed;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per wallet, including the first one.
    pub max_retries: u32,
    /// Base backoff; attempt `n` waits `retry_delay * n` before the next try.
    pub retry_delay: Duration,
    /// Upper bound for a single attempt. `None` waits indefinitely.
    pub attempt_timeout: Option<Duration>,
}

impl RetryPolicy {
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    pub fn backoff(&self, attempt: u32) -> Duration {
        self.retry_delay * attempt
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    Scored {
        address: String,
        report: String,
        score: Score,
    },
    /// The scorer had nothing on this wallet.
    NoData { address: String },
    /// Every attempt failed.
    Failed {
        address: String,
        attempts: u32,
        error: String,
    },
}

impl TaskOutcome {
    pub fn address(&self) -> &str {
        match self {
            Self::Scored { address, .. } | Self::NoData { address } | Self::Failed { address, .. } => {
                address
            }
        }
    }
}

#[derive(Debug)]
enum AttemptError {
    Scorer(ScorerError),
    TimedOut(Duration),
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptError::Scorer(e) => write!(f, "{e}"),
            AttemptError::TimedOut(limit) => write!(f, "attempt timed out after {limit:?}"),
        }
    }
}

async fn score_wallet(
    address: Address,
    factory: &dyn ScorerFactory,
) -> Result<Option<(String, Score)>, ScorerError> {
    let scorer = factory.connect().await?;

    let Some(wallet_data) = scorer.fetch_wallet_data(address).await? else {
        return Ok(None);
    };

    let score = scorer.predict_score(&wallet_data).await?;
    let report = render_report(&checksummed(&address), &wallet_data, score);
    Ok(Some((report, score)))
}

async fn run_attempt(
    address: Address,
    factory: &dyn ScorerFactory,
    attempt_timeout: Option<Duration>,
) -> Result<Option<(String, Score)>, AttemptError> {
    match attempt_timeout {
        Some(limit) => match tokio::time::timeout(limit, score_wallet(address, factory)).await {
            Ok(result) => result.map_err(AttemptError::Scorer),
            Err(_) => Err(AttemptError::TimedOut(limit)),
        },
        None => score_wallet(address, factory)
            .await
            .map_err(AttemptError::Scorer),
    }
}

/// Scores one wallet, retrying with linear backoff.
///
/// Every attempt opens its own scorer connection. A wallet without data ends
/// the task at once. Errors never escape; they end up in
/// [`TaskOutcome::Failed`].
pub async fn process_wallet(
    address: Address,
    factory: &dyn ScorerFactory,
    policy: &RetryPolicy,
) -> TaskOutcome {
    let address_str = checksummed(&address);
    let attempts = policy.attempts();
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        match run_attempt(address, factory, policy.attempt_timeout).await {
            Ok(Some((report, score))) => {
                debug!("Scored {address_str}: {score:.1}");
                return TaskOutcome::Scored {
                    address: address_str,
                    report,
                    score,
                };
            }
            Ok(None) => {
                debug!("No wallet data for {address_str}");
                return TaskOutcome::NoData {
                    address: address_str,
                };
            }
            Err(e) => {
                last_error = e.to_string();
                if attempt < attempts {
                    let delay = policy.backoff(attempt);
                    debug!(
                        "Attempt {attempt}/{attempts} for {address_str} failed: {e}; retrying in {delay:?}"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    warn!("Failed to process {address_str} after {attempts} attempts: {last_error}");
    TaskOutcome::Failed {
        address: address_str,
        attempts,
        error: last_error,
    }
}
