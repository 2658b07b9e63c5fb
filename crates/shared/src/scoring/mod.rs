use crate::models::{Score, WalletData};
use crate::web3::connection::ConnectionError;
use alloy::primitives::Address;
use async_trait::async_trait;
use thiserror::Error;

pub mod http;

pub use http::{HttpScorer, HttpScorerFactory};

pub const MAX_SCORE: Score = 1000.0;

#[derive(Debug, Error)]
pub enum ScorerError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    #[error("scoring service request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("scoring service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("score {0} is outside [0, 1000]")]
    InvalidScore(Score),
}

/// Feature extraction and score prediction for a single wallet.
///
/// Implementations are opaque to the analyzer; it only relies on these two
/// calls. `fetch_wallet_data` returns `Ok(None)` when the wallet has no
/// usable history.
#[async_trait]
pub trait CreditScorer: Send + Sync {
    async fn fetch_wallet_data(&self, address: Address) -> Result<Option<WalletData>, ScorerError>;

    async fn predict_score(&self, wallet_data: &WalletData) -> Result<Score, ScorerError>;
}

/// Produces scorers bound to a fresh chain connection.
#[async_trait]
pub trait ScorerFactory: Send + Sync {
    /// Checks that the chain endpoint is reachable, returning its chain id.
    async fn verify_endpoint(&self) -> Result<u64, ScorerError>;

    async fn connect(&self) -> Result<Box<dyn CreditScorer>, ScorerError>;
}

pub(crate) fn check_score_range(score: Score) -> Result<Score, ScorerError> {
    if score.is_finite() && (0.0..=MAX_SCORE).contains(&score) {
        Ok(score)
    } else {
        Err(ScorerError::InvalidScore(score))
    }
}
