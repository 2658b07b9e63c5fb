use super::{check_score_range, CreditScorer, ScorerError, ScorerFactory};
use crate::models::{Score, WalletData};
use crate::web3::address::checksummed;
use crate::web3::connection::RpcConnection;
use alloy::primitives::Address;
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ScoreResponse {
    score: Score,
}

/// Scorer backed by a remote scoring service.
///
/// `GET {base}/wallets/{address}?chain_id={id}` returns the wallet features
/// (404 or 204 when the wallet has no history) and `POST {base}/score` turns
/// them into a score.
pub struct HttpScorer {
    client: Client,
    base_url: String,
    chain_id: u64,
}

impl HttpScorer {
    pub fn new(client: Client, base_url: &Url, chain_id: u64) -> Self {
        Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            chain_id,
        }
    }

    async fn error_from_response(response: reqwest::Response) -> ScorerError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "No error message".to_string());
        ScorerError::Status { status, body }
    }
}

#[async_trait]
impl CreditScorer for HttpScorer {
    async fn fetch_wallet_data(&self, address: Address) -> Result<Option<WalletData>, ScorerError> {
        let request_url = format!("{}/wallets/{}", self.base_url, checksummed(&address));
        let response = self
            .client
            .get(&request_url)
            .query(&[("chain_id", self.chain_id)])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::NO_CONTENT => {
                debug!("No wallet data for {address}");
                Ok(None)
            }
            status if status.is_success() => Ok(Some(response.json::<WalletData>().await?)),
            _ => Err(Self::error_from_response(response).await),
        }
    }

    async fn predict_score(&self, wallet_data: &WalletData) -> Result<Score, ScorerError> {
        let request_url = format!("{}/score", self.base_url);
        let response = self
            .client
            .post(&request_url)
            .json(wallet_data)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body: ScoreResponse = response.json().await?;
        check_score_range(body.score)
    }
}

/// Connects to the RPC endpoint on every `connect` call and hands out an
/// [`HttpScorer`] tied to the resulting chain id.
#[derive(Clone)]
pub struct HttpScorerFactory {
    rpc_url: Url,
    scorer_url: Url,
    client: Client,
}

impl HttpScorerFactory {
    pub fn new(rpc_url: Url, scorer_url: Url) -> Result<Self, ScorerError> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(format!("wallet-analyzer/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            rpc_url,
            scorer_url,
            client,
        })
    }
}

#[async_trait]
impl ScorerFactory for HttpScorerFactory {
    async fn verify_endpoint(&self) -> Result<u64, ScorerError> {
        let connection = RpcConnection::connect(self.rpc_url.clone()).await?;
        Ok(connection.chain_id())
    }

    async fn connect(&self) -> Result<Box<dyn CreditScorer>, ScorerError> {
        let connection = RpcConnection::connect(self.rpc_url.clone()).await?;
        Ok(Box::new(HttpScorer::new(
            self.client.clone(),
            &self.scorer_url,
            connection.chain_id(),
        )))
    }
}
