use alloy::network::Ethereum;
use alloy::providers::{Provider, RootProvider};
use std::time::Duration;
use thiserror::Error;
use url::Url;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("RPC endpoint {url} did not answer within {timeout:?}")]
    Timeout { url: Url, timeout: Duration },
    #[error("failed to connect to RPC endpoint {url}: {message}")]
    Unreachable { url: Url, message: String },
}

/// A verified HTTP JSON-RPC endpoint of an Ethereum node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpcConnection {
    chain_id: u64,
}

impl RpcConnection {
    /// Checks that the node at `url` answers `eth_chainId`.
    pub async fn connect(url: Url) -> Result<Self, ConnectionError> {
        let provider = RootProvider::<Ethereum>::new_http(url.clone());

        let chain_id = match tokio::time::timeout(CONNECT_TIMEOUT, provider.get_chain_id()).await {
            Ok(Ok(chain_id)) => chain_id,
            Ok(Err(e)) => {
                return Err(ConnectionError::Unreachable {
                    url,
                    message: e.to_string(),
                })
            }
            Err(_) => {
                return Err(ConnectionError::Timeout {
                    url,
                    timeout: CONNECT_TIMEOUT,
                })
            }
        };

        log::debug!("Connected to {url} (chain id {chain_id})");
        Ok(Self { chain_id })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }
}
