use crate::error::AnalyzerError;
use crate::operations::RetryPolicy;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";
pub const DEFAULT_SCORER_URL: &str = "http://localhost:8000";

fn default_workers() -> usize {
    // two tasks per core
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        * 2
}

/// Run settings. Resolved from defaults, then an optional TOML file, then
/// `RPC_URL` / `SCORER_URL`, then command line flags.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    pub rpc_url: String,
    pub scorer_url: String,
    pub input_file: PathBuf,
    pub output_dir: PathBuf,
    pub cache_file: PathBuf,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub workers: usize,
    /// Per-attempt limit in seconds; 0 disables it.
    pub task_timeout_secs: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            scorer_url: DEFAULT_SCORER_URL.to_string(),
            input_file: PathBuf::from("real_eth_addresses.txt"),
            output_dir: PathBuf::from("wallet_reports"),
            cache_file: PathBuf::from("processed_cache.json"),
            max_retries: 2,
            retry_delay_ms: 1000,
            workers: default_workers(),
            task_timeout_secs: 120,
        }
    }
}

impl AnalyzerConfig {
    /// Loads `path` when given, otherwise starts from defaults. Environment
    /// overrides are applied on top.
    pub fn load(path: Option<&Path>) -> Result<Self, AnalyzerError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, AnalyzerError> {
        let content = std::fs::read_to_string(path).map_err(|e| AnalyzerError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| AnalyzerError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(rpc_url) = lookup("RPC_URL") {
            self.rpc_url = rpc_url;
        }
        if let Some(scorer_url) = lookup("SCORER_URL") {
            self.scorer_url = scorer_url;
        }
    }

    pub fn rpc_url(&self) -> Result<Url> {
        Url::parse(&self.rpc_url).with_context(|| format!("Invalid RPC URL: {}", self.rpc_url))
    }

    pub fn scorer_url(&self) -> Result<Url> {
        Url::parse(&self.scorer_url)
            .with_context(|| format!("Invalid scorer URL: {}", self.scorer_url))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            attempt_timeout: (self.task_timeout_secs > 0)
                .then(|| Duration::from_secs(self.task_timeout_secs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.input_file, PathBuf::from("real_eth_addresses.txt"));
        assert_eq!(config.output_dir, PathBuf::from("wallet_reports"));
        assert_eq!(config.cache_file, PathBuf::from("processed_cache.json"));
        assert_eq!(config.max_retries, 2);
        assert!(config.workers >= 2);
        assert_eq!(config.workers % 2, 0);
    }

    #[test]
    fn test_partial_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analyzer.toml");
        std::fs::write(
            &path,
            r#"
rpc_url = "https://rpc.example.org"
max_retries = 5
workers = 3
"#,
        )
        .unwrap();

        let config = AnalyzerConfig::load_from_file(&path).unwrap();
        assert_eq!(config.rpc_url, "https://rpc.example.org");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.workers, 3);
        assert_eq!(config.retry_delay_ms, 1000);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analyzer.toml");
        std::fs::write(&path, "etherscan_key = \"abc\"\n").unwrap();

        let err = AnalyzerConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, AnalyzerError::Config { .. }));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AnalyzerConfig::load(Some(dir.path().join("nope.toml").as_path())).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [("SCORER_URL", "http://scorer:9000")].into();
        let mut config = AnalyzerConfig::default();

        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.scorer_url, "http://scorer:9000");
    }

    #[test]
    fn test_retry_policy() {
        let config = AnalyzerConfig {
            retry_delay_ms: 250,
            task_timeout_secs: 0,
            ..AnalyzerConfig::default()
        };
        let policy = config.retry_policy();
        assert_eq!(policy.retry_delay, Duration::from_millis(250));
        assert_eq!(policy.attempt_timeout, None);
        assert_eq!(policy.backoff(3), Duration::from_millis(750));
    }

    #[test]
    fn test_invalid_url() {
        let config = AnalyzerConfig {
            rpc_url: "not a url".to_string(),
            ..AnalyzerConfig::default()
        };
        assert!(config.rpc_url().is_err());
    }
}
