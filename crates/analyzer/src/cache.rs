use crate::error::AnalyzerError;
use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Addresses handled by earlier runs.
///
/// An address is in at most one of the two sets. Anything in either set is
/// skipped on the next run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cache {
    #[serde(default)]
    processed: BTreeSet<String>,
    #[serde(default)]
    failed: BTreeSet<String>,
}

impl Cache {
    /// Loads the cache at `path`. A missing file is an empty cache, a file
    /// that does not parse is an error.
    pub fn load(path: &Path) -> Result<Self, AnalyzerError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No cache file at {path:?}, starting empty");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(AnalyzerError::CacheRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let mut cache: Cache =
            serde_json::from_str(&contents).map_err(|source| AnalyzerError::CorruptCache {
                path: path.to_path_buf(),
                source,
            })?;

        // Older files may list an address in both sets; processed wins.
        let processed = cache.processed.clone();
        cache.failed.retain(|address| !processed.contains(address));

        debug!(
            "Loaded cache from {path:?}: {} processed, {} failed",
            cache.processed.len(),
            cache.failed.len()
        );
        Ok(cache)
    }

    /// Writes the cache to `path` through a temp file in the same directory,
    /// so a crash leaves either the old or the new contents.
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {dir:?}"))?;

        let json = serde_json::to_string_pretty(self)?;
        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in {dir:?}"))?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path)
            .with_context(|| format!("Failed to replace cache file {path:?}"))?;

        debug!("Saved cache to {path:?}");
        Ok(())
    }

    pub fn is_known(&self, address: &str) -> bool {
        self.processed.contains(address) || self.failed.contains(address)
    }

    pub fn mark_processed(&mut self, address: &str) {
        self.failed.remove(address);
        self.processed.insert(address.to_string());
    }

    pub fn mark_failed(&mut self, address: &str) {
        self.processed.remove(address);
        self.failed.insert(address.to_string());
    }

    pub fn processed(&self) -> &BTreeSet<String> {
        &self.processed
    }

    pub fn failed(&self) -> &BTreeSet<String> {
        &self.failed
    }
}
