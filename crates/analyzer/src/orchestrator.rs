use crate::cache::Cache;
use crate::config::AnalyzerConfig;
use crate::console::Console;
use crate::error::AnalyzerError;
use crate::intake::load_wallet_addresses;
use crate::operations::{TaskOutcome, WorkerPool};
use crate::report::{ReportWriter, SummaryRow};
use crate::stats::{throughput, ScoreStats};
use alloy::primitives::Address;
use anyhow::Result;
use futures::StreamExt;
use log::{error, info, warn};
use shared::scoring::ScorerFactory;
use shared::web3::address::{checksummed, validate_address};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Addresses from the input file, split by what happens to them.
#[derive(Debug, Default)]
pub struct Intake {
    pub total: usize,
    pub already_known: usize,
    pub valid: Vec<Address>,
    pub invalid: Vec<String>,
}

/// Drops addresses the cache already knows and validates the rest.
///
/// Inputs are checked against the cache both as written and in checksummed
/// form, and two spellings of one address are dispatched once.
pub fn partition_addresses(raw: Vec<String>, cache: &Cache) -> Intake {
    let mut intake = Intake {
        total: raw.len(),
        ..Intake::default()
    };
    let mut seen = HashSet::new();

    for candidate in raw {
        if cache.is_known(&candidate) {
            intake.already_known += 1;
            continue;
        }
        match validate_address(&candidate) {
            Some(address) => {
                if cache.is_known(&checksummed(&address)) {
                    intake.already_known += 1;
                } else if seen.insert(address) {
                    intake.valid.push(address);
                }
            }
            None => intake.invalid.push(candidate),
        }
    }

    intake
}

#[derive(Debug)]
pub struct RunSummary {
    pub total_addresses: usize,
    pub already_known: usize,
    pub dispatched: usize,
    pub invalid: usize,
    pub scored: usize,
    pub no_data: usize,
    pub failed: usize,
    /// Scored wallets whose report could not be written.
    pub write_failed: usize,
    pub cancelled: bool,
    pub elapsed: Duration,
    pub stats: Option<ScoreStats>,
}

pub struct Orchestrator {
    config: AnalyzerConfig,
    factory: Box<dyn ScorerFactory>,
}

impl Orchestrator {
    pub fn new(config: AnalyzerConfig, factory: Box<dyn ScorerFactory>) -> Self {
        Self { config, factory }
    }

    /// Runs one pass over the input file.
    ///
    /// Fails on an unreachable endpoint, unreadable input or a corrupt cache.
    /// Per-wallet failures are recorded in the cache and never abort the run.
    pub async fn run(&self, cancel: CancellationToken) -> Result<RunSummary> {
        let config = &self.config;
        Console::section("WALLET CREDIT ANALYZER");

        let chain_id = self
            .factory
            .verify_endpoint()
            .await
            .map_err(|e| AnalyzerError::Connection(e.to_string()))?;
        Console::success(&format!("Connected to {} (chain id {chain_id})", config.rpc_url));

        let writer = ReportWriter::new(&config.output_dir)?;

        Console::info("Loading addresses from", &config.input_file.display().to_string());
        let raw = load_wallet_addresses(&config.input_file)?;
        let mut cache = Cache::load(&config.cache_file)?;

        let intake = partition_addresses(raw, &cache);
        Console::info("Total addresses", &intake.total.to_string());
        Console::info("Already processed", &cache.processed().len().to_string());
        Console::info("Previously failed", &cache.failed().len().to_string());
        Console::info("New valid addresses", &intake.valid.len().to_string());
        Console::info("Invalid addresses", &intake.invalid.len().to_string());

        if let Some(path) = writer.write_invalid_addresses(&intake.invalid)? {
            info!("Wrote {} invalid addresses to {path:?}", intake.invalid.len());
        }

        let pool = WorkerPool::new(config.workers);
        let policy = config.retry_policy();
        Console::section("PROCESSING WALLETS");
        Console::info("Parallel workers", &pool.workers().to_string());

        let start = Instant::now();
        let progress = Console::progress_bar(intake.valid.len() as u64);
        let mut rows: Vec<SummaryRow> = Vec::new();
        let mut dispatched = 0;
        let mut no_data = 0;
        let mut failed = 0;
        let mut write_failed = 0;

        let outcomes = pool.dispatch(intake.valid, self.factory.as_ref(), &policy, cancel.clone());
        tokio::pin!(outcomes);
        while let Some(outcome) = outcomes.next().await {
            dispatched += 1;
            match outcome {
                TaskOutcome::Scored {
                    address,
                    report,
                    score,
                } => match writer.write_report(&address, &report) {
                    Ok(_) => {
                        cache.mark_processed(&address);
                        rows.push(SummaryRow { address, score });
                    }
                    // left out of the cache so the next run retries it
                    Err(e) => {
                        write_failed += 1;
                        error!("Failed to save report for {address}: {e:#}");
                    }
                },
                TaskOutcome::NoData { address } => {
                    no_data += 1;
                    cache.mark_failed(&address);
                }
                TaskOutcome::Failed {
                    address, attempts, ..
                } => {
                    failed += 1;
                    progress.println(format!(
                        "Failed to process {address} after {attempts} attempts"
                    ));
                    cache.mark_failed(&address);
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();
        let elapsed = start.elapsed();

        let cancelled = cancel.is_cancelled();
        if cancelled {
            warn!("Run interrupted; saving progress for {dispatched} completed wallets");
        }

        cache.save(&config.cache_file)?;
        if let Some(path) = writer.write_summary(&rows)? {
            info!("Wrote summary of {} wallets to {path:?}", rows.len());
        }

        let scores: Vec<f64> = rows.iter().map(|row| row.score).collect();
        Ok(RunSummary {
            total_addresses: intake.total,
            already_known: intake.already_known,
            dispatched,
            invalid: intake.invalid.len(),
            scored: rows.len(),
            no_data,
            failed,
            write_failed,
            cancelled,
            elapsed,
            stats: ScoreStats::from_scores(&scores),
        })
    }
}

pub fn print_summary(summary: &RunSummary, config: &AnalyzerConfig) {
    if let Some(stats) = &summary.stats {
        Console::section("PROCESSING SUMMARY");
        Console::info(
            "Processed",
            &format!(
                "{} wallets in {:.1} seconds",
                summary.scored,
                summary.elapsed.as_secs_f64()
            ),
        );
        Console::info(
            "Processing speed",
            &format!(
                "{:.1} wallets/second",
                throughput(summary.scored, summary.elapsed)
            ),
        );
        Console::info("Average score", &format!("{:.1}", stats.mean));
        Console::info("Median score", &format!("{:.1}", stats.median));
        println!();
        println!("Score distribution:");
        for bucket in &stats.histogram {
            println!("  {bucket}");
        }
    }

    if summary.no_data + summary.failed > 0 {
        Console::warning(&format!(
            "{} wallets without data, {} failed after retries",
            summary.no_data, summary.failed
        ));
    }
    if summary.write_failed > 0 {
        Console::warning(&format!(
            "{} reports could not be written; those wallets will be retried next run",
            summary.write_failed
        ));
    }
    if summary.cancelled {
        Console::warning("Run was interrupted; remaining addresses will be picked up next run");
    }

    Console::section("COMPLETED");
    Console::info("Reports saved to", &config.output_dir.display().to_string());
}
