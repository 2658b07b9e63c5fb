pub mod cache;
pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod intake;
pub mod operations;
pub mod orchestrator;
pub mod report;
pub mod stats;
pub mod utils;

pub use cli::Cli;
pub use utils::logging::setup_logging;
