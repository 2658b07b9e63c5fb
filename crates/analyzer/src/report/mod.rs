pub mod render;
pub mod writer;

pub use render::{render_report, ScoreBand};
pub use writer::{ReportWriter, SummaryRow, INVALID_ADDRESSES_FILE, SUMMARY_FILE};
