pub mod pool;
pub mod task;

pub use pool::WorkerPool;
pub use task::{process_wallet, RetryPolicy, TaskOutcome};
