pub mod wallet;

pub use wallet::{InteractionCount, Score, SecurityData, WalletData};
