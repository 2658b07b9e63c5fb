pub mod models;
pub mod scoring;
pub mod utils;
pub mod web3;
