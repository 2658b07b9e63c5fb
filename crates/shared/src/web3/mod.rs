pub mod address;
pub mod connection;

pub use address::validate_address;
pub use connection::RpcConnection;
