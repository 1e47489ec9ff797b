//! Account management over the node's RPC interface.
//!
//! [`AccountRpc`] is the only view of the node the provisioner has. The
//! production implementation is [`HttpAccountRpc`]; tests use in-memory fakes.

pub mod http;

pub use http::HttpAccountRpc;

/// Errors returned by an [`AccountRpc`] call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RpcError {
    #[error("HTTP error: {0}")]
    Transport(String),

    #[error("RPC error {code}: {message}")]
    Remote { code: i64, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Account operations exposed by a running node
pub trait AccountRpc {
    /// Addresses of all accounts the node manages
    fn list_accounts(&self) -> Result<Vec<String>, RpcError>;

    /// Create an account protected by `password` and return its address
    fn create_account(&self, password: &str) -> Result<String, RpcError>;

    /// Unlock `address` for `duration_secs` seconds; 0 means no expiry
    fn unlock_account(
        &self,
        address: &str,
        password: &str,
        duration_secs: u64,
    ) -> Result<bool, RpcError>;
}
