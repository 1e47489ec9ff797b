//! JSON-RPC 2.0 client for the node's HTTP endpoint.

use super::{AccountRpc, RpcError};
use log::debug;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcResponseError>,
}

#[derive(Debug, Deserialize)]
struct RpcResponseError {
    code: i64,
    message: String,
}

/// [`AccountRpc`] over the `personal_*` JSON-RPC namespace
#[derive(Debug)]
pub struct HttpAccountRpc {
    url: String,
    http_client: Client,
    next_id: AtomicU64,
}

impl HttpAccountRpc {
    pub fn new(url: impl Into<String>) -> Result<Self, RpcError> {
        Self::with_timeout(url, DEFAULT_HTTP_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RpcError::Transport(e.to_string()))?;
        Ok(Self {
            url: url.into(),
            http_client,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!("RPC {} (id {})", method, id);

        let response: RpcResponse = self
            .http_client
            .post(&self.url)
            .json(&request)
            .send()
            .map_err(|e| RpcError::Transport(e.to_string()))?
            .json()
            .map_err(|e| RpcError::InvalidResponse(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(RpcError::Remote {
                code: error.code,
                message: error.message,
            });
        }
        let result = response
            .result
            .ok_or_else(|| RpcError::InvalidResponse(format!("{} returned no result", method)))?;
        serde_json::from_value(result).map_err(|e| RpcError::InvalidResponse(e.to_string()))
    }
}

impl AccountRpc for HttpAccountRpc {
    fn list_accounts(&self) -> Result<Vec<String>, RpcError> {
        self.call("personal_listAccounts", json!([]))
    }

    fn create_account(&self, password: &str) -> Result<String, RpcError> {
        self.call("personal_newAccount", json!([password]))
    }

    fn unlock_account(
        &self,
        address: &str,
        password: &str,
        duration_secs: u64,
    ) -> Result<bool, RpcError> {
        self.call("personal_unlockAccount", json!([address, password, duration_secs]))
    }
}
