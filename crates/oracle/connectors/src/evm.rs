use oracle_codec::text::truncate;
use oracle_codec::{RpcCall, RpcReply};
use oracle_consensus::{HttpClient, HttpRequest};
use oracle_types::OracleError;

/// JSON-RPC endpoint of an EVM chain.
#[derive(Debug, Clone)]
pub struct EvmRpc {
    url: String,
}

impl EvmRpc {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue one call. Reverts come back as [`RpcReply::Error`]; only
    /// transport failures and undecodable bodies are errors.
    pub async fn call(&self, http: &dyn HttpClient, call: &RpcCall) -> Result<RpcReply, OracleError> {
        let response = http
            .send(HttpRequest::post_json(&self.url, call.to_body()))
            .await?;
        if !response.is_success() {
            return Err(OracleError::upstream(
                &self.url,
                format!(
                    "{} returned {}: {}",
                    call.method(),
                    response.status,
                    truncate(&response.text(), 320)
                ),
            ));
        }
        RpcReply::decode(&response.body).map_err(|e| OracleError::upstream(&self.url, e.to_string()))
    }
}
