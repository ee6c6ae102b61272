//! Source-ledger mirror node REST client

use alloy_primitives::Address;
use oracle_codec::parse_address;
use oracle_codec::text::truncate;
use oracle_consensus::{HttpClient, HttpRequest};
use oracle_types::OracleError;
use serde::Deserialize;

/// Accounts holding none of the tracked token at one ledger timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZeroBalanceSnapshot {
    pub timestamp: String,
    /// Sorted, de-duplicated account ids.
    pub accounts: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct BalancesPage {
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    balances: Vec<TokenBalance>,
}

#[derive(Debug, Deserialize)]
struct TokenBalance {
    account: String,
    balance: u64,
}

#[derive(Debug, Deserialize)]
struct AccountInfo {
    #[serde(default)]
    evm_address: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MirrorNodeClient {
    base_url: String,
}

impl MirrorNodeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn balances_url(&self, token_id: &str, limit: u32) -> String {
        format!(
            "{}/api/v1/tokens/{token_id}/balances?account.balance=0&limit={limit}",
            self.base_url
        )
    }

    pub fn account_url(&self, account: &str) -> String {
        format!("{}/api/v1/accounts/{account}", self.base_url)
    }

    /// Accounts whose balance of `token_id` is zero.
    ///
    /// A zero balance stands in for "frozen" until the ledger exposes freeze
    /// status directly; it also matches accounts that merely sold out.
    pub async fn zero_balance_accounts(
        &self,
        http: &dyn HttpClient,
        token_id: &str,
        limit: u32,
    ) -> Result<ZeroBalanceSnapshot, OracleError> {
        let url = self.balances_url(token_id, limit);
        let page: BalancesPage = self.get_json(http, &url).await?;

        let mut accounts: Vec<String> = page
            .balances
            .into_iter()
            .filter(|b| b.balance == 0)
            .map(|b| b.account)
            .collect();
        accounts.sort();
        accounts.dedup();

        Ok(ZeroBalanceSnapshot {
            timestamp: page.timestamp.unwrap_or_default(),
            accounts,
        })
    }

    /// EVM address recorded for `account`, if the ledger knows one.
    pub async fn account_evm_address(
        &self,
        http: &dyn HttpClient,
        account: &str,
    ) -> Result<Option<Address>, OracleError> {
        let url = self.account_url(account);
        let info: AccountInfo = self.get_json(http, &url).await?;
        match info.evm_address.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => parse_address(raw)
                .map(Some)
                .map_err(|e| OracleError::upstream(&url, e.to_string())),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        http: &dyn HttpClient,
        url: &str,
    ) -> Result<T, OracleError> {
        let response = http.send(HttpRequest::get(url)).await?;
        if !response.is_success() {
            return Err(OracleError::upstream(
                url,
                format!("status {}: {}", response.status, truncate(&response.text(), 320)),
            ));
        }
        serde_json::from_slice(&response.body)
            .map_err(|e| OracleError::upstream(url, format!("invalid mirror response: {e}")))
    }
}
