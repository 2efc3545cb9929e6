// crates/pocketknife-chain/src/client.rs
//
// LCD REST client for Pocket Network chain state.
// Uses reqwest to query the Cosmos SDK gRPC-gateway of a poktroll node.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use pocketknife_core::{Amount, ChainQuery, FetchError, Role};

use crate::bech32;
use crate::responses::{
    parse_int_amount, sum_coins, sum_dec_coins, ApplicationResponse, BalanceResponse,
    CommissionResponse, DelegationsResponse, RewardsResponse, SupplierResponse,
    ValidatorResponse,
};

/// Default public REST endpoint for Pocket Network mainnet.
pub const DEFAULT_ENDPOINT: &str = "https://shannon-grove-api.mainnet.poktroll.com";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const DELEGATIONS_PAGE_LIMIT: u32 = 1000;
const MAX_DELEGATION_PAGES: usize = 100;

/// Connection settings for the LCD client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcdConfig {
    /// Base URL of the REST gateway.
    pub endpoint: String,
    /// Base denom to read balances in (e.g. "upokt").
    pub denom: String,
    /// Bech32 prefix of account addresses.
    pub account_prefix: String,
    /// Bech32 prefix of validator operator addresses.
    pub validator_prefix: String,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

impl Default for LcdConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            denom: "upokt".to_string(),
            account_prefix: "pokt".to_string(),
            validator_prefix: "poktvaloper".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Chain query client backed by the REST gateway.
///
/// Cheap to clone; the inner `reqwest::Client` is a shared connection pool
/// and no call mutates client state, so one instance serves every worker.
#[derive(Debug, Clone)]
pub struct LcdClient {
    base_url: String,
    config: LcdConfig,
    client: reqwest::Client,
}

impl LcdClient {
    /// Create a client for the given configuration.
    pub fn new(config: LcdConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            config,
            client,
        })
    }

    pub fn config(&self) -> &LcdConfig {
        &self.config
    }

    /// GET `path` and decode the JSON body.
    ///
    /// Returns `Ok(None)` on HTTP 404 so callers can decide whether a
    /// missing record means zero or an error.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, FetchError> {
        self.get_json_with_query(path, &[]).await
    }

    /// Like `get_json`, with URL-encoded query parameters appended.
    async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::trace!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, body));
        }

        let parsed = response
            .json::<T>()
            .await
            .map_err(|e| FetchError::InvalidResponse(format!("{}: {}", path, e)))?;
        Ok(Some(parsed))
    }

    async fn application_stake(&self, address: &str) -> Result<Amount, FetchError> {
        let path = format!("/pokt-network/poktroll/application/application/{}", address);
        match self.get_json::<ApplicationResponse>(&path).await? {
            Some(resp) => sum_coins(resp.application.stake.as_ref(), &self.config.denom),
            None => Ok(Amount::zero()),
        }
    }

    async fn supplier_stake(&self, address: &str) -> Result<Amount, FetchError> {
        let path = format!("/pokt-network/poktroll/supplier/supplier/{}", address);
        match self.get_json::<SupplierResponse>(&path).await? {
            Some(resp) => sum_coins(resp.supplier.stake.as_ref(), &self.config.denom),
            None => Ok(Amount::zero()),
        }
    }

    async fn validator_tokens(&self, address: &str) -> Result<Amount, FetchError> {
        let path = format!("/cosmos/staking/v1beta1/validators/{}", address);
        let resp = self
            .get_json::<ValidatorResponse>(&path)
            .await?
            .ok_or_else(|| FetchError::NotFound(format!("validator {}", address)))?;
        parse_int_amount(&resp.validator.tokens)
    }

    /// Sum delegations across every page of the delegations listing.
    async fn delegated_stake(&self, address: &str) -> Result<Amount, FetchError> {
        let path = format!("/cosmos/staking/v1beta1/delegations/{}", address);
        let limit = DELEGATIONS_PAGE_LIMIT.to_string();
        let mut total = Amount::zero();
        let mut next_key: Option<String> = None;

        for _ in 0..MAX_DELEGATION_PAGES {
            let mut query = Vec::with_capacity(2);
            if let Some(key) = next_key.as_deref() {
                query.push(("pagination.key", key));
            }
            query.push(("pagination.limit", limit.as_str()));

            let Some(resp) = self
                .get_json_with_query::<DelegationsResponse>(&path, &query)
                .await?
            else {
                return Ok(total);
            };

            total += sum_coins(
                resp.delegation_responses
                    .iter()
                    .filter_map(|d| d.balance.as_ref()),
                &self.config.denom,
            )?;

            match resp.next_key() {
                Some(key) => next_key = Some(key.to_string()),
                None => return Ok(total),
            }
        }

        Err(FetchError::InvalidResponse(format!(
            "delegations for {} exceed {} pages",
            address, MAX_DELEGATION_PAGES
        )))
    }
}

#[async_trait]
impl ChainQuery for LcdClient {
    async fn get_liquid_balance(&self, address: &str) -> Result<Amount, FetchError> {
        check_path_safe(address)?;
        let path = format!("/cosmos/bank/v1beta1/balances/{}/by_denom", address);
        let query = [("denom", self.config.denom.as_str())];
        match self
            .get_json_with_query::<BalanceResponse>(&path, &query)
            .await?
        {
            Some(resp) => sum_coins(resp.balance.as_ref(), &self.config.denom),
            None => Err(FetchError::NotFound(format!("account {}", address))),
        }
    }

    async fn get_stake(&self, address: &str, role: Role) -> Result<Amount, FetchError> {
        check_path_safe(address)?;
        match role {
            Role::Liquid => Ok(Amount::zero()),
            Role::AppStake => self.application_stake(address).await,
            Role::NodeStake => self.supplier_stake(address).await,
            Role::ValidatorStake => self.validator_tokens(address).await,
            Role::DelegatorStake => self.delegated_stake(address).await,
        }
    }

    async fn get_commission(&self, address: &str) -> Result<Amount, FetchError> {
        check_path_safe(address)?;
        let path = format!(
            "/cosmos/distribution/v1beta1/validators/{}/commission",
            address
        );
        match self.get_json::<CommissionResponse>(&path).await? {
            Some(resp) => match resp.commission {
                Some(c) => sum_dec_coins(&c.commission, &self.config.denom),
                None => Ok(Amount::zero()),
            },
            None => Ok(Amount::zero()),
        }
    }

    async fn get_rewards(&self, address: &str) -> Result<Amount, FetchError> {
        check_path_safe(address)?;
        let path = format!(
            "/cosmos/distribution/v1beta1/delegators/{}/rewards",
            address
        );
        match self.get_json::<RewardsResponse>(&path).await? {
            Some(resp) => resp.total_in(&self.config.denom),
            None => Ok(Amount::zero()),
        }
    }

    fn account_address(&self, operator_address: &str) -> Result<String, FetchError> {
        bech32::convert_prefix(
            operator_address,
            &self.config.validator_prefix,
            &self.config.account_prefix,
        )
        .map_err(|e| FetchError::MalformedAddress(format!("{}: {}", operator_address, e)))
    }
}

/// Addresses are interpolated into URL paths; only bech32-ish characters
/// are allowed through.
fn check_path_safe(address: &str) -> Result<(), FetchError> {
    if address.is_empty() || !address.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(FetchError::MalformedAddress(address.to_string()));
    }
    Ok(())
}

fn map_send_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout(e.to_string())
    } else {
        FetchError::Network(e.to_string())
    }
}

fn map_status_error(status: StatusCode, body: String) -> FetchError {
    let lower = body.to_ascii_lowercase();
    if lower.contains("bech32") || lower.contains("invalid address") {
        return FetchError::MalformedAddress(body.trim().to_string());
    }
    FetchError::Http {
        status: status.as_u16(),
        body: body.trim().to_string(),
    }
}
