// crates/pocketknife-chain/src/responses.rs
//
// Response bodies of the Cosmos SDK / poktroll REST gateway, and the
// decoding of their coin amounts into base units.
//
// Only the fields the treasury needs are modelled; everything else in the
// payloads is ignored.

use serde::Deserialize;

use pocketknife_core::{Amount, FetchError};

/// An integer coin, e.g. `{"denom": "upokt", "amount": "1000000"}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

/// A decimal coin as used by the distribution module.
///
/// The gateway returns `{"denom", "amount"}` objects with 18 decimal places;
/// `pocketd` text output uses the compact `"123.45upokt"` form. Both are
/// accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DecCoin {
    Object { denom: String, amount: String },
    Compact(String),
}

#[derive(Debug, Deserialize)]
pub struct BalanceResponse {
    pub balance: Option<Coin>,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationResponse {
    pub application: StakedActor,
}

#[derive(Debug, Deserialize)]
pub struct SupplierResponse {
    pub supplier: StakedActor,
}

/// Application or supplier record; both carry a single `stake` coin.
#[derive(Debug, Deserialize)]
pub struct StakedActor {
    pub stake: Option<Coin>,
}

#[derive(Debug, Deserialize)]
pub struct ValidatorResponse {
    pub validator: Validator,
}

#[derive(Debug, Deserialize)]
pub struct Validator {
    #[serde(default)]
    pub tokens: String,
}

#[derive(Debug, Deserialize)]
pub struct DelegationsResponse {
    #[serde(default)]
    pub delegation_responses: Vec<DelegationResponse>,
    #[serde(default)]
    pub pagination: Option<PageResponse>,
}

impl DelegationsResponse {
    /// Key of the next page, if the listing continues.
    pub fn next_key(&self) -> Option<&str> {
        self.pagination
            .as_ref()
            .and_then(|p| p.next_key.as_deref())
            .filter(|k| !k.is_empty())
    }
}

/// Cosmos SDK pagination trailer.
#[derive(Debug, Deserialize)]
pub struct PageResponse {
    #[serde(default)]
    pub next_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DelegationResponse {
    pub balance: Option<Coin>,
}

#[derive(Debug, Deserialize)]
pub struct CommissionResponse {
    pub commission: Option<ValidatorCommission>,
}

#[derive(Debug, Deserialize)]
pub struct ValidatorCommission {
    #[serde(default)]
    pub commission: Vec<DecCoin>,
}

#[derive(Debug, Deserialize)]
pub struct RewardsResponse {
    #[serde(default)]
    pub rewards: Vec<DelegatorReward>,
    #[serde(default)]
    pub total: Vec<DecCoin>,
}

#[derive(Debug, Deserialize)]
pub struct DelegatorReward {
    #[serde(default)]
    pub reward: Vec<DecCoin>,
}

/// Parse an integer amount string. Empty means zero.
pub fn parse_int_amount(raw: &str) -> Result<Amount, FetchError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Amount::zero());
    }
    raw.parse::<u128>()
        .map(Amount::from_base_units)
        .map_err(|e| FetchError::InvalidResponse(format!("bad amount '{}': {}", raw, e)))
}

/// Parse a decimal amount string, truncating the fraction to whole base
/// units ("300491.883966650000000000" -> 300491).
pub fn parse_dec_amount(raw: &str) -> Result<Amount, FetchError> {
    let raw = raw.trim();
    let (whole, frac) = raw.split_once('.').unwrap_or((raw, ""));
    if !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(FetchError::InvalidResponse(format!(
            "bad decimal amount '{}'",
            raw
        )));
    }
    parse_int_amount(whole)
}

/// Sum of integer coins in `denom`, ignoring other denoms.
pub fn sum_coins<'a>(
    coins: impl IntoIterator<Item = &'a Coin>,
    denom: &str,
) -> Result<Amount, FetchError> {
    let mut total = Amount::zero();
    for coin in coins {
        if coin.denom == denom {
            total += parse_int_amount(&coin.amount)?;
        }
    }
    Ok(total)
}

/// Sum of decimal coins in `denom`, ignoring other denoms.
pub fn sum_dec_coins<'a>(
    coins: impl IntoIterator<Item = &'a DecCoin>,
    denom: &str,
) -> Result<Amount, FetchError> {
    let mut total = Amount::zero();
    for coin in coins {
        let amount = match coin {
            DecCoin::Object { denom: d, amount } if d == denom => amount.as_str(),
            DecCoin::Compact(s) => match s.strip_suffix(denom) {
                Some(amount) => amount,
                None => continue,
            },
            _ => continue,
        };
        total += parse_dec_amount(amount)?;
    }
    Ok(total)
}

impl RewardsResponse {
    /// Total rewards in `denom`. Uses the `total` field when present and
    /// falls back to summing the per-validator entries.
    pub fn total_in(&self, denom: &str) -> Result<Amount, FetchError> {
        if !self.total.is_empty() {
            return sum_dec_coins(&self.total, denom);
        }
        sum_dec_coins(self.rewards.iter().flat_map(|r| r.reward.iter()), denom)
    }
}
