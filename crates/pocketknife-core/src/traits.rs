// crates/pocketknife-core/src/traits.rs

use async_trait::async_trait;

use crate::amount::Amount;
use crate::error::FetchError;
use crate::role::Role;

/// Read-only access to chain state for a single address.
///
/// Implemented by pocketknife-chain (LCD REST backend). Implementations are
/// shared across scheduler workers, so every call must be safe to run
/// concurrently with any other. Per-request timeouts belong here and surface
/// as `FetchError::Timeout`.
#[async_trait]
pub trait ChainQuery: Send + Sync {
    /// Spendable balance of an account address.
    async fn get_liquid_balance(&self, address: &str) -> Result<Amount, FetchError>;

    /// Stake held by `address` in `role`: application stake, supplier
    /// stake, validator bonded tokens, or total delegated stake.
    /// Zero for `Role::Liquid`.
    async fn get_stake(&self, address: &str, role: Role) -> Result<Amount, FetchError>;

    /// Outstanding commission of a validator operator address.
    async fn get_commission(&self, address: &str) -> Result<Amount, FetchError>;

    /// Outstanding delegation rewards of an account address.
    async fn get_rewards(&self, address: &str) -> Result<Amount, FetchError>;

    /// Map an operator address to the account address that holds its liquid
    /// balance. Backends without a separate operator form return the input.
    fn account_address(&self, operator_address: &str) -> Result<String, FetchError> {
        Ok(operator_address.to_string())
    }
}
