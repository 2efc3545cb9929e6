// crates/pocketknife-core/src/fetch.rs
//
// One fetch task: all components for one address under its assigned role.
//
// Sub-queries run one after another inside the task so a worker never holds
// more than one connection open.

use crate::classifier::AddressEntry;
use crate::error::FetchError;
use crate::role::{Component, Components};
use crate::traits::ChainQuery;

/// Outcome of a single fetch task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// Position of the entry in classifier order.
    pub index: usize,
    pub entry: AddressEntry,
    /// Every component for the role, or the first error encountered.
    pub outcome: Result<Components, FetchError>,
}

impl FetchResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Fetch every component the entry's role needs.
///
/// Stops at the first failing sub-query; a partially fetched address is
/// never reported as a success.
pub async fn fetch_components<C>(client: &C, entry: &AddressEntry) -> Result<Components, FetchError>
where
    C: ChainQuery + ?Sized,
{
    let address = entry.address.as_str();
    let mut components = Components::default();

    for component in entry.role.components() {
        let amount = match component {
            Component::Liquid => {
                if entry.role.uses_operator_address() {
                    let account = client.account_address(address)?;
                    client.get_liquid_balance(&account).await?
                } else {
                    client.get_liquid_balance(address).await?
                }
            }
            Component::Staked => client.get_stake(address, entry.role).await?,
            Component::Commission => client.get_commission(address).await?,
            Component::Rewards => client.get_rewards(address).await?,
        };
        components.set(*component, amount);
    }

    Ok(components)
}

/// Run a fetch task and wrap it as a `FetchResult`.
pub async fn fetch_entry<C>(client: &C, index: usize, entry: AddressEntry) -> FetchResult
where
    C: ChainQuery + ?Sized,
{
    let outcome = fetch_components(client, &entry).await;
    FetchResult {
        index,
        entry,
        outcome,
    }
}
