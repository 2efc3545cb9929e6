// crates/pocketknife-core/src/role.rs
//
// Treasury roles and the balance components each role is made of.
//
// Every role fixes which components are fetched for an address and how
// they compose into the address total:
//
//   liquid           total = liquid
//   app_stake        total = liquid + staked
//   node_stake       total = liquid + staked
//   validator_stake  total = liquid + staked + commission
//   delegator_stake  total = liquid + delegated stake + rewards

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::amount::Amount;

/// One of the five treasury categories an address is queried under.
///
/// Variant order is the canonical processing order: it decides which role
/// keeps an address declared more than once, and the order of report
/// sections.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Spendable account balance only.
    Liquid,
    /// Account staked as an application.
    AppStake,
    /// Account staked as a node (supplier).
    NodeStake,
    /// Validator operator (valoper address).
    ValidatorStake,
    /// Account delegating to validators.
    DelegatorStake,
}

impl Role {
    /// All roles in canonical processing order.
    pub const ALL: [Role; 5] = [
        Role::Liquid,
        Role::AppStake,
        Role::NodeStake,
        Role::ValidatorStake,
        Role::DelegatorStake,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Liquid => "liquid",
            Role::AppStake => "app_stake",
            Role::NodeStake => "node_stake",
            Role::ValidatorStake => "validator_stake",
            Role::DelegatorStake => "delegator_stake",
        }
    }

    /// Human-readable category name used in report headings.
    pub fn title(&self) -> &'static str {
        match self {
            Role::Liquid => "Liquid Balance",
            Role::AppStake => "App Stake",
            Role::NodeStake => "Node Stake",
            Role::ValidatorStake => "Validator Stake",
            Role::DelegatorStake => "Delegator Stake",
        }
    }

    /// The components fetched for an address under this role, in query order.
    /// Liquid is always first.
    pub fn components(&self) -> &'static [Component] {
        match self {
            Role::Liquid => &[Component::Liquid],
            Role::AppStake | Role::NodeStake => &[Component::Liquid, Component::Staked],
            Role::ValidatorStake => &[
                Component::Liquid,
                Component::Staked,
                Component::Commission,
            ],
            Role::DelegatorStake => &[Component::Liquid, Component::Staked, Component::Rewards],
        }
    }

    /// Whether addresses of this role are in operator (valoper) form.
    pub fn uses_operator_address(&self) -> bool {
        matches!(self, Role::ValidatorStake)
    }

    /// Compose an address total from its fetched components.
    pub fn total(&self, c: &Components) -> Amount {
        match self {
            Role::Liquid => c.liquid,
            Role::AppStake | Role::NodeStake => c.liquid + c.staked,
            Role::ValidatorStake => c.liquid + c.staked + c.commission,
            Role::DelegatorStake => c.liquid + c.staked + c.rewards,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "liquid" => Ok(Role::Liquid),
            "app_stake" | "app_stakes" => Ok(Role::AppStake),
            "node_stake" | "node_stakes" => Ok(Role::NodeStake),
            "validator_stake" | "validator_stakes" => Ok(Role::ValidatorStake),
            "delegator_stake" | "delegator_stakes" => Ok(Role::DelegatorStake),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// A single balance component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Liquid,
    /// Application/supplier/validator stake, or delegated stake for delegators.
    Staked,
    Commission,
    Rewards,
}

/// Fetched balance components for one address.
///
/// Components the role does not fetch stay zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Components {
    pub liquid: Amount,
    pub staked: Amount,
    pub commission: Amount,
    pub rewards: Amount,
}

impl Components {
    pub fn get(&self, component: Component) -> Amount {
        match component {
            Component::Liquid => self.liquid,
            Component::Staked => self.staked,
            Component::Commission => self.commission,
            Component::Rewards => self.rewards,
        }
    }

    pub fn set(&mut self, component: Component, amount: Amount) {
        match component {
            Component::Liquid => self.liquid = amount,
            Component::Staked => self.staked = amount,
            Component::Commission => self.commission = amount,
            Component::Rewards => self.rewards = amount,
        }
    }

    /// Add another address's components into this running sum.
    pub fn accumulate(&mut self, other: &Components) {
        self.liquid += other.liquid;
        self.staked += other.staked;
        self.commission += other.commission;
        self.rewards += other.rewards;
    }
}
