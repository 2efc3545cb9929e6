// crates/pocketknife-core/src/input.rs
//
// Treasury input document.
//
// JSON object with up to five optional address lists, one per role:
//
//   {"liquid": [...], "app_stakes": [...], "node_stakes": [...],
//    "validator_stakes": [...], "delegator_stakes": [...]}
//
// The singular role names ("app_stake", ...) are accepted as aliases.
// Any other key in a full treasury document is rejected before a single
// query goes out.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::error::TreasuryError;
use crate::role::Role;

/// Parsed treasury input. Absent lists are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TreasuryInput {
    #[serde(default)]
    pub liquid: Option<Vec<String>>,

    #[serde(default, rename = "app_stakes", alias = "app_stake")]
    pub app_stakes: Option<Vec<String>>,

    #[serde(default, rename = "node_stakes", alias = "node_stake")]
    pub node_stakes: Option<Vec<String>>,

    #[serde(default, rename = "validator_stakes", alias = "validator_stake")]
    pub validator_stakes: Option<Vec<String>>,

    #[serde(default, rename = "delegator_stakes", alias = "delegator_stake")]
    pub delegator_stakes: Option<Vec<String>>,
}

impl TreasuryInput {
    /// Parse a JSON treasury document.
    pub fn from_json(contents: &str) -> Result<Self, TreasuryError> {
        serde_json::from_str(contents).map_err(|e| {
            TreasuryError::InputParse(format!("Invalid treasury document: {}", e))
        })
    }

    /// Read and parse a JSON treasury document from disk.
    pub fn load(path: &Path) -> Result<Self, TreasuryError> {
        let contents = read_input(path)?;
        Self::from_json(&contents)
    }

    /// Build an input holding a single role's list.
    pub fn single(role: Role, addresses: Vec<String>) -> Self {
        let mut input = Self::default();
        *input.slot_mut(role) = Some(addresses);
        input
    }

    /// The address list declared for a role, empty if absent.
    pub fn addresses(&self, role: Role) -> &[String] {
        let slot = match role {
            Role::Liquid => &self.liquid,
            Role::AppStake => &self.app_stakes,
            Role::NodeStake => &self.node_stakes,
            Role::ValidatorStake => &self.validator_stakes,
            Role::DelegatorStake => &self.delegator_stakes,
        };
        slot.as_deref().unwrap_or(&[])
    }

    /// Number of declared addresses, duplicates included.
    pub fn declared_count(&self) -> usize {
        Role::ALL.iter().map(|r| self.addresses(*r).len()).sum()
    }

    fn slot_mut(&mut self, role: Role) -> &mut Option<Vec<String>> {
        match role {
            Role::Liquid => &mut self.liquid,
            Role::AppStake => &mut self.app_stakes,
            Role::NodeStake => &mut self.node_stakes,
            Role::ValidatorStake => &mut self.validator_stakes,
            Role::DelegatorStake => &mut self.delegator_stakes,
        }
    }
}

/// Document keys that hold a role's list: the plural key first, then the
/// singular alias.
pub fn role_keys(role: Role) -> &'static [&'static str] {
    match role {
        Role::Liquid => &["liquid"],
        Role::AppStake => &["app_stakes", "app_stake"],
        Role::NodeStake => &["node_stakes", "node_stake"],
        Role::ValidatorStake => &["validator_stakes", "validator_stake"],
        Role::DelegatorStake => &["delegator_stakes", "delegator_stake"],
    }
}

/// Read one role's list out of a JSON object, ignoring every other key.
fn role_list_from_json(contents: &str, role: Role) -> Result<Vec<String>, TreasuryError> {
    let doc: Map<String, Value> = serde_json::from_str(contents).map_err(|e| {
        TreasuryError::InputParse(format!("Invalid treasury document: {}", e))
    })?;

    let mut addresses = Vec::new();
    for key in role_keys(role) {
        if let Some(value) = doc.get(*key) {
            let list: Vec<String> = serde_json::from_value(value.clone()).map_err(|e| {
                TreasuryError::InputParse(format!("Invalid '{}' list: {}", key, e))
            })?;
            addresses.extend(list);
        }
    }
    Ok(addresses)
}

/// Load the addresses for a single-category run.
///
/// Content starting with `{` is parsed as a JSON object and only the keys
/// for `role` are read; other keys are ignored, unlike the full treasury
/// document. Anything else is a plain text file with one address per line;
/// blank lines are skipped.
pub fn load_role_addresses(path: &Path, role: Role) -> Result<TreasuryInput, TreasuryError> {
    let contents = read_input(path)?;
    let trimmed = contents.trim_start();

    if trimmed.starts_with('{') {
        return Ok(TreasuryInput::single(role, role_list_from_json(trimmed, role)?));
    }

    let addresses = trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    Ok(TreasuryInput::single(role, addresses))
}

fn read_input(path: &Path) -> Result<String, TreasuryError> {
    fs::read_to_string(path)
        .map_err(|e| TreasuryError::Io(format!("Failed to read {}: {}", path.display(), e)))
}
