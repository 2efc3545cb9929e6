// crates/pocketknife-core/src/classifier.rs
//
// Address classification: flattens the per-role input lists into a single
// deduplicated work list.
//
// Roles are walked in canonical order (liquid, app_stake, node_stake,
// validator_stake, delegator_stake). The first role an address appears under
// keeps it; later appearances are dropped so the address is counted once.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::TreasuryError;
use crate::input::TreasuryInput;
use crate::role::Role;

/// An address with the single role it will be fetched and aggregated under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressEntry {
    pub address: String,
    pub role: Role,
}

impl AddressEntry {
    pub fn new(address: impl Into<String>, role: Role) -> Self {
        Self {
            address: address.into(),
            role,
        }
    }
}

/// A declaration that was dropped because the address was already claimed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateAddress {
    pub address: String,
    /// Role that keeps the address.
    pub kept: Role,
    /// Role whose declaration was dropped. Equal to `kept` for a repeat
    /// inside the same list.
    pub dropped: Role,
}

/// Output of one classification pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Deduplicated entries in first-seen order.
    pub entries: Vec<AddressEntry>,
    /// Every dropped declaration, in the order encountered.
    pub duplicates: Vec<DuplicateAddress>,
}

impl Classification {
    /// Number of entries assigned to `role`.
    pub fn count(&self, role: Role) -> usize {
        self.entries.iter().filter(|e| e.role == role).count()
    }

    /// Reject the classification if any duplicate was dropped.
    pub fn into_strict(self) -> Result<Vec<AddressEntry>, TreasuryError> {
        if self.duplicates.is_empty() {
            return Ok(self.entries);
        }

        let conflicts: Vec<String> = self
            .duplicates
            .iter()
            .map(|d| format!("{} ({} and {})", d.address, d.kept, d.dropped))
            .collect();
        Err(TreasuryError::InputParse(format!(
            "Duplicate addresses found: {}",
            conflicts.join(", ")
        )))
    }
}

/// Classify the input's addresses, first occurrence wins.
///
/// Absent or empty lists are skipped. Addresses are trimmed and blank
/// entries ignored; no prefix validation happens here.
pub fn classify(input: &TreasuryInput) -> Classification {
    let mut seen: HashMap<String, Role> = HashMap::new();
    let mut out = Classification::default();

    for role in Role::ALL {
        for raw in input.addresses(role) {
            let address = raw.trim();
            if address.is_empty() {
                continue;
            }

            match seen.get(address) {
                Some(kept) => out.duplicates.push(DuplicateAddress {
                    address: address.to_string(),
                    kept: *kept,
                    dropped: role,
                }),
                None => {
                    seen.insert(address.to_string(), role);
                    out.entries.push(AddressEntry::new(address, role));
                }
            }
        }
    }

    out
}
