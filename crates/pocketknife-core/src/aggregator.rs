// crates/pocketknife-core/src/aggregator.rs
//
// Aggregation of fetch results into a treasury report.
//
// Results are re-sorted into classifier order first, so the report is the
// same no matter the order fetches completed in. A failed fetch adds nothing
// to any sum and goes to the report's failure list instead.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::amount::Amount;
use crate::fetch::FetchResult;
use crate::role::{Components, Role};

/// One successfully fetched address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressTotal {
    pub address: String,
    pub components: Components,
    /// Address total under its role's composition rule.
    pub total: Amount,
}

/// An address whose fetch failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedFetch {
    pub address: String,
    pub role: Role,
    pub reason: String,
}

/// Subtotals for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub role: Role,
    /// Successful addresses in classifier order.
    pub rows: Vec<AddressTotal>,
    /// Addresses classified under this role, failed ones included.
    pub requested: usize,
    /// Per-component sums over successful rows.
    pub components: Components,
    /// Sum of the row totals.
    pub total: Amount,
}

impl CategoryTotal {
    fn new(role: Role) -> Self {
        Self {
            role,
            rows: Vec::new(),
            requested: 0,
            components: Components::default(),
            total: Amount::zero(),
        }
    }

    /// Number of addresses that contributed to the total.
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn failed(&self) -> usize {
        self.requested - self.rows.len()
    }
}

/// Terminal artifact of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasuryReport {
    /// Present categories only, in canonical role order.
    pub categories: Vec<CategoryTotal>,
    /// Sum of the present category totals.
    pub grand_total: Amount,
    /// Failed addresses in classifier order.
    pub failures: Vec<FailedFetch>,
}

impl TreasuryReport {
    pub fn category(&self, role: Role) -> Option<&CategoryTotal> {
        self.categories.iter().find(|c| c.role == role)
    }

    pub fn failures_for(&self, role: Role) -> impl Iterator<Item = &FailedFetch> {
        self.failures.iter().filter(move |f| f.role == role)
    }

    /// Number of addresses fetched, successful or not.
    pub fn requested(&self) -> usize {
        self.categories.iter().map(|c| c.requested).sum()
    }

    pub fn succeeded(&self) -> usize {
        self.categories.iter().map(|c| c.count()).sum()
    }
}

/// Build the report for one run.
///
/// A category exists when at least one address was classified under it;
/// roles with no addresses are left out entirely.
pub fn aggregate(mut results: Vec<FetchResult>) -> TreasuryReport {
    results.sort_by_key(|r| r.index);

    let mut categories: BTreeMap<Role, CategoryTotal> = BTreeMap::new();
    let mut failures = Vec::new();

    for result in results {
        let role = result.entry.role;
        let category = categories
            .entry(role)
            .or_insert_with(|| CategoryTotal::new(role));
        category.requested += 1;

        match result.outcome {
            Ok(components) => {
                let total = role.total(&components);
                category.components.accumulate(&components);
                category.total += total;
                category.rows.push(AddressTotal {
                    address: result.entry.address,
                    components,
                    total,
                });
            }
            Err(e) => failures.push(FailedFetch {
                address: result.entry.address,
                role,
                reason: e.to_string(),
            }),
        }
    }

    // BTreeMap iterates in Role order, which is the canonical order.
    let categories: Vec<CategoryTotal> = categories.into_values().collect();
    let grand_total = categories.iter().map(|c| c.total).sum();

    TreasuryReport {
        categories,
        grand_total,
        failures,
    }
}
