// crates/pocketknife-core/src/lib.rs
//
// pocketknife-core: treasury balance aggregation engine.
//
// Takes addresses grouped by role, assigns each address to exactly one role,
// fetches its balance components over a bounded worker pool, and aggregates
// per-category and grand totals. The chain backend is abstracted behind the
// `ChainQuery` trait; rendering lives in the CLI.
//
// All amounts are integer base units (upokt). Display conversion goes
// through `Denomination`.

pub mod aggregator;
pub mod amount;
pub mod classifier;
pub mod error;
pub mod fetch;
pub mod input;
pub mod pipeline;
pub mod role;
pub mod scheduler;
pub mod traits;

// Re-export key types for ergonomic access from downstream crates.
pub use aggregator::{aggregate, AddressTotal, CategoryTotal, FailedFetch, TreasuryReport};
pub use amount::{Amount, Denomination, DEFAULT_BASE_UNITS_PER_TOKEN};
pub use classifier::{classify, AddressEntry, Classification, DuplicateAddress};
pub use error::{FetchError, TreasuryError};
pub use fetch::{fetch_components, fetch_entry, FetchResult};
pub use input::{load_role_addresses, TreasuryInput};
pub use pipeline::{run_treasury, RunOptions};
pub use role::{Component, Components, Role};
pub use scheduler::{FetchScheduler, DEFAULT_MAX_WORKERS};
pub use traits::ChainQuery;
