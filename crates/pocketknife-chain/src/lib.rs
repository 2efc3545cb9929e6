// crates/pocketknife-chain/src/lib.rs
//
// pocketknife-chain: Pocket Network (poktroll) backend for the treasury
// engine. Implements `ChainQuery` over the Cosmos SDK REST gateway.

pub mod bech32;
pub mod client;
pub mod responses;

pub use bech32::Bech32Error;
pub use client::{LcdClient, LcdConfig, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};
