// crates/pocketknife-core/tests/treasury_pipeline.rs
//
// End-to-end pipeline tests: input document -> classification -> concurrent
// fetch -> aggregated report, against an in-memory chain stub.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use pocketknife_core::{
    run_treasury, Amount, ChainQuery, FetchError, Role, RunOptions, TreasuryError,
    TreasuryInput,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
struct Balances {
    liquid: u128,
    staked: u128,
    commission: u128,
    rewards: u128,
}

/// In-memory chain state. Addresses missing from the map fail with a
/// network error; every lookup sleeps briefly so fetches overlap.
#[derive(Default)]
struct StubChain {
    accounts: HashMap<String, Balances>,
    calls: AtomicUsize,
}

impl StubChain {
    fn with(mut self, address: &str, balances: Balances) -> Self {
        self.accounts.insert(address.to_string(), balances);
        self
    }

    async fn lookup(&self, address: &str) -> Result<Balances, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(2)).await;
        self.accounts
            .get(address)
            .cloned()
            .ok_or_else(|| FetchError::Network(format!("connection refused for {}", address)))
    }
}

#[async_trait]
impl ChainQuery for StubChain {
    async fn get_liquid_balance(&self, address: &str) -> Result<Amount, FetchError> {
        Ok(Amount::from_base_units(self.lookup(address).await?.liquid))
    }

    async fn get_stake(&self, address: &str, _role: Role) -> Result<Amount, FetchError> {
        Ok(Amount::from_base_units(self.lookup(address).await?.staked))
    }

    async fn get_commission(&self, address: &str) -> Result<Amount, FetchError> {
        Ok(Amount::from_base_units(self.lookup(address).await?.commission))
    }

    async fn get_rewards(&self, address: &str) -> Result<Amount, FetchError> {
        Ok(Amount::from_base_units(self.lookup(address).await?.rewards))
    }
}

fn input(json: &str) -> TreasuryInput {
    TreasuryInput::from_json(json).unwrap()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_duplicate_counted_under_first_role_only() {
    let chain = Arc::new(StubChain::default().with(
        "A",
        Balances {
            liquid: 100,
            staked: 50,
            ..Default::default()
        },
    ));

    let report = run_treasury(
        chain,
        &input(r#"{"liquid": ["A"], "node_stake": ["A"]}"#),
        &RunOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(report.categories.len(), 1);
    assert_eq!(report.category(Role::Liquid).unwrap().total.base_units, 100);
    assert!(report.category(Role::NodeStake).is_none());
    assert_eq!(report.grand_total.base_units, 100);
}

#[tokio::test]
async fn test_validator_total_includes_commission() {
    let chain = Arc::new(StubChain::default().with(
        "V1",
        Balances {
            liquid: 10,
            staked: 1000,
            commission: 25,
            rewards: 999,
        },
    ));

    let report = run_treasury(
        chain,
        &input(r#"{"validator_stake": ["V1"]}"#),
        &RunOptions::default(),
    )
    .await
    .unwrap();

    let validators = report.category(Role::ValidatorStake).unwrap();
    assert_eq!(validators.total.base_units, 1035);
    assert_eq!(report.grand_total.base_units, 1035);
}

#[tokio::test]
async fn test_partial_failure_completes_run() {
    let chain = Arc::new(StubChain::default().with(
        "ok",
        Balances {
            liquid: 5,
            ..Default::default()
        },
    ));

    let report = run_treasury(
        chain,
        &input(r#"{"liquid": ["ok", "unreachable"]}"#),
        &RunOptions::default(),
    )
    .await
    .unwrap();

    let liquid = report.category(Role::Liquid).unwrap();
    assert_eq!(liquid.total.base_units, 5);
    assert_eq!(liquid.count(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].address, "unreachable");
    assert_eq!(report.grand_total.base_units, 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_mixed_roles_with_duplicates() {
    let b = |liquid, staked, commission, rewards| Balances {
        liquid,
        staked,
        commission,
        rewards,
    };
    let chain = Arc::new(
        StubChain::default()
            .with("L1", b(1, 0, 0, 0))
            .with("A1", b(2, 20, 0, 0))
            .with("N1", b(3, 30, 0, 0))
            .with("V1", b(4, 40, 4, 0))
            .with("D1", b(5, 50, 0, 5)),
    );

    let report = run_treasury(
        chain,
        &input(
            r#"{
                "liquid": ["L1"],
                "app_stakes": ["A1", "L1"],
                "node_stakes": ["N1", "A1"],
                "validator_stakes": ["V1"],
                "delegator_stakes": ["D1", "N1", "L1"]
            }"#,
        ),
        &RunOptions {
            max_workers: 3,
            strict: false,
        },
    )
    .await
    .unwrap();

    let totals: Vec<(Role, u128)> = report
        .categories
        .iter()
        .map(|c| (c.role, c.total.base_units))
        .collect();
    assert_eq!(
        totals,
        vec![
            (Role::Liquid, 1),
            (Role::AppStake, 22),
            (Role::NodeStake, 33),
            (Role::ValidatorStake, 48),
            (Role::DelegatorStake, 60),
        ]
    );
    assert_eq!(report.grand_total.base_units, 1 + 22 + 33 + 48 + 60);
    assert_eq!(report.requested(), 5);
    assert!(report.failures.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_repeated_runs_identical() {
    let mut chain = StubChain::default();
    let mut addresses = Vec::new();
    for i in 0..30u128 {
        let addr = format!("pokt1node{}", i);
        if i % 7 != 0 {
            chain = chain.with(
                &addr,
                Balances {
                    liquid: i,
                    staked: i * 100,
                    ..Default::default()
                },
            );
        }
        addresses.push(addr);
    }
    let doc = TreasuryInput::single(Role::NodeStake, addresses);
    let chain = Arc::new(chain);

    let options = RunOptions {
        max_workers: 6,
        strict: false,
    };
    let first = run_treasury(Arc::clone(&chain), &doc, &options).await.unwrap();
    let second = run_treasury(chain, &doc, &options).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.failures.len(), 5);
    let rows: Vec<&str> = first.categories[0]
        .rows
        .iter()
        .map(|r| r.address.as_str())
        .collect();
    assert_eq!(rows[0], "pokt1node1");
    assert_eq!(rows.last().copied(), Some("pokt1node29"));
}

// ---------------------------------------------------------------------------
// Fatal errors abort before dispatch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_zero_workers_is_config_error() {
    let chain = Arc::new(StubChain::default());
    let err = run_treasury(
        Arc::clone(&chain),
        &input(r#"{"liquid": ["A"]}"#),
        &RunOptions {
            max_workers: 0,
            strict: false,
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, TreasuryError::Config(_)));
    assert_eq!(chain.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_strict_mode_rejects_duplicates_before_fetch() {
    let chain = Arc::new(StubChain::default());
    let err = run_treasury(
        Arc::clone(&chain),
        &input(r#"{"liquid": ["A"], "app_stakes": ["A"]}"#),
        &RunOptions {
            max_workers: 2,
            strict: true,
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, TreasuryError::InputParse(_)));
    assert_eq!(chain.calls.load(Ordering::SeqCst), 0);
}
