// crates/pocketknife-cli/src/commands/mod.rs
//
// Command module declarations for the pocketknife CLI, plus the runner
// shared by every command: build the chain client, run the pipeline,
// print the report.

pub mod tools;
pub mod treasury;

use std::sync::Arc;

use pocketknife_chain::LcdClient;
use pocketknife_core::{run_treasury, RunOptions, TreasuryInput};

use crate::config::CliConfig;
use crate::output::{self, OutputFormat};

/// Settings resolved once in `main` and handed to each command.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: CliConfig,
    pub output: OutputFormat,
}

impl Context {
    /// Worker count for this run: the flag if given, else the config value.
    pub fn run_options(&self, max_workers: Option<usize>, strict: bool) -> RunOptions {
        RunOptions {
            max_workers: max_workers.unwrap_or(self.config.max_workers),
            strict,
        }
    }
}

/// Run the pipeline over `input` and print the report to stdout.
///
/// Ctrl-C aborts the run; no partial report is printed.
pub async fn execute(
    ctx: &Context,
    input: &TreasuryInput,
    options: RunOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let denom = ctx.config.denomination()?;
    let client = Arc::new(LcdClient::new(ctx.config.lcd_config())?);
    tracing::debug!("Querying {}", ctx.config.endpoint);

    let report = tokio::select! {
        result = run_treasury(client, input, &options) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted; discarding in-flight queries");
            return Err("interrupted before all queries completed".into());
        }
    };

    println!("{}", output::render(&report, &denom, ctx.output));
    Ok(())
}
