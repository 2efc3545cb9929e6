// crates/pocketknife-cli/src/commands/treasury.rs
//
// `pocketknife treasury`: full analysis across every role in one document.

use clap::Args;
use std::path::PathBuf;

use pocketknife_core::{Role, TreasuryInput};

use super::Context;

/// Arguments for the full treasury analysis.
#[derive(Debug, Args)]
pub struct TreasuryArgs {
    /// JSON document listing addresses per role.
    #[arg(long)]
    pub file: PathBuf,

    /// Number of concurrent fetch workers.
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub max_workers: Option<usize>,

    /// Fail instead of warning when an address is listed under more than one role.
    #[arg(long)]
    pub strict: bool,
}

/// Run the treasury command.
pub async fn run(args: &TreasuryArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let input = TreasuryInput::load(&args.file)?;

    let counts: Vec<String> = Role::ALL
        .iter()
        .filter(|role| !input.addresses(**role).is_empty())
        .map(|role| format!("{}={}", role, input.addresses(*role).len()))
        .collect();
    tracing::info!(
        "Loaded {} addresses from {} ({})",
        input.declared_count(),
        args.file.display(),
        counts.join(", ")
    );

    super::execute(ctx, &input, ctx.run_options(args.max_workers, args.strict)).await
}
