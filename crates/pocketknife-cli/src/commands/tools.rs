// crates/pocketknife-cli/src/commands/tools.rs
//
// `pocketknife treasury-tools {...}`: single-category reports.
//
// Each tool runs the same pipeline as `treasury`, restricted to one role.
// Input is either a JSON treasury document (only the tool's key is read) or
// a text file with one address per line.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use pocketknife_core::{load_role_addresses, Role, TreasuryError};

use super::Context;

/// Input arguments shared by every single-category tool.
#[derive(Debug, Args)]
pub struct ToolArgs {
    /// Text file with one address per line, or a JSON treasury document.
    #[arg(long)]
    pub file: PathBuf,

    /// Number of concurrent fetch workers.
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub max_workers: Option<usize>,
}

/// Single-category subcommands.
#[derive(Debug, Subcommand)]
pub enum ToolsCmd {
    /// Liquid balances only.
    LiquidBalance(ToolArgs),
    /// Application stakes plus liquid balances.
    AppStakes(ToolArgs),
    /// Node (supplier) stakes plus liquid balances.
    NodeStakes(ToolArgs),
    /// Validator stakes, commission and liquid balances.
    ValidatorStakes(ToolArgs),
    /// Delegated stakes, rewards and liquid balances.
    DelegatorStakes(ToolArgs),
}

impl ToolsCmd {
    pub fn role(&self) -> Role {
        match self {
            ToolsCmd::LiquidBalance(_) => Role::Liquid,
            ToolsCmd::AppStakes(_) => Role::AppStake,
            ToolsCmd::NodeStakes(_) => Role::NodeStake,
            ToolsCmd::ValidatorStakes(_) => Role::ValidatorStake,
            ToolsCmd::DelegatorStakes(_) => Role::DelegatorStake,
        }
    }

    pub fn args(&self) -> &ToolArgs {
        match self {
            ToolsCmd::LiquidBalance(a)
            | ToolsCmd::AppStakes(a)
            | ToolsCmd::NodeStakes(a)
            | ToolsCmd::ValidatorStakes(a)
            | ToolsCmd::DelegatorStakes(a) => a,
        }
    }
}

/// Run a treasury tool subcommand.
pub async fn run(cmd: &ToolsCmd, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let role = cmd.role();
    let args = cmd.args();

    let input = load_role_addresses(&args.file, role)?;
    if input.declared_count() == 0 {
        return Err(TreasuryError::InputParse(format!(
            "No addresses found in {}",
            args.file.display()
        ))
        .into());
    }
    tracing::info!(
        "Loaded {} {} addresses from {}",
        input.declared_count(),
        role,
        args.file.display()
    );

    super::execute(ctx, &input, ctx.run_options(args.max_workers, false)).await
}
