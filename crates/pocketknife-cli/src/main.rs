// crates/pocketknife-cli/src/main.rs
//
// CLI entrypoint for pocketknife treasury tools.
//
// Aggregates liquid, staked, commission and reward balances for a set of
// Pocket Network addresses grouped by role, and prints a report. Logs go
// to stderr so stdout carries only the report.

mod commands;
mod config;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use commands::tools::ToolsCmd;
use commands::treasury::TreasuryArgs;
use commands::Context;
use config::{CliConfig, ConfigSource};
use output::OutputFormat;

/// Pocketknife: treasury balance reports for Pocket Network.
#[derive(Parser, Debug)]
#[command(
    name = "pocketknife",
    version,
    about = "Aggregate treasury balances across liquid, staked, validator and delegator addresses"
)]
struct Cli {
    /// Config file (default: ~/.pocketknife/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// REST endpoint of the chain node, overriding the config file.
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Report format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    /// Debug-level logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Full treasury analysis across all roles.
    Treasury(TreasuryArgs),

    /// Single-category treasury reports.
    #[command(subcommand)]
    TreasuryTools(ToolsCmd),
}

/// Initialize tracing on stderr. `RUST_LOG` wins over the config level.
fn init_tracing(level: &str, verbose: bool) {
    let level = if verbose { "debug" } else { level };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();
}

async fn run(
    cli: Cli,
    resolved: (CliConfig, ConfigSource),
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut config, source) = resolved;
    match &source {
        ConfigSource::File(path) => tracing::debug!("Loaded config from {}", path.display()),
        ConfigSource::Defaults(path) => tracing::warn!(
            "No config file at {}. Using defaults.",
            path.display()
        ),
        ConfigSource::NoHome => {
            tracing::warn!("Could not determine home directory. Using default config.")
        }
    }

    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    config.validate()?;

    let ctx = Context {
        config,
        output: cli.output,
    };

    match &cli.command {
        Commands::Treasury(args) => commands::treasury::run(args, &ctx).await?,
        Commands::TreasuryTools(cmd) => commands::tools::run(cmd, &ctx).await?,
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let resolved = CliConfig::resolve(cli.config.as_deref());
    let level = match &resolved {
        Ok((config, _)) => config.log_level.clone(),
        Err(_) => "info".to_string(),
    };
    init_tracing(&level, cli.verbose);

    let result = match resolved {
        Ok(resolved) => run(cli, resolved).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_treasury() {
        let cli = Cli::try_parse_from([
            "pocketknife",
            "treasury",
            "--file",
            "treasury.json",
            "--max-workers",
            "4",
            "--strict",
        ])
        .unwrap();
        match cli.command {
            Commands::Treasury(args) => {
                assert_eq!(args.file, PathBuf::from("treasury.json"));
                assert_eq!(args.max_workers, Some(4));
                assert!(args.strict);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.output, OutputFormat::Table);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let err = Cli::try_parse_from([
            "pocketknife",
            "treasury",
            "--file",
            "t.json",
            "--max-workers",
            "0",
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn test_parse_tool_with_global_flags() {
        let cli = Cli::try_parse_from([
            "pocketknife",
            "treasury-tools",
            "validator-stakes",
            "--file",
            "validators.txt",
            "--output",
            "json",
            "--endpoint",
            "http://localhost:1317",
        ])
        .unwrap();
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.endpoint.as_deref(), Some("http://localhost:1317"));
        match cli.command {
            Commands::TreasuryTools(cmd) => {
                assert_eq!(cmd.role(), pocketknife_core::Role::ValidatorStake);
                assert_eq!(cmd.args().max_workers, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_file_is_required() {
        assert!(Cli::try_parse_from(["pocketknife", "treasury"]).is_err());
    }
}
