//! nbt: command-line entry point for the NanoByte token ledger.

mod exercise;

use anyhow::Context;
use clap::Parser;
use nbt_token::{TokenConfig, TokenController};
use nbt_types::{AccountId, NetworkId};
use nbt_utils::{format_units, init_logging, LogFormat};
use std::path::PathBuf;

/// Recipient used by the smoke walkthrough unless overridden.
const DEFAULT_RECIPIENT: &str = "0x41A232DB03cE4514bdd5Ce3412Bd7fC1eC31f8DA";

#[derive(Parser)]
#[command(name = "nbt", about = "NanoByte token ledger")]
struct Cli {
    /// Network: "dev", "testnet", or "mainnet".
    /// When a config file is provided, defaults to the file's network value.
    #[arg(long, env = "NBT_NETWORK")]
    network: Option<NetworkId>,

    /// Owner account (0x-prefixed hex).
    #[arg(long, env = "NBT_OWNER")]
    owner: Option<AccountId>,

    /// RPC endpoint override.
    #[arg(long, env = "NBT_RPC_URL")]
    rpc_url: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "NBT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "NBT_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Print command output as JSON.
    #[arg(long, env = "NBT_JSON")]
    json: bool,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "NBT_CONFIG")]
    config: Option<PathBuf>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print token metadata for the configured network.
    Info,
    /// Replay the smoke walkthrough against an in-process ledger.
    Exercise {
        /// Account that receives the minted and transferred tokens.
        #[arg(long, default_value = DEFAULT_RECIPIENT)]
        recipient: AccountId,
    },
    /// Print the effective configuration as TOML.
    Config,
}

impl Cli {
    /// File config as the base, flags and env vars on top.
    fn resolve_config(&self) -> anyhow::Result<TokenConfig> {
        let base = match &self.config {
            Some(path) => TokenConfig::from_toml_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => TokenConfig::default(),
        };
        let config = TokenConfig {
            network: self.network.unwrap_or(base.network),
            rpc_url: self.rpc_url.clone().or(base.rpc_url),
            owner: self.owner.unwrap_or(base.owner),
            log_level: self.log_level.clone().unwrap_or(base.log_level),
            log_format: self.log_format.unwrap_or(base.log_format),
            token: base.token,
        };
        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    init_logging(config.log_format, &config.log_level);
    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    match cli.command {
        Command::Info => print_info(&config, cli.json),
        Command::Exercise { recipient } => run_exercise(&config, recipient, cli.json),
        Command::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

fn print_info(config: &TokenConfig, json: bool) -> anyhow::Result<()> {
    let params = &config.token;
    let network = config.network;
    if json {
        let value = serde_json::json!({
            "name": params.name,
            "symbol": params.symbol,
            "decimals": params.decimals,
            "cap": params.cap.to_string(),
            "owner": config.owner,
            "network": network.as_str(),
            "chain_id": network.chain_id(),
            "rpc_url": config.effective_rpc_url(),
            "explorer_url": network.explorer_url(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("=== {} ({}) ===", params.name, params.symbol);
    println!("  Decimals: {}", params.decimals);
    println!(
        "  Cap: {} {}",
        format_units(params.cap, params.decimals),
        params.symbol
    );
    println!("  Owner: {}", config.owner);
    println!("  Network: {} (chain id {})", network.as_str(), network.chain_id());
    println!("  RPC: {}", config.effective_rpc_url());
    if let Some(explorer) = network.explorer_url() {
        println!("  Explorer: {explorer}");
    }
    Ok(())
}

fn run_exercise(config: &TokenConfig, recipient: AccountId, json: bool) -> anyhow::Result<()> {
    tracing::info!(
        network = config.network.as_str(),
        owner = %config.owner,
        %recipient,
        "starting walkthrough"
    );
    let mut token = TokenController::new(config.token.clone(), config.owner);
    let report = exercise::run(&mut token, config.owner, recipient)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("=== {} Walkthrough ===\n", token.name());
        println!("Owner: {}", report.owner);
        println!("Recipient: {}\n", report.recipient);
        for step in &report.steps {
            let mark = if step.ok { "ok" } else { "FAILED" };
            println!("[block {:>3}] {:<16} {:<6} {}", step.block, step.step, mark, step.detail);
        }
        println!("\n=== Summary ===");
        println!("  Total Supply: {}", report.total_supply);
        println!("  Owner Balance: {}", report.owner_balance);
        println!("  Recipient Balance: {}", report.recipient_balance);
        println!("  Owner Voting Power: {}", report.owner_votes);
        println!(
            "  Invariants: {}",
            if report.invariants_ok { "hold" } else { "VIOLATED" }
        );
    }

    if !report.invariants_ok {
        anyhow::bail!("ledger invariants violated after walkthrough");
    }
    if report.failed_steps() > 0 {
        tracing::warn!(failed = report.failed_steps(), "walkthrough finished with failures");
    }
    Ok(())
}
