//! `qv`: drive a quadratic voting store from the command line.
//!
//! Each invocation opens the LMDB store, runs one call against it and exits.
//! Each call runs at the block height after the last one the store recorded;
//! the engine commits that height together with the call's own writes.

mod config;

use anyhow::Context;
use clap::Parser;
use config::CliConfig;
use qv_store::meta::keys;
use qv_store::MetaStore;
use qv_store_lmdb::{check_data_dir, check_integrity, LmdbEnvironment, Migrator};
use qv_types::{BlockHeight, Principal, ProposalId};
use qv_utils::{init_logging, LogFormat};
use qv_voting::{QuadraticVoting, VotingError};
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "qv", about = "Quadratic voting over a local proposal store")]
struct Cli {
    /// Path to a TOML configuration file. CLI flags and env vars override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the LMDB store.
    #[arg(long, env = "QV_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "QV_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "QV_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Create a proposal and print its id.
    CreateProposal {
        #[arg(long, env = "QV_SENDER")]
        sender: Principal,
        title: String,
        description: String,
    },
    /// Add stake to a proposal and print the resulting vote weight.
    Vote {
        #[arg(long, env = "QV_SENDER")]
        sender: Principal,
        proposal: ProposalId,
        stake: u128,
    },
    /// Withdraw the sender's whole vote on a proposal.
    WithdrawVote {
        #[arg(long, env = "QV_SENDER")]
        sender: Principal,
        proposal: ProposalId,
    },
    /// Print a proposal as JSON, or `none`.
    GetProposal { proposal: ProposalId },
    /// Print a vote as JSON, or `none`.
    GetVote {
        proposal: ProposalId,
        voter: Principal,
    },
    /// Print the number of proposals created.
    GetProposalCount,
    /// Print the ranked proposal ids as a JSON array, heaviest first.
    GetTopProposals,
    /// Audit derived state and check the LMDB databases.
    Check,
}

/// Merge the optional config file with flags and env vars.
fn resolve_config(cli: &Cli) -> anyhow::Result<CliConfig> {
    let mut config = match &cli.config {
        Some(path) => CliConfig::from_toml_file(path)?,
        None => CliConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    Ok(config)
}

fn run(command: Command, config: &CliConfig, out: &mut impl Write) -> anyhow::Result<()> {
    check_data_dir(&config.data_dir).map_err(anyhow::Error::msg)?;
    let env = LmdbEnvironment::open(&config.data_dir, config.map_size)
        .with_context(|| format!("opening store at {}", config.data_dir.display()))?;
    Migrator::run(&env)?;

    let block = BlockHeight::new(env.get_meta_u64(keys::CHAIN_HEIGHT)?).next();
    let mut qv = QuadraticVoting::open(env, block, config.limits.clone())?;

    match command {
        Command::CreateProposal {
            sender,
            title,
            description,
        } => {
            let id = qv.create_proposal(&sender, &title, &description)?;
            writeln!(out, "{}", id)?;
        }
        Command::Vote {
            sender,
            proposal,
            stake,
        } => {
            let weight = qv.vote(&sender, proposal, stake)?;
            writeln!(out, "{}", weight)?;
        }
        Command::WithdrawVote { sender, proposal } => {
            let removed = qv.withdraw_vote(&sender, proposal)?;
            writeln!(out, "{}", removed)?;
        }
        Command::GetProposal { proposal } => match qv.get_proposal(proposal)? {
            Some(record) => writeln!(out, "{}", serde_json::to_string(&record)?)?,
            None => writeln!(out, "none")?,
        },
        Command::GetVote { proposal, voter } => match qv.get_vote(proposal, &voter)? {
            Some(record) => writeln!(out, "{}", serde_json::to_string(&record)?)?,
            None => writeln!(out, "none")?,
        },
        Command::GetProposalCount => {
            writeln!(out, "{}", qv.get_proposal_count())?;
        }
        Command::GetTopProposals => {
            writeln!(out, "{}", serde_json::to_string(&qv.get_top_proposals())?)?;
        }
        Command::Check => {
            let audit = qv.audit()?;
            let integrity = check_integrity(qv.store())?;
            writeln!(
                out,
                "{}",
                serde_json::to_string_pretty(&json!({
                    "audit": audit,
                    "integrity": integrity,
                }))?
            )?;
            if !audit.is_clean() || !integrity.is_healthy() {
                anyhow::bail!(
                    "store check failed: {} audit problems, {} integrity errors",
                    audit.problems.len(),
                    integrity.errors.len()
                );
            }
        }
    }

    for event in qv.take_events() {
        writeln!(out, "{}", serde_json::to_string(&event)?)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(config.log_format, &config.log_level);

    let mut stdout = std::io::stdout().lock();
    match run(cli.command, &config, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<VotingError>() {
                Some(err) => eprintln!("error {}: {}", err.code(), err),
                None => eprintln!("error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}
