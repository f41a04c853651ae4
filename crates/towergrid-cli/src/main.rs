//! towergrid — operator CLI for the TowerGrid kernel.
//!
//! # Usage
//!
//! ```text
//! towergrid simulate --towers 8 --users 1200 --seed 7 --predict
//! towergrid decide --input snapshots.json --state-db policy.redb
//! towergrid predict --input features.json
//! towergrid config > towergrid.toml
//! ```
//!
//! Results go to stdout as JSON; logs go to stderr.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "towergrid",
    about = "TowerGrid — tower load redistribution and migration policy",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Path to towergrid.toml (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed a scenario, redistribute users, and report the improvement
    Simulate {
        /// Number of towers (overrides [scenario].towers)
        #[arg(long)]
        towers: Option<u32>,
        /// Number of users (overrides [scenario].users)
        #[arg(long)]
        users: Option<u32>,
        /// RNG seed for scenario generation and prediction noise
        #[arg(long)]
        seed: Option<u64>,
        /// Iteration cap (overrides [redistribution].max_iterations)
        #[arg(long)]
        max_iterations: Option<u32>,
        /// Rank towers by predicted load instead of live load
        #[arg(long)]
        predict: bool,
        /// Output format: json or text
        #[arg(short, long, default_value = "json")]
        format: String,
    },
    /// Run policy decisions for a JSON array of tower snapshots
    Decide {
        /// JSON file with an array of snapshots
        #[arg(short, long)]
        input: PathBuf,
        /// Persist policy state in this redb file (in-memory when omitted)
        #[arg(long)]
        state_db: Option<PathBuf>,
    },
    /// Predict load and recommend actions for a JSON array of tower features
    Predict {
        /// JSON file with an array of tower features
        #[arg(short, long)]
        input: PathBuf,
        /// RNG seed for prediction noise
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("towergrid=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Simulate {
            towers,
            users,
            seed,
            max_iterations,
            predict,
            format,
        } => {
            let overrides = commands::simulate::Overrides {
                towers,
                users,
                seed,
                max_iterations,
            };
            commands::simulate::simulate(config, overrides, predict, &format)
        }
        Commands::Decide { input, state_db } => {
            commands::decide::decide(config, &input, state_db.as_deref()).await
        }
        Commands::Predict { input, seed } => commands::predict::predict(config, &input, seed),
        Commands::Config => commands::show_config(&config),
    }
}
