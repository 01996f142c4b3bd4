//! CLI entry point for the allotment rebalancer.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use allotment_rebalancer::commands::{self, PlanOptions};
use allotment_rebalancer::config::Config;
use allotment_rebalancer::error::Result;

#[derive(Parser)]
#[command(name = "rebalancer")]
#[command(about = "Portfolio rebalance planner: holdings + targets -> trades")]
#[command(version)]
struct Cli {
    /// Path to a TOML config (default: ./rebalancer.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the trades that move holdings to the saved targets
    Plan {
        /// Holdings snapshot (overrides storage.holdings_file)
        #[arg(long)]
        holdings: Option<PathBuf>,

        /// Strategy name (see `strategies`)
        #[arg(long)]
        strategy: Option<String>,

        /// Suppress trades smaller than this amount
        #[arg(long)]
        min_trade: Option<f64>,

        /// Hold asset classes within this many percentage points of target
        #[arg(long)]
        tolerance: Option<f64>,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the current aggregated allocation
    Allocation {
        /// Holdings snapshot (overrides storage.holdings_file)
        #[arg(long)]
        holdings: Option<PathBuf>,
    },

    /// Show, replace or clear allocation targets
    Targets {
        #[command(subcommand)]
        action: TargetsCommand,
    },

    /// List available rebalance strategies
    Strategies,
}

#[derive(Subcommand)]
enum TargetsCommand {
    /// Print saved targets
    Show,

    /// Replace saved targets; must total 100%
    Set {
        /// Assignments such as "US Stocks=60"
        #[arg(required = true, value_name = "ASSET=PCT")]
        assignments: Vec<String>,
    },

    /// Delete all saved targets
    Reset,
}

fn run(cli: Cli, config: &Config, out: &mut impl Write) -> Result<()> {
    match cli.command {
        Command::Plan {
            holdings,
            strategy,
            min_trade,
            tolerance,
            json,
        } => {
            let opts = PlanOptions {
                holdings,
                strategy,
                min_trade,
                tolerance,
                json,
            };
            commands::run_plan(config, &opts, out)
        }
        Command::Allocation { holdings } => commands::show_allocation(config, holdings, out),
        Command::Targets { action } => match action {
            TargetsCommand::Show => commands::show_targets(config, out),
            TargetsCommand::Set { assignments } => {
                commands::set_targets(config, &assignments, out)
            }
            TargetsCommand::Reset => commands::reset_targets(config, out),
        },
        Command::Strategies => commands::list_strategies(config, out),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let config = match Config::resolve(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            process::exit(1);
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = run(cli, &config, &mut out) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
