mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "roundup",
    about = "Drive the monthly activity-report cycle",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .roundup/)
    #[arg(long, global = true, env = "ROUNDUP_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config and example roster into .roundup/
    Init,

    /// Show the cycle dates for a month
    Schedule {
        /// Year (default: current)
        #[arg(long)]
        year: Option<i32>,
        /// Month 1-12 (default: current)
        #[arg(long)]
        month: Option<u32>,
    },

    /// Check whether the form accepts submissions (fails when closed)
    Gate {
        /// Date to check as YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<chrono::NaiveDate>,
    },

    /// Run today's scheduled action, if any (meant for a daily trigger)
    Dispatch {
        /// Run this action today regardless of the cycle: send, remind or report
        #[arg(long)]
        force: Option<String>,
        /// Time to run a forced action, HH:MM (default: the action's configured time)
        #[arg(long, requires = "force")]
        at: Option<String>,
    },

    /// Email everyone in the roster who has not responded yet
    Remind,

    /// Serve the report form
    Serve {
        /// Port to listen on (default: server.port from config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Inspect the project configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Dispatch { .. } | Commands::Remind | Commands::Serve { .. } => {
            tracing::Level::INFO
        }
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Schedule { year, month } => cmd::schedule::run(&root, year, month, cli.json),
        Commands::Gate { date } => cmd::gate::run(&root, date, cli.json),
        Commands::Dispatch { force, at } => {
            cmd::dispatch::run(&root, force.as_deref(), at.as_deref(), cli.json)
        }
        Commands::Remind => cmd::remind::run(&root, cli.json),
        Commands::Serve { port } => cmd::serve::run(&root, port),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
