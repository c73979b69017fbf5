mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::{member::MemberSubcommand, ooo::OooSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rota",
    about = "Manages fair rotation and allocation of the next person in the rota",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file path
    #[arg(
        short = 'f',
        long,
        global = true,
        env = "ROTA_CONFIG",
        default_value = "rota.yaml"
    )]
    config: PathBuf,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server and the daily pick scheduler
    Serve,

    /// Manage team members
    Member {
        #[command(subcommand)]
        subcommand: MemberSubcommand,
    },

    /// Show accrual history for the team or one member
    History {
        /// Member name (omit for the whole team)
        name: Option<String>,
    },

    /// Preview who would be picked next (no side effects)
    Next,

    /// Manage out-of-office windows
    Ooo {
        #[command(subcommand)]
        subcommand: OooSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Serve => cmd::serve::run(&cli.config),
        Commands::Member { subcommand } => cmd::member::run(&cli.config, subcommand, cli.json),
        Commands::History { name } => cmd::history::run(&cli.config, name.as_deref(), cli.json),
        Commands::Next => cmd::next::run(&cli.config, cli.json),
        Commands::Ooo { subcommand } => cmd::ooo::run(&cli.config, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
