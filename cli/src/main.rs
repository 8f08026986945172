//! AppBlocker CLI - Block-list enforcing process killer daemon
//!
//! Runs the daemon loop, or inspects the block-list files it manages.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "appblocker")]
#[command(author, version, about = "Terminate block-listed apps on sight")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory holding the block-list files (default: ~/.appblocker)
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the daemon loop (default)
    Run,

    /// Print the current user block list
    #[command(alias = "ls")]
    List,

    /// Print the effective default block list
    Defaults,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let paths = match &cli.config_dir {
        Some(dir) => appblocker_core::ListPaths::in_dir(dir),
        None => appblocker_core::ListPaths::new()?,
    };

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => commands::run::run(paths).await?,
        Commands::List => commands::list::user(paths, cli.json).await?,
        Commands::Defaults => commands::list::defaults(paths, cli.json).await?,
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "appblocker=info,appblocker_core=info".into()),
        )
        .init();
}
