mod app;
mod commands;
mod render;
#[cfg(feature = "tui")]
mod tui;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vokabel-cli", about = "German vocabulary flashcards", version)]
struct Cli {
    /// Data directory (default: platform local data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Shipped SQLite word database used to provision a fresh install
    #[arg(long, global = true)]
    seed_db: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Show how many words sit in each bucket
    Stats,

    /// Forget all review progress
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Launch the interactive deck
    #[cfg(feature = "tui")]
    Tui,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let app = app::App::new(cli.data_dir, cli.seed_db)?;

    match cli.command {
        None => {
            // No subcommand → launch TUI
            #[cfg(feature = "tui")]
            {
                app.init_file_logging()?;
                tui::run(app)?;
            }
            #[cfg(not(feature = "tui"))]
            {
                eprintln!("TUI not available (built without 'tui' feature). Use a subcommand.");
                eprintln!("Run with --help for usage.");
                std::process::exit(1);
            }
        }
        Some(Command::Stats) => {
            env_logger::init();
            commands::stats::run(&app, &cli.format, use_color)?;
        }
        Some(Command::Reset { yes }) => {
            env_logger::init();
            commands::reset::run(&app, yes, &cli.format)?;
        }
        #[cfg(feature = "tui")]
        Some(Command::Tui) => {
            app.init_file_logging()?;
            tui::run(app)?;
        }
    }

    Ok(())
}
