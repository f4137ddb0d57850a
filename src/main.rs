mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hanif-formula")]
#[command(author, version, about = "Installer and post-install verifier for the hanif CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Install the staged hanif tree into the prefix
    Install {
        /// Staged source tree root (unpacked release archive)
        #[arg(long)]
        source: PathBuf,

        /// Installation prefix (defaults to the detected prefix)
        #[arg(long)]
        prefix: Option<PathBuf>,

        /// Absolute path to the bash runtime used for the shebang rewrite
        #[arg(long)]
        bash: Option<PathBuf>,

        /// Absolute path to the git runtime (recorded in the receipt)
        #[arg(long)]
        git: Option<PathBuf>,
    },

    /// Run the post-install smoke checks against the installed executable
    Test {
        /// Installation prefix (defaults to the detected prefix)
        #[arg(long)]
        prefix: Option<PathBuf>,

        /// Per-check deadline in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Print the formula caveats
    Caveats,

    /// Show formula metadata
    Info,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "warn");
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Install {
            source,
            prefix,
            bash,
            git,
        } => {
            commands::install_cmd(source, prefix, bash, git)?;
        }
        Commands::Test { prefix, timeout } => {
            commands::test_cmd(prefix, timeout)?;
        }
        Commands::Caveats => {
            commands::caveats_cmd();
        }
        Commands::Info => {
            commands::info_cmd();
        }
    }

    Ok(())
}
