use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for playterm
#[derive(Parser, Debug)]
#[command(name = "playterm")]
#[command(about = "Drive remote playground terminals from your shell")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the playground service
    #[arg(long, env = "PLAYTERM_BASE_URL", value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Path to a TOML config file (default: playterm.toml if present)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Record each terminal's output as JSONL under this directory
    #[arg(long, env = "PLAYTERM_TRANSCRIPT_DIR", value_name = "DIR", global = true)]
    pub transcript_dir: Option<PathBuf>,

    /// Log frames and other debug detail
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create a session and open one terminal per target
    New {
        /// Verification token obtained out of band
        #[arg(long, env = "PLAYTERM_TOKEN", value_name = "TOKEN")]
        token: String,

        /// Target key; repeat for several terminals
        #[arg(long = "target", value_name = "KEY", required = true)]
        targets: Vec<String>,
    },

    /// Attach to an existing session
    Attach {
        /// Session id
        #[arg(long, value_name = "ID")]
        session: String,

        /// Rebind an instance that already exists instead of creating one
        #[arg(long, value_name = "NAME")]
        instance: Option<String>,
    },
}
