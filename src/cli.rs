use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hlscast")]
#[command(author, version, about = "Live HLS segment server with realtime viewer notifications")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the segment server and notification hub
    Start {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Media directory to serve and watch
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Print the newest index playlist in the media directory
    Latest {
        /// Media directory to scan (defaults to the configured one)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}
