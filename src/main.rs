mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use hlscast::{config, server, store::SegmentStore};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "hlscast=trace,tower_http=debug".to_string()
        } else {
            "hlscast=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port, dir } => {
            let mut config = config::load_config_or_default(cli.config.as_deref())?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(dir) = dir {
                config.media.dir = dir;
            }

            tracing::info!("Starting hlscast");
            tracing::info!("Serving media from {:?}", config.media.dir);

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(server::start_server(config))
        }
        Commands::Latest { dir } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let dir = dir.unwrap_or(config.media.dir);
            let store = SegmentStore::new(dir);
            match store.latest_index(&config.media.index_prefix)? {
                Some(name) => println!("{name}"),
                None => println!("No index playlist found"),
            }
            Ok(())
        }
    }
}
