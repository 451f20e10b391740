use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use blobsync_daemon::{process, Config};

#[derive(Debug, Parser)]
#[command(name = "blobsync", version, about = "Directory to blob container synchronization daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the synchronization service.
    Serve {
        /// Config file path; defaults to the platform config directory.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override the listen address from the config file.
        #[arg(long)]
        listen: Option<SocketAddr>,
    },
    /// Print version information.
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { config, listen } => {
            let path = config.unwrap_or_else(Config::default_path);
            let mut config = Config::load(&path)?;
            if let Some(listen) = listen {
                config.listen_addr = listen;
            }
            process::start_service(config).await
        }
        Command::Version => {
            println!("blobsync {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
