//! clams-dashboard CLI - EU-CLAMS Stats Dashboard
//!
//! Usage:
//!   clams-dashboard watch [OPTIONS]   Interactive terminal dashboard
//!   clams-dashboard once [OPTIONS]    Refresh once and print the page
//!
//! Examples:
//!   clams-dashboard watch --server http://127.0.0.1:8080
//!   clams-dashboard watch --config dashboard.yaml --log-file dashboard.log
//!   clams-dashboard once --limit 5

use clap::{Args, Parser, Subcommand};
use clams_dashboard::cli::{Config, ConfigError};
use clams_dashboard::tui::run_dashboard;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Parser)]
#[command(name = "clams-dashboard")]
#[command(author, version, about = "EU-CLAMS Stats Dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommonArgs {
    /// Configuration file path (YAML)
    #[arg(short, long)]
    config: Option<String>,

    /// Base URL of the stats service
    #[arg(short, long, env = "CLAMS_SERVER_URL")]
    server: Option<String>,

    /// Pause between refreshes in milliseconds
    #[arg(long)]
    refresh_ms: Option<u64>,

    /// Maximum number of Globals/HOFs to request
    #[arg(long)]
    limit: Option<usize>,

    /// Preference storage file
    #[arg(long)]
    storage: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the live dashboard (TUI)
    Watch {
        #[command(flatten)]
        common: CommonArgs,

        /// Write logs to this file (the terminal is taken by the UI)
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
    /// Refresh once and print the dashboard as text
    Once {
        #[command(flatten)]
        common: CommonArgs,
    },
}

fn build_config(args: CommonArgs) -> Result<Config, ConfigError> {
    let mut config = if let Some(path) = args.config {
        Config::from_file(&path)?
    } else {
        Config::default()
    };

    // Override with CLI arguments
    if let Some(server) = args.server {
        config.server.url = server;
    }
    if let Some(refresh_ms) = args.refresh_ms {
        config.polling.refresh_ms = refresh_ms;
    }
    if args.limit.is_some() {
        config.polling.record_limit = args.limit;
    }
    if args.storage.is_some() {
        config.storage.path = args.storage;
    }

    config.validate()?;
    Ok(config)
}

fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::from_default_env().add_directive(
        "clams_dashboard=info"
            .parse()
            .expect("static directive is valid"),
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Watch { common, log_file } => {
            let config = build_config(common)?;

            // stdout belongs to the UI, so logs only go to an explicit file
            if let Some(path) = log_file {
                let file = std::fs::File::create(path)?;
                tracing_subscriber::fmt()
                    .with_env_filter(env_filter())
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .init();
            }

            run_dashboard(config).await?;
        }
        Commands::Once { common } => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .init();

            let config = build_config(common)?;
            let mut stdout = std::io::stdout();
            clams_dashboard::cli::run_once(config, &mut stdout).await?;
        }
    }

    Ok(())
}
