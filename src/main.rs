use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hdwatch::duration::format_duration;
use hdwatch::{build_monitor, AgentConfig};

#[derive(Parser, Debug)]
#[command(name = "hdwatch")]
#[command(about = "Disk temperature and free-space diagnostics agent")]
struct Args {
    /// Directory whose filesystem is checked for free space (usage
    /// monitoring is disabled when omitted)
    home_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Hostname used as the status name prefix
    #[arg(long)]
    hostname: Option<String>,

    /// Never raise temperature warnings while data is present
    #[arg(long)]
    no_temp_warn: bool,

    /// Write each published message to this JSON file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Send each published message to this TCP endpoint (host:port)
    #[arg(short, long)]
    connect: Option<String>,
}

impl Args {
    /// Flags take precedence over file and environment settings.
    fn apply(self, config: &mut AgentConfig) {
        if self.home_dir.is_some() {
            config.home_dir = self.home_dir;
        }
        if self.hostname.is_some() {
            config.hostname = self.hostname;
        }
        if self.no_temp_warn {
            config.no_temp_warn = true;
        }
        if self.file.is_some() {
            config.output.file = self.file;
        }
        if self.connect.is_some() {
            config.output.connect = self.connect;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hdwatch=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = AgentConfig::load(args.config.as_deref())
        .with_context(|| match &args.config {
            Some(path) => format!("Failed to load configuration from {}", path.display()),
            None => "Failed to load configuration".to_string(),
        })?;
    args.apply(&mut config);

    let monitor = build_monitor(&config)?;
    tracing::info!(
        hostname = %config.resolved_hostname(),
        home_dir = ?config.home_dir,
        interval = %format_duration(config.publish.interval()?),
        "Starting disk health agent",
    );

    let handle = monitor.start();

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    tracing::info!("Shutting down");
    handle.shutdown().await;

    Ok(())
}
