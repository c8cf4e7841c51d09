//! Quantum server binary.
//!
//! Runs a standalone node under the lifecycle orchestrator until SIGINT,
//! SIGQUIT or SIGTERM is received.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;

use quantum::config::{self, Opt};
use quantum::observability::logging::init_logging;
use quantum::{Lifecycle, ListenOutcome, Node, NodeConfig, NodeError, Scheduler};

#[derive(Parser)]
#[command(name = "quantum")]
#[command(version, about = "Quantum server lifecycle orchestrator", long_about = None)]
struct Cli {
    /// Service address to listen on.
    #[arg(short, long, default_value = "0.0.0.0:3250")]
    addr: String,

    /// TOML configuration file applied before command-line options.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run as cluster master.
    #[arg(long)]
    master: bool,

    /// Address announced to cluster peers.
    #[arg(long)]
    advertise: Option<String>,

    /// Address exposed to clients.
    #[arg(long)]
    client: Option<String>,

    /// Node retry interval in milliseconds.
    #[arg(long)]
    retry_interval_ms: Option<u64>,

    /// Scheduler tick in milliseconds.
    #[arg(long, default_value_t = 1000)]
    tick_ms: u64,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Command-line options, in the order they override each other.
    fn options(&self) -> Vec<Opt> {
        let file = match &cli.config {
        Some(path) => match config::load_config(path) {
            Ok(file) => {
                tracing::info!(path = %path.display(), "Configuration loaded");
                Some(file)
            }
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "Failed to load configuration");
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };
    let opts = config::merge(file.as_ref(), cli.options());

    let lifecycle = Lifecycle::new(
        |config: NodeConfig| StandaloneNode { config },
        TickScheduler {
            tick: Duration::from_millis(cli.tick_ms.max(1)),
        },
    );

    match lifecycle.listen(&cli.addr, &opts).await {
        Ok(ListenOutcome::Stopped(report)) => {
            tracing::info!(reason = %report.reason, "Shutdown complete");
            ExitCode::SUCCESS
        }
        Ok(ListenOutcome::AlreadyRunning) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Fatal error");
            ExitCode::FAILURE
        }
    }
}
