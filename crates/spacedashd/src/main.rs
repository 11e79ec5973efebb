//! spacedashd — the SpaceDash daemon.
//!
//! Loads the launch records CSV once, registers the chart bindings and
//! serves the dashboard plus its JSON API.
//!
//! # Usage
//!
//! ```text
//! spacedashd serve --data spacex_launch_dash.csv --port 8050
//! spacedashd check --data spacex_launch_dash.csv
//! ```
//!
//! Every flag has a default; `spacedashd` with no arguments serves
//! `spacex_launch_dash.csv` from the working directory on port 8050.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use spacedash_core::DashConfig;
use spacedash_dashboard::{AppContext, DashboardState};
use spacedash_records::{RecordStore, SiteSelection, success_proportion};

#[derive(Parser)]
#[command(name = "spacedashd", about = "SpaceDash launch records dashboard")]
struct Cli {
    /// Optional spacedash.toml; flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the dashboard.
    Serve {
        /// Launch records CSV.
        #[arg(long)]
        data: Option<PathBuf>,

        /// Address to bind.
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Validate a records file and print a JSON summary.
    Check {
        /// Launch records CSV.
        #[arg(long)]
        data: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,spacedashd=debug,spacedash=debug".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => DashConfig::from_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => DashConfig::default(),
    };

    match cli.command.unwrap_or(Command::Serve {
        data: None,
        host: None,
        port: None,
    }) {
        Command::Serve { data, host, port } => {
            if let Some(data) = data {
                config.data.path = data;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            run_server(config).await
        }
        Command::Check { data } => {
            let path = data.unwrap_or(config.data.path);
            check(&path)
        }
    }
}

fn load_store(path: &Path) -> anyhow::Result<RecordStore> {
    let store = RecordStore::load(path)
        .with_context(|| format!("loading launch records from {}", path.display()))?;
    info!(
        path = %path.display(),
        records = store.len(),
        sites = store.sites().len(),
        "launch records loaded"
    );
    Ok(store)
}

async fn run_server(config: DashConfig) -> anyhow::Result<()> {
    info!("SpaceDash starting");

    // A missing or malformed file is fatal: never serve without records.
    let store = load_store(&config.data.path)?;

    let state = DashboardState::new(AppContext::new(store, config.layout.clone()))?;
    info!(bindings = state.bindings.len(), "chart bindings registered");

    let router = spacedash_api::build_router(state);
    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port))
            .await
            .with_context(|| {
                format!("binding {}:{}", config.server.host, config.server.port)
            })?;
    let addr: SocketAddr = listener.local_addr()?;
    info!(%addr, "dashboard server listening");

    // Graceful shutdown on Ctrl-C.
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("SpaceDash stopped");
    Ok(())
}

fn check(path: &Path) -> anyhow::Result<()> {
    let store = load_store(path)?;
    let successes = success_proportion(&store, &SiteSelection::All).total();
    let summary = serde_json::json!({
        "path": path.display().to_string(),
        "records": store.len(),
        "successes": successes,
        "sites": store.sites(),
        "payload_bounds": store.payload_bounds(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
