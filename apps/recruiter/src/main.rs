mod agents;
mod cli;
mod config;
mod errors;
mod interview;
mod llm_client;
mod routes;
mod services;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::console::Console;
use crate::cli::Runner;
use crate::config::Config;
use crate::llm_client::{LlmClient, TextGenerator};
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::Storage;

#[derive(Parser)]
#[command(name = "recruiter")]
#[command(about = "Recruitment assistant backed by a local text-generation model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available agents
    List,

    /// Run one agent interactively, or `all` for the complete workflow
    Run {
        /// Agent short name (jd, ranker, email, scheduler, interview, recommendation, sentiment) or `all`
        agent: String,
    },

    /// Start the HTTP API
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Commands::List = cli.command {
        cli::list_agents(&mut std::io::stdout())?;
        return Ok(());
    }

    // Data directories
    Storage::new(config.data_dir.clone()).ensure_layout().await?;

    // Initialize LLM client
    let client = LlmClient::new(&config.llm)?;
    if client.is_available().await {
        info!(
            "LLM backend reachable at {} (model: {})",
            client.base_url(),
            client.model()
        );
    } else {
        warn!(
            "LLM backend at {} is not responding; generation requests will fail until it is up",
            client.base_url()
        );
    }
    let llm: Arc<dyn TextGenerator> = Arc::new(client);

    match cli.command {
        Commands::List => {}
        Commands::Run { agent } => {
            let console = Console::new(std::io::stdin().lock(), std::io::stdout());
            let mut runner = Runner::new(llm, config, console);
            // Outcome is reported by the runner; the exit code stays zero.
            runner.run_target(&agent).await;
        }
        Commands::Serve { port } => serve(llm, config, port).await?,
    }

    Ok(())
}

async fn serve(llm: Arc<dyn TextGenerator>, config: Config, port: Option<u16>) -> Result<()> {
    info!("Starting recruiter API v{}", env!("CARGO_PKG_VERSION"));
    let port = port.unwrap_or(config.port);

    let state = AppState::new(llm, config);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
