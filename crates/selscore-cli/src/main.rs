//! Command-line entry point for the SEL inference engine.

mod startup;
mod wiring;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use startup::StartupLogger;

#[derive(Parser, Debug)]
#[command(name = "selscore")]
#[command(author, version, about = "Social-emotional skill inference engine", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server.
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
    },
}

#[tokio::main(flavor = "multi_thread", worker_threads = 16)]
async fn main() -> Result<()> {
    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "panic before unwind");
    }));

    init_tracing();

    let args = Args::parse();
    match args.command {
        Command::Serve { host, port } => run_serve(host, port).await,
    }
}

fn init_tracing() {
    let json_logging = std::env::var("SELSCORE_LOG_JSON")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("selscore=info,warn"));

    if json_logging {
        tracing_subscriber::fmt().json().with_env_filter(env_filter).init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .compact()
            .init();
    }
}

async fn run_serve(host: String, port: u16) -> Result<()> {
    let mut logger = StartupLogger::new();
    logger.banner();

    let state = wiring::build_state(&mut logger)
        .await
        .context("failed to initialize services")?;

    let router = selscore_api::router::create_router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    logger.phase_ready(&addr);
    tracing::info!(%addr, "selscore listening");

    axum::serve(listener, router)
        .await
        .context("server exited with an error")
}
