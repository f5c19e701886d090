mod analysis;
mod cli;
mod config;
mod errors;
mod ingest;
mod llm_client;
mod render;
mod routes;
mod state;
mod text;

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::analysis::analyzer::ResumeAnalyzer;
use crate::analysis::similarity::{build_embedder, SimilarityScorer};
use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Load configuration first (fails on missing GEMINI_API_KEY)
    let config = Config::from_env()?;

    // Structured logging on stderr; stdout carries prompts and reports
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting TalentAlignAI v{}", env!("CARGO_PKG_VERSION"));

    // Embedding model is loaded once and shared read-only
    let embedder = build_embedder(&config.embedding_backend)?;
    let scorer = SimilarityScorer::new(embedder);
    info!("Similarity scorer initialized (backend: {})", scorer.backend());

    // Initialize LLM client
    let llm = LlmClient::new(config.gemini_api_key.clone(), config.llm_timeout)?
        .with_api_base(&config.gemini_api_base)
        .with_model(&config.gemini_model)
        .with_max_retries(config.llm_max_retries)
        .with_backoff(config.llm_backoff);
    info!(
        "LLM client initialized (model: {}, max retries: {})",
        llm.model(),
        config.llm_max_retries
    );

    let analyzer = ResumeAnalyzer::new(scorer, Arc::new(llm));

    match args.command.unwrap_or(Command::Interactive) {
        Command::Interactive => cli::run_interactive(&analyzer).await,
        Command::Analyze { resume, job, report } => {
            let report_path = report.unwrap_or_else(|| config.report_path.clone());
            cli::run_batch(&analyzer, &resume, &job, &report_path).await
        }
        Command::Serve { port } => serve(analyzer, port.unwrap_or(config.port)).await,
    }
}

async fn serve(analyzer: ResumeAnalyzer, port: u16) -> Result<()> {
    let state = AppState {
        analyzer: Arc::new(analyzer),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
