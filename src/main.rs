//! surfsense - Surf Conditions Intelligence Service
//!
//! Scores wind, swell, and tide readings into one graded verdict and serves
//! it with an optionally AI-enhanced narrative.
//!
//! # Usage
//!
//! ```bash
//! # Run with the synthetic reading source
//! cargo run --release
//!
//! # Custom bind address and evaluation interval
//! cargo run --release -- --addr 127.0.0.1:9090 --interval 30
//! ```
//!
//! # Environment Variables
//!
//! - `SURFSENSE_CONFIG`: Path to a site_config.toml
//! - `SURFSENSE_ENHANCE_KEY`: API key for the text-enhancement service
//! - `RUST_LOG`: Logging level (default: info)

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use surfsense::acquisition::SyntheticSource;
use surfsense::api::{create_app, DashboardState};
use surfsense::config::{self, SiteConfig};
use surfsense::enhancement::{EnhancementPipeline, HttpEnhancementClient, SystemClock};
use surfsense::evaluation::{Evaluator, SharedReport};
use surfsense::narrative::{NarrativeGenerator, RandomSelector};
use surfsense::prediction::{HttpPredictionService, PredictionService};
use surfsense::PipelineSettings;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "surfsense")]
#[command(about = "Surf conditions intelligence service")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default from config, "0.0.0.0:8080")
    #[arg(short, long)]
    addr: Option<String>,

    /// Override the evaluation interval in seconds
    #[arg(long)]
    interval: Option<u64>,
}

// ============================================================================
// Entry point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();
    config::init(SiteConfig::load());
    let cfg = config::get();

    info!(site = %cfg.site.name, "surfsense starting");

    let shutdown = CancellationToken::new();

    // Enhancement pipeline actor
    let client = Arc::new(HttpEnhancementClient::from_config(&cfg.enhancement));
    let (pipeline, enhancer) = EnhancementPipeline::new(
        client,
        PipelineSettings::from(&cfg.enhancement),
        Arc::new(SystemClock),
        shutdown.clone(),
    );
    tokio::spawn(pipeline.run());

    // Optional prediction service
    let predictor: Option<Arc<dyn PredictionService>> =
        HttpPredictionService::from_config(&cfg.prediction)
            .map(|s| Arc::new(s) as Arc<dyn PredictionService>);
    if predictor.is_none() {
        info!("Prediction service not configured — scoring on analyzers alone");
    }

    // Evaluation loop
    let report: SharedReport = Arc::new(RwLock::new(None));
    let evaluator = Evaluator::new(
        Box::new(SyntheticSource),
        predictor,
        NarrativeGenerator::new(Box::new(RandomSelector)),
        enhancer.clone(),
    );
    let interval = tokio::time::Duration::from_secs(
        args.interval.unwrap_or(cfg.evaluation.interval_secs),
    );
    tokio::spawn(evaluator.run(Arc::clone(&report), interval, shutdown.clone()));

    // HTTP server
    let state = DashboardState {
        report,
        validating: enhancer.validating_flag(),
    };
    let app = create_app(state);
    let addr = args.addr.unwrap_or_else(|| cfg.server.listen_addr.clone());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "API listening");

    let server_shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {},
                () = server_shutdown.cancelled() => {},
            }
        })
        .await
        .context("server error")?;

    // Tear down timers and in-flight work before exit
    shutdown.cancel();
    info!("surfsense stopped");
    Ok(())
}
