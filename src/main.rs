//! DevOpsDemoApi: deployment status service.
//!
//! Application entry point. Loads layered configuration, initializes tracing,
//! builds the status router and serves it until a shutdown signal arrives.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use devops_demo_api::config::{AppConfig, CliOverrides, LogFormat, DEFAULT_LOG_FILTER};
use devops_demo_api::http::start_server;
use devops_demo_api::{build_info, create_router, AppState};

/// DevOpsDemoApi: reports deployment status over HTTP
#[derive(Parser, Debug)]
#[command(name = "devops-demo-api", version, about)]
struct Args {
    /// Path to configuration file (defaults to config/default.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level filter (e.g., "devops_demo_api=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Deployment environment name, overrides config and APP_ENVIRONMENT
    #[arg(short, long)]
    environment: Option<String>,

    /// Port to listen on, overrides config and HTTP__PORT
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let overrides = CliOverrides {
        environment: args.environment,
        port: args.port,
    };
    let config = AppConfig::load(args.config.as_deref(), &overrides)?;

    // Priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    init_tracing(&log_filter, config.logging.format);

    tracing::info!(
        environment = %config.environment,
        addr = %config.http.bind_addr(),
        marker_set = config.deployment.marker.is_some(),
        build_version = build_info::release_version().unwrap_or(build_info::FALLBACK_VERSION),
        framework = %build_info::framework_description(),
        "Loaded configuration"
    );

    let config = Arc::new(config);
    let app = create_router(AppState::new(config.clone()));

    start_server(app, &config.http).await?;

    Ok(())
}

fn init_tracing(filter: &str, format: LogFormat) {
    let registry = tracing_subscriber::registry().with(EnvFilter::new(filter));
    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }
}
