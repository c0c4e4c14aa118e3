//! mythd: MythWeaver daemon.
//!
//! Serves [`MythService`](mythweaver::MythService) over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use mythweaver::MythService;
use mythweaver::providers::OpenAiClient;
use mythweaver::server::config::{Config, Secrets};

/// MythWeaver daemon: scenario-to-myth generation service.
#[derive(Parser)]
#[command(name = "mythd")]
#[command(version = mythweaver::PKG_VERSION)]
#[command(about = "MythWeaver myth generation daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = Config::load(args.config.as_deref())?;
    init_tracing(&config);

    let secrets = Secrets::load()?;
    let service = build_service(&config, &secrets)?;

    let addr: SocketAddr =
        config.server.address.parse().map_err(|e| {
            mythweaver::MythError::Configuration(format!("Invalid address: {e}"))
        })?;

    info!(
        version = mythweaver::PKG_VERSION,
        environment = %config.server.environment,
        model = %config.generation.model,
        %addr,
        "mythd starting"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    mythweaver::server::serve(listener, Arc::new(service), shutdown_signal()).await?;

    info!("mythd stopped");
    Ok(())
}

/// JSON logs in production, human-readable everywhere else. `RUST_LOG`
/// takes precedence over the configured level.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.server.environment == "production" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Build a [`MythService`] from configuration.
fn build_service(
    config: &Config,
    secrets: &Secrets,
) -> Result<MythService, mythweaver::MythError> {
    let api_key = secrets.api_key().ok_or_else(|| {
        mythweaver::MythError::Configuration(
            "No API key found. Set OPENAI_API_KEY or add [openai] api_key to secrets.toml"
                .to_string(),
        )
    })?;

    let client = Arc::new(OpenAiClient::with_timeout(
        api_key,
        config.generation.base_url.as_str(),
        config.request_timeout(),
    )?);

    let mut builder = MythService::builder()
        .completion(client.clone())
        .generator_config(config.generator_config())
        .validator(config.validator())
        .classifier(config.classifier())
        .motifs(config.motif_repository())
        .cache_config(config.cache_config())
        .environment(config.server.environment.as_str());

    if config.safety.moderation {
        builder = builder.moderation(client);
    } else {
        warn!("moderation disabled by configuration");
    }

    builder.build()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        // Without a signal handler, never resolve: serve until killed.
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
