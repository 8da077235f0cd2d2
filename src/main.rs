// nl2formula - Korean natural-language to Excel formula service with cost-protection gating

use anyhow::Result;
use clap::Parser;
use nl2formula::cli::Args;
use nl2formula::config::AppConfig;
use nl2formula::gate::Gate;
use nl2formula::provider::OpenAiClient;
use nl2formula::server::create_router;
use nl2formula::utils::logging;
use std::net::SocketAddr;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let mut config = AppConfig::load_from(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting nl2formula v{}", env!("CARGO_PKG_VERSION"));

    // Phase 3: Build provider client
    if config.provider.dev_mode {
        info!("Dev mode enabled: provider calls are stubbed");
    }
    let provider = OpenAiClient::new(&config.provider)?;

    // Phase 4: Assemble the gate
    let gate = Gate::new(&config.gate, config.provider.dev_mode, provider);
    info!(
        "Gate limits: {} requests / {}s per client, {} generations per day, cache TTL {}s",
        config.gate.rate_limit,
        config.gate.rate_window_seconds,
        config.gate.daily_limit,
        config.gate.cache_ttl_seconds
    );

    // Phase 5: Build and start HTTP server
    let app = create_router(config.clone(), gate)?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 6: Run server with graceful shutdown
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
