//! Alert relay server - TradingView webhook to WhatsApp forwarder.
//!
//! This binary provides a thin web server that:
//! - Receives TradingView alert webhooks
//! - Verifies the shared-secret token
//! - Forwards the alert text to WhatsApp via Twilio
//! - Responds with the provider's message identifier

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use alert_relay::web::{router, AppState};
use alert_relay::{Config, TwilioNotifier};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("relay_starting");

    // Load configuration
    let config = Config::from_env();
    if config.twilio_account_sid.is_empty() || config.twilio_auth_token.is_empty() {
        warn!("twilio_credentials_missing");
    }
    info!(
        port = config.port,
        from = %config.from_whatsapp,
        destinations = config.to_whatsapp.len(),
        webhook_token_configured = config.webhook_token.is_some(),
        request_timeout_ms = config.request_timeout_ms,
        "config_loaded"
    );

    // Create the Twilio notifier (shared, immutable, one client per process)
    let notifier = Arc::new(
        TwilioNotifier::from_config(&config).context("Failed to build Twilio client")?,
    );

    // Create application state and router
    let state = AppState::new(config.clone(), notifier);
    let app = router(state).layer(TraceLayer::new_for_http());

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "relay_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("relay_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("relay_shutting_down");
}
