//! Chat relay - Entry Point
//!
//! Loads configuration, binds the TCP listener and accepts connections.

use std::env;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chat_relay::{serve, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=chat_relay=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chat_relay=info")),
        )
        .init();

    // Optional config file path as the first argument
    let config = match env::args().nth(1) {
        Some(path) => {
            info!("Loading config from {}", path);
            Config::load(&path)?
        }
        None => Config::default(),
    };

    // Start TCP listener
    let listener = TcpListener::bind(&config.listen).await?;
    info!("Chat relay listening on {}", config.listen);

    serve(listener, Arc::new(config)).await;

    Ok(())
}
