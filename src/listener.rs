//! TCP accept loop
//!
//! Spawns the ChatServer actor and one session task per accepted connection.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::Config;
use crate::handler::handle_connection;
use crate::server;

/// Accept connections forever
///
/// Accept failures are logged and skipped; they never stop the loop.
pub async fn serve(listener: TcpListener, config: Arc<Config>) {
    let cmd_tx = server::spawn(config.command_buffer);
    info!("ChatServer actor started");

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!("New connection from {}", addr);
                let cmd_tx = cmd_tx.clone();
                let config = Arc::clone(&config);

                // Spawn handler task for each connection
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, cmd_tx, config).await {
                        error!("Connection handler error for {}: {}", addr, e);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}
