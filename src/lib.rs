//! Line-based chat relay library
//!
//! Clients connect over TCP, claim a unique nickname and exchange
//! broadcast or private messages as newline-delimited text.
//!
//! # Commands
//! - `/NICK <nickname>`: claim or change nickname
//! - `/LIST`: list registered nicknames
//! - `/BC <message>`: broadcast to everyone
//! - `/MSG <nickname> <message>`: private message
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `ChatServer` owns the nickname `Registry` and runs all routing
//! - Each connection runs a `Session` task plus a writer task
//! - No locks needed - the actor's command queue serializes registry access
//!
//! # Example
//! ```ignore
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use chat_relay::{serve, Config};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::default();
//!     let listener = TcpListener::bind(&config.listen).await.unwrap();
//!     serve(listener, Arc::new(config)).await;
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod listener;
pub mod message;
pub mod registry;
pub mod router;
pub mod server;
pub mod types;

// Re-export main types for convenience
pub use client::Client;
pub use config::{Config, ConfigError};
pub use error::{AppError, SendError};
pub use handler::{handle_connection, Session, SessionState};
pub use listener::serve;
pub use message::{ClientCommand, ServerMessage};
pub use registry::Registry;
pub use server::{ChatServer, ServerCommand};
pub use types::ClientId;
