//! Error types for the chat relay
//!
//! Defines application-level errors and message send errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;
use tokio_util::codec::LinesCodecError;

/// Application-level errors
///
/// Covers both fatal errors (session termination) and
/// protocol errors (reported to the client as a text reply).
#[derive(Debug, Error)]
pub enum AppError {
    /// IO error on the session's own connection (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Line framing error: oversized line or invalid UTF-8 (fatal)
    #[error("Line codec error: {0}")]
    Codec(#[from] LinesCodecError),

    /// Channel send error (fatal - internal channel broken)
    #[error("Channel send error")]
    ChannelSend,

    /// Nickname is held by another session
    #[error("Nickname already in use: {0}")]
    NicknameInUse(String),

    /// Command issued before a nickname was set
    #[error("Nickname required")]
    NicknameRequired,

    /// `/MSG` without both a recipient and a body
    #[error("Malformed private message")]
    MessageUsage,

    /// Unrecognized command from a registered session
    #[error("Unknown command")]
    UnknownCommand,

    /// Private message recipient is not registered
    #[error("User not found: {0}")]
    UserNotFound(String),
}

/// Message send errors
///
/// Occurs when attempting to send messages through closed channels.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,
}
