//! Client struct definition
//!
//! A registry entry: a registered session's nickname and the channel
//! feeding that session's writer task.

use tokio::sync::mpsc;

use crate::error::SendError;
use crate::message::ServerMessage;
use crate::types::ClientId;

/// Registered client information
///
/// The registry never touches the connection itself; it only holds the
/// outbound channel to the session's writer.
#[derive(Debug, Clone)]
pub struct Client {
    /// Identity of the owning session
    pub id: ClientId,
    /// Current nickname
    pub nickname: String,
    /// Server → Client message channel
    pub sender: mpsc::Sender<ServerMessage>,
}

impl Client {
    /// Create a new registry entry
    pub fn new(id: ClientId, nickname: String, sender: mpsc::Sender<ServerMessage>) -> Self {
        Self {
            id,
            nickname,
            sender,
        }
    }

    /// Send a message to this client
    ///
    /// Returns an error if the channel is closed (client disconnected).
    pub async fn send(&self, msg: ServerMessage) -> Result<(), SendError> {
        self.sender
            .send(msg)
            .await
            .map_err(|_| SendError::ChannelClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_send() {
        let (tx, mut rx) = mpsc::channel(32);
        let client = Client::new(ClientId::new(), "alice".to_string(), tx);

        client.send(ServerMessage::Welcome).await.unwrap();
        assert_eq!(rx.recv().await, Some(ServerMessage::Welcome));
    }

    #[tokio::test]
    async fn test_client_send_closed() {
        let (tx, rx) = mpsc::channel(32);
        let client = Client::new(ClientId::new(), "alice".to_string(), tx);
        drop(rx);

        assert!(matches!(
            client.send(ServerMessage::Welcome).await,
            Err(SendError::ChannelClosed)
        ));
    }
}
