//! ChatServer Actor implementation
//!
//! The central actor that owns the nickname registry. Sessions talk to it
//! through an mpsc queue, so every registry read, write and routing
//! fan-out runs one at a time inside this task.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::message::ServerMessage;
use crate::registry::Registry;
use crate::router;
use crate::types::ClientId;

/// Commands sent from sessions to the ChatServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// Claim or change a nickname
    Nick {
        client_id: ClientId,
        nickname: String,
        sender: mpsc::Sender<ServerMessage>,
        reply: oneshot::Sender<Result<(), AppError>>,
    },
    /// Snapshot the registered nicknames
    List {
        reply: oneshot::Sender<Vec<String>>,
    },
    /// Broadcast to all registered sessions
    Broadcast {
        client_id: ClientId,
        body: String,
    },
    /// Private message to one nickname
    PrivateMessage {
        client_id: ClientId,
        recipient: String,
        body: String,
    },
    /// Session closed
    Disconnect {
        client_id: ClientId,
    },
}

/// The main ChatServer actor
pub struct ChatServer {
    registry: Registry,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl ChatServer {
    /// Create a new ChatServer with the given command receiver
    pub fn new(receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self {
            registry: Registry::new(),
            receiver,
        }
    }

    /// Run the ChatServer event loop
    ///
    /// Continuously receives and processes commands until all senders are dropped.
    pub async fn run(mut self) {
        info!("ChatServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd).await;
        }

        info!("ChatServer shutting down");
    }

    /// Process a single command
    async fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Nick {
                client_id,
                nickname,
                sender,
                reply,
            } => {
                let result = self.handle_nick(client_id, &nickname, sender);
                if reply.send(result).is_err() {
                    debug!("Client {} went away before nick reply", client_id);
                }
            }
            ServerCommand::List { reply } => {
                let _ = reply.send(self.registry.list());
            }
            ServerCommand::Broadcast { client_id, body } => {
                router::broadcast(&self.registry, client_id, &body).await;
            }
            ServerCommand::PrivateMessage {
                client_id,
                recipient,
                body,
            } => {
                router::send_private(&self.registry, client_id, &recipient, &body).await;
            }
            ServerCommand::Disconnect { client_id } => {
                self.handle_disconnect(client_id);
            }
        }
    }

    /// Handle nickname claim or rename
    fn handle_nick(
        &mut self,
        client_id: ClientId,
        nickname: &str,
        sender: mpsc::Sender<ServerMessage>,
    ) -> Result<(), AppError> {
        let previous = self.registry.get(client_id).map(|c| c.nickname.clone());

        if let Err(e) = self.registry.claim(client_id, nickname, sender) {
            debug!("Client {} denied nickname '{}'", client_id, nickname);
            return Err(e);
        }

        match previous {
            Some(old) => info!("Client {} renamed '{}' -> '{}'", client_id, old, nickname),
            None => info!("Client {} registered as '{}'", client_id, nickname),
        }
        debug!("Registered clients: {}", self.registry.len());
        Ok(())
    }

    /// Handle session teardown
    fn handle_disconnect(&mut self, client_id: ClientId) {
        match self.registry.remove(client_id) {
            Some(client) => info!("Client {} ('{}') left", client_id, client.nickname),
            None => debug!("Client {} left without a nickname", client_id),
        }
        debug!("Registered clients: {}", self.registry.len());
    }
}

/// Spawn a ChatServer actor and return its command queue
pub fn spawn(buffer: usize) -> mpsc::Sender<ServerCommand> {
    let (cmd_tx, cmd_rx) = mpsc::channel(buffer);
    tokio::spawn(ChatServer::new(cmd_rx).run());
    cmd_tx
}

/// Request a nickname on behalf of a session
pub async fn request_nick(
    cmd_tx: &mpsc::Sender<ServerCommand>,
    client_id: ClientId,
    nickname: String,
    sender: mpsc::Sender<ServerMessage>,
) -> Result<Result<(), AppError>, AppError> {
    let (reply, rx) = oneshot::channel();
    cmd_tx
        .send(ServerCommand::Nick {
            client_id,
            nickname,
            sender,
            reply,
        })
        .await
        .map_err(|_| AppError::ChannelSend)?;
    rx.await.map_err(|_| {
        warn!("ChatServer dropped nick reply for {}", client_id);
        AppError::ChannelSend
    })
}

/// Request the current nickname list
pub async fn request_list(cmd_tx: &mpsc::Sender<ServerCommand>) -> Result<Vec<String>, AppError> {
    let (reply, rx) = oneshot::channel();
    cmd_tx
        .send(ServerCommand::List { reply })
        .await
        .map_err(|_| AppError::ChannelSend)?;
    rx.await.map_err(|_| AppError::ChannelSend)
}
