//! Per-connection session handler
//!
//! Drives one connection from accept to disconnect: splits the stream,
//! frames inbound lines, runs the session state machine and forwards
//! registry and routing work to the ChatServer actor.

use std::sync::Arc;

use futures_util::{Stream, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::AppError;
use crate::message::{ClientCommand, ServerMessage};
use crate::server::{self, ServerCommand};
use crate::types::ClientId;

/// Session lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Connected, no nickname yet
    Unregistered,
    /// Holds a unique nickname
    Registered { nickname: String },
    /// Read loop ended; registry entry released
    Closed,
}

/// State machine for one connection
///
/// Owns the sending side of its writer channel; the connection itself is
/// owned by the read loop and the writer task.
pub struct Session {
    id: ClientId,
    state: SessionState,
    cmd_tx: mpsc::Sender<ServerCommand>,
    msg_tx: mpsc::Sender<ServerMessage>,
}

impl Session {
    pub fn new(
        id: ClientId,
        cmd_tx: mpsc::Sender<ServerCommand>,
        msg_tx: mpsc::Sender<ServerMessage>,
    ) -> Self {
        Self {
            id,
            state: SessionState::Unregistered,
            cmd_tx,
            msg_tx,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn nickname(&self) -> Option<&str> {
        match &self.state {
            SessionState::Registered { nickname } => Some(nickname),
            _ => None,
        }
    }

    pub fn is_registered(&self) -> bool {
        matches!(self.state, SessionState::Registered { .. })
    }

    /// Send the welcome banner, then process lines until end of stream.
    ///
    /// Any error returned is fatal for the session.
    pub async fn run<S>(&mut self, mut lines: S) -> Result<(), AppError>
    where
        S: Stream<Item = Result<String, LinesCodecError>> + Unpin,
    {
        self.reply(ServerMessage::Welcome).await?;

        while let Some(line) = lines.next().await {
            let line = line?;
            self.handle_line(&line).await?;
        }

        debug!("Client {} reached end of stream", self.id);
        Ok(())
    }

    /// Process one inbound line
    pub async fn handle_line(&mut self, line: &str) -> Result<(), AppError> {
        let command = ClientCommand::parse(line);

        if !self.is_registered() && !command.allowed_unregistered() {
            return self.reply(AppError::NicknameRequired.into()).await;
        }

        match command {
            ClientCommand::Nick { nickname } => self.set_nickname(nickname).await,
            ClientCommand::List => {
                let nicknames = server::request_list(&self.cmd_tx).await?;
                self.reply(ServerMessage::ClientList { nicknames }).await
            }
            ClientCommand::Broadcast { body } => {
                self.dispatch(ServerCommand::Broadcast {
                    client_id: self.id,
                    body,
                })
                .await
            }
            ClientCommand::PrivateMessage { recipient, body } => {
                self.dispatch(ServerCommand::PrivateMessage {
                    client_id: self.id,
                    recipient,
                    body,
                })
                .await
            }
            ClientCommand::MalformedPrivateMessage => {
                self.reply(AppError::MessageUsage.into()).await
            }
            ClientCommand::Unknown => self.reply(AppError::UnknownCommand.into()).await,
        }
    }

    /// Release the registry entry and mark the session closed
    pub async fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        self.state = SessionState::Closed;

        let _ = self
            .cmd_tx
            .send(ServerCommand::Disconnect { client_id: self.id })
            .await;
    }

    async fn set_nickname(&mut self, nickname: String) -> Result<(), AppError> {
        let result =
            server::request_nick(&self.cmd_tx, self.id, nickname.clone(), self.msg_tx.clone())
                .await?;

        match result {
            Ok(()) => {
                self.state = SessionState::Registered {
                    nickname: nickname.clone(),
                };
                self.reply(ServerMessage::NicknameSet { nickname }).await
            }
            Err(e) => self.reply(e.into()).await,
        }
    }

    async fn dispatch(&self, cmd: ServerCommand) -> Result<(), AppError> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| AppError::ChannelSend)
    }

    /// Queue a reply on this session's own connection.
    ///
    /// Fails only when the writer task has ended, i.e. the connection is
    /// no longer writable.
    async fn reply(&self, msg: ServerMessage) -> Result<(), AppError> {
        self.msg_tx
            .send(msg)
            .await
            .map_err(|_| AppError::ChannelSend)
    }
}

/// Handle one accepted connection until it closes
///
/// Works over any full-duplex byte stream.
pub async fn handle_connection<S>(
    stream: S,
    cmd_tx: mpsc::Sender<ServerCommand>,
    config: Arc<Config>,
) -> Result<(), AppError>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let client_id = ClientId::new();
    info!("Client {} connected", client_id);

    let (reader, writer) = tokio::io::split(stream);
    let lines = FramedRead::new(reader, LinesCodec::new_with_max_length(config.max_line_length));

    // Channel for server -> client messages
    let (msg_tx, msg_rx) = mpsc::channel::<ServerMessage>(config.outbound_buffer);
    let mut write_task = spawn_writer(writer, msg_rx, config.line_terminator.clone());

    let mut session = Session::new(client_id, cmd_tx, msg_tx);

    // Whichever side fails first ends the session
    let mut writer_done = false;
    let result = tokio::select! {
        res = session.run(lines) => res,
        res = &mut write_task => {
            writer_done = true;
            match res {
                Ok(res) => res,
                Err(e) => {
                    error!("Writer task for {} panicked: {}", client_id, e);
                    Err(AppError::ChannelSend)
                }
            }
        }
    };

    if let Err(e) = &result {
        debug!("Client {} session ended with error: {}", client_id, e);
    }

    session.close().await;
    drop(session);

    // Flush anything still queued; the writer stops once the registry
    // has dropped its copy of the sender.
    if !writer_done {
        match write_task.await {
            Ok(Err(e)) => debug!("Final flush for {} failed: {}", client_id, e),
            Err(e) => error!("Writer task for {} panicked: {}", client_id, e),
            Ok(Ok(())) => {}
        }
    }

    info!("Client {} disconnected", client_id);

    result
}

fn spawn_writer<W>(
    mut writer: W,
    mut msg_rx: mpsc::Receiver<ServerMessage>,
    terminator: String,
) -> JoinHandle<Result<(), AppError>>
where
    W: AsyncWrite + Send + Unpin + 'static,
{
    tokio::spawn(async move {
        while let Some(msg) = msg_rx.recv().await {
            writer.write_all(msg.render(&terminator).as_bytes()).await?;
            writer.flush().await?;
        }
        debug!("Write task ended for client");

        let _ = writer.shutdown().await;
        Ok(())
    })
}
