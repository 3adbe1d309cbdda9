//! Message routing
//!
//! Stateless fan-out over the registry. Called only from the `ChatServer`
//! actor, so each call sees the registry exclusively for its whole duration.

use tracing::{debug, warn};

use crate::error::AppError;
use crate::message::ServerMessage;
use crate::registry::Registry;
use crate::types::ClientId;

/// Deliver `body` to every registered session.
///
/// The sender gets `You: <body>`, everyone else `<sender>: <body>`.
/// A failed delivery is logged and the fan-out continues. Returns the
/// number of successful deliveries.
pub async fn broadcast(registry: &Registry, sender_id: ClientId, body: &str) -> usize {
    let Some(sender) = registry.get(sender_id) else {
        warn!("Broadcast from unregistered client {}", sender_id);
        return 0;
    };
    let from = sender.nickname.clone();

    let mut delivered = 0;
    for client in registry.clients() {
        let msg = if client.id == sender_id {
            ServerMessage::BroadcastEcho {
                body: body.to_string(),
            }
        } else {
            ServerMessage::Broadcast {
                from: from.clone(),
                body: body.to_string(),
            }
        };

        match client.send(msg).await {
            Ok(()) => delivered += 1,
            Err(e) => warn!("Failed to deliver broadcast to {}: {}", client.nickname, e),
        }
    }

    debug!("Broadcast from {} delivered to {} clients", from, delivered);
    delivered
}

/// Deliver `body` to the session named `recipient`.
///
/// If nobody holds that nickname, the sender gets a not-found notice
/// instead. Exactly one message is produced per call.
pub async fn send_private(registry: &Registry, sender_id: ClientId, recipient: &str, body: &str) {
    let Some(sender) = registry.get(sender_id) else {
        warn!("Private message from unregistered client {}", sender_id);
        return;
    };

    let target = registry
        .find_by_name(recipient)
        .and_then(|id| registry.get(id));

    match target {
        Some(target) => {
            let msg = ServerMessage::Private {
                from: sender.nickname.clone(),
                body: body.to_string(),
            };
            if let Err(e) = target.send(msg).await {
                warn!(
                    "Failed to deliver private message to {}: {}",
                    target.nickname, e
                );
            }
        }
        None => {
            debug!("{} messaged unknown user {}", sender.nickname, recipient);
            let notice = AppError::UserNotFound(recipient.to_string()).into();
            if let Err(e) = sender.send(notice).await {
                warn!("Failed to notify {}: {}", sender.nickname, e);
            }
        }
    }
}
