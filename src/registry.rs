//! Nickname registry
//!
//! Maps each registered session to its nickname. Nicknames are pairwise
//! distinct at all times. The registry is plain data; exclusive access is
//! provided by the `ChatServer` actor that owns it.

use std::collections::HashMap;

use tokio::sync::mpsc;

use crate::client::Client;
use crate::error::AppError;
use crate::message::ServerMessage;
use crate::types::ClientId;

/// Registered sessions keyed by identity
#[derive(Debug, Default)]
pub struct Registry {
    clients: HashMap<ClientId, Client>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff no entry currently holds `nickname`
    pub fn is_available(&self, nickname: &str) -> bool {
        !self.clients.values().any(|c| c.nickname == nickname)
    }

    /// Insert without checking availability.
    ///
    /// Callers must have checked `is_available` in the same critical
    /// section; sessions go through `claim` instead.
    pub fn register(
        &mut self,
        id: ClientId,
        nickname: String,
        sender: mpsc::Sender<ServerMessage>,
    ) {
        self.clients.insert(id, Client::new(id, nickname, sender));
    }

    /// Atomically check and take `nickname` for `id`.
    ///
    /// A session that is already registered is renamed in place and keeps
    /// its existing channel. A nickname held by anyone, including `id`
    /// itself, is rejected.
    pub fn claim(
        &mut self,
        id: ClientId,
        nickname: &str,
        sender: mpsc::Sender<ServerMessage>,
    ) -> Result<(), AppError> {
        if !self.is_available(nickname) {
            return Err(AppError::NicknameInUse(nickname.to_string()));
        }

        match self.clients.get_mut(&id) {
            Some(client) => client.nickname = nickname.to_string(),
            None => self.register(id, nickname.to_string(), sender),
        }
        Ok(())
    }

    /// Remove the entry for `id`; no-op if absent
    pub fn remove(&mut self, id: ClientId) -> Option<Client> {
        self.clients.remove(&id)
    }

    /// Snapshot of all nicknames, sorted
    pub fn list(&self) -> Vec<String> {
        let mut nicknames: Vec<String> = self
            .clients
            .values()
            .map(|c| c.nickname.clone())
            .collect();
        nicknames.sort();
        nicknames
    }

    pub fn find_by_name(&self, nickname: &str) -> Option<ClientId> {
        self.clients
            .values()
            .find(|c| c.nickname == nickname)
            .map(|c| c.id)
    }

    pub fn get(&self, id: ClientId) -> Option<&Client> {
        self.clients.get(&id)
    }

    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
