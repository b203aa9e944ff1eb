//! Connection Registry & Fan-out
//!
//! Keeps the outbox of every live connection and delivers server messages
//! with an explicit [`Scope`]. Owned by the session actor, so registration,
//! removal and delivery are already serialized.

use super::protocol::ServerMessage;
use super::types::ClientId;

use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Messages a connection may have queued before it is considered stalled.
pub const OUTBOX_CAPACITY: usize = 64;

/// Per-connection queue drained by that connection's socket writer.
pub type Outbox = mpsc::Sender<ServerMessage>;

pub fn outbox() -> (Outbox, mpsc::Receiver<ServerMessage>) {
    mpsc::channel(OUTBOX_CAPACITY)
}

/// Who receives a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All,
    AllExcept(ClientId),
    Only(ClientId),
}

impl Scope {
    pub fn includes(&self, client: &ClientId) -> bool {
        match self {
            Scope::All => true,
            Scope::AllExcept(excluded) => excluded != client,
            Scope::Only(target) => target == client,
        }
    }
}

#[derive(Default)]
pub struct Broadcaster {
    clients: HashMap<ClientId, Outbox>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, client: ClientId, outbox: Outbox) {
        self.clients.insert(client, outbox);
    }

    /// Returns `false` if the client was not registered.
    pub fn unregister(&mut self, client: &ClientId) -> bool {
        self.clients.remove(client).is_some()
    }

    pub fn contains(&self, client: &ClientId) -> bool {
        self.clients.contains_key(client)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Queues `message` for every client in `scope` and returns how many
    /// received it. Never waits: clients whose outbox is closed or full are
    /// dropped from the registry, which ends their socket writer.
    pub fn deliver(&mut self, scope: &Scope, message: &ServerMessage) -> usize {
        let mut delivered = 0;
        let mut closed = Vec::new();

        for (client, outbox) in self.clients.iter() {
            if !scope.includes(client) {
                continue;
            }
            match outbox.try_send(message.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!("Connection {} is not reading, dropping it", client);
                    closed.push(client.clone());
                }
                Err(TrySendError::Closed(_)) => closed.push(client.clone()),
            }
        }

        for client in closed {
            tracing::debug!("Unregistering connection {}", client);
            self.clients.remove(&client);
        }

        tracing::trace!(
            "Delivered '{}' to {} client(s) ({:?})",
            message.event_name(),
            delivered,
            scope
        );
        delivered
    }
}
