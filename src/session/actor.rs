//! Session Actor
//!
//! Single owner of the [`SessionState`] and the connection registry. Every
//! connection handler talks to it through a [`SessionHandle`]; commands are
//! queued on one channel and applied strictly one at a time.
//!
//! ## Guarantees
//! - **Atomicity**: a command's state change and the broadcasts it causes
//!   happen inside one call to [`SessionActor::handle`], before the next
//!   command is looked at.
//! - **Ordering**: all clients observe transitions in the order the actor
//!   received the commands.
//! - **Snapshot first**: a connection is registered and sent its snapshot by
//!   the `Connect` command, which the connection handler queues before
//!   forwarding any of its own messages.

use super::broadcaster::{Broadcaster, Outbox, Scope};
use super::protocol::{ClientMessage, ServerMessage};
use super::types::{ClientId, SessionState};
use crate::error::AppError;
use crate::songs::parse_song;
use crate::store::SongStore;

use anyhow::{anyhow, Result};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Capacity of the command queue shared by all connections.
const COMMAND_QUEUE_SIZE: usize = 256;

#[derive(Debug)]
pub enum SessionCommand {
    /// Registers a connection and sends it the current snapshot.
    Connect { client: ClientId, outbox: Outbox },
    /// A decoded frame from a connection.
    Message {
        client: ClientId,
        message: ClientMessage,
    },
    /// A frame from a connection that could not be decoded.
    Rejected { client: ClientId, reason: String },
    Disconnect { client: ClientId },
    /// Copy of the current state, for diagnostics and tests.
    Snapshot { reply: oneshot::Sender<SessionState> },
}

pub struct SessionActor {
    state: SessionState,
    broadcaster: Broadcaster,
    store: Arc<dyn SongStore>,
}

impl SessionActor {
    pub fn new(store: Arc<dyn SongStore>) -> Self {
        Self {
            state: SessionState::default(),
            broadcaster: Broadcaster::new(),
            store,
        }
    }

    /// Starts the actor on the runtime and returns the handle used by
    /// connection handlers.
    pub fn spawn(store: Arc<dyn SongStore>) -> SessionHandle {
        let (tx, rx) = mpsc::channel(COMMAND_QUEUE_SIZE);
        let actor = Self::new(store);
        tokio::spawn(actor.run(rx));
        SessionHandle { tx }
    }

    pub async fn run(mut self, mut commands: mpsc::Receiver<SessionCommand>) {
        tracing::info!("Session actor started");
        while let Some(command) = commands.recv().await {
            self.handle(command);
        }
        tracing::info!("Session actor stopped: all handles dropped");
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn client_count(&self) -> usize {
        self.broadcaster.len()
    }

    /// Applies one command to completion, including its broadcasts.
    pub fn handle(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Connect { client, outbox } => {
                tracing::info!("[Client Connected] {}", client);
                self.broadcaster.register(client.clone(), outbox);
                let snapshot = ServerMessage::Initial(self.state.clone());
                self.broadcaster.deliver(&Scope::Only(client), &snapshot);
            }
            SessionCommand::Message { client, message } => {
                if !self.broadcaster.contains(&client) {
                    tracing::warn!("Ignoring message from unregistered client {}", client);
                    return;
                }
                self.apply(&client, message);
            }
            SessionCommand::Rejected { client, reason } => {
                tracing::warn!("Rejected frame from {}: {}", client, reason);
                self.report(&client, AppError::validation(reason));
            }
            SessionCommand::Disconnect { client } => {
                if self.broadcaster.unregister(&client) {
                    tracing::info!("[Client Disconnected] {}", client);
                }
            }
            SessionCommand::Snapshot { reply } => {
                let _ = reply.send(self.state.clone());
            }
        }
    }

    fn apply(&mut self, sender: &ClientId, message: ClientMessage) {
        let others = Scope::AllExcept(sender.clone());

        match message {
            ClientMessage::NewLine(text) => {
                tracing::info!("[Line] {}", text);
                self.state.active_line_text = text.clone();
                self.broadcaster.deliver(&others, &ServerMessage::Line(text));
            }
            ClientMessage::ChangeCanto(song_id) => self.change_song(sender, song_id),
            ClientMessage::ChangeIndex(index) => {
                tracing::info!("[Index Change] {}", index);
                if let Some(line) = self.state.move_to(index) {
                    self.broadcaster.deliver(&others, &ServerMessage::Line(line));
                } else {
                    tracing::debug!("Index {} is outside the active song, line kept", index);
                }
                self.broadcaster.deliver(&others, &ServerMessage::Index(index));
            }
            ClientMessage::View(visible) => {
                tracing::info!("[Viewer State] {}", if visible { "ENABLED" } else { "DISABLED" });
                self.state.viewer_visible = visible;
                self.broadcaster
                    .deliver(&others, &ServerMessage::ViewerActive(visible));
            }
            ClientMessage::SetAnnouncement(update) => {
                self.state.announcement.merge(update);
                let announcement = &self.state.announcement;
                tracing::info!(
                    "[Announcement] {} {} ({})",
                    if announcement.active { "SHOW:" } else { "HIDE:" },
                    announcement.text,
                    announcement.position
                );
                let message = ServerMessage::Announcement(announcement.clone());
                self.broadcaster.deliver(&others, &message);
                self.broadcaster
                    .deliver(&Scope::Only(sender.clone()), &message);
            }
            ClientMessage::NewWritten(payload) => {
                if payload.is_null() {
                    self.report(sender, AppError::validation("Notice payload is required"));
                    return;
                }
                tracing::info!("[Notification] from {}", sender);
                self.broadcaster
                    .deliver(&Scope::All, &ServerMessage::Written(payload));
            }
            ClientMessage::Disconnect => {
                if self.broadcaster.unregister(sender) {
                    tracing::info!("[Client Disconnected] {}", sender);
                }
            }
        }
    }

    /// Looks the song up, parses it and makes it active. Unknown ids and store
    /// failures leave the state untouched and are reported to the sender only.
    fn change_song(&mut self, sender: &ClientId, song_id: String) {
        tracing::info!("[Canto Change] {}", song_id);
        if song_id.trim().is_empty() {
            self.report(sender, AppError::validation("Song id is required"));
            return;
        }

        let song = match self.store.get_song(&song_id) {
            Ok(Some(song)) => song,
            Ok(None) => {
                tracing::warn!("Song {} not found, session unchanged", song_id);
                self.report(sender, AppError::song_not_found(song_id));
                return;
            }
            Err(e) => {
                tracing::error!("Failed to load song {}: {:#}", song_id, e);
                self.report(sender, AppError::Internal(e));
                return;
            }
        };

        let parsed = parse_song(&song);
        let first_line = self.state.activate_song(parsed.clone());

        self.broadcaster
            .deliver(&Scope::All, &ServerMessage::ActiveSong(parsed));
        self.broadcaster.deliver(
            &Scope::AllExcept(sender.clone()),
            &ServerMessage::Canto(song_id),
        );
        if let Some(line) = first_line {
            self.broadcaster.deliver(&Scope::All, &ServerMessage::Line(line));
            self.broadcaster.deliver(&Scope::All, &ServerMessage::Index(0));
        }
    }

    fn report(&mut self, client: &ClientId, error: AppError) {
        self.broadcaster.deliver(
            &Scope::Only(client.clone()),
            &ServerMessage::Error(error.to_body()),
        );
    }
}

/// Cloneable front door to the session actor.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    async fn submit(&self, command: SessionCommand) -> Result<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| anyhow!("session actor is not running"))
    }

    /// Registers a new connection. The snapshot is queued on `outbox` before
    /// any later command from this connection is applied.
    pub async fn connect(&self, outbox: Outbox) -> Result<ClientId> {
        let client = ClientId::new();
        self.submit(SessionCommand::Connect {
            client: client.clone(),
            outbox,
        })
        .await?;
        Ok(client)
    }

    pub async fn send(&self, client: &ClientId, message: ClientMessage) -> Result<()> {
        self.submit(SessionCommand::Message {
            client: client.clone(),
            message,
        })
        .await
    }

    pub async fn reject(&self, client: &ClientId, reason: String) -> Result<()> {
        self.submit(SessionCommand::Rejected {
            client: client.clone(),
            reason,
        })
        .await
    }

    pub async fn disconnect(&self, client: &ClientId) -> Result<()> {
        self.submit(SessionCommand::Disconnect {
            client: client.clone(),
        })
        .await
    }

    pub async fn snapshot(&self) -> Result<SessionState> {
        let (reply, response) = oneshot::channel();
        self.submit(SessionCommand::Snapshot { reply }).await?;
        response
            .await
            .map_err(|_| anyhow!("session actor dropped the snapshot request"))
    }
}
