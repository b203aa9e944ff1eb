//! Session Wire Protocol
//!
//! Every WebSocket frame is a JSON text message of the form
//! `{"event": "<name>", "data": <payload>}`. Event names are kept compatible
//! with the existing controller and viewer clients.

use super::types::{AnnouncementState, AnnouncementUpdate, SessionState};
use crate::error::ErrorBody;
use crate::songs::ParsedSong;
use serde::{Deserialize, Serialize};

pub const ENDPOINT_SESSION: &str = "/ws";

/// Commands a client can send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Free text to show as the active line.
    NewLine(String),
    /// Switch the active song by id.
    ChangeCanto(String),
    /// Move the cursor within the active song.
    ChangeIndex(i64),
    /// Show or hide the viewer output.
    View(bool),
    SetAnnouncement(AnnouncementUpdate),
    /// Transient notice relayed to everyone, never stored.
    NewWritten(serde_json::Value),
    Disconnect,
}

/// Notifications the server pushes to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Full snapshot, sent once right after connecting.
    Initial(SessionState),
    Line(String),
    /// Legacy song-change notification, kept next to `ActiveSong` for older
    /// viewers that only track the id.
    Canto(String),
    ActiveSong(ParsedSong),
    Index(i64),
    ViewerActive(bool),
    Announcement(AnnouncementState),
    Written(serde_json::Value),
    /// A command from this client was rejected; sent to that client only.
    Error(ErrorBody),
}

impl ServerMessage {
    pub fn event_name(&self) -> &'static str {
        match self {
            ServerMessage::Initial(_) => "initial",
            ServerMessage::Line(_) => "line",
            ServerMessage::Canto(_) => "canto",
            ServerMessage::ActiveSong(_) => "activeSong",
            ServerMessage::Index(_) => "index",
            ServerMessage::ViewerActive(_) => "viewerActive",
            ServerMessage::Announcement(_) => "announcement",
            ServerMessage::Written(_) => "written",
            ServerMessage::Error(_) => "error",
        }
    }
}

/// Parses one text frame.
pub fn decode_client_message(text: &str) -> Result<ClientMessage, serde_json::Error> {
    serde_json::from_str(text)
}
