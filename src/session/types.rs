use crate::songs::ParsedSong;
use crate::store::AnnouncementPosition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one live connection.
///
/// Wrapper around a UUID string, generated when the socket is accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ClientId(pub String);

impl ClientId {
    /// Generates a new random UUID v4-based ClientId.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The banner currently shown (or hidden) on viewers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementState {
    pub text: String,
    pub active: bool,
    pub position: AnnouncementPosition,
}

/// Partial banner update sent by a controller. Absent fields keep their
/// current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementUpdate {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub position: Option<AnnouncementPosition>,
}

impl AnnouncementState {
    pub fn merge(&mut self, update: AnnouncementUpdate) {
        if let Some(text) = update.text {
            self.text = text;
        }
        if let Some(active) = update.active {
            self.active = active;
        }
        if let Some(position) = update.position {
            self.position = position;
        }
    }
}

/// Canonical state of the live presentation.
///
/// Owned by the session actor for the lifetime of the process; a copy of it is
/// the snapshot every new connection receives first.
///
/// `active_line_text` normally mirrors `active_parsed_song.lines[active_line_index]`.
/// An out-of-range index is accepted and leaves the text where it was.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(rename = "viewerActive")]
    pub viewer_visible: bool,
    #[serde(rename = "activeLine")]
    pub active_line_text: String,
    #[serde(rename = "activeCantoId")]
    pub active_song_id: Option<String>,
    #[serde(rename = "activeIndex")]
    pub active_line_index: i64,
    #[serde(rename = "activeSong")]
    pub active_parsed_song: Option<ParsedSong>,
    pub announcement: AnnouncementState,
}

impl SessionState {
    /// Makes `parsed` the active song and rewinds to its first line.
    ///
    /// Returns the new active line text, if the song has any line.
    pub fn activate_song(&mut self, parsed: ParsedSong) -> Option<String> {
        self.active_song_id = Some(parsed.id.clone());
        self.active_line_index = 0;
        let first = parsed.lines.first().cloned();
        if let Some(line) = &first {
            self.active_line_text = line.clone();
        }
        self.active_parsed_song = Some(parsed);
        first
    }

    /// Moves the cursor to `index`.
    ///
    /// Returns the line at that position when it exists; otherwise the
    /// active text is left untouched and `None` is returned.
    pub fn move_to(&mut self, index: i64) -> Option<String> {
        self.active_line_index = index;
        let line = self
            .active_parsed_song
            .as_ref()
            .and_then(|song| song.line(index))
            .map(str::to_string)?;
        self.active_line_text = line.clone();
        Some(line)
    }
}
