use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where an announcement banner is rendered on the viewer screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementPosition {
    Top,
    #[default]
    Bottom,
}

impl AnnouncementPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnouncementPosition::Top => "top",
            AnnouncementPosition::Bottom => "bottom",
        }
    }
}

impl fmt::Display for AnnouncementPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnnouncementPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(AnnouncementPosition::Top),
            "bottom" => Ok(AnnouncementPosition::Bottom),
            other => Err(format!("unknown announcement position: {}", other)),
        }
    }
}

/// A saved announcement, kept by the store so operators can re-use it.
///
/// The live banner shown to viewers is a separate mirror held by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: String,
    pub text: String,
    pub position: AnnouncementPosition,
    /// Timestamp (ms) when the announcement was created.
    #[serde(rename = "createdAt")]
    pub created_at: u64,
}

/// Helper to get the current system time in milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
