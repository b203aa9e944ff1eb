use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Classification of a song in the corpus.
///
/// Stored and transmitted as a plain string (`"Canto"`, `"Especial"`). Any other
/// value coming from the store is preserved verbatim in `Other` so that a
/// round-trip through the API never rewrites user data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SongKind {
    /// A regular, numbered song.
    Canto,
    /// A non-numbered, special-occasion song.
    Especial,
    Other(String),
}

impl SongKind {
    pub fn as_str(&self) -> &str {
        match self {
            SongKind::Canto => "Canto",
            SongKind::Especial => "Especial",
            SongKind::Other(raw) => raw,
        }
    }
}

impl From<String> for SongKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Canto" => SongKind::Canto,
            "Especial" => SongKind::Especial,
            _ => SongKind::Other(raw),
        }
    }
}

impl From<SongKind> for String {
    fn from(kind: SongKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for SongKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw song body as it arrives from the store or the import endpoint.
///
/// Older records keep the whole lyric in one newline-separated string, newer
/// ones ship an ordered list of verses. Anything else is kept as raw JSON and
/// treated as "no content" by the parser and the search index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SongContent {
    Text(String),
    Verses(Vec<String>),
    Other(serde_json::Value),
}

impl SongContent {
    /// Flattens the content into a single searchable/storable string.
    ///
    /// Returns `None` for shapes the system does not understand.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            SongContent::Text(text) => Some(Cow::Borrowed(text.as_str())),
            SongContent::Verses(verses) => Some(Cow::Owned(verses.join("\n"))),
            SongContent::Other(_) => None,
        }
    }
}

/// A song record owned by the store.
///
/// Every field except `id` is optional on purpose: imported data is messy and
/// the parser must degrade rather than fail on incomplete records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<SongKind>,
    #[serde(default)]
    pub nh: Option<i64>,
    #[serde(default)]
    pub content: Option<SongContent>,
}

impl Song {
    /// Title and content are both present and non-empty.
    ///
    /// Songs that fail this check are valid parser input but are never added to
    /// the search index.
    pub fn is_searchable(&self) -> bool {
        let has_title = self.title.as_deref().is_some_and(|t| !t.is_empty());
        let has_content = self
            .content
            .as_ref()
            .and_then(SongContent::as_text)
            .is_some_and(|c| !c.is_empty());
        has_title && has_content
    }

    pub fn content_text(&self) -> Option<Cow<'_, str>> {
        self.content.as_ref().and_then(SongContent::as_text)
    }
}

/// A navigable shortcut into the display lines of a parsed song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAction {
    #[serde(rename = "text")]
    pub label: String,
    #[serde(rename = "index")]
    pub target_line_index: usize,
}

/// Presentable form of a [`Song`]: header line, body lines and quick actions.
///
/// Derived on demand and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedSong {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: Option<SongKind>,
    pub nh: Option<i64>,
    pub lines: Vec<String>,
    #[serde(rename = "quickActions")]
    pub quick_actions: Vec<QuickAction>,
}

impl ParsedSong {
    pub fn line(&self, index: i64) -> Option<&str> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.lines.get(i))
            .map(String::as_str)
    }
}
