//! Song Parser
//!
//! Turns a raw [`Song`] into a [`ParsedSong`]: a synthetic header line followed by
//! the body lines, plus the quick actions a controller uses to jump between
//! sections. Parsing is pure and never fails; malformed content just produces
//! fewer lines and actions.

use super::types::{ParsedSong, QuickAction, Song, SongContent, SongKind};

use regex::Regex;
use std::sync::LazyLock;

/// Prefix used in the header line for anything that is not a numbered `Canto`.
pub const SPECIAL_PREFIX: &str = "ESPECIAL";
/// Label of the quick action that always points at the header line.
pub const START_LABEL: &str = "INICIO";

static DEFAULT_MATCHER: LazyLock<SectionMatcher> = LazyLock::new(SectionMatcher::default);

/// Section-marker grammar.
///
/// A body line opens a section when, after trimming, it starts with a *mark*
/// (a number, `-`, `>`, `FINAL`, `CORO`, `PRE-CORO`, `PRECORO`, `ESTRIBILLO`)
/// or a *tag* (`Al CORO`, `Al FINAL 2`, ...). Both are case-insensitive.
pub struct SectionMatcher {
    mark: Regex,
    tag: Regex,
    tag_prefix: Regex,
}

impl SectionMatcher {
    /// Builds a matcher from custom mark and tag patterns.
    pub fn new(mark: &str, tag: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            mark: Regex::new(mark)?,
            tag: Regex::new(tag)?,
            tag_prefix: Regex::new(r"(?i)^Al(?:\s+|$)")?,
        })
    }

    pub fn is_section(&self, line: &str) -> bool {
        self.mark.is_match(line) || self.tag.is_match(line)
    }

    /// Quick-action label for a section line: the line without its leading
    /// `Al` token. A line that is only `Al` yields an empty label.
    pub fn label<'a>(&self, line: &'a str) -> std::borrow::Cow<'a, str> {
        self.tag_prefix.replace(line, "")
    }
}

impl Default for SectionMatcher {
    fn default() -> Self {
        // Literal patterns, covered by the parser tests.
        Self::new(
            r"(?i)^(?:\d+|[>\-]|FINAL|CORO|PRE-?CORO|ESTRIBILLO)",
            r"(?i)^Al\s+(?:CORO|PRE-?CORO|ESTRIBILLO|FINAL)(?:\s+\d+)?",
        )
        .expect("built-in section patterns are valid")
    }
}

/// Parses a song with the built-in section grammar.
pub fn parse_song(song: &Song) -> ParsedSong {
    parse_song_with(song, &DEFAULT_MATCHER)
}

pub fn parse_song_with(song: &Song, matcher: &SectionMatcher) -> ParsedSong {
    let title = song.title.clone().unwrap_or_default();

    let mut lines = vec![header_line(song, &title)];
    let mut quick_actions = vec![QuickAction {
        label: START_LABEL.to_string(),
        target_line_index: 0,
    }];

    for line in body_lines(song) {
        lines.push(line);
        let line_index = lines.len() - 1;

        let clean = lines[line_index].trim();
        if !matcher.is_section(clean) {
            continue;
        }

        // Only reachable with a tag pattern that accepts a bare `Al`.
        let label = matcher.label(clean);
        let label = if label.is_empty() {
            format!("Sec {}", line_index)
        } else {
            label.into_owned()
        };

        quick_actions.push(QuickAction {
            label,
            target_line_index: line_index + 1,
        });
    }

    ParsedSong {
        id: song.id.clone(),
        title,
        kind: song.kind.clone(),
        nh: song.nh,
        lines,
        quick_actions,
    }
}

/// `"{nh} - {TITLE}"` for numbered cantos, `"ESPECIAL - {TITLE}"` otherwise.
///
/// An `nh` of zero counts as absent; the editor stores 0 for unnumbered songs.
fn header_line(song: &Song, title: &str) -> String {
    let prefix = match (&song.kind, song.nh) {
        (Some(SongKind::Canto), Some(nh)) if nh != 0 => nh.to_string(),
        _ => SPECIAL_PREFIX.to_string(),
    };
    format!("{} - {}", prefix, title.to_uppercase())
}

fn body_lines(song: &Song) -> Vec<String> {
    match &song.content {
        Some(SongContent::Text(text)) => text
            .split('\n')
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect(),
        Some(SongContent::Verses(verses)) => verses
            .iter()
            .filter(|line| !line.trim().is_empty())
            .cloned()
            .collect(),
        Some(SongContent::Other(raw)) => {
            tracing::debug!(
                "Song {} has unsupported content shape ({}), parsing header only",
                song.id,
                json_kind(raw)
            );
            Vec::new()
        }
        None => Vec::new(),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
