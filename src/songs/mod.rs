//! Song Module
//!
//! Data model of the song corpus and the pure transformation that makes a song
//! presentable during a live session.
//!
//! ## Submodules
//! - **`types`**: `Song` as stored, `ParsedSong`/`QuickAction` as presented.
//! - **`parser`**: header synthesis, line normalization and section detection.

pub mod parser;
pub mod types;

pub use parser::{parse_song, SectionMatcher};
pub use types::{ParsedSong, QuickAction, Song, SongContent, SongKind};
