//! Store Contract
//!
//! The live session and the search index never talk to a database directly;
//! they consume this trait.
//!
//! ## Blocking
//! Implementations are synchronous and are called straight from async code:
//! from the session actor (song lookup on `changeCanto`) and from the catalog
//! while it holds the index lock. Every call is one indexed statement or one
//! transaction over a corpus of hundreds of songs, so it completes in well
//! under a millisecond and the worker thread is not held up. A store that can
//! stall (network database, very large corpus) must not be plugged in as is;
//! its calls need to move to `tokio::task::spawn_blocking` at the call sites.

use super::types::{Announcement, AnnouncementPosition};
use crate::songs::Song;

use anyhow::Result;

pub trait SongStore: Send + Sync {
    fn get_song(&self, id: &str) -> Result<Option<Song>>;

    /// Every song, ordered by `nh` (unnumbered first) and then by title.
    fn list_songs(&self) -> Result<Vec<Song>>;

    /// Inserts the song or replaces the one with the same id.
    fn upsert_song(&self, song: &Song) -> Result<()>;

    /// Batch variant of [`SongStore::upsert_song`]. Implementations backed by a
    /// transactional engine should apply the batch atomically.
    fn upsert_songs(&self, songs: &[Song]) -> Result<()> {
        for song in songs {
            self.upsert_song(song)?;
        }
        Ok(())
    }

    /// Returns `false` when no song had that id.
    fn delete_song(&self, id: &str) -> Result<bool>;

    /// Removes the whole corpus, returning how many songs were deleted.
    fn delete_all_songs(&self) -> Result<usize>;

    /// Newest announcements first, at most `limit`.
    fn list_announcements(&self, limit: usize) -> Result<Vec<Announcement>>;

    fn create_announcement(&self, text: &str, position: AnnouncementPosition)
        -> Result<Announcement>;

    /// Returns `false` when no announcement had that id.
    fn delete_announcement(&self, id: &str) -> Result<bool>;
}

/// Ordering shared by every store: `nh` ascending with unnumbered songs first,
/// then case-insensitive title.
pub(crate) fn corpus_order(a: &Song, b: &Song) -> std::cmp::Ordering {
    a.nh.cmp(&b.nh).then_with(|| {
        let left = a.title.as_deref().unwrap_or_default().to_lowercase();
        let right = b.title.as_deref().unwrap_or_default().to_lowercase();
        left.cmp(&right)
    })
}
