use super::repository::{corpus_order, SongStore};
use super::types::{now_ms, Announcement, AnnouncementPosition};
use crate::songs::Song;

use anyhow::Result;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-local store used when no database file is configured, and by tests.
///
/// Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    songs: DashMap<String, Song>,
    /// Announcements keyed by id, tagged with an insertion sequence so that
    /// entries created within the same millisecond still list newest first.
    announcements: DashMap<String, (u64, Announcement)>,
    sequence: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded with `songs`.
    pub fn with_songs(songs: impl IntoIterator<Item = Song>) -> Self {
        let store = Self::new();
        for song in songs {
            store.songs.insert(song.id.clone(), song);
        }
        store
    }

    pub fn song_count(&self) -> usize {
        self.songs.len()
    }
}

impl SongStore for MemoryStore {
    fn get_song(&self, id: &str) -> Result<Option<Song>> {
        Ok(self.songs.get(id).map(|entry| entry.value().clone()))
    }

    fn list_songs(&self) -> Result<Vec<Song>> {
        let mut songs: Vec<Song> = self
            .songs
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        songs.sort_by(corpus_order);
        Ok(songs)
    }

    fn upsert_song(&self, song: &Song) -> Result<()> {
        self.songs.insert(song.id.clone(), song.clone());
        Ok(())
    }

    fn delete_song(&self, id: &str) -> Result<bool> {
        Ok(self.songs.remove(id).is_some())
    }

    fn delete_all_songs(&self) -> Result<usize> {
        let count = self.songs.len();
        self.songs.clear();
        Ok(count)
    }

    fn list_announcements(&self, limit: usize) -> Result<Vec<Announcement>> {
        let mut entries: Vec<(u64, Announcement)> = self
            .announcements
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by(|a, b| {
            b.1.created_at
                .cmp(&a.1.created_at)
                .then_with(|| b.0.cmp(&a.0))
        });
        Ok(entries
            .into_iter()
            .take(limit)
            .map(|(_, announcement)| announcement)
            .collect())
    }

    fn create_announcement(
        &self,
        text: &str,
        position: AnnouncementPosition,
    ) -> Result<Announcement> {
        let announcement = Announcement {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.to_string(),
            position,
            created_at: now_ms(),
        };
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.announcements
            .insert(announcement.id.clone(), (seq, announcement.clone()));
        Ok(announcement)
    }

    fn delete_announcement(&self, id: &str) -> Result<bool> {
        Ok(self.announcements.remove(id).is_some())
    }
}
