//! Catalog Service
//!
//! Pairs the song store with the search index and enforces their consistency
//! contract: a song mutation is only finished once the index has been rebuilt
//! from the updated corpus. Writers hold the index write lock for the whole
//! store-write + rebuild step, so readers either see the old corpus or the new
//! one, never a partial index.

use super::protocol::{ImportReport, SongRequest};
use crate::error::AppError;
use crate::search::engine::{substring_matches, SearchIndex};
use crate::search::types::{RebuildStats, SearchResponse, SearchResultItem};
use crate::songs::Song;
use crate::store::{Announcement, AnnouncementPosition, SongStore};

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct Catalog {
    store: Arc<dyn SongStore>,
    index: RwLock<SearchIndex>,
}

impl Catalog {
    /// Creates a catalog with an empty index. Call [`Catalog::rebuild_index`]
    /// once at startup; a query against an empty index also triggers it.
    pub fn new(store: Arc<dyn SongStore>) -> Arc<Self> {
        Arc::new(Self {
            store,
            index: RwLock::new(SearchIndex::new()),
        })
    }

    pub fn store(&self) -> Arc<dyn SongStore> {
        self.store.clone()
    }

    pub async fn rebuild_index(&self) -> Result<RebuildStats> {
        let mut index = self.index.write().await;
        self.rebuild_locked(&mut index)
    }

    /// Rebuilds while the caller holds the write lock. If the corpus cannot be
    /// loaded the index is emptied, so the next query heals it.
    fn rebuild_locked(&self, index: &mut SearchIndex) -> Result<RebuildStats> {
        match self.store.list_songs() {
            Ok(corpus) => {
                let stats = index.rebuild(&corpus);
                tracing::info!(
                    "Search index ready: {} songs indexed, {} skipped",
                    stats.indexed,
                    stats.skipped
                );
                Ok(stats)
            }
            Err(e) => {
                index.clear();
                tracing::error!("Search index rebuild failed, index cleared: {:#}", e);
                Err(e)
            }
        }
    }

    pub async fn indexed_count(&self) -> usize {
        self.index.read().await.len()
    }

    // ============================================================
    // SONGS
    // ============================================================

    pub fn list_songs(&self) -> Result<Vec<Song>, AppError> {
        Ok(self.store.list_songs()?)
    }

    pub fn get_song(&self, id: &str) -> Result<Song, AppError> {
        self.store
            .get_song(id)?
            .ok_or_else(|| AppError::song_not_found(id))
    }

    /// Inserts or replaces `song` and rebuilds the index before returning.
    pub async fn upsert_song(&self, song: Song) -> Result<Song, AppError> {
        let mut index = self.index.write().await;
        self.store.upsert_song(&song)?;
        self.rebuild_locked(&mut index)?;
        Ok(song)
    }

    /// Creates a song with a fresh id. A title is required.
    pub async fn create_song(&self, request: SongRequest) -> Result<Song, AppError> {
        let title = required_title(request.title)?;
        let song = Song {
            id: uuid::Uuid::new_v4().to_string(),
            title: Some(title),
            kind: request.kind,
            nh: request.nh,
            content: request.content,
        };

        tracing::info!("Creating song {} ({:?})", song.id, song.title);
        self.upsert_song(song).await
    }

    /// Replaces an existing song. Fails with `NotFound` for unknown ids.
    pub async fn update_song(&self, request: SongRequest) -> Result<Song, AppError> {
        let id = request
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AppError::validation("'id' is required to update a song"))?;
        let title = required_title(request.title)?;

        let mut index = self.index.write().await;
        if self.store.get_song(&id)?.is_none() {
            return Err(AppError::song_not_found(id));
        }

        let song = Song {
            id,
            title: Some(title),
            kind: request.kind,
            nh: request.nh,
            content: request.content,
        };
        self.store.upsert_song(&song)?;
        self.rebuild_locked(&mut index)?;

        tracing::info!("Updated song {}", song.id);
        Ok(song)
    }

    pub async fn delete_song(&self, id: &str) -> Result<(), AppError> {
        let mut index = self.index.write().await;
        if !self.store.delete_song(id)? {
            return Err(AppError::song_not_found(id));
        }
        self.rebuild_locked(&mut index)?;

        tracing::info!("Deleted song {}", id);
        Ok(())
    }

    pub async fn delete_all_songs(&self) -> Result<usize, AppError> {
        let mut index = self.index.write().await;
        let deleted = self.store.delete_all_songs()?;
        self.rebuild_locked(&mut index)?;

        tracing::warn!("Deleted all {} songs", deleted);
        Ok(deleted)
    }

    /// Bulk import. Items that do not look like a song, or lack `id`, `title`
    /// or `content`, are skipped and counted; the rest are written as one batch.
    pub async fn import_songs(&self, body: serde_json::Value) -> Result<ImportReport, AppError> {
        let serde_json::Value::Array(items) = body else {
            return Err(AppError::validation("Body must be an array of songs"));
        };

        let mut valid = Vec::with_capacity(items.len());
        let mut skipped = 0usize;
        for (position, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<Song>(item) {
                Ok(song) if !song.id.trim().is_empty() && song.is_searchable() => {
                    valid.push(song)
                }
                Ok(song) => {
                    tracing::warn!("Import item #{} ({}) skipped: missing data", position, song.id);
                    skipped += 1;
                }
                Err(e) => {
                    tracing::warn!("Import item #{} skipped: {}", position, e);
                    skipped += 1;
                }
            }
        }

        let mut index = self.index.write().await;
        self.store.upsert_songs(&valid)?;
        self.rebuild_locked(&mut index)?;

        tracing::info!("Imported {} songs ({} skipped)", valid.len(), skipped);
        Ok(ImportReport {
            message: "Songs imported".to_string(),
            imported: valid.len(),
            skipped,
        })
    }

    // ============================================================
    // SEARCH
    // ============================================================

    /// Fuzzy search. A blank or missing term is a validation error.
    ///
    /// An empty index means initialization was missed (or the corpus is
    /// empty): the query answers with no results and the index is rebuilt so
    /// later queries are served.
    pub async fn search(&self, term: Option<&str>) -> Result<SearchResponse, AppError> {
        let term = term
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::validation("Search query is required"))?;

        {
            let index = self.index.read().await;
            if !index.is_empty() {
                let results: Vec<SearchResultItem> = index
                    .query(term)
                    .into_iter()
                    .map(SearchResultItem::from)
                    .collect();
                let manual_matches = self.count_substring_matches(term);

                if manual_matches > results.len() {
                    tracing::warn!(
                        "Substring scan of the store found {} matches for '{}' but the index found {}",
                        manual_matches,
                        term,
                        results.len()
                    );
                }

                return Ok(SearchResponse {
                    query: term.to_string(),
                    count: results.len(),
                    manual_matches,
                    results,
                });
            }
        }

        tracing::warn!("Search index unavailable, rebuilding before next query");
        if let Err(e) = self.rebuild_index().await {
            tracing::error!("Defensive index rebuild failed: {:#}", e);
        }

        Ok(SearchResponse {
            query: term.to_string(),
            count: 0,
            manual_matches: 0,
            results: Vec::new(),
        })
    }

    /// Plain substring count over the stored corpus. A store failure only
    /// costs the diagnostic, never the search.
    fn count_substring_matches(&self, term: &str) -> usize {
        match self.store.list_songs() {
            Ok(corpus) => substring_matches(term, &corpus),
            Err(e) => {
                tracing::warn!("Substring scan skipped, store unavailable: {:#}", e);
                0
            }
        }
    }

    // ============================================================
    // ANNOUNCEMENTS
    // ============================================================

    pub fn list_announcements(&self, limit: usize) -> Result<Vec<Announcement>, AppError> {
        Ok(self.store.list_announcements(limit)?)
    }

    pub fn create_announcement(
        &self,
        text: Option<&str>,
        position: Option<AnnouncementPosition>,
    ) -> Result<Announcement, AppError> {
        let text = text
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::validation("Text is required"))?;

        let announcement = self
            .store
            .create_announcement(text, position.unwrap_or_default())?;
        tracing::info!("Saved announcement {}", announcement.id);
        Ok(announcement)
    }

    pub fn delete_announcement(&self, id: &str) -> Result<(), AppError> {
        if !self.store.delete_announcement(id)? {
            return Err(AppError::announcement_not_found(id));
        }
        Ok(())
    }
}

fn required_title(title: Option<String>) -> Result<String, AppError> {
    title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::validation("'title' is required"))
}
