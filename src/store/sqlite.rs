use super::repository::SongStore;
use super::types::{now_ms, Announcement, AnnouncementPosition};
use crate::songs::{Song, SongContent, SongKind};

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite-backed store. The connection is shared behind a mutex; every call
/// holds it for a single statement or transaction.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database file and runs the lazy migrations.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("failed to create data directory")?;
            }
        }

        let conn = Connection::open(path).context("failed to open SQLite database")?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory SQLite")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("SQLite connection mutex poisoned"))
    }
}

fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS cantos (
            title TEXT NOT NULL,
            id TEXT PRIMARY KEY,
            nh INTEGER,
            content TEXT,
            type TEXT
        )",
        [],
    )
    .context("failed to create cantos table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS anuncios (
            id TEXT PRIMARY KEY,
            text TEXT NOT NULL,
            position TEXT DEFAULT 'bottom',
            createdAt INTEGER
        )",
        [],
    )
    .context("failed to create anuncios table")?;

    // Databases created before banners had a position lack the column.
    if conn.prepare("SELECT position FROM anuncios LIMIT 1").is_err() {
        tracing::info!("Migrating anuncios table to include position");
        conn.execute(
            "ALTER TABLE anuncios ADD COLUMN position TEXT DEFAULT 'bottom'",
            [],
        )
        .context("failed to add position column")?;
    }

    Ok(())
}

fn song_from_row(row: &Row<'_>) -> rusqlite::Result<Song> {
    let kind: Option<String> = row.get("type")?;
    let content: Option<String> = row.get("content")?;
    Ok(Song {
        id: row.get("id")?,
        title: row.get("title")?,
        kind: kind.map(SongKind::from),
        nh: row.get("nh")?,
        content: content.map(SongContent::Text),
    })
}

fn announcement_from_row(row: &Row<'_>) -> rusqlite::Result<Announcement> {
    let position: Option<String> = row.get("position")?;
    let created_at: Option<i64> = row.get("createdAt")?;
    Ok(Announcement {
        id: row.get("id")?,
        text: row.get("text")?,
        position: position
            .and_then(|p| p.parse().ok())
            .unwrap_or_default(),
        created_at: created_at.unwrap_or_default().max(0) as u64,
    })
}

fn insert_song(conn: &Connection, song: &Song) -> Result<()> {
    let content = song.content_text().map(|c| c.into_owned());
    conn.execute(
        "INSERT OR REPLACE INTO cantos (id, title, type, nh, content) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            song.id,
            song.title.as_deref().unwrap_or_default(),
            song.kind.as_ref().map(SongKind::as_str),
            song.nh,
            content,
        ],
    )
    .with_context(|| format!("failed to upsert song {}", song.id))?;
    Ok(())
}

impl SongStore for SqliteStore {
    fn get_song(&self, id: &str) -> Result<Option<Song>> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT id, title, nh, type, content FROM cantos WHERE id = ?1",
            [id],
            song_from_row,
        )
        .optional()
        .context("failed to load song")
    }

    fn list_songs(&self) -> Result<Vec<Song>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, title, nh, type, content FROM cantos
                 ORDER BY nh, title COLLATE NOCASE",
            )
            .context("failed to prepare songs query")?;

        let songs = stmt
            .query_map([], song_from_row)
            .context("failed to iterate songs")?
            .collect::<Result<Vec<_>, _>>()
            .context("failed to collect songs")?;

        Ok(songs)
    }

    fn upsert_song(&self, song: &Song) -> Result<()> {
        let conn = self.lock()?;
        insert_song(&conn, song)
    }

    fn upsert_songs(&self, songs: &[Song]) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().context("failed to start import transaction")?;
        for song in songs {
            insert_song(&tx, song)?;
        }
        tx.commit().context("failed to commit import transaction")?;
        Ok(())
    }

    fn delete_song(&self, id: &str) -> Result<bool> {
        let conn = self.lock()?;
        let deleted = conn
            .execute("DELETE FROM cantos WHERE id = ?1", params![id])
            .context("failed to delete song")?;
        Ok(deleted > 0)
    }

    fn delete_all_songs(&self) -> Result<usize> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM cantos", [])
            .context("failed to delete songs")
    }

    fn list_announcements(&self, limit: usize) -> Result<Vec<Announcement>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, text, position, createdAt FROM anuncios
                 ORDER BY createdAt DESC, rowid DESC LIMIT ?1",
            )
            .context("failed to prepare announcements query")?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let announcements = stmt
            .query_map([limit], announcement_from_row)
            .context("failed to iterate announcements")?
            .collect::<Result<Vec<_>, _>>()
            .context("failed to collect announcements")?;

        Ok(announcements)
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

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO anuncios (id, text, position, createdAt) VALUES (?1, ?2, ?3, ?4)",
            params![
                announcement.id,
                announcement.text,
                announcement.position.as_str(),
                announcement.created_at as i64,
            ],
        )
        .context("failed to insert announcement")?;

        Ok(announcement)
    }

    fn delete_announcement(&self, id: &str) -> Result<bool> {
        let conn = self.lock()?;
        let deleted = conn
            .execute("DELETE FROM anuncios WHERE id = ?1", params![id])
            .context("failed to delete announcement")?;
        Ok(deleted > 0)
    }
}
