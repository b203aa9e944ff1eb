//! Catalog Module Tests
//!
//! Exercises the catalog service over an in-memory store.
//!
//! ## Test Scopes
//! - **Consistency**: mutations are visible to the very next search.
//! - **Validation**: required fields and unknown ids.
//! - **Import**: partial batches and malformed bodies.
//! - **Announcements**: saved banner texts.

#[cfg(test)]
mod tests {
    use crate::catalog::protocol::SongRequest;
    use crate::catalog::Catalog;
    use crate::error::AppError;
    use crate::songs::{Song, SongContent, SongKind};
    use crate::store::{Announcement, AnnouncementPosition, MemoryStore, SongStore, SqliteStore};
    use anyhow::{anyhow, Result};
    use serde_json::json;
    use std::sync::Arc;

    fn song(id: &str, nh: i64, title: &str, content: &str) -> Song {
        Song {
            id: id.to_string(),
            title: Some(title.to_string()),
            kind: Some(SongKind::Canto),
            nh: Some(nh),
            content: Some(SongContent::Text(content.to_string())),
        }
    }

    fn request(title: Option<&str>, content: &str) -> SongRequest {
        SongRequest {
            id: None,
            title: title.map(str::to_string),
            kind: Some(SongKind::Canto),
            nh: Some(7),
            content: Some(SongContent::Text(content.to_string())),
        }
    }

    async fn catalog_with(songs: Vec<Song>) -> Arc<Catalog> {
        let catalog = Catalog::new(Arc::new(MemoryStore::with_songs(songs)));
        catalog.rebuild_index().await.unwrap();
        catalog
    }

    /// Store whose corpus listing always fails.
    struct BrokenStore;

    impl SongStore for BrokenStore {
        fn get_song(&self, _id: &str) -> Result<Option<Song>> {
            Ok(None)
        }
        fn list_songs(&self) -> Result<Vec<Song>> {
            Err(anyhow!("disk on fire"))
        }
        fn upsert_song(&self, _song: &Song) -> Result<()> {
            Ok(())
        }
        fn delete_song(&self, _id: &str) -> Result<bool> {
            Ok(false)
        }
        fn delete_all_songs(&self) -> Result<usize> {
            Ok(0)
        }
        fn list_announcements(&self, _limit: usize) -> Result<Vec<Announcement>> {
            Ok(Vec::new())
        }
        fn create_announcement(
            &self,
            _text: &str,
            _position: AnnouncementPosition,
        ) -> Result<Announcement> {
            Err(anyhow!("read only"))
        }
        fn delete_announcement(&self, _id: &str) -> Result<bool> {
            Ok(false)
        }
    }

    // ============================================================
    // CONSISTENCY
    // ============================================================

    #[tokio::test]
    async fn test_created_song_is_searchable_immediately() {
        // ARRANGE
        let catalog = catalog_with(vec![song("a", 1, "Gloria", "gloria a dios")]).await;

        // ACT
        let created = catalog
            .create_song(request(Some("Pescador de hombres"), "tu has venido a la orilla"))
            .await
            .unwrap();
        let response = catalog.search(Some("pescador")).await.unwrap();

        // ASSERT
        assert_eq!(response.count, 1);
        assert_eq!(response.results[0].song.id, created.id);
        assert_eq!(catalog.indexed_count().await, 2);
    }

    #[tokio::test]
    async fn test_updated_song_replaces_old_text_in_index() {
        let catalog = catalog_with(vec![song("a", 1, "Magnificat", "proclama mi alma")]).await;

        let mut update = request(Some("Bendigamos"), "bendigamos al señor");
        update.id = Some("a".to_string());
        catalog.update_song(update).await.unwrap();

        assert_eq!(catalog.search(Some("magnificat")).await.unwrap().count, 0);
        assert_eq!(catalog.search(Some("bendigamos")).await.unwrap().count, 1);
    }

    #[tokio::test]
    async fn test_deleted_song_leaves_index() {
        let catalog = catalog_with(vec![
            song("a", 1, "Magnificat", "proclama mi alma"),
            song("b", 2, "Gloria", "en las alturas"),
        ])
        .await;

        catalog.delete_song("a").await.unwrap();

        assert_eq!(catalog.search(Some("magnificat")).await.unwrap().count, 0);
        assert_eq!(catalog.indexed_count().await, 1);
    }

    #[tokio::test]
    async fn test_delete_all_empties_index() {
        let catalog = catalog_with(vec![
            song("a", 1, "Magnificat", "proclama mi alma"),
            song("b", 2, "Gloria", "en las alturas"),
        ])
        .await;

        let deleted = catalog.delete_all_songs().await.unwrap();

        assert_eq!(deleted, 2);
        assert_eq!(catalog.indexed_count().await, 0);
        assert!(catalog.list_songs().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_index_answers_empty_then_heals() {
        // ARRANGE: startup rebuild was never run
        let catalog = Catalog::new(Arc::new(MemoryStore::with_songs(vec![song(
            "a",
            1,
            "Santo",
            "santo santo santo",
        )])));

        // ACT
        let first = catalog.search(Some("santo")).await.unwrap();
        let second = catalog.search(Some("santo")).await.unwrap();

        // ASSERT
        assert_eq!(first.count, 0);
        assert!(first.results.is_empty());
        assert_eq!(second.count, 1);
    }

    #[tokio::test]
    async fn test_failed_rebuild_clears_index() {
        let catalog = Catalog::new(Arc::new(BrokenStore));

        assert!(catalog.rebuild_index().await.is_err());
        assert_eq!(catalog.indexed_count().await, 0);

        // Queries still answer, just without results
        let response = catalog.search(Some("santo")).await.unwrap();
        assert_eq!(response.count, 0);
    }

    #[tokio::test]
    async fn test_search_reports_substring_matches() {
        let catalog = catalog_with(vec![
            song("a", 1, "Santo", "bendito"),
            song("b", 2, "Gloria", "santo es el señor"),
        ])
        .await;

        let response = catalog.search(Some("  Santo ")).await.unwrap();

        assert_eq!(response.query, "Santo");
        assert_eq!(response.manual_matches, 2);
        assert_eq!(response.count, 2);
        assert_eq!(response.results[0].song.id, "a");
    }

    #[tokio::test]
    async fn test_search_reports_store_songs_missing_from_index() {
        // ARRANGE: a song written behind the catalog's back
        let store = Arc::new(MemoryStore::with_songs(vec![song(
            "a",
            1,
            "Gloria",
            "en las alturas",
        )]));
        let catalog = Catalog::new(store.clone());
        catalog.rebuild_index().await.unwrap();
        store
            .upsert_song(&song("b", 2, "Magnificat", "proclama mi alma"))
            .unwrap();

        // ACT
        let response = catalog.search(Some("magnificat")).await.unwrap();

        // ASSERT
        assert_eq!(response.count, 0);
        assert_eq!(response.manual_matches, 1);
    }

    #[tokio::test]
    async fn test_sqlite_backed_catalog_stays_consistent() {
        let catalog = Catalog::new(Arc::new(SqliteStore::open_in_memory().unwrap()));

        let created = catalog
            .create_song(request(Some("Alma misionera"), "señor toma mi vida nueva"))
            .await
            .unwrap();
        let response = catalog.search(Some("misionera")).await.unwrap();

        assert_eq!(response.count, 1);
        assert_eq!(response.manual_matches, 1);
        assert_eq!(response.results[0].song.id, created.id);
    }

    // ============================================================
    // VALIDATION
    // ============================================================

    #[tokio::test]
    async fn test_blank_search_is_rejected() {
        let catalog = catalog_with(vec![song("a", 1, "Santo", "santo")]).await;

        assert!(matches!(catalog.search(None).await, Err(AppError::Validation(_))));
        assert!(matches!(catalog.search(Some("   ")).await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_requires_title() {
        let catalog = catalog_with(Vec::new()).await;

        let result = catalog.create_song(request(None, "letra")).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(catalog.list_songs().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_ignores_client_id() {
        let catalog = catalog_with(Vec::new()).await;
        let mut req = request(Some("Santo"), "santo");
        req.id = Some("chosen-by-client".to_string());

        let created = catalog.create_song(req).await.unwrap();

        assert_ne!(created.id, "chosen-by-client");
        assert_eq!(catalog.get_song(&created.id).unwrap().title.as_deref(), Some("Santo"));
    }

    #[tokio::test]
    async fn test_update_requires_known_id() {
        let catalog = catalog_with(vec![song("a", 1, "Santo", "santo")]).await;

        let missing_id = catalog.update_song(request(Some("Santo"), "santo")).await;
        let mut unknown = request(Some("Santo"), "santo");
        unknown.id = Some("nope".to_string());
        let unknown_id = catalog.update_song(unknown).await;

        assert!(matches!(missing_id, Err(AppError::Validation(_))));
        assert!(matches!(unknown_id, Err(AppError::NotFound { .. })));
        assert!(catalog.get_song("nope").is_err());
    }

    #[tokio::test]
    async fn test_delete_unknown_song_is_not_found() {
        let catalog = catalog_with(vec![song("a", 1, "Santo", "santo")]).await;

        let result = catalog.delete_song("nope").await;

        assert!(matches!(result, Err(AppError::NotFound { entity: "song", .. })));
        assert_eq!(catalog.indexed_count().await, 1);
    }

    // ============================================================
    // IMPORT
    // ============================================================

    #[tokio::test]
    async fn test_import_skips_incomplete_items() {
        let catalog = catalog_with(Vec::new()).await;
        let body = json!([
            {"id": "s1", "title": "Santo", "type": "Canto", "nh": 12, "content": "santo santo"},
            {"id": "s2", "title": "Verses", "content": ["primera", "segunda"]},
            {"id": "s3", "content": "sin titulo"},
            {"id": "", "title": "Sin id", "content": "letra"},
            42
        ]);

        let report = catalog.import_songs(body).await.unwrap();

        assert_eq!(report.imported, 2);
        assert_eq!(report.skipped, 3);
        assert_eq!(catalog.indexed_count().await, 2);
        assert_eq!(catalog.search(Some("segunda")).await.unwrap().results[0].song.id, "s2");
    }

    #[tokio::test]
    async fn test_import_replaces_existing_ids() {
        let catalog = catalog_with(vec![song("s1", 1, "Viejo", "letra vieja")]).await;

        catalog
            .import_songs(json!([{"id": "s1", "title": "Nuevo", "content": "letra nueva"}]))
            .await
            .unwrap();

        let stored = catalog.get_song("s1").unwrap();
        assert_eq!(stored.title.as_deref(), Some("Nuevo"));
        assert_eq!(catalog.list_songs().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_import_rejects_non_array() {
        let catalog = catalog_with(Vec::new()).await;

        let result = catalog.import_songs(json!({"id": "s1"})).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    // ============================================================
    // ANNOUNCEMENTS
    // ============================================================

    #[tokio::test]
    async fn test_announcement_defaults_to_bottom() {
        let catalog = catalog_with(Vec::new()).await;

        let saved = catalog.create_announcement(Some("Ofrenda"), None).unwrap();

        assert_eq!(saved.position, AnnouncementPosition::Bottom);
        assert_eq!(saved.text, "Ofrenda");
        assert_eq!(catalog.list_announcements(50).unwrap(), vec![saved]);
    }

    #[tokio::test]
    async fn test_announcement_requires_text() {
        let catalog = catalog_with(Vec::new()).await;

        assert!(matches!(
            catalog.create_announcement(Some("  "), Some(AnnouncementPosition::Top)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            catalog.create_announcement(None, None),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_announcement() {
        let catalog = catalog_with(Vec::new()).await;
        let saved = catalog.create_announcement(Some("Ofrenda"), None).unwrap();

        catalog.delete_announcement(&saved.id).unwrap();

        assert!(catalog.list_announcements(50).unwrap().is_empty());
        assert!(matches!(
            catalog.delete_announcement(&saved.id),
            Err(AppError::NotFound { entity: "announcement", .. })
        ));
    }

    #[tokio::test]
    async fn test_store_failure_is_internal() {
        let catalog = Catalog::new(Arc::new(BrokenStore));

        let result = catalog.create_announcement(Some("Ofrenda"), None);

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
