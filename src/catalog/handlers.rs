use super::protocol::*;
use super::service::Catalog;
use crate::error::AppError;
use crate::songs::Song;
use crate::store::Announcement;

use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::{Extension, Json};
use std::sync::Arc;

pub async fn handle_alive() -> &'static str {
    "Alive!"
}

pub async fn handle_list_songs(
    Extension(catalog): Extension<Arc<Catalog>>,
) -> Result<Json<Vec<Song>>, AppError> {
    Ok(Json(catalog.list_songs()?))
}

pub async fn handle_get_song(
    Extension(catalog): Extension<Arc<Catalog>>,
    Path(id): Path<String>,
) -> Result<Json<Song>, AppError> {
    Ok(Json(catalog.get_song(&id)?))
}

pub async fn handle_create_song(
    Extension(catalog): Extension<Arc<Catalog>>,
    payload: Result<Json<SongRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Song>), AppError> {
    let Json(req) = payload?;
    let song = catalog.create_song(req).await?;
    Ok((StatusCode::CREATED, Json(song)))
}

pub async fn handle_update_song(
    Extension(catalog): Extension<Arc<Catalog>>,
    payload: Result<Json<SongRequest>, JsonRejection>,
) -> Result<Json<Song>, AppError> {
    let Json(req) = payload?;
    Ok(Json(catalog.update_song(req).await?))
}

pub async fn handle_delete_song(
    Extension(catalog): Extension<Arc<Catalog>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    catalog.delete_song(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn handle_delete_all_songs(
    Extension(catalog): Extension<Arc<Catalog>>,
) -> Result<Json<DeleteAllResponse>, AppError> {
    let deleted = catalog.delete_all_songs().await?;
    Ok(Json(DeleteAllResponse { deleted }))
}

/// The body is taken as raw JSON so that one malformed item does not reject
/// the whole batch.
pub async fn handle_import(
    Extension(catalog): Extension<Arc<Catalog>>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<ImportReport>, AppError> {
    let Json(body) = payload?;
    Ok(Json(catalog.import_songs(body).await?))
}

pub async fn handle_list_announcements(
    Extension(catalog): Extension<Arc<Catalog>>,
) -> Result<Json<Vec<Announcement>>, AppError> {
    Ok(Json(catalog.list_announcements(ANNOUNCEMENT_LIST_LIMIT)?))
}

pub async fn handle_create_announcement(
    Extension(catalog): Extension<Arc<Catalog>>,
    payload: Result<Json<CreateAnnouncementRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Announcement>), AppError> {
    let Json(req) = payload?;
    let announcement = catalog.create_announcement(req.text.as_deref(), req.position)?;
    Ok((StatusCode::CREATED, Json(announcement)))
}

pub async fn handle_delete_announcement(
    Extension(catalog): Extension<Arc<Catalog>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAnnouncementResponse>, AppError> {
    catalog.delete_announcement(&id)?;
    Ok(Json(DeleteAnnouncementResponse { success: true }))
}
