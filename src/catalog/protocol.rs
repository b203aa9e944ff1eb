//! HTTP Contracts
//!
//! Request and response bodies of the song and announcement endpoints.

use crate::songs::{SongContent, SongKind};
use crate::store::AnnouncementPosition;
use serde::{Deserialize, Serialize};

pub const ENDPOINT_SONGS: &str = "/api/cantos";
pub const ENDPOINT_SONG: &str = "/api/canto";
pub const ENDPOINT_IMPORT: &str = "/import";
pub const ENDPOINT_ANNOUNCEMENTS: &str = "/api/anuncios";
pub const ENDPOINT_SEARCH: &str = "/search";

/// How many saved announcements the listing endpoint returns.
pub const ANNOUNCEMENT_LIST_LIMIT: usize = 50;

/// Body of `POST /api/canto` and `PUT /api/canto`. `id` is ignored on create
/// and required on update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SongRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<SongKind>,
    #[serde(default)]
    pub nh: Option<i64>,
    #[serde(default)]
    pub content: Option<SongContent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAllResponse {
    pub deleted: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub message: String,
    pub imported: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateAnnouncementRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub position: Option<AnnouncementPosition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAnnouncementResponse {
    pub success: bool,
}
