use crate::catalog::handlers::*;
use crate::catalog::protocol::*;
use crate::catalog::Catalog;
use crate::search::handlers::handle_search;
use crate::session::handlers::handle_session_socket;
use crate::session::protocol::ENDPOINT_SESSION;
use crate::session::SessionHandle;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::{Extension, Router};
use std::sync::Arc;

/// Largest accepted request body; bulk imports carry the whole corpus.
const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// HTTP + WebSocket surface of the server.
pub fn build_router(catalog: Arc<Catalog>, session: SessionHandle) -> Router {
    Router::new()
        .route("/", get(handle_alive))
        .route(
            ENDPOINT_SONGS,
            get(handle_list_songs).delete(handle_delete_all_songs),
        )
        .route(
            ENDPOINT_SONG,
            post(handle_create_song).put(handle_update_song),
        )
        .route(
            &format!("{}/:id", ENDPOINT_SONG),
            get(handle_get_song).delete(handle_delete_song),
        )
        .route(ENDPOINT_IMPORT, post(handle_import))
        .route(
            ENDPOINT_ANNOUNCEMENTS,
            get(handle_list_announcements).post(handle_create_announcement),
        )
        .route(
            &format!("{}/:id", ENDPOINT_ANNOUNCEMENTS),
            delete(handle_delete_announcement),
        )
        .route(ENDPOINT_SEARCH, get(handle_search))
        .route(ENDPOINT_SESSION, get(handle_session_socket))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(Extension(catalog))
        .layer(Extension(session))
}
