use super::types::{SearchParams, SearchResponse};
use crate::catalog::Catalog;
use crate::error::AppError;

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::{Extension, Json};
use std::sync::Arc;

/// `GET /search?q=term`. A missing or blank `q` is answered with 400.
pub async fn handle_search(
    Extension(catalog): Extension<Arc<Catalog>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let Query(params) = params?;
    let response = catalog.search(params.q.as_deref()).await?;
    tracing::debug!("Search '{}' -> {} results", response.query, response.count);
    Ok(Json(response))
}
