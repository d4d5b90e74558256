use crate::error::ApiError;
use apod_archive::{ArchiveEntry, ArchiveStore, StoreHandle, parse_date};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

/// `GET /api/apod`
///
/// An empty archive is a 404, not an empty array.
pub(crate) async fn list_entries(State(store): State<StoreHandle>) -> Result<Json<Vec<ArchiveEntry>>, ApiError> {
    let entries = store.get_all().await.map_err(ApiError::store)?;
    if entries.is_empty() {
        return Err(ApiError::NotFound("Images not found"));
    }
    Ok(Json(entries))
}

/// `GET /api/apod/{date}`
pub(crate) async fn get_entry(
    State(store): State<StoreHandle>,
    Path(date): Path<String>,
) -> Result<Json<ArchiveEntry>, ApiError> {
    let date = parse_date(&date).ok_or(ApiError::InvalidDate)?;
    match store.get_by_date(date).await.map_err(ApiError::store)? {
        Some(entry) => Ok(Json(entry)),
        None => Err(ApiError::NotFound("Image not found")),
    }
}

/// Bare `OPTIONS`; real preflights are answered by the CORS layer first.
pub(crate) async fn options() -> StatusCode {
    StatusCode::NO_CONTENT
}
