use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};

use tracing::info;

use crate::api::{CreateSongRequest, ErrorBody, HealthResponse, ListParams, PageParams};
use crate::error::ServiceError;
use crate::model::{Song, SongUpdate};
use crate::service::{SongService, parse_id};

#[derive(Clone)]
pub struct AppState {
    pub songs: Arc<SongService>,
}

fn body_error(rejection: JsonRejection) -> ServiceError {
    ServiceError::Request(format!("invalid body: {}", rejection.body_text()))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn healthcheck() -> impl IntoResponse {
    info!("got healthcheck request");
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn route_not_found(uri: Uri) -> ServiceError {
    ServiceError::UnknownRoute(uri.path().to_string())
}

#[utoipa::path(
    get,
    path = "/songs",
    tag = "songs",
    params(ListParams),
    responses(
        (status = 200, description = "Songs ordered by id", body = Vec<Song>),
        (status = 400, description = "Malformed limit or offset", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn list_songs(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Response, ServiceError> {
    let songs = state.songs.list(params).await?;
    Ok((StatusCode::OK, Json(songs)).into_response())
}

#[utoipa::path(
    get,
    path = "/songs/{id}",
    tag = "songs",
    params(("id" = i64, Path, description = "Song id")),
    responses(
        (status = 200, description = "The song", body = Song),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "Unknown or deleted song", body = ErrorBody)
    )
)]
pub async fn get_song(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, ServiceError> {
    let song = state.songs.get(parse_id(&id)?).await?;
    Ok((StatusCode::OK, Json(song)).into_response())
}

#[utoipa::path(
    get,
    path = "/songs/{id}/text",
    tag = "songs",
    params(("id" = i64, Path, description = "Song id"), PageParams),
    responses(
        (status = 200, description = "One page of verses", body = Vec<String>),
        (status = 400, description = "Malformed or out-of-range page", body = ErrorBody),
        (status = 404, description = "Unknown or deleted song", body = ErrorBody)
    )
)]
pub async fn get_song_text(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Response, ServiceError> {
    let id = parse_id(&id)?;
    let verses = state.songs.verses(id, params.page.as_deref()).await?;
    Ok((StatusCode::OK, Json(verses)).into_response())
}

#[utoipa::path(
    post,
    path = "/songs",
    tag = "songs",
    request_body = CreateSongRequest,
    responses(
        (status = 201, description = "Song created with provider details", body = Song),
        (status = 400, description = "Missing group or song, or malformed body", body = ErrorBody),
        (status = 500, description = "Provider or storage failure", body = ErrorBody)
    )
)]
pub async fn create_song(
    State(state): State<AppState>,
    payload: Result<Json<CreateSongRequest>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let Json(request) = payload.map_err(body_error)?;
    let song = state.songs.create(request).await?;
    Ok((StatusCode::CREATED, Json(song)).into_response())
}

#[utoipa::path(
    put,
    path = "/songs/{id}",
    tag = "songs",
    params(("id" = i64, Path, description = "Song id")),
    request_body = SongUpdate,
    responses(
        (status = 204, description = "Song updated"),
        (status = 400, description = "Malformed body or blank group/song", body = ErrorBody),
        (status = 404, description = "Unknown or deleted song", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn update_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SongUpdate>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let id = parse_id(&id)?;
    let Json(update) = payload.map_err(body_error)?;
    state.songs.update(id, update).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    delete,
    path = "/songs/{id}",
    tag = "songs",
    params(("id" = i64, Path, description = "Song id")),
    responses(
        (status = 204, description = "Song deleted"),
        (status = 404, description = "Unknown or deleted song", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn delete_song(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, ServiceError> {
    state.songs.delete(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
