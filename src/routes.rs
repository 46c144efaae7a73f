use axum::http::Method;
use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{CreateSongRequest, ErrorBody, HealthResponse};
use crate::handler::{
    self, AppState, create_song, delete_song, get_song, get_song_text, healthcheck, list_songs,
    route_not_found, update_song,
};
use crate::model::{Song, SongUpdate};

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(title = "songbook", description = "Song catalog with lyric enrichment"),
    paths(
        handler::healthcheck,
        handler::list_songs,
        handler::get_song,
        handler::get_song_text,
        handler::create_song,
        handler::update_song,
        handler::delete_song,
    ),
    components(schemas(Song, SongUpdate, CreateSongRequest, ErrorBody, HealthResponse)),
    tags(
        (name = "songs", description = "Song catalog"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/", get(healthcheck))
        .route("/songs", get(list_songs).post(create_song))
        .route("/songs/:id", get(get_song).put(update_song).delete(delete_song))
        .route("/songs/:id/text", get(get_song_text))
        .merge(SwaggerUi::new("/swagger").url(OPENAPI_PATH, ApiDoc::openapi()))
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
