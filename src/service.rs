//! Song catalog operations.
//!
//! [`SongService`] sits between the HTTP handlers and its two collaborators:
//! a [`SongStore`] for persistence and a [`LyricProvider`] for enrichment.
//! Both are injected at construction so tests can swap in fakes.

use std::sync::Arc;

use crate::api::{CreateSongRequest, ListParams};
use crate::error::ServiceError;
use crate::lyrics::LyricProvider;
use crate::model::{NewSong, Song, SongFilter, SongUpdate};
use crate::store::SongStore;
use crate::verses;

pub const MAX_LIMIT: u32 = 100;

pub struct SongService {
    store: Arc<dyn SongStore>,
    lyrics: Arc<dyn LyricProvider>,
    default_limit: u32,
}

impl SongService {
    pub fn new(store: Arc<dyn SongStore>, lyrics: Arc<dyn LyricProvider>, default_limit: u32) -> Self {
        SongService {
            store,
            lyrics,
            default_limit: default_limit.clamp(1, MAX_LIMIT),
        }
    }

    pub async fn list(&self, params: ListParams) -> Result<Vec<Song>, ServiceError> {
        let limit = match parse_count("limit", params.limit.as_deref())? {
            None | Some(0) => self.default_limit,
            Some(limit) => limit.min(MAX_LIMIT),
        };
        let offset = parse_count("offset", params.offset.as_deref())?.unwrap_or(0);
        let filter = SongFilter::new(params.group, params.song);

        tracing::debug!(?filter, limit, offset, "listing songs");
        self.store
            .find(&filter, limit, offset)
            .await
            .map_err(ServiceError::Persistence)
    }

    pub async fn get(&self, id: i64) -> Result<Song, ServiceError> {
        self.store
            .get(id)
            .await
            .map_err(ServiceError::Persistence)?
            .ok_or(ServiceError::NotFound(id))
    }

    /// One page of the song's verses. `page` is the raw query value.
    pub async fn verses(&self, id: i64, page: Option<&str>) -> Result<Vec<String>, ServiceError> {
        let song = self.get(id).await?;
        let page = verses::parse_page(page)?;
        let text = song.text.as_deref().unwrap_or_default();

        tracing::debug!(
            song_id = id,
            page,
            pages = verses::page_count(text),
            "paginating song text"
        );
        Ok(verses::paginate(text, page)?)
    }

    /// Creates a song from a group and title.
    ///
    /// Release date, text and link always come from the lyric provider; any
    /// values the caller sent for them are discarded. If the provider or the
    /// store fails, nothing is written.
    pub async fn create(&self, request: CreateSongRequest) -> Result<Song, ServiceError> {
        let group = required("group", request.group)?;
        let name = required("song", request.song)?;

        let detail = self
            .lyrics
            .fetch_details(&group, &name)
            .await
            .inspect_err(|e| tracing::warn!(%group, song = %name, error = %e, "enrichment failed"))?;

        let song = self
            .store
            .create(NewSong::enriched(group, name, detail))
            .await
            .map_err(ServiceError::Persistence)?;

        tracing::info!(song_id = song.id, group = %song.group, song = %song.name, "song created");
        Ok(song)
    }

    /// Applies the fields present in `update`; never re-enriches.
    pub async fn update(&self, id: i64, update: SongUpdate) -> Result<(), ServiceError> {
        if let Some(group) = &update.group {
            non_blank("group", group)?;
        }
        if let Some(name) = &update.name {
            non_blank("song", name)?;
        }

        self.get(id).await?;

        let updated = self
            .store
            .update_partial(id, &update)
            .await
            .map_err(ServiceError::Persistence)?;
        if !updated {
            return Err(ServiceError::NotFound(id));
        }

        tracing::info!(song_id = id, "song updated");
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.get(id).await?;

        let deleted = self
            .store
            .soft_delete(id)
            .await
            .map_err(ServiceError::Persistence)?;
        if !deleted {
            return Err(ServiceError::NotFound(id));
        }

        tracing::info!(song_id = id, "song deleted");
        Ok(())
    }
}

pub fn parse_id(raw: &str) -> Result<i64, ServiceError> {
    raw.trim()
        .parse()
        .map_err(|_| ServiceError::invalid("song id", raw))
}

fn parse_count(field: &str, raw: Option<&str>) -> Result<Option<u32>, ServiceError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ServiceError::invalid(field, raw)),
    }
}

fn non_blank(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::missing(field));
    }
    Ok(())
}

fn required(field: &str, value: Option<String>) -> Result<String, ServiceError> {
    let value = value.ok_or_else(|| ServiceError::missing(field))?;
    non_blank(field, &value)?;
    Ok(value)
}
