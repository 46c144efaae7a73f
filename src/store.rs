use anyhow::Result;
use async_trait::async_trait;

use crate::model::{NewSong, Song, SongFilter, SongUpdate};

/// Persistence for song records.
///
/// Soft-deleted rows are invisible to every method: `get` returns `None`,
/// `find` skips them, and writes against them affect nothing.
#[async_trait]
pub trait SongStore: Send + Sync {
    async fn find(&self, filter: &SongFilter, limit: u32, offset: u32) -> Result<Vec<Song>>;

    async fn get(&self, id: i64) -> Result<Option<Song>>;

    async fn create(&self, song: NewSong) -> Result<Song>;

    /// Returns `false` when no live row has this id.
    async fn update_partial(&self, id: i64, update: &SongUpdate) -> Result<bool>;

    /// Returns `false` when no live row has this id.
    async fn soft_delete(&self, id: i64) -> Result<bool>;
}
