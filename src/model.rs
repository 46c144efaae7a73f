use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A song record as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: i64,
    pub group: String,
    #[serde(rename = "song")]
    pub name: String,
    pub release_date: Option<String>,
    pub text: Option<String>,
    pub link: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

/// Enrichment data returned by the lyric provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongDetail {
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub link: String,
}

/// A validated and enriched song, ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSong {
    pub group: String,
    pub name: String,
    pub release_date: Option<String>,
    pub text: Option<String>,
    pub link: Option<String>,
}

impl NewSong {
    pub fn enriched(group: String, name: String, detail: SongDetail) -> Self {
        NewSong {
            group,
            name,
            release_date: Some(detail.release_date),
            text: Some(detail.text),
            link: Some(detail.link),
        }
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SongUpdate {
    pub group: Option<String>,
    #[serde(rename = "song")]
    pub name: Option<String>,
    pub release_date: Option<String>,
    pub text: Option<String>,
    pub link: Option<String>,
}

impl SongUpdate {
    pub fn is_empty(&self) -> bool {
        self.group.is_none()
            && self.name.is_none()
            && self.release_date.is_none()
            && self.text.is_none()
            && self.link.is_none()
    }
}

/// Equality filters for listing songs. Empty strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongFilter {
    pub group: Option<String>,
    pub name: Option<String>,
}

impl SongFilter {
    pub fn new(group: Option<String>, name: Option<String>) -> Self {
        SongFilter {
            group: group.filter(|g| !g.is_empty()),
            name: name.filter(|n| !n.is_empty()),
        }
    }
}
