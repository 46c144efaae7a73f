use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Raw list query. Numbers stay strings so malformed values can be reported
/// against the field that carried them.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Exact group name
    pub group: Option<String>,
    /// Exact song title
    pub song: Option<String>,
    /// Page size; omitted or 0 uses the configured default
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// 1-indexed verse page; omitted or 0 is the first page
    pub page: Option<String>,
}

/// Body of `POST /songs`. Anything besides `group` and `song` is ignored.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateSongRequest {
    pub group: Option<String>,
    pub song: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}
