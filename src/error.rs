use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::ErrorBody;
use crate::lyrics::LyricError;
use crate::verses::VerseError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Request(String),

    #[error("song {0} not found")]
    NotFound(i64),

    #[error("no route for {0}")]
    UnknownRoute(String),

    #[error("lyric provider failed")]
    Dependency(#[from] LyricError),

    #[error("persistence failed")]
    Persistence(#[source] anyhow::Error),
}

impl ServiceError {
    pub fn invalid(field: &str, value: &str) -> Self {
        ServiceError::Request(format!("invalid {field}: {value:?}"))
    }

    pub fn missing(field: &str) -> Self {
        ServiceError::Request(format!("{field} is required"))
    }

    pub fn status(&self) -> StatusCode {
        use ServiceError::*;
        match self {
            Request(_) => StatusCode::BAD_REQUEST,
            NotFound(_) | UnknownRoute(_) => StatusCode::NOT_FOUND,
            Dependency(_) | Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client. Server-side failures stay generic; the
    /// details go to the log.
    fn public_message(&self) -> String {
        use ServiceError::*;
        match self {
            Request(_) | NotFound(_) | UnknownRoute(_) => self.to_string(),
            Dependency(_) => "failed to fetch song details".to_string(),
            Persistence(_) => "failed to access song storage".to_string(),
        }
    }
}

impl From<VerseError> for ServiceError {
    fn from(error: VerseError) -> Self {
        ServiceError::Request(error.to_string())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %crate::unpack_error(&self), "request failed");
        } else {
            tracing::info!(error = %self, "request rejected");
        }

        let body = ErrorBody {
            code: status.as_u16(),
            message: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}
