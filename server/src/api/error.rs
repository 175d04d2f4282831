use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use common::score::ApiResponse;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid score submission")]
    Validation(Vec<String>),

    #[error("Not found")]
    NotFound,

    /// Any storage failure; `message` is the generic text the client sees.
    #[error("{message}")]
    Internal {
        message: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(details) => {
                warn!("Rejected score submission: {:?}", details);
                let body = ApiResponse::<()>::error("Invalid score submission").with_details(details);
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::NotFound => {
                (StatusCode::NOT_FOUND, Json(ApiResponse::<()>::error("Not found"))).into_response()
            }
            ApiError::Internal { message, source } => {
                error!("API error: {}: {:?}", message, source);
                (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::<()>::error(message)))
                    .into_response()
            }
        }
    }
}

/// Attach the client-facing message to a storage failure.
pub trait OrInternal<T> {
    fn or_internal(self, message: &'static str) -> Result<T, ApiError>;
}

impl<T> OrInternal<T> for anyhow::Result<T> {
    fn or_internal(self, message: &'static str) -> Result<T, ApiError> {
        self.map_err(|source| ApiError::Internal { message, source })
    }
}
