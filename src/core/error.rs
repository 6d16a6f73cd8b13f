use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Error body returned to clients on every failure path.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Image payload could not be decoded as base64.
    #[error("Imagem em base64 inválida")]
    InvalidImageEncoding,

    /// Decoded image payload is below the plausibility floor.
    #[error("Imagem muito pequena ou inválida")]
    ImageTooSmall,

    /// A per-call upload to the object store failed.
    #[error("Erro ao fazer upload da imagem: {0}")]
    UploadFailed(String),

    /// Object store unreachable or misconfigured. Fatal at startup.
    #[error("Erro ao conectar ao Blob Storage: {0}")]
    StorageUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::InvalidImageEncoding | AppError::ImageTooSmall => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::UploadFailed(ref msg) => {
                tracing::error!("Upload failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::StorageUnavailable(ref msg) => {
                tracing::error!("Object store unavailable: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                )
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_input_errors_map_to_400() {
        assert_eq!(
            AppError::InvalidImageEncoding.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::ImageTooSmall.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::BadRequest("missing field".into())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn dependency_errors_map_to_500() {
        assert_eq!(
            AppError::UploadFailed("timeout".into())
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::StorageUnavailable("bucket missing".into())
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound)
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn decode_errors_are_distinguishable() {
        // Callers surface different client-facing messages for the two cases.
        assert_ne!(
            AppError::InvalidImageEncoding.to_string(),
            AppError::ImageTooSmall.to_string()
        );
    }
}
