use appeal_shared::api::ErrorResponse;
use appeal_store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Malformed appeal: {0}")]
    MalformedBody(String),

    #[error("API key is required")]
    MissingApiKey,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Appeal not found")]
    NotFound,

    #[error("Server error while saving appeal")]
    SaveFailed(#[source] StoreError),

    #[error("Error reading appeals")]
    ListFailed(#[source] StoreError),

    #[error("Error reading appeal")]
    ReadFailed(#[source] StoreError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingFields | AppError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            AppError::MissingApiKey => StatusCode::UNAUTHORIZED,
            AppError::InvalidApiKey => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::SaveFailed(_) | AppError::ListFailed(_) | AppError::ReadFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::SaveFailed(e) | AppError::ListFailed(e) | AppError::ReadFailed(e) => {
                tracing::error!("{}: {}", self, e);
            }
            _ => {}
        }

        let body = ErrorResponse {
            success: false,
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
