use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid credentials")]
    AuthError,
    #[error("{0}")]
    Unauthorized(String),
    #[error("You are not allowed to modify this resource")]
    Forbidden,
    #[error("{0}")]
    BadRequest(String),
    #[error("Email already exists")]
    UserExists,
    #[error("Not found")]
    NotFound,
    #[error("database error")]
    DatabaseError(#[from] sqlx::Error),
    #[error("internal error")]
    InternalError(#[from] anyhow::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {rejection}");
        AppError::BadRequest(rejection.body_text())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::AuthError | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) | AppError::UserExists => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            AppError::DatabaseError(e) => {
                tracing::error!("Database error: {e}");
                "Server error".to_string()
            }
            AppError::InternalError(e) => {
                tracing::error!("Internal error: {e:#}");
                "Server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
