use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    database: String,
}

pub async fn index() -> &'static str {
    "YouTube Clone Backend Running..."
}

pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, StatusCode> {
    let db_status = match state.videos.ping().await {
        Ok(()) => "healthy",
        Err(e) => {
            tracing::warn!("Health check failed: {e}");
            "unhealthy"
        }
    };

    let response = HealthResponse {
        status: if db_status == "healthy" {
            "ok".to_string()
        } else {
            "degraded".to_string()
        },
        database: db_status.to_string(),
    };

    if db_status == "healthy" {
        Ok(Json(response))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}
