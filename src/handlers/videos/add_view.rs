use axum::{
    Json,
    extract::{Path, State},
};

use crate::{AppState, error::AppError, handlers::parse_id, models::*};

pub async fn add_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Video>, AppError> {
    let video = state
        .videos
        .increment_views(parse_id(&id)?)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(video))
}
