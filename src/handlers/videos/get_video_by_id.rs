use axum::{
    Json,
    extract::{Path, State},
};

use crate::{AppState, error::AppError, handlers::parse_id, models::*};

use super::attach_uploader_avatars::attach_uploader_avatars;

pub async fn get_video_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VideoWithAvatar>, AppError> {
    let video = state
        .videos
        .find_by_id(parse_id(&id)?)
        .await?
        .ok_or(AppError::NotFound)?;

    attach_uploader_avatars(&state, vec![video])
        .await?
        .pop()
        .map(Json)
        .ok_or(AppError::NotFound)
}
