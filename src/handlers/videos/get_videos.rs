use axum::{Json, extract::State};

use crate::{AppState, error::AppError, models::*};

use super::attach_uploader_avatars::attach_uploader_avatars;

pub async fn get_videos(
    State(state): State<AppState>,
) -> Result<Json<Vec<VideoWithAvatar>>, AppError> {
    let videos = state.videos.list().await?;
    Ok(Json(attach_uploader_avatars(&state, videos).await?))
}
