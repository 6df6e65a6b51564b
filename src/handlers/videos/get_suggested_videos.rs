use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{AppState, error::AppError, models::*};

use super::attach_uploader_avatars::attach_uploader_avatars;

const SUGGESTION_LIMIT: usize = 8;

pub async fn get_suggested_videos(
    State(state): State<AppState>,
    Path((category, exclude_id)): Path<(String, String)>,
) -> Result<Json<Vec<VideoWithAvatar>>, AppError> {
    // An unparseable id matches no stored video, so nothing is excluded.
    let exclude = Uuid::parse_str(&exclude_id).unwrap_or_else(|_| Uuid::nil());

    let videos = state
        .videos
        .suggested(&category, exclude, SUGGESTION_LIMIT)
        .await?;

    Ok(Json(attach_uploader_avatars(&state, videos).await?))
}
