use axum::{
    Json,
    extract::{Path, State},
};

use crate::{AppState, auth::AuthUser, error::AppError, handlers::parse_id, models::*};

pub async fn delete_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((video_id, comment_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, AppError> {
    let video_id = parse_id(&video_id)?;
    let comment_id = parse_id(&comment_id)?;

    let existing = state
        .videos
        .find_comment(video_id, comment_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if existing.user_id != auth.user_id {
        return Err(AppError::Forbidden);
    }

    if !state.videos.delete_comment(video_id, comment_id).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!("Comment {comment_id} deleted by {}", auth.username);

    Ok(Json(MessageResponse {
        message: "Comment deleted".to_string(),
    }))
}
