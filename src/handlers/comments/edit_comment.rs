use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState, auth::AuthUser, error::AppError, extract::JsonBody, handlers::parse_id, models::*,
};

pub async fn edit_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((video_id, comment_id)): Path<(String, String)>,
    JsonBody(req): JsonBody<CommentRequest>,
) -> Result<Json<Comment>, AppError> {
    let video_id = parse_id(&video_id)?;
    let comment_id = parse_id(&comment_id)?;

    let text = req.text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::BadRequest("Comment text is required".to_string()));
    }

    let existing = state
        .videos
        .find_comment(video_id, comment_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if existing.user_id != auth.user_id {
        return Err(AppError::Forbidden);
    }

    let comment = state
        .videos
        .update_comment(video_id, comment_id, &text)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(comment))
}
