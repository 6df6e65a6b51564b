use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState, auth::AuthUser, error::AppError, extract::JsonBody, handlers::parse_id, models::*,
    repository::NewComment,
};

pub async fn add_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    JsonBody(req): JsonBody<CommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let video_id = parse_id(&video_id)?;

    let text = req.text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::BadRequest("Comment text is required".to_string()));
    }

    let author = state
        .users
        .find_by_id(auth.user_id)
        .await?
        .ok_or(AppError::AuthError)?;

    let comment = state
        .videos
        .add_comment(
            video_id,
            NewComment {
                user_id: author.id,
                username: author.username,
                avatar: author.avatar,
                text,
            },
        )
        .await?
        .ok_or(AppError::NotFound)?;

    Ok((StatusCode::CREATED, Json(comment)))
}
