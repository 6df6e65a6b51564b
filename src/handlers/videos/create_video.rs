use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState, auth::AuthUser, error::AppError, extract::JsonBody, handlers::required,
    link::normalize, models::*, repository::NewVideo,
};

pub async fn create_video(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateVideoRequest>,
) -> Result<(StatusCode, Json<CreateVideoResponse>), AppError> {
    let video_url = req
        .video_url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Video URL required".to_string()))?;
    let title = required(req.title, "title")?;

    // The token may outlive a username change; the stored record is authoritative.
    let uploader = state
        .users
        .find_by_id(auth.user_id)
        .await?
        .ok_or(AppError::AuthError)?;

    let link = normalize(&video_url);

    let video = state
        .videos
        .insert(NewVideo {
            title,
            description: req.description.unwrap_or_default(),
            category: req.category.map(|c| c.trim().to_string()).unwrap_or_default(),
            channel_id: uploader.id,
            uploader: uploader.username,
            video_url: link.playable_url,
            thumbnail_url: link.thumbnail_url,
        })
        .await?;

    tracing::info!("Video {} created by {}", video.id, video.channel_id);

    Ok((
        StatusCode::CREATED,
        Json(CreateVideoResponse {
            message: "Video uploaded successfully".to_string(),
            video,
        }),
    ))
}
