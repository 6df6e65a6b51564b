use axum::{Json, extract::State};

use crate::{AppState, auth::AuthUser, error::AppError, models::*};

pub async fn update_avatar(
    auth: AuthUser,
    State(state): State<AppState>,
    mut multipart: axum::extract::Multipart,
) -> Result<Json<UpdateAvatarResponse>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Error reading multipart field: {}", e);
        AppError::BadRequest("Malformed multipart body".to_string())
    })? {
        if field.name() != Some("avatar") {
            continue;
        }

        let content_type = field.content_type().unwrap_or("").to_string();
        if !content_type.starts_with("image/") {
            return Err(AppError::BadRequest("Only image files allowed".to_string()));
        }

        let file_name = field.file_name().unwrap_or("avatar").to_string();

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read avatar: {e}")))?;

        if data.is_empty() {
            return Err(AppError::BadRequest("No image provided".to_string()));
        }

        let image_url = state
            .images
            .upload(&file_name, &content_type, data.to_vec())
            .await?;

        let user = state
            .users
            .update_avatar(auth.user_id, &image_url)
            .await?
            .ok_or(AppError::NotFound)?;

        return Ok(Json(UpdateAvatarResponse {
            message: "Avatar updated".to_string(),
            user,
        }));
    }

    Err(AppError::BadRequest("No image provided".to_string()))
}
