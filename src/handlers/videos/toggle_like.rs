use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState, auth::AuthUser, error::AppError, handlers::parse_id, models::*, reaction::Reaction,
};

pub async fn toggle_like(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Video>, AppError> {
    let video = state
        .videos
        .apply_reaction(parse_id(&id)?, auth.user_id, Reaction::Like)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(video))
}
