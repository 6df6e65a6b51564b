use axum::{Json, extract::State};

use crate::{
    AppState, auth::AuthUser, error::AppError, extract::JsonBody, handlers::required, models::*,
    repository::ProfileUpdate,
};

pub async fn update_user(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    let username = match req.username {
        Some(name) => Some(required(Some(name), "username")?),
        None => None,
    };

    let channels = req.channels.map(|channels| {
        channels
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect()
    });

    let user = state
        .users
        .update_profile(auth.user_id, ProfileUpdate { username, channels })
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(user))
}
