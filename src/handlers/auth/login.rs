use axum::{Json, extract::State};

use crate::{
    AppState,
    auth::{create_token, verify_password},
    error::AppError,
    extract::JsonBody,
    models::*,
};

pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = req.email.trim().to_lowercase();

    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or(AppError::AuthError)?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::AuthError);
    }

    let token = create_token(&state.auth_config, &user)?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user: user.into(),
    }))
}
