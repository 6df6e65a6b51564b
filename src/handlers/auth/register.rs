use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState,
    auth::{create_token, hash_password},
    error::AppError,
    extract::JsonBody,
    handlers::required,
    models::*,
    repository::NewUser,
};

pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let username = required(Some(req.username), "username")?;
    let email = required(Some(req.email), "email")?.to_lowercase();
    if req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Missing required field: password".to_string(),
        ));
    }

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::UserExists);
    }

    let password_hash = hash_password(&state.auth_config, &req.password)?;

    let avatar = req
        .avatar
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| DEFAULT_AVATAR.to_string());

    let user = state
        .users
        .insert(NewUser {
            username,
            email,
            password_hash,
            avatar,
        })
        .await?;

    let token = create_token(&state.auth_config, &user)?;
    tracing::info!("Registered user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            token,
            user: user.into(),
        }),
    ))
}
