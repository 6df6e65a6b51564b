pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod image_host;
pub mod link;
pub mod models;
pub mod reaction;
pub mod repository;

use std::{path::PathBuf, sync::Arc};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    config::AuthConfig,
    image_host::ImageHost,
    repository::{UserRepository, VideoRepository},
};

pub const AVATAR_BODY_LIMIT: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub videos: Arc<dyn VideoRepository>,
    pub images: Arc<dyn ImageHost>,
    pub auth_config: Arc<AuthConfig>,
}

/// Builds the HTTP API. `uploads_dir`, when set, is served under `/uploads`.
pub fn router(state: AppState, uploads_dir: Option<PathBuf>) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login));

    let video_routes = Router::new()
        .route("/", get(handlers::get_videos))
        .route("/upload", post(handlers::create_video))
        .route(
            "/suggested/{category}/{exclude_id}",
            get(handlers::get_suggested_videos),
        )
        .route("/{id}", get(handlers::get_video_by_id))
        .route("/{id}/view", put(handlers::add_view))
        .route("/{id}/like", put(handlers::toggle_like))
        .route("/{id}/dislike", put(handlers::toggle_dislike));

    let comment_routes = Router::new()
        .route("/{video_id}", post(handlers::add_comment))
        .route(
            "/{video_id}/comment/{comment_id}",
            put(handlers::edit_comment).delete(handlers::delete_comment),
        );

    let user_routes = Router::new()
        .route("/me", get(handlers::get_me))
        .route("/update", put(handlers::update_user))
        .route(
            "/avatar",
            put(handlers::update_avatar).layer(DefaultBodyLimit::max(AVATAR_BODY_LIMIT)),
        );

    let mut app = Router::new()
        .route("/", get(handlers::index))
        .route("/api/health", get(handlers::health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api/videos", video_routes)
        .nest("/api/comments", comment_routes)
        .nest("/api/users", user_routes);

    if let Some(dir) = uploads_dir {
        app = app.nest_service("/uploads", ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
