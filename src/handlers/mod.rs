pub mod auth;
pub mod comments;
pub mod health_check;
pub mod users;
pub mod videos;

use uuid::Uuid;

use crate::error::AppError;

pub use auth::login::login;
pub use auth::register::register;
pub use comments::add_comment::add_comment;
pub use comments::delete_comment::delete_comment;
pub use comments::edit_comment::edit_comment;
pub use health_check::{health_check, index};
pub use users::get_me::get_me;
pub use users::update_avatar::update_avatar;
pub use users::update_user::update_user;
pub use videos::add_view::add_view;
pub use videos::create_video::create_video;
pub use videos::get_suggested_videos::get_suggested_videos;
pub use videos::get_video_by_id::get_video_by_id;
pub use videos::get_videos::get_videos;
pub use videos::toggle_dislike::toggle_dislike;
pub use videos::toggle_like::toggle_like;

/// Path ids that are not UUIDs cannot name a stored document.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}

/// Trims a required text field, rejecting missing or blank values.
pub(crate) fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("Missing required field: {field}")))
}
