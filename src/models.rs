use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::reaction::ReactionState;

pub const DEFAULT_AVATAR: &str = "https://i.pravatar.cc/150";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    #[serde(rename = "userId")]
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub avatar: String,
    pub channels: Vec<String>,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Comment {
    #[serde(rename = "commentId")]
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub video_id: Uuid,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub username: String,
    pub avatar: String,
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    #[sqlx(rename = "posted_at")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Video {
    #[serde(rename = "videoId")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(rename = "channelId")]
    pub channel_id: Uuid,
    pub uploader: String,
    #[serde(rename = "videoUrl")]
    pub video_url: String,
    #[serde(rename = "thumbnailUrl")]
    pub thumbnail_url: String,
    pub views: i64,
    pub likes: Vec<Uuid>,
    pub dislikes: Vec<Uuid>,
    #[serde(rename = "uploadDate", with = "time::serde::rfc3339")]
    pub upload_date: OffsetDateTime,
    #[sqlx(skip)]
    pub comments: Vec<Comment>,
}

impl Video {
    pub fn reactions(&self) -> ReactionState {
        ReactionState::new(self.likes.clone(), self.dislikes.clone())
    }

    pub fn set_reactions(&mut self, state: ReactionState) {
        self.likes = state.likes;
        self.dislikes = state.dislikes;
    }
}

#[derive(Debug, Serialize)]
pub struct VideoWithAvatar {
    #[serde(flatten)]
    pub video: Video,
    #[serde(rename = "uploaderAvatar")]
    pub uploader_avatar: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    #[serde(rename = "userId")]
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub avatar: String,
    pub channels: Vec<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            avatar: user.avatar,
            channels: user.channels,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub channels: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct UpdateAvatarResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateVideoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "videoUrl")]
    pub video_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateVideoResponse {
    pub message: String,
    pub video: Video,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommentRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
