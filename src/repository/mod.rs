pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{Comment, User, Video},
    reaction::Reaction,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub channels: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct NewVideo {
    pub title: String,
    pub description: String,
    pub category: String,
    pub channel_id: Uuid,
    pub uploader: String,
    pub video_url: String,
    pub thumbnail_url: String,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub user_id: Uuid,
    pub username: String,
    pub avatar: String,
    pub text: String,
}

#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Stores a new user. Fails with `UserExists` when the email is taken.
    async fn insert(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError>;

    /// Applies the fields present in `update`. Returns `None` for an unknown user.
    async fn update_profile(&self, id: Uuid, update: ProfileUpdate)
    -> Result<Option<User>, AppError>;

    async fn update_avatar(&self, id: Uuid, avatar: &str) -> Result<Option<User>, AppError>;
}

/// Video documents together with their comments.
///
/// Mutating methods return `None` when the video does not exist and leave
/// the store untouched in that case.
#[async_trait]
pub trait VideoRepository: Send + Sync + 'static {
    async fn ping(&self) -> Result<(), AppError>;

    async fn insert(&self, video: NewVideo) -> Result<Video, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// All videos, newest upload first.
    async fn list(&self) -> Result<Vec<Video>, AppError>;

    /// Newest videos of `category`, excluding `exclude`, at most `limit`.
    async fn suggested(
        &self,
        category: &str,
        exclude: Uuid,
        limit: usize,
    ) -> Result<Vec<Video>, AppError>;

    async fn increment_views(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// Toggles `reaction` for `user_id` in a single atomic update.
    async fn apply_reaction(
        &self,
        id: Uuid,
        user_id: Uuid,
        reaction: Reaction,
    ) -> Result<Option<Video>, AppError>;

    async fn add_comment(
        &self,
        video_id: Uuid,
        comment: NewComment,
    ) -> Result<Option<Comment>, AppError>;

    async fn find_comment(
        &self,
        video_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Option<Comment>, AppError>;

    async fn update_comment(
        &self,
        video_id: Uuid,
        comment_id: Uuid,
        text: &str,
    ) -> Result<Option<Comment>, AppError>;

    /// Returns `true` when a comment was removed.
    async fn delete_comment(&self, video_id: Uuid, comment_id: Uuid) -> Result<bool, AppError>;
}
