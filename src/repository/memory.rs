use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{NewComment, NewUser, NewVideo, ProfileUpdate, UserRepository, VideoRepository};
use crate::{
    error::AppError,
    models::{Comment, User, Video},
    reaction::{self, Reaction},
};

/// Process-local store. Every mutation happens under a single write lock.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    videos: HashMap<Uuid, Video>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut videos: Vec<Video>) -> Vec<Video> {
    videos.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));
    videos
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let mut inner = self.inner.write();

        if inner.users.values().any(|u| u.email == user.email) {
            return Err(AppError::UserExists);
        }

        let user = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            avatar: user.avatar,
            channels: Vec::new(),
            created_at: OffsetDateTime::now_utc(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.inner.read().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .inner
            .read()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError> {
        let inner = self.inner.read();
        Ok(ids
            .iter()
            .filter_map(|id| inner.users.get(id).cloned())
            .collect())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<Option<User>, AppError> {
        let mut inner = self.inner.write();
        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(username) = update.username {
            user.username = username;
        }
        if let Some(channels) = update.channels {
            user.channels = channels;
        }
        Ok(Some(user.clone()))
    }

    async fn update_avatar(&self, id: Uuid, avatar: &str) -> Result<Option<User>, AppError> {
        let mut inner = self.inner.write();
        Ok(inner.users.get_mut(&id).map(|user| {
            user.avatar = avatar.to_string();
            user.clone()
        }))
    }
}

#[async_trait]
impl VideoRepository for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn insert(&self, video: NewVideo) -> Result<Video, AppError> {
        let video = Video {
            id: Uuid::new_v4(),
            title: video.title,
            description: video.description,
            category: video.category,
            channel_id: video.channel_id,
            uploader: video.uploader,
            video_url: video.video_url,
            thumbnail_url: video.thumbnail_url,
            views: 0,
            likes: Vec::new(),
            dislikes: Vec::new(),
            upload_date: OffsetDateTime::now_utc(),
            comments: Vec::new(),
        };
        self.inner.write().videos.insert(video.id, video.clone());
        Ok(video)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.inner.read().videos.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Video>, AppError> {
        let videos = self.inner.read().videos.values().cloned().collect();
        Ok(newest_first(videos))
    }

    async fn suggested(
        &self,
        category: &str,
        exclude: Uuid,
        limit: usize,
    ) -> Result<Vec<Video>, AppError> {
        let videos = self
            .inner
            .read()
            .videos
            .values()
            .filter(|v| v.category == category && v.id != exclude)
            .cloned()
            .collect();

        let mut videos = newest_first(videos);
        videos.truncate(limit);
        Ok(videos)
    }

    async fn increment_views(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let mut inner = self.inner.write();
        Ok(inner.videos.get_mut(&id).map(|video| {
            video.views += 1;
            video.clone()
        }))
    }

    async fn apply_reaction(
        &self,
        id: Uuid,
        user_id: Uuid,
        reaction: Reaction,
    ) -> Result<Option<Video>, AppError> {
        let mut inner = self.inner.write();
        Ok(inner.videos.get_mut(&id).map(|video| {
            let state = reaction::toggle(video.reactions(), user_id, reaction);
            video.set_reactions(state);
            video.clone()
        }))
    }

    async fn add_comment(
        &self,
        video_id: Uuid,
        comment: NewComment,
    ) -> Result<Option<Comment>, AppError> {
        let mut inner = self.inner.write();
        Ok(inner.videos.get_mut(&video_id).map(|video| {
            let comment = Comment {
                id: Uuid::new_v4(),
                video_id,
                user_id: comment.user_id,
                username: comment.username,
                avatar: comment.avatar,
                text: comment.text,
                timestamp: OffsetDateTime::now_utc(),
            };
            video.comments.push(comment.clone());
            comment
        }))
    }

    async fn find_comment(
        &self,
        video_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Option<Comment>, AppError> {
        Ok(self
            .inner
            .read()
            .videos
            .get(&video_id)
            .and_then(|v| v.comments.iter().find(|c| c.id == comment_id))
            .cloned())
    }

    async fn update_comment(
        &self,
        video_id: Uuid,
        comment_id: Uuid,
        text: &str,
    ) -> Result<Option<Comment>, AppError> {
        let mut inner = self.inner.write();
        Ok(inner
            .videos
            .get_mut(&video_id)
            .and_then(|v| v.comments.iter_mut().find(|c| c.id == comment_id))
            .map(|comment| {
                comment.text = text.to_string();
                comment.clone()
            }))
    }

    async fn delete_comment(&self, video_id: Uuid, comment_id: Uuid) -> Result<bool, AppError> {
        let mut inner = self.inner.write();
        let Some(video) = inner.videos.get_mut(&video_id) else {
            return Ok(false);
        };

        let before = video.comments.len();
        video.comments.retain(|c| c.id != comment_id);
        Ok(video.comments.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            username: "alice".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            avatar: String::new(),
        }
    }

    fn new_video(channel_id: Uuid, category: &str) -> NewVideo {
        NewVideo {
            title: "clip".to_string(),
            description: String::new(),
            category: category.to_string(),
            channel_id,
            uploader: "alice".to_string(),
            video_url: "https://cdn.example.com/clip.mp4".to_string(),
            thumbnail_url: String::new(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        UserRepository::insert(&store, new_user("a@example.com"))
            .await
            .unwrap();

        let err = UserRepository::insert(&store, new_user("a@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UserExists));
    }

    #[tokio::test]
    async fn reactions_on_missing_video_change_nothing() {
        let store = MemoryStore::new();
        let result = store
            .apply_reaction(Uuid::new_v4(), Uuid::new_v4(), Reaction::Like)
            .await
            .unwrap();
        assert!(result.is_none());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_reactions_from_different_users_all_land() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let video = VideoRepository::insert(&*store, new_video(Uuid::new_v4(), "music"))
            .await
            .unwrap();
        let video_id = video.id;

        let users: Vec<Uuid> = (0..32).map(|_| Uuid::new_v4()).collect();
        let handles: Vec<_> = users
            .iter()
            .map(|user| {
                let store = store.clone();
                let user = *user;
                tokio::spawn(async move {
                    store
                        .apply_reaction(video_id, user, Reaction::Like)
                        .await
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let stored = VideoRepository::find_by_id(&*store, video_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.likes.len(), users.len());
    }

    #[tokio::test]
    async fn suggested_excludes_current_and_other_categories() {
        let store = MemoryStore::new();
        let channel = Uuid::new_v4();
        let current = VideoRepository::insert(&store, new_video(channel, "music"))
            .await
            .unwrap();
        for _ in 0..10 {
            VideoRepository::insert(&store, new_video(channel, "music"))
                .await
                .unwrap();
        }
        VideoRepository::insert(&store, new_video(channel, "news"))
            .await
            .unwrap();

        let suggested = store.suggested("music", current.id, 8).await.unwrap();
        assert_eq!(suggested.len(), 8);
        assert!(suggested.iter().all(|v| v.category == "music"));
        assert!(suggested.iter().all(|v| v.id != current.id));
    }

    #[tokio::test]
    async fn comments_are_scoped_to_their_video() {
        let store = MemoryStore::new();
        let channel = Uuid::new_v4();
        let first = VideoRepository::insert(&store, new_video(channel, "a"))
            .await
            .unwrap();
        let second = VideoRepository::insert(&store, new_video(channel, "a"))
            .await
            .unwrap();

        let comment = store
            .add_comment(
                first.id,
                NewComment {
                    user_id: channel,
                    username: "alice".to_string(),
                    avatar: String::new(),
                    text: "nice".to_string(),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert!(
            store
                .find_comment(second.id, comment.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(!store.delete_comment(second.id, comment.id).await.unwrap());
        assert!(store.delete_comment(first.id, comment.id).await.unwrap());
        assert!(
            VideoRepository::find_by_id(&store, first.id)
                .await
                .unwrap()
                .unwrap()
                .comments
                .is_empty()
        );
    }
}
