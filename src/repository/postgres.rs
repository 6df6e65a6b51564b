use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, postgres::PgPoolOptions};
use uuid::Uuid;

use super::{NewComment, NewUser, NewVideo, ProfileUpdate, UserRepository, VideoRepository};
use crate::{
    error::AppError,
    models::{Comment, User, Video},
    reaction::Reaction,
};

const TOGGLE_LIKE: &str = r#"
    UPDATE videos
    SET likes = CASE WHEN $2 = ANY(likes) THEN array_remove(likes, $2) ELSE array_append(likes, $2) END,
        dislikes = array_remove(dislikes, $2)
    WHERE id = $1
    RETURNING *
"#;

const TOGGLE_DISLIKE: &str = r#"
    UPDATE videos
    SET dislikes = CASE WHEN $2 = ANY(dislikes) THEN array_remove(dislikes, $2) ELSE array_append(dislikes, $2) END,
        likes = array_remove(likes, $2)
    WHERE id = $1
    RETURNING *
"#;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects and brings the schema up to date.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(Self::new(pool))
    }

    async fn with_comments(&self, mut videos: Vec<Video>) -> Result<Vec<Video>, AppError> {
        if videos.is_empty() {
            return Ok(videos);
        }

        let ids: Vec<Uuid> = videos.iter().map(|v| v.id).collect();
        let comments: Vec<Comment> = sqlx::query_as(
            "SELECT * FROM comments WHERE video_id = ANY($1) ORDER BY posted_at, id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_video: HashMap<Uuid, Vec<Comment>> = HashMap::new();
        for comment in comments {
            by_video.entry(comment.video_id).or_default().push(comment);
        }

        for video in &mut videos {
            video.comments = by_video.remove(&video.id).unwrap_or_default();
        }

        Ok(videos)
    }

    async fn with_comments_one(&self, video: Option<Video>) -> Result<Option<Video>, AppError> {
        match video {
            Some(video) => Ok(self.with_comments(vec![video]).await?.pop()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let result: Result<User, sqlx::Error> = sqlx::query_as(
            r#"
            INSERT INTO users (id, username, email, password_hash, avatar, channels, created_at)
            VALUES ($1, $2, $3, $4, $5, '{}', NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.avatar)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::UserExists),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError> {
        let users: Vec<User> = sqlx::query_as("SELECT * FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<Option<User>, AppError> {
        let user: Option<User> = sqlx::query_as(
            r#"
            UPDATE users
            SET username = COALESCE($1, username),
                channels = COALESCE($2, channels)
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(update.username)
        .bind(update.channels)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update_avatar(&self, id: Uuid, avatar: &str) -> Result<Option<User>, AppError> {
        let user: Option<User> =
            sqlx::query_as("UPDATE users SET avatar = $1 WHERE id = $2 RETURNING *")
                .bind(avatar)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }
}

#[async_trait]
impl VideoRepository for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    async fn insert(&self, video: NewVideo) -> Result<Video, AppError> {
        let video: Video = sqlx::query_as(
            r#"
            INSERT INTO videos (id, title, description, category, channel_id, uploader, video_url, thumbnail_url, upload_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.category)
        .bind(video.channel_id)
        .bind(&video.uploader)
        .bind(&video.video_url)
        .bind(&video.thumbnail_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(video)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let video: Option<Video> = sqlx::query_as("SELECT * FROM videos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        self.with_comments_one(video).await
    }

    async fn list(&self) -> Result<Vec<Video>, AppError> {
        let videos: Vec<Video> =
            sqlx::query_as("SELECT * FROM videos ORDER BY upload_date DESC")
                .fetch_all(&self.pool)
                .await?;
        self.with_comments(videos).await
    }

    async fn suggested(
        &self,
        category: &str,
        exclude: Uuid,
        limit: usize,
    ) -> Result<Vec<Video>, AppError> {
        let videos: Vec<Video> = sqlx::query_as(
            r#"
            SELECT * FROM videos
            WHERE category = $1 AND id <> $2
            ORDER BY upload_date DESC
            LIMIT $3
            "#,
        )
        .bind(category)
        .bind(exclude)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        self.with_comments(videos).await
    }

    async fn increment_views(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let video: Option<Video> =
            sqlx::query_as("UPDATE videos SET views = views + 1 WHERE id = $1 RETURNING *")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        self.with_comments_one(video).await
    }

    async fn apply_reaction(
        &self,
        id: Uuid,
        user_id: Uuid,
        reaction: Reaction,
    ) -> Result<Option<Video>, AppError> {
        let statement = match reaction {
            Reaction::Like => TOGGLE_LIKE,
            Reaction::Dislike => TOGGLE_DISLIKE,
        };

        let video: Option<Video> = sqlx::query_as(statement)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        self.with_comments_one(video).await
    }

    async fn add_comment(
        &self,
        video_id: Uuid,
        comment: NewComment,
    ) -> Result<Option<Comment>, AppError> {
        // Inserting through a SELECT yields no row when the video is gone.
        let comment: Option<Comment> = sqlx::query_as(
            r#"
            INSERT INTO comments (id, video_id, user_id, username, avatar, text, posted_at)
            SELECT $1, v.id, $3, $4, $5, $6, NOW() FROM videos v WHERE v.id = $2
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(video_id)
        .bind(comment.user_id)
        .bind(&comment.username)
        .bind(&comment.avatar)
        .bind(&comment.text)
        .fetch_optional(&self.pool)
        .await?;
        Ok(comment)
    }

    async fn find_comment(
        &self,
        video_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Option<Comment>, AppError> {
        let comment: Option<Comment> =
            sqlx::query_as("SELECT * FROM comments WHERE video_id = $1 AND id = $2")
                .bind(video_id)
                .bind(comment_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(comment)
    }

    async fn update_comment(
        &self,
        video_id: Uuid,
        comment_id: Uuid,
        text: &str,
    ) -> Result<Option<Comment>, AppError> {
        let comment: Option<Comment> = sqlx::query_as(
            "UPDATE comments SET text = $1 WHERE video_id = $2 AND id = $3 RETURNING *",
        )
        .bind(text)
        .bind(video_id)
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(comment)
    }

    async fn delete_comment(&self, video_id: Uuid, comment_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE video_id = $1 AND id = $2")
            .bind(video_id)
            .bind(comment_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// These run against a throwaway database per test created by `sqlx::test`:
// `DATABASE_URL=postgres://... cargo test -- --ignored`
#[cfg(test)]
mod tests {
    use super::*;

    async fn seed(store: &PgStore) -> (User, Video) {
        let user = UserRepository::insert(
            store,
            NewUser {
                username: "alice".to_string(),
                email: format!("{}@example.com", Uuid::new_v4()),
                password_hash: "hash".to_string(),
                avatar: String::new(),
            },
        )
        .await
        .unwrap();

        let video = VideoRepository::insert(
            store,
            NewVideo {
                title: "clip".to_string(),
                description: String::new(),
                category: "music".to_string(),
                channel_id: user.id,
                uploader: user.username.clone(),
                video_url: "https://cdn.example.com/clip.mp4".to_string(),
                thumbnail_url: String::new(),
            },
        )
        .await
        .unwrap();

        (user, video)
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn like_then_dislike_moves_the_user(pool: PgPool) {
        let store = PgStore::new(pool);
        let (user, video) = seed(&store).await;

        let liked = store
            .apply_reaction(video.id, user.id, Reaction::Like)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(liked.likes, vec![user.id]);
        assert!(liked.dislikes.is_empty());

        let disliked = store
            .apply_reaction(video.id, user.id, Reaction::Dislike)
            .await
            .unwrap()
            .unwrap();
        assert!(disliked.likes.is_empty());
        assert_eq!(disliked.dislikes, vec![user.id]);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn liking_twice_clears_the_like(pool: PgPool) {
        let store = PgStore::new(pool);
        let (user, video) = seed(&store).await;
        let other = Uuid::new_v4();

        store
            .apply_reaction(video.id, other, Reaction::Like)
            .await
            .unwrap();
        store
            .apply_reaction(video.id, user.id, Reaction::Like)
            .await
            .unwrap();
        let twice = store
            .apply_reaction(video.id, user.id, Reaction::Like)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(twice.likes, vec![other]);
        assert!(twice.dislikes.is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn missing_video_is_none_and_nothing_changes(pool: PgPool) {
        let store = PgStore::new(pool);
        let (user, video) = seed(&store).await;

        let result = store
            .apply_reaction(Uuid::new_v4(), user.id, Reaction::Like)
            .await
            .unwrap();
        assert!(result.is_none());
        assert!(store.increment_views(Uuid::new_v4()).await.unwrap().is_none());

        let stored = VideoRepository::find_by_id(&store, video.id)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.likes.is_empty());
        assert!(stored.dislikes.is_empty());
        assert_eq!(stored.views, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn comments_need_an_existing_video(pool: PgPool) {
        let store = PgStore::new(pool);
        let (user, video) = seed(&store).await;
        let comment = |text: &str| NewComment {
            user_id: user.id,
            username: user.username.clone(),
            avatar: user.avatar.clone(),
            text: text.to_string(),
        };

        let orphan = store
            .add_comment(Uuid::new_v4(), comment("lost"))
            .await
            .unwrap();
        assert!(orphan.is_none());

        let first = store
            .add_comment(video.id, comment("first"))
            .await
            .unwrap()
            .unwrap();
        store
            .add_comment(video.id, comment("second"))
            .await
            .unwrap()
            .unwrap();

        let loaded = VideoRepository::find_by_id(&store, video.id)
            .await
            .unwrap()
            .unwrap();
        let texts: Vec<&str> = loaded.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["first", "second"]);

        assert!(store.delete_comment(video.id, first.id).await.unwrap());
        assert!(!store.delete_comment(video.id, first.id).await.unwrap());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn profile_update_keeps_unset_fields(pool: PgPool) {
        let store = PgStore::new(pool);
        let (user, _) = seed(&store).await;

        let updated = store
            .update_profile(
                user.id,
                ProfileUpdate {
                    username: None,
                    channels: Some(vec!["Alice Plays".to_string()]),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.username, "alice");
        assert_eq!(updated.channels, ["Alice Plays"]);

        let duplicate = UserRepository::insert(
            &store,
            NewUser {
                username: "copy".to_string(),
                email: user.email.clone(),
                password_hash: "hash".to_string(),
                avatar: String::new(),
            },
        )
        .await;
        assert!(matches!(duplicate, Err(AppError::UserExists)));
    }
}
