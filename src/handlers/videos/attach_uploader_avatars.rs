use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    AppState,
    error::AppError,
    models::{Video, VideoWithAvatar},
};

pub async fn attach_uploader_avatars(
    state: &AppState,
    videos: Vec<Video>,
) -> Result<Vec<VideoWithAvatar>, AppError> {
    let mut channel_ids: Vec<Uuid> = videos.iter().map(|v| v.channel_id).collect();
    channel_ids.sort_unstable();
    channel_ids.dedup();

    let avatars: HashMap<Uuid, String> = state
        .users
        .find_many(&channel_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u.avatar))
        .collect();

    Ok(videos
        .into_iter()
        .map(|video| VideoWithAvatar {
            uploader_avatar: avatars.get(&video.channel_id).cloned().unwrap_or_default(),
            video,
        })
        .collect())
}
