pub mod add_view;
pub mod attach_uploader_avatars;
pub mod create_video;
pub mod get_suggested_videos;
pub mod get_video_by_id;
pub mod get_videos;
pub mod toggle_dislike;
pub mod toggle_like;
