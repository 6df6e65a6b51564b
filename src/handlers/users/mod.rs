pub mod get_me;
pub mod update_avatar;
pub mod update_user;
