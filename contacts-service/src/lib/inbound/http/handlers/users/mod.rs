pub mod me;
pub mod update_avatar;
