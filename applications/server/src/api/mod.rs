/// API route modules
pub mod auth;
pub mod health;
pub mod moods;
pub mod playlists;
pub mod tracks;
