//! Mixtape Core
//!
//! Domain types and error handling for Mixtape, a playlist-sharing service.
//!
//! This crate defines:
//! - **Domain Types**: `User`, `Track`, `Playlist`, `MoodTag`, `Like`, etc.
//! - **Error Handling**: unified [`MixtapeError`] and [`Result`] types
//! - **Import Classification**: [`types::ImportSource`] for URL-based track import
//!
//! # Example
//!
//! ```rust
//! use mixtape_core::types::{CollaboratorRole, ImportSource};
//!
//! let role = CollaboratorRole::parse("editor").unwrap();
//! assert!(role.can_edit());
//!
//! let source = ImportSource::detect("https://open.spotify.com/track/abc");
//! assert_eq!(source, ImportSource::Spotify);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{MixtapeError, Result};
pub use types::{
    Collaborator, CollaboratorRole, CreatePlaylist, CreateTrack, CreateUser, ImportSource, Like,
    LikeOutcome, MoodTag, MoodTagId, Playlist, PlaylistEntry, PlaylistId, Track, TrackId,
    UpdatePlaylist, User, UserId,
};
