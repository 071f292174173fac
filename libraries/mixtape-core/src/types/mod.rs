//! Domain types for Mixtape

mod ids;
mod like;
mod mood;
mod playlist;
mod track;
mod user;

pub use ids::{MoodTagId, PlaylistId, TrackId, UserId};
pub use like::{Like, LikeOutcome};
pub use mood::MoodTag;
pub use playlist::{
    Collaborator, CollaboratorRole, CreatePlaylist, Playlist, PlaylistEntry, UpdatePlaylist,
};
pub use track::{CreateTrack, ImportSource, Track};
pub use user::{CreateUser, User};
