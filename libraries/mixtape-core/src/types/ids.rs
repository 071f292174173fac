//! ID types for Mixtape entities
//!
//! All identifiers are SQLite rowids.

/// User identifier
pub type UserId = i64;

/// Track identifier
pub type TrackId = i64;

/// Playlist identifier
pub type PlaylistId = i64;

/// Mood tag identifier
pub type MoodTagId = i64;
