//! Playlist domain types

use super::ids::{PlaylistId, TrackId, UserId};
use super::mood::MoodTag;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A playlist owned by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub title: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub is_public: bool,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Denormalized like-count rollup. Updated incrementally on like/unlike
    /// events; a point-in-time cache, not a live aggregate.
    pub likes_count: i64,

    /// Membership entries (populated when requested)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracks: Option<Vec<PlaylistEntry>>,

    /// Mood tags (populated when requested)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moods: Option<Vec<MoodTag>>,
}

/// Data for creating a new playlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylist {
    pub title: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub is_public: bool,
    pub owner_id: UserId,
}

/// Partial update of playlist metadata (owner-only)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePlaylist {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub is_public: Option<bool>,
}

/// A membership entry: (playlist, track) with ordered inclusion
///
/// Positions are zero-based and unique at insertion time, but not required
/// to stay contiguous after deletions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub track_id: TrackId,
    pub position: i64,
    pub added_by_user_id: Option<UserId>,
    pub added_at: DateTime<Utc>,

    /// Denormalized fields for display
    pub title: String,
    pub artist: String,
    pub cover_url: Option<String>,
}

/// Role held by a collaborator on a playlist
///
/// Closed set; the playlist's actual owner is never stored as a grant row.
/// Grants without an explicit role start as [`Viewer`](Self::Viewer).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollaboratorRole {
    /// Can only view
    #[default]
    Viewer,
    /// Can add/remove/reorder tracks
    Editor,
    /// Same edit rights as an editor, granted in the owner's stead
    #[serde(rename = "owner")]
    OwnerDelegate,
}

impl CollaboratorRole {
    /// Convert role to string for database storage
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Editor => "editor",
            Self::OwnerDelegate => "owner",
        }
    }

    /// Parse role from string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "viewer" => Some(Self::Viewer),
            "editor" => Some(Self::Editor),
            "owner" => Some(Self::OwnerDelegate),
            _ => None,
        }
    }

    /// Whether this role grants track-membership mutation rights
    pub fn can_edit(self) -> bool {
        matches!(self, Self::Editor | Self::OwnerDelegate)
    }
}

/// A collaborator grant: (playlist, user, role)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collaborator {
    pub playlist_id: PlaylistId,
    pub user_id: UserId,
    pub username: String,
    pub role: CollaboratorRole,
    pub added_at: DateTime<Utc>,
}
