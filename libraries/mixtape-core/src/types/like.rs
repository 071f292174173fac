//! Like types

use super::ids::{TrackId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A like: (user, track). A user likes a track at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub user_id: UserId,
    pub track_id: TrackId,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a like request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeOutcome {
    /// The like was created and playlist counts were incremented
    Liked,
    /// The like already existed; nothing changed
    #[serde(rename = "already")]
    AlreadyLiked,
}
