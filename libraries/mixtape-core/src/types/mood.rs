//! Mood tag types

use super::ids::MoodTagId;
use serde::{Deserialize, Serialize};

/// A named mood tag, many-to-many with playlists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodTag {
    pub id: MoodTagId,
    pub name: String,
}
