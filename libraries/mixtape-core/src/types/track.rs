//! Track types and the URL import classifier

use super::ids::TrackId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A track in the catalog. Identity is immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub duration_sec: Option<i64>,
    pub spotify_id: Option<String>,
    pub youtube_id: Option<String>,
    pub cover_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new track
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTrack {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub duration_sec: Option<i64>,
    pub spotify_id: Option<String>,
    pub youtube_id: Option<String>,
    pub cover_url: Option<String>,
}

/// Source category detected from an import URL
///
/// The import flow is a stub classifier, not a real API integration: it
/// matches known domain substrings and synthesizes a placeholder track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportSource {
    Spotify,
    Youtube,
    Soundcloud,
    Deezer,
    Generic,
}

impl ImportSource {
    /// Classify a URL by substring match against known domains
    pub fn detect(url: &str) -> Self {
        if url.contains("spotify.com") {
            Self::Spotify
        } else if url.contains("youtube.com") || url.contains("youtu.be") {
            Self::Youtube
        } else if url.contains("soundcloud.com") {
            Self::Soundcloud
        } else if url.contains("deezer.com") {
            Self::Deezer
        } else {
            Self::Generic
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spotify => "spotify",
            Self::Youtube => "youtube",
            Self::Soundcloud => "soundcloud",
            Self::Deezer => "deezer",
            Self::Generic => "generic",
        }
    }

    /// Synthesize a placeholder track for an imported URL
    ///
    /// The raw URL lands in the external-id field of the detected source.
    /// Only Spotify and YouTube are modeled as external-id columns; other
    /// sources leave both null.
    pub fn placeholder_track(self, url: &str) -> CreateTrack {
        CreateTrack {
            title: format!("Imported track from {self}"),
            artist: format!("Unknown ({self})"),
            album: None,
            duration_sec: None,
            spotify_id: (self == Self::Spotify).then(|| url.to_string()),
            youtube_id: (self == Self::Youtube).then(|| url.to_string()),
            cover_url: None,
        }
    }
}

impl fmt::Display for ImportSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
