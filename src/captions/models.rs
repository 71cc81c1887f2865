//! Data models for caption tracks and payloads.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Who produced a caption track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Uploaded by the publisher.
    Authored,
    /// Produced by automatic speech recognition.
    Generated,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Authored => write!(f, "authored"),
            Provenance::Generated => write!(f, "generated"),
        }
    }
}

/// Where a track's payload can be retrieved from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadLocator {
    /// A file already materialized on disk.
    LocalFile(PathBuf),
    /// A URL to download.
    Remote(String),
}

/// Payload encoding of a caption track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptionFormat {
    /// Time-coded JSON with `events[].segs[].utf8`.
    Json3,
    /// Anything else, identified by its extension (vtt, srv3, ttml...).
    Other(String),
}

impl CaptionFormat {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "json3" => CaptionFormat::Json3,
            other => CaptionFormat::Other(other.to_string()),
        }
    }

    pub fn extension(&self) -> &str {
        match self {
            CaptionFormat::Json3 => "json3",
            CaptionFormat::Other(ext) => ext,
        }
    }
}

/// One caption track reported by a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionTrack {
    /// Language code exactly as the catalog reports it (`en`, `en-US`, `ko`...).
    pub language_code: String,
    pub provenance: Provenance,
    pub locator: PayloadLocator,
    pub format: CaptionFormat,
    /// Human-readable track name, when the catalog has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CaptionTrack {
    /// Create a JSON3 track served from a URL.
    pub fn remote(language_code: &str, provenance: Provenance, url: &str) -> Self {
        Self {
            language_code: language_code.to_string(),
            provenance,
            locator: PayloadLocator::Remote(url.to_string()),
            format: CaptionFormat::Json3,
            name: None,
        }
    }
}

/// Everything a catalog knows about one video's captions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackListing {
    /// Video title, if the catalog reported one.
    pub title: Option<String>,
    /// Tracks in the order the catalog reported them.
    pub tracks: Vec<CaptionTrack>,
}

impl TrackListing {
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// A single pre-flattened transcript line, as returned by line-based sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptLine {
    pub text: String,
    /// Start time in seconds.
    #[serde(default)]
    pub start: f64,
    /// Duration in seconds.
    #[serde(default)]
    pub duration: f64,
}

/// Raw caption data handed back by a catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Undecoded bytes, nominally JSON3 possibly preceded by log noise.
    Raw(Vec<u8>),
    /// Already-flattened lines, no segment structure.
    Lines(Vec<TranscriptLine>),
}
