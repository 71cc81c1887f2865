//! Video reference resolution.
//!
//! Turns an arbitrary user input (watch URL, short link, bare ID) into a
//! [`VideoRef`] before any catalog lookup happens.

mod youtube;

pub use youtube::{extract_id, watch_url, WATCH_URL_PREFIX};

use serde::{Deserialize, Serialize};

/// A resolved video reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRef {
    /// 11-character video ID, empty when the input was not recognized.
    pub id: String,
    /// The input exactly as the caller supplied it.
    pub source_url: String,
}

impl VideoRef {
    /// Resolve an input into a reference. Never fails; check [`VideoRef::is_resolved`].
    pub fn resolve(input: &str) -> Self {
        Self {
            id: extract_id(input).unwrap_or_default(),
            source_url: input.to_string(),
        }
    }

    /// Whether an ID was extracted from the input.
    pub fn is_resolved(&self) -> bool {
        !self.id.is_empty()
    }

    /// Canonical watch URL for the resolved ID.
    pub fn watch_url(&self) -> String {
        watch_url(&self.id)
    }
}
