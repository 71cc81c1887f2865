//! In-memory track catalog.
//!
//! Useful for testing and for callers that already hold caption data.

use super::TrackCatalog;
use crate::captions::{CaptionTrack, Payload, PayloadLocator, Provenance, TrackListing};
use crate::error::{Result, UndertekstError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Separates a source locator from the translation target.
const TRANSLATION_MARKER: &str = "?tlang=";

/// Listing failure a memory catalog reproduces on every call.
#[derive(Debug, Clone)]
enum ListingFailure {
    Disabled,
    Unreachable(String),
}

/// In-memory catalog built from fixed tracks and payloads.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    title: Option<String>,
    tracks: Vec<CaptionTrack>,
    payloads: HashMap<String, Payload>,
    translations: HashMap<String, Payload>,
    failure: Option<ListingFailure>,
    translation_failure: Option<String>,
    translate_calls: AtomicUsize,
}

fn locator_key(locator: &PayloadLocator) -> String {
    match locator {
        PayloadLocator::LocalFile(path) => path.display().to_string(),
        PayloadLocator::Remote(url) => url.clone(),
    }
}

impl MemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Add a track whose payload is served from memory.
    pub fn with_track(mut self, language_code: &str, provenance: Provenance, payload: Payload) -> Self {
        let track = self.push_track(language_code, provenance);
        self.payloads.insert(locator_key(&track.locator), payload);
        self
    }

    /// Add a track whose payload cannot be retrieved.
    pub fn with_unreachable_track(mut self, language_code: &str, provenance: Provenance) -> Self {
        self.push_track(language_code, provenance);
        self
    }

    /// Allow translating tracks into `target_language`, serving `payload`.
    pub fn with_translation(mut self, target_language: &str, payload: Payload) -> Self {
        self.translations.insert(target_language.to_string(), payload);
        self
    }

    /// Make every listing fail as if captions were disabled.
    pub fn disabled(mut self) -> Self {
        self.failure = Some(ListingFailure::Disabled);
        self
    }

    /// Make every listing fail as if the catalog could not be reached.
    pub fn unreachable(mut self, message: &str) -> Self {
        self.failure = Some(ListingFailure::Unreachable(message.to_string()));
        self
    }

    /// Make every translation request fail with a retrieval error.
    pub fn failing_translations(mut self, message: &str) -> Self {
        self.translation_failure = Some(message.to_string());
        self
    }

    /// Number of translation requests received so far.
    pub fn translate_calls(&self) -> usize {
        self.translate_calls.load(Ordering::SeqCst)
    }

    fn push_track(&mut self, language_code: &str, provenance: Provenance) -> CaptionTrack {
        let url = format!(
            "memory://{}/{}/{}",
            provenance,
            language_code,
            self.tracks.len()
        );
        let track = CaptionTrack::remote(language_code, provenance, &url);
        self.tracks.push(track.clone());
        track
    }
}

#[async_trait]
impl TrackCatalog for MemoryCatalog {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn list_tracks(&self, video_id: &str) -> Result<TrackListing> {
        match &self.failure {
            Some(ListingFailure::Disabled) => {
                Err(UndertekstError::CaptionsDisabled(video_id.to_string()))
            }
            Some(ListingFailure::Unreachable(message)) => {
                Err(UndertekstError::CatalogUnreachable(message.clone()))
            }
            None => Ok(TrackListing {
                title: self.title.clone(),
                tracks: self.tracks.clone(),
            }),
        }
    }

    async fn fetch_payload(&self, _video_id: &str, track: &CaptionTrack) -> Result<Payload> {
        let key = locator_key(&track.locator);
        let stored = match key.split_once(TRANSLATION_MARKER) {
            Some((_, target)) => self.translations.get(target),
            None => self.payloads.get(&key),
        };
        stored
            .cloned()
            .ok_or_else(|| UndertekstError::Retrieval(format!("No payload stored for {}", key)))
    }

    async fn translate(
        &self,
        track: &CaptionTrack,
        target_language: &str,
    ) -> Result<Option<CaptionTrack>> {
        self.translate_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.translation_failure {
            return Err(UndertekstError::Retrieval(message.clone()));
        }

        if !self.translations.contains_key(target_language) {
            return Ok(None);
        }

        let url = format!(
            "{}{}{}",
            locator_key(&track.locator),
            TRANSLATION_MARKER,
            target_language
        );
        let translated = CaptionTrack {
            language_code: target_language.to_string(),
            provenance: track.provenance,
            locator: PayloadLocator::Remote(url),
            format: track.format.clone(),
            name: None,
        };
        Ok(Some(translated))
    }
}
