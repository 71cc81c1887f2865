//! Transcript resolution.
//!
//! Wires reference extraction, track selection, payload retrieval and
//! decoding into a single call. Whatever happens along the way, the caller
//! gets a [`TranscriptResult`] back.

use crate::cancel::Interrupt;
use crate::captions::{decode_payload, select, TrackListing, TranscriptResult};
use crate::catalog::{TrackCatalog, YtDlpCatalog};
use crate::config::Settings;
use crate::error::{Result, UndertekstError};
use crate::source::VideoRef;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Resolves video references into transcripts.
pub struct TranscriptResolver {
    catalog: Arc<dyn TrackCatalog>,
    default_language: String,
    timeout: Option<Duration>,
}

impl TranscriptResolver {
    /// Create a resolver backed by yt-dlp.
    pub fn new(settings: &Settings) -> Result<Self> {
        let catalog: Arc<dyn TrackCatalog> = Arc::new(YtDlpCatalog::new(settings)?);
        Ok(Self::with_catalog(catalog, &settings.captions.default_language)
            .with_timeout(settings.captions.timeout()))
    }

    /// Create a resolver with a custom catalog.
    pub fn with_catalog(catalog: Arc<dyn TrackCatalog>, default_language: &str) -> Self {
        Self {
            catalog,
            default_language: default_language.to_string(),
            timeout: None,
        }
    }

    /// Apply a deadline to every [`resolve`](Self::resolve) call.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn catalog(&self) -> Arc<dyn TrackCatalog> {
        self.catalog.clone()
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Resolve a transcript with the configured deadline.
    pub async fn resolve(&self, url: &str, language: Option<&str>) -> TranscriptResult {
        let interrupt = Interrupt::none().with_optional_timeout(self.timeout);
        self.resolve_with(url, language, &interrupt).await
    }

    /// Resolve a transcript, giving up when `interrupt` fires.
    ///
    /// Never fails: errors become results with `subtitle_type` `error`.
    #[instrument(skip(self, interrupt), fields(catalog = self.catalog.name()))]
    pub async fn resolve_with(
        &self,
        url: &str,
        language: Option<&str>,
        interrupt: &Interrupt,
    ) -> TranscriptResult {
        let language = self.language_or_default(language);
        let video = VideoRef::resolve(url);

        if !video.is_resolved() {
            let err = UndertekstError::InvalidReference(url.to_string());
            warn!("{}", err);
            return TranscriptResult::failure(&video, None, &err);
        }

        let listing = match interrupt.guard(self.catalog.list_tracks(&video.id)).await {
            Ok(listing) => listing,
            Err(e) => {
                warn!("Listing captions for {} failed: {}", video.id, e);
                return TranscriptResult::failure(&video, None, &e);
            }
        };

        match self.transcribe(&video, &listing, language, interrupt).await {
            Ok(result) => {
                info!(
                    "Resolved {} as {} ({} chars)",
                    video.id,
                    result.subtitle_type,
                    result.subtitle_text.chars().count()
                );
                result
            }
            Err(e) => {
                warn!("Resolving captions for {} failed: {}", video.id, e);
                TranscriptResult::failure(&video, Some(&listing), &e)
            }
        }
    }

    /// List the caption tracks behind a reference.
    pub async fn list(&self, url: &str, interrupt: &Interrupt) -> Result<(VideoRef, TrackListing)> {
        let video = VideoRef::resolve(url);
        if !video.is_resolved() {
            return Err(UndertekstError::InvalidReference(url.to_string()));
        }
        let listing = interrupt.guard(self.catalog.list_tracks(&video.id)).await?;
        Ok((video, listing))
    }

    fn language_or_default<'a>(&'a self, language: Option<&'a str>) -> &'a str {
        language
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(&self.default_language)
    }

    async fn transcribe(
        &self,
        video: &VideoRef,
        listing: &TrackListing,
        language: &str,
        interrupt: &Interrupt,
    ) -> Result<TranscriptResult> {
        let catalog = self.catalog.as_ref();

        let Some(selection) = select(catalog, listing, language, interrupt).await? else {
            info!("No {} captions for {}", language, video.id);
            return Ok(TranscriptResult::no_captions(video, listing));
        };

        let payload = interrupt
            .guard(catalog.fetch_payload(&video.id, &selection.track))
            .await?;
        let text = decode_payload(&payload)?;

        Ok(TranscriptResult::transcript(video, listing, &selection, text))
    }
}
