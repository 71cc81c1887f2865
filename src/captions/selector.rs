//! Track selection.
//!
//! Picks one caption track for a requested language by walking an ordered
//! list of tiers. Each tier scans the whole listing before the next tier
//! is tried, so an authored `ko-KR` track beats a generated `ko` one.

use super::language::{self, ENGLISH};
use super::models::{CaptionTrack, Provenance, TrackListing};
use super::result::SubtitleType;
use crate::cancel::Interrupt;
use crate::catalog::TrackCatalog;
use crate::error::{Result, UndertekstError};
use tracing::{debug, instrument, warn};

/// Selection tiers, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Publisher-uploaded track in a requested variant.
    AuthoredMatch,
    /// Speech-recognition track in a requested variant.
    GeneratedMatch,
    /// An English track machine-translated into the requested language.
    TranslatedFallback,
    /// Whatever track the catalog listed first.
    ArbitraryFallback,
}

/// The order tiers are evaluated in.
pub const TIER_ORDER: [Tier; 4] = [
    Tier::AuthoredMatch,
    Tier::GeneratedMatch,
    Tier::TranslatedFallback,
    Tier::ArbitraryFallback,
];

impl Tier {
    async fn evaluate(
        self,
        catalog: &dyn TrackCatalog,
        listing: &TrackListing,
        requested: &str,
        interrupt: &Interrupt,
    ) -> Result<Option<ResolvedSelection>> {
        match self {
            Tier::AuthoredMatch => Ok(authored_match(listing, requested)),
            Tier::GeneratedMatch => Ok(generated_match(listing, requested)),
            Tier::TranslatedFallback => {
                translated_fallback(catalog, listing, requested, interrupt).await
            }
            Tier::ArbitraryFallback => Ok(arbitrary_fallback(listing)),
        }
    }
}

/// The track chosen for a request and how it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSelection {
    pub track: CaptionTrack,
    /// Language code the track was matched on. For translations this is the
    /// English variant of the source track.
    pub matched_variant: String,
    pub tier: Tier,
}

impl ResolvedSelection {
    /// How the selection is reported to callers.
    pub fn subtitle_type(&self) -> SubtitleType {
        match self.tier {
            Tier::AuthoredMatch => SubtitleType::Uploaded,
            Tier::GeneratedMatch => SubtitleType::Auto,
            Tier::TranslatedFallback => SubtitleType::Translated,
            Tier::ArbitraryFallback => match self.track.provenance {
                Provenance::Authored => SubtitleType::Uploaded,
                Provenance::Generated => SubtitleType::Auto,
            },
        }
    }
}

/// First track matching any variant, variants tried in order.
fn find_variant<'a>(
    listing: &'a TrackListing,
    variants: &[String],
    provenance: Provenance,
) -> Option<(&'a CaptionTrack, &'a str)> {
    variants.iter().find_map(|variant| {
        listing
            .tracks
            .iter()
            .find(|t| t.provenance == provenance && t.language_code == *variant)
            .map(|t| (t, t.language_code.as_str()))
    })
}

fn exact_match(
    listing: &TrackListing,
    requested: &str,
    provenance: Provenance,
    tier: Tier,
) -> Option<ResolvedSelection> {
    let variants = language::expand(requested);
    find_variant(listing, &variants, provenance).map(|(track, variant)| ResolvedSelection {
        track: track.clone(),
        matched_variant: variant.to_string(),
        tier,
    })
}

/// Authored track in any variant of `requested`.
pub fn authored_match(listing: &TrackListing, requested: &str) -> Option<ResolvedSelection> {
    exact_match(listing, requested, Provenance::Authored, Tier::AuthoredMatch)
}

/// Generated track in any variant of `requested`.
pub fn generated_match(listing: &TrackListing, requested: &str) -> Option<ResolvedSelection> {
    exact_match(listing, requested, Provenance::Generated, Tier::GeneratedMatch)
}

/// English track translated into `requested`.
///
/// Skipped when English itself was requested. A catalog that cannot
/// translate, or fails to, lets the chain continue; only cancellation and
/// deadline errors are returned.
pub async fn translated_fallback(
    catalog: &dyn TrackCatalog,
    listing: &TrackListing,
    requested: &str,
    interrupt: &Interrupt,
) -> Result<Option<ResolvedSelection>> {
    if requested == ENGLISH {
        return Ok(None);
    }

    let variants = language::expand(ENGLISH);
    let source = find_variant(listing, &variants, Provenance::Authored)
        .or_else(|| find_variant(listing, &variants, Provenance::Generated));
    let Some((source, variant)) = source else {
        debug!("No English track to translate from");
        return Ok(None);
    };

    match interrupt.guard(catalog.translate(source, requested)).await {
        Ok(Some(track)) => Ok(Some(ResolvedSelection {
            track,
            matched_variant: variant.to_string(),
            tier: Tier::TranslatedFallback,
        })),
        Ok(None) => {
            warn!("{} cannot translate {} into {}", catalog.name(), variant, requested);
            Ok(None)
        }
        Err(e @ (UndertekstError::Cancelled | UndertekstError::TimedOut(_))) => Err(e),
        Err(e) => {
            warn!("Translation into {} failed: {}", requested, e);
            Ok(None)
        }
    }
}

/// First listed track, whatever its language.
pub fn arbitrary_fallback(listing: &TrackListing) -> Option<ResolvedSelection> {
    listing.tracks.first().map(|track| ResolvedSelection {
        track: track.clone(),
        matched_variant: track.language_code.clone(),
        tier: Tier::ArbitraryFallback,
    })
}

/// Walk [`TIER_ORDER`] and return the first selection.
#[instrument(
    skip(catalog, listing, interrupt),
    fields(catalog = catalog.name(), tracks = listing.tracks.len())
)]
pub async fn select(
    catalog: &dyn TrackCatalog,
    listing: &TrackListing,
    requested: &str,
    interrupt: &Interrupt,
) -> Result<Option<ResolvedSelection>> {
    if listing.is_empty() {
        return Ok(None);
    }

    for tier in TIER_ORDER {
        if let Some(selection) = tier.evaluate(catalog, listing, requested, interrupt).await? {
            debug!(
                "Selected {} track {} via {:?}",
                selection.track.provenance, selection.track.language_code, tier
            );
            return Ok(Some(selection));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captions::Payload;
    use crate::catalog::MemoryCatalog;

    fn raw() -> Payload {
        Payload::Raw(b"{}".to_vec())
    }

    async fn listing_of(catalog: &MemoryCatalog) -> TrackListing {
        catalog.list_tracks("dQw4w9WgXcQ").await.unwrap()
    }

    #[tokio::test]
    async fn test_authored_beats_generated() {
        let catalog = MemoryCatalog::new()
            .with_track("ko", Provenance::Generated, raw())
            .with_track("ko", Provenance::Authored, raw());
        let listing = listing_of(&catalog).await;

        let selection = select(&catalog, &listing, "ko", &Interrupt::none()).await.unwrap().unwrap();
        assert_eq!(selection.tier, Tier::AuthoredMatch);
        assert_eq!(selection.track.provenance, Provenance::Authored);
        assert_eq!(selection.subtitle_type(), SubtitleType::Uploaded);
    }

    #[tokio::test]
    async fn test_tier_major_over_variants() {
        // Authored regional variant wins over generated base code
        let catalog = MemoryCatalog::new()
            .with_track("ko", Provenance::Generated, raw())
            .with_track("ko-KR", Provenance::Authored, raw());
        let listing = listing_of(&catalog).await;

        let selection = authored_match(&listing, "ko").unwrap();
        assert_eq!(selection.matched_variant, "ko-KR");

        let selection = select(&catalog, &listing, "ko", &Interrupt::none()).await.unwrap().unwrap();
        assert_eq!(selection.tier, Tier::AuthoredMatch);
        assert_eq!(selection.track.language_code, "ko-KR");
    }

    #[tokio::test]
    async fn test_variant_order_within_tier() {
        let catalog = MemoryCatalog::new()
            .with_track("eng", Provenance::Authored, raw())
            .with_track("en-GB", Provenance::Authored, raw());
        let listing = listing_of(&catalog).await;

        let selection = authored_match(&listing, "en").unwrap();
        assert_eq!(selection.matched_variant, "en-GB");
    }

    #[tokio::test]
    async fn test_generated_match() {
        let catalog = MemoryCatalog::new()
            .with_track("fr", Provenance::Authored, raw())
            .with_track("ja-JP", Provenance::Generated, raw());
        let listing = listing_of(&catalog).await;

        assert!(authored_match(&listing, "ja").is_none());
        let selection = generated_match(&listing, "ja").unwrap();
        assert_eq!(selection.tier, Tier::GeneratedMatch);
        assert_eq!(selection.subtitle_type(), SubtitleType::Auto);
    }

    #[tokio::test]
    async fn test_generated_match_skips_translation() {
        let catalog = MemoryCatalog::new()
            .with_track("en", Provenance::Authored, raw())
            .with_track("ja", Provenance::Generated, raw())
            .with_translation("ja", raw());
        let listing = listing_of(&catalog).await;

        let selection = select(&catalog, &listing, "ja", &Interrupt::none()).await.unwrap().unwrap();
        assert_eq!(selection.tier, Tier::GeneratedMatch);
        assert_eq!(selection.subtitle_type(), SubtitleType::Auto);
        assert_eq!(catalog.translate_calls(), 0);
    }

    #[tokio::test]
    async fn test_translation_prefers_authored_english() {
        let catalog = MemoryCatalog::new()
            .with_track("en", Provenance::Generated, raw())
            .with_track("en-US", Provenance::Authored, raw())
            .with_translation("ko", raw());
        let listing = listing_of(&catalog).await;

        let selection = translated_fallback(&catalog, &listing, "ko", &Interrupt::none())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(selection.tier, Tier::TranslatedFallback);
        assert_eq!(selection.matched_variant, "en-US");
        assert_eq!(selection.track.language_code, "ko");
        assert_eq!(selection.track.provenance, Provenance::Authored);
        assert_eq!(selection.subtitle_type(), SubtitleType::Translated);
    }

    #[tokio::test]
    async fn test_english_request_never_translates() {
        let catalog = MemoryCatalog::new()
            .with_track("de", Provenance::Authored, raw())
            .with_translation("en", raw());
        let listing = listing_of(&catalog).await;

        let selection = select(&catalog, &listing, "en", &Interrupt::none()).await.unwrap().unwrap();
        assert_eq!(selection.tier, Tier::ArbitraryFallback);
        assert_eq!(catalog.translate_calls(), 0);
    }

    #[tokio::test]
    async fn test_untranslatable_falls_through() {
        let catalog = MemoryCatalog::new()
            .with_track("de", Provenance::Generated, raw())
            .with_track("en", Provenance::Authored, raw());
        let listing = listing_of(&catalog).await;

        let selection = select(&catalog, &listing, "ko", &Interrupt::none()).await.unwrap().unwrap();
        assert_eq!(catalog.translate_calls(), 1);
        assert_eq!(selection.tier, Tier::ArbitraryFallback);
        assert_eq!(selection.track.language_code, "de");
        assert_eq!(selection.subtitle_type(), SubtitleType::Auto);
    }

    #[tokio::test]
    async fn test_arbitrary_fallback_keeps_provenance() {
        let catalog = MemoryCatalog::new().with_track("es", Provenance::Authored, raw());
        let listing = listing_of(&catalog).await;

        let selection = arbitrary_fallback(&listing).unwrap();
        assert_eq!(selection.matched_variant, "es");
        assert_eq!(selection.subtitle_type(), SubtitleType::Uploaded);
    }

    #[tokio::test]
    async fn test_empty_listing_selects_nothing() {
        let catalog = MemoryCatalog::new().with_translation("ko", raw());
        let listing = listing_of(&catalog).await;

        assert!(select(&catalog, &listing, "ko", &Interrupt::none()).await.unwrap().is_none());
        assert!(arbitrary_fallback(&listing).is_none());
        assert_eq!(catalog.translate_calls(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_translation_ends_chain() {
        let catalog = MemoryCatalog::new()
            .with_track("en", Provenance::Authored, raw())
            .with_translation("ko", raw());
        let listing = listing_of(&catalog).await;

        let (handle, interrupt) = crate::cancel::CancelHandle::new();
        handle.cancel();
        let err = select(&catalog, &listing, "ko", &interrupt).await.unwrap_err();
        assert!(matches!(err, UndertekstError::Cancelled));
    }

    #[test]
    fn test_tier_order() {
        assert_eq!(
            TIER_ORDER,
            [
                Tier::AuthoredMatch,
                Tier::GeneratedMatch,
                Tier::TranslatedFallback,
                Tier::ArbitraryFallback
            ]
        );
    }
}
