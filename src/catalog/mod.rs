//! Track catalog abstraction.
//!
//! A catalog reports which caption tracks exist for a video, hands back a
//! track's payload, and optionally produces machine-translated tracks. The
//! resolver only talks to catalogs through [`TrackCatalog`].

mod memory;
mod ytdlp;

pub use memory::MemoryCatalog;
pub use ytdlp::YtDlpCatalog;

use crate::captions::{CaptionTrack, Payload, TrackListing};
use crate::error::Result;
use async_trait::async_trait;

/// Trait for caption track catalogs.
#[async_trait]
pub trait TrackCatalog: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// List every caption track of a video, in the catalog's own order.
    ///
    /// Fails with `CaptionsDisabled` or `CatalogUnreachable`; a video that
    /// simply has no captions yields an empty listing.
    async fn list_tracks(&self, video_id: &str) -> Result<TrackListing>;

    /// Retrieve the payload of a track previously returned by this catalog.
    async fn fetch_payload(&self, video_id: &str, track: &CaptionTrack) -> Result<Payload>;

    /// Ask for `track` machine-translated into `target_language`.
    ///
    /// `Ok(None)` means the catalog cannot translate this track.
    async fn translate(
        &self,
        track: &CaptionTrack,
        target_language: &str,
    ) -> Result<Option<CaptionTrack>>;
}
