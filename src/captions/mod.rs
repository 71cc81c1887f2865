//! Caption tracks, selection and decoding.

pub mod decoder;
pub mod language;
mod models;
pub mod result;
pub mod selector;

pub use decoder::{decode, decode_lines, decode_payload};
pub use models::{
    CaptionFormat, CaptionTrack, Payload, PayloadLocator, Provenance, TrackListing,
    TranscriptLine,
};
pub use result::{SubtitleType, TranscriptResult};
pub use selector::{select, ResolvedSelection, Tier, TIER_ORDER};
