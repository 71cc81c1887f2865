//! Transcript result records.
//!
//! Every resolution ends in a [`TranscriptResult`], successful or not. The
//! user-facing messages are Korean and fixed.

use super::models::TrackListing;
use super::selector::ResolvedSelection;
use crate::error::UndertekstError;
use crate::source::VideoRef;
use serde::{Deserialize, Serialize};

/// Text reported when no track could be selected.
pub const NO_CAPTIONS_MESSAGE: &str = "이 영상에는 지정한 언어의 자막이 없습니다.";

/// Text reported when the video has captions turned off.
pub const DISABLED_MESSAGE: &str = "이 영상은 자막이 비활성화되어 있습니다.";

/// Title used when the catalog listed tracks but no title.
pub const UNTITLED: &str = "제목 없음";

/// Title used when no listing was obtained at all.
pub const ERROR_TITLE: &str = "오류 발생";

/// Kind of text carried by a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleType {
    Uploaded,
    Auto,
    Translated,
    None,
    Error,
}

impl SubtitleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubtitleType::Uploaded => "uploaded",
            SubtitleType::Auto => "auto",
            SubtitleType::Translated => "translated",
            SubtitleType::None => "none",
            SubtitleType::Error => "error",
        }
    }
}

impl std::fmt::Display for SubtitleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one transcript resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptResult {
    pub video_title: String,
    pub subtitle_text: String,
    pub subtitle_type: SubtitleType,
    /// Resolved video ID, empty when the input was not recognized.
    pub video_id: String,
    /// The input exactly as the caller supplied it.
    pub video_url: String,
}

fn title_of(listing: Option<&TrackListing>) -> String {
    match listing {
        Some(listing) => listing.title.clone().unwrap_or_else(|| UNTITLED.to_string()),
        None => ERROR_TITLE.to_string(),
    }
}

/// User-facing text for a failure.
pub fn error_message(err: &UndertekstError) -> String {
    match err {
        UndertekstError::CaptionsDisabled(_) => DISABLED_MESSAGE.to_string(),
        UndertekstError::Decode(diagnostic) => {
            format!("자막 파일을 파싱할 수 없습니다: {}", diagnostic)
        }
        UndertekstError::InvalidReference(input) => {
            format!("유효한 YouTube 영상 URL이 아닙니다: {}", input)
        }
        other => format!("자막 추출 중 오류 발생: {}", other),
    }
}

impl TranscriptResult {
    /// A decoded transcript for the selected track.
    pub fn transcript(
        video: &VideoRef,
        listing: &TrackListing,
        selection: &ResolvedSelection,
        text: String,
    ) -> Self {
        Self {
            video_title: title_of(Some(listing)),
            subtitle_text: text,
            subtitle_type: selection.subtitle_type(),
            video_id: video.id.clone(),
            video_url: video.source_url.clone(),
        }
    }

    /// No track matched and nothing could stand in for one.
    pub fn no_captions(video: &VideoRef, listing: &TrackListing) -> Self {
        Self {
            video_title: title_of(Some(listing)),
            subtitle_text: NO_CAPTIONS_MESSAGE.to_string(),
            subtitle_type: SubtitleType::None,
            video_id: video.id.clone(),
            video_url: video.source_url.clone(),
        }
    }

    /// A failure, with the listing if one was obtained before it happened.
    pub fn failure(video: &VideoRef, listing: Option<&TrackListing>, err: &UndertekstError) -> Self {
        Self {
            video_title: title_of(listing),
            subtitle_text: error_message(err),
            subtitle_type: SubtitleType::Error,
            video_id: video.id.clone(),
            video_url: video.source_url.clone(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.subtitle_type == SubtitleType::Error
    }

    pub fn has_transcript(&self) -> bool {
        !matches!(self.subtitle_type, SubtitleType::None | SubtitleType::Error)
    }
}
