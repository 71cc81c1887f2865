//! Segment payload decoding.
//!
//! Flattens a JSON3 caption payload into one continuous string. Every
//! fragment is followed by a single space and nothing is trimmed, so the
//! same payload always decodes to byte-identical text.

use super::models::{Payload, TranscriptLine};
use crate::error::{Result, UndertekstError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Json3Document {
    #[serde(default)]
    events: Option<Vec<Json3Event>>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    #[serde(default)]
    segs: Option<Vec<Json3Segment>>,
}

#[derive(Debug, Deserialize)]
struct Json3Segment {
    #[serde(default)]
    utf8: Option<String>,
}

/// Text fragments of one caption event, in payload order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentEvent {
    pub fragments: Vec<String>,
}

/// Drop anything ahead of the first `{` unless the text already starts with one.
fn strip_leading_noise(text: &str) -> &str {
    if text.trim_start().starts_with('{') {
        return text;
    }
    match text.find('{') {
        Some(start) => &text[start..],
        None => text,
    }
}

/// Parse a raw JSON3 payload into its events.
pub fn parse_events(raw: &[u8]) -> Result<Vec<SegmentEvent>> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| UndertekstError::Decode(format!("payload is not valid UTF-8: {}", e)))?;
    let json = strip_leading_noise(text);

    let document: Json3Document =
        serde_json::from_str(json).map_err(|e| UndertekstError::Decode(e.to_string()))?;

    Ok(document
        .events
        .unwrap_or_default()
        .into_iter()
        .map(|event| SegmentEvent {
            fragments: event
                .segs
                .unwrap_or_default()
                .into_iter()
                .filter_map(|seg| seg.utf8)
                .collect(),
        })
        .collect())
}

/// Concatenate every fragment followed by one space.
pub fn flatten(events: &[SegmentEvent]) -> String {
    let mut text = String::new();
    for fragment in events.iter().flat_map(|e| e.fragments.iter()) {
        text.push_str(fragment);
        text.push(' ');
    }
    text
}

/// Decode a raw JSON3 payload into flattened text.
pub fn decode(raw: &[u8]) -> Result<String> {
    parse_events(raw).map(|events| flatten(&events))
}

/// Join pre-flattened lines with single spaces.
pub fn decode_lines(lines: &[TranscriptLine]) -> String {
    lines
        .iter()
        .map(|line| line.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decode whichever payload shape a catalog returned.
pub fn decode_payload(payload: &Payload) -> Result<String> {
    match payload {
        Payload::Raw(bytes) => decode(bytes),
        Payload::Lines(lines) => Ok(decode_lines(lines)),
    }
}
