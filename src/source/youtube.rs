//! YouTube video reference parsing.

use regex::Regex;
use std::sync::OnceLock;

/// Canonical watch URL prefix for a bare video id.
pub const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

fn video_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Matches the common YouTube URL shapes and bare video IDs; the host
        // must start the input
        Regex::new(
            r"(?x)
            ^(?:
                (?:https?://)?
                (?:www\.|m\.|music\.)?
                (?:
                    youtube\.com/watch\?(?:[^&\s]*&)*v=
                    | youtu\.be/
                    | youtube\.com/embed/
                    | youtube\.com/v/
                    | youtube\.com/shorts/
                    | youtube\.com/live/
                    | youtube-nocookie\.com/embed/
                )
                ([a-zA-Z0-9_-]{11})
                (?:[^a-zA-Z0-9_-]|$)
            )
            |
            # Bare video ID (11 characters)
            ^([a-zA-Z0-9_-]{11})$
        ",
        )
        .expect("Invalid regex")
    })
}

/// Extract the 11-character video ID from a YouTube URL or bare ID.
///
/// Returns `None` when the input is not a recognizable video reference.
pub fn extract_id(input: &str) -> Option<String> {
    let caps = video_id_regex().captures(input.trim())?;

    // Try group 1 (URL format) then group 2 (bare ID)
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Build the canonical watch URL for a video ID.
pub fn watch_url(video_id: &str) -> String {
    format!("{}{}", WATCH_URL_PREFIX, video_id)
}
