//! MCP tool definitions for Undertekst.

use super::protocol::Tool;
use serde_json::json;

/// Name of the transcript tool.
pub const ANALYZE_SUBTITLE: &str = "analyze_youtube_subtitle";

/// Get all available tools.
pub fn get_tools(default_language: &str) -> Vec<Tool> {
    vec![Tool {
        name: ANALYZE_SUBTITLE.to_string(),
        description: "Extract the transcript of a YouTube video. \
            Prefers publisher-uploaded captions, then auto-generated ones, then an \
            English track machine-translated into the requested language. Returns a \
            JSON record with video_title, subtitle_text, subtitle_type \
            (uploaded, auto, translated, none, error), video_id and video_url."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "youtube_url": {
                    "type": "string",
                    "description": "YouTube video URL or 11-character video ID"
                },
                "language": {
                    "type": "string",
                    "description": "Caption language code, e.g. ko, en, ja, zh",
                    "default": default_language
                }
            },
            "required": ["youtube_url"]
        }),
    }]
}
