//! Undertekst - YouTube caption extraction
//!
//! Resolves the best available caption track of a video and flattens it into
//! continuous text.
//!
//! The name "Undertekst" is the Norwegian word for "subtitle."
//!
//! # Overview
//!
//! Given a video URL and a language code, Undertekst:
//! - extracts the video ID from the URL
//! - lists the caption tracks a catalog (yt-dlp by default) knows about
//! - selects one track: uploaded, then auto-generated, then an English track
//!   machine-translated into the requested language, then whatever exists
//! - downloads and decodes the JSON3 payload into plain text
//!
//! Every call ends in a [`captions::TranscriptResult`], including failures.
//!
//! # Architecture
//!
//! - `source` - Video reference parsing
//! - `captions` - Track models, language variants, selection, decoding, results
//! - `catalog` - Track catalog abstraction (yt-dlp, in-memory)
//! - `payload` - Payload retrieval over HTTP or from disk
//! - `resolver` - Pipeline coordination
//! - `cancel` - Cancellation and deadlines
//! - `mcp` - MCP stdio server
//! - `config` - Configuration management
//!
//! # Example
//!
//! ```rust,no_run
//! use undertekst::config::Settings;
//! use undertekst::resolver::TranscriptResolver;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let resolver = TranscriptResolver::new(&settings)?;
//!
//!     let result = resolver.resolve("https://youtu.be/dQw4w9WgXcQ", Some("en")).await;
//!     println!("[{}] {}", result.subtitle_type, result.subtitle_text);
//!
//!     Ok(())
//! }
//! ```

pub mod cancel;
pub mod captions;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod mcp;
pub mod payload;
pub mod resolver;
pub mod source;

pub use error::{Result, UndertekstError};
