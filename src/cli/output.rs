//! CLI output formatting utilities.

use crate::captions::{CaptionTrack, SubtitleType, TranscriptResult};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a status line to stderr, keeping stdout for the transcript.
    pub fn note(msg: &str) {
        eprintln!("{} {}", style(">>").dim(), style(msg).dim());
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print one caption track.
    pub fn track(track: &CaptionTrack) {
        println!(
            "  {} {:<10} {:<10} {:<6} {}",
            style("*").cyan(),
            style(&track.language_code).bold(),
            track.provenance,
            track.format.extension(),
            style(track.name.as_deref().unwrap_or("")).dim()
        );
    }

    /// One-line summary of a resolution, written to stderr.
    pub fn result_summary(result: &TranscriptResult) {
        let kind = match result.subtitle_type {
            SubtitleType::Uploaded | SubtitleType::Auto | SubtitleType::Translated => {
                style(result.subtitle_type.as_str()).green()
            }
            SubtitleType::None => style(result.subtitle_type.as_str()).yellow(),
            SubtitleType::Error => style(result.subtitle_type.as_str()).red(),
        };
        Self::note(&format!(
            "{} [{}] {} chars",
            result.video_title,
            kind,
            result.subtitle_text.chars().count()
        ));
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}
