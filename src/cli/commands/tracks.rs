//! Tracks command implementation.

use crate::cancel::Interrupt;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::resolver::TranscriptResolver;
use anyhow::Result;

/// List the caption tracks a catalog reports for a video.
pub async fn run_tracks(url: &str, settings: Settings) -> Result<()> {
    preflight::check(Operation::Fetch, &settings)?;

    let resolver = TranscriptResolver::new(&settings)?;
    let interrupt = Interrupt::none().with_optional_timeout(settings.captions.timeout());

    let spinner = Output::spinner("Listing caption tracks...");
    let listed = resolver.list(url, &interrupt).await;
    spinner.finish_and_clear();
    let (video, listing) = listed?;

    Output::header(listing.title.as_deref().unwrap_or(&video.id));
    Output::kv("Video ID", &video.id);
    Output::kv("Catalog", resolver.catalog().name());
    println!();

    if listing.is_empty() {
        Output::warning("No caption tracks available.");
        return Ok(());
    }

    for track in &listing.tracks {
        Output::track(track);
    }

    println!();
    Output::info(&format!("{} track(s)", listing.tracks.len()));

    Ok(())
}
