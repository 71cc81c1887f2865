//! Fetch command implementation.

use crate::cancel::CancelHandle;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::resolver::TranscriptResolver;
use anyhow::Result;
use std::time::Duration;
use tracing::debug;

/// Run the fetch command.
pub async fn run_fetch(
    url: &str,
    language: Option<&str>,
    json: bool,
    output: Option<String>,
    timeout: Option<u64>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Fetch, &settings) {
        Output::error(&format!("{}", e));
        Output::note("Run 'undertekst doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let resolver = TranscriptResolver::new(&settings)?;

    let timeout = timeout
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .or_else(|| settings.captions.timeout());
    let (handle, interrupt) = CancelHandle::new();
    let interrupt = interrupt.with_optional_timeout(timeout);

    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Ctrl-C received, cancelling");
            handle.cancel();
        }
    });

    let spinner = Output::spinner(&format!("Resolving captions for {}", url));
    let result = resolver.resolve_with(url, language, &interrupt).await;
    spinner.finish_and_clear();
    ctrl_c.abort();

    let rendered = if json {
        serde_json::to_string_pretty(&result)?
    } else {
        result.subtitle_text.clone()
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &rendered)?;
            Output::result_summary(&result);
            Output::success(&format!("Saved to {}", path));
        }
        None => {
            println!("{}", rendered);
            Output::result_summary(&result);
        }
    }

    if result.is_error() {
        anyhow::bail!("Caption extraction failed for {}", url);
    }

    Ok(())
}
