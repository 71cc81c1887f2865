//! Pre-flight checks before resolving captions.
//!
//! Validates that required tools are available before starting operations
//! that would otherwise fail on their first catalog call.

use crate::config::Settings;
use crate::error::{Result, UndertekstError};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Fetching or listing captions needs yt-dlp.
    Fetch,
    /// Servers start without external tools and report failures per request.
    Serve,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Fetch => check_tool(&settings.captions.ytdlp_path),
        Operation::Serve => Ok(()),
    }
}

/// Check if an external tool is available.
pub fn check_tool(name: &str) -> Result<()> {
    match Command::new(name).arg("--version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(UndertekstError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(UndertekstError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(UndertekstError::ToolNotFound(format!("{}: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_has_no_requirements() {
        assert!(check(Operation::Serve, &Settings::default()).is_ok());
    }

    #[test]
    fn test_missing_tool() {
        let mut settings = Settings::default();
        settings.captions.ytdlp_path = "/nonexistent/yt-dlp".to_string();

        let err = check(Operation::Fetch, &settings).unwrap_err();
        assert!(matches!(err, UndertekstError::ToolNotFound(name) if name == "/nonexistent/yt-dlp"));
    }
}
