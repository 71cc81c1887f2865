//! yt-dlp backed track catalog.
//!
//! Listing uses `yt-dlp --dump-json` and reads the `subtitles` and
//! `automatic_captions` maps. Payloads are either downloaded straight from
//! the reported URL or written to a scratch directory by yt-dlp itself,
//! depending on [`FetchMode`].

use super::TrackCatalog;
use crate::captions::{
    CaptionFormat, CaptionTrack, Payload, PayloadLocator, Provenance, TrackListing,
};
use crate::config::{FetchMode, Settings};
use crate::error::{Result, UndertekstError};
use crate::payload::{find_caption_file, scratch_dir, PayloadFetcher};
use crate::source::watch_url;
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::{debug, info, instrument};
use url::Url;

/// Pseudo-language yt-dlp reports for chat replays.
const LIVE_CHAT: &str = "live_chat";

/// Query parameter selecting a machine translation target.
const TRANSLATION_PARAM: &str = "tlang";

/// Caption catalog driven by the yt-dlp binary.
pub struct YtDlpCatalog {
    binary: String,
    fetch_mode: FetchMode,
    temp_dir: PathBuf,
    fetcher: PayloadFetcher,
}

impl YtDlpCatalog {
    /// Create a catalog from settings.
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            binary: settings.captions.ytdlp_path.clone(),
            fetch_mode: settings.captions.fetch_mode,
            temp_dir: settings.temp_dir(),
            fetcher: PayloadFetcher::with_config(&settings.http)?,
        })
    }

    async fn run(&self, args: &[&str]) -> Result<Output> {
        debug!("Running {} {}", self.binary, args.join(" "));

        Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    UndertekstError::ToolNotFound("yt-dlp".to_string())
                } else {
                    UndertekstError::CatalogUnreachable(format!("Failed to run yt-dlp: {}", e))
                }
            })
    }

    /// Let yt-dlp write the track to disk, then read it back.
    #[instrument(skip(self, track), fields(language = %track.language_code))]
    async fn materialize(&self, video_id: &str, track: &CaptionTrack) -> Result<Vec<u8>> {
        let dir = scratch_dir(&self.temp_dir)?;
        let template = dir
            .path()
            .join("%(id)s.%(ext)s")
            .to_string_lossy()
            .into_owned();
        let url = watch_url(video_id);

        // Machine translations only ever appear among the automatic captions
        let write_flag = match (track.provenance, translation_target(track)) {
            (Provenance::Authored, None) => "--write-subs",
            _ => "--write-auto-subs",
        };

        let output = self
            .run(&[
                "--skip-download",
                "--no-playlist",
                "--no-warnings",
                write_flag,
                "--sub-langs",
                track.language_code.as_str(),
                "--sub-format",
                "json3",
                "-o",
                template.as_str(),
                url.as_str(),
            ])
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(UndertekstError::Retrieval(format!(
                "yt-dlp failed: {}",
                stderr.trim()
            )));
        }

        let path = find_caption_file(dir.path(), video_id, &track.language_code)?;
        info!("Materialized {}", path.display());
        self.fetcher.fetch(&PayloadLocator::LocalFile(path)).await
    }
}

#[async_trait]
impl TrackCatalog for YtDlpCatalog {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    #[instrument(skip(self))]
    async fn list_tracks(&self, video_id: &str) -> Result<TrackListing> {
        let url = watch_url(video_id);
        let output = self
            .run(&[
                "--dump-json",
                "--skip-download",
                "--no-playlist",
                "--no-warnings",
                url.as_str(),
            ])
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_failure(video_id, &stderr));
        }

        let json: Value = serde_json::from_slice(&output.stdout).map_err(|e| {
            UndertekstError::CatalogUnreachable(format!("Failed to parse yt-dlp output: {}", e))
        })?;

        let listing = parse_listing(&json);
        debug!("Catalog reported {} tracks", listing.tracks.len());
        Ok(listing)
    }

    async fn fetch_payload(&self, video_id: &str, track: &CaptionTrack) -> Result<Payload> {
        let bytes = match (&track.locator, self.fetch_mode) {
            (PayloadLocator::Remote(_), FetchMode::Materialize) => {
                self.materialize(video_id, track).await?
            }
            (locator, _) => self.fetcher.fetch(locator).await?,
        };
        Ok(Payload::Raw(bytes))
    }

    async fn translate(
        &self,
        track: &CaptionTrack,
        target_language: &str,
    ) -> Result<Option<CaptionTrack>> {
        Ok(translated_track(track, target_language))
    }
}

/// Map a failed listing run onto a catalog error.
fn classify_failure(video_id: &str, stderr: &str) -> UndertekstError {
    let lower = stderr.to_lowercase();
    let disabled = ["subtitles are disabled", "captions are disabled", "transcripts are disabled"]
        .iter()
        .any(|needle| lower.contains(needle));

    if disabled {
        UndertekstError::CaptionsDisabled(video_id.to_string())
    } else {
        UndertekstError::CatalogUnreachable(stderr.trim().to_string())
    }
}

/// Build a listing from `--dump-json` output.
fn parse_listing(json: &Value) -> TrackListing {
    let mut tracks = Vec::new();
    collect_tracks(&json["subtitles"], Provenance::Authored, &mut tracks);
    collect_tracks(&json["automatic_captions"], Provenance::Generated, &mut tracks);

    TrackListing {
        title: json["title"].as_str().map(|s| s.to_string()),
        tracks,
    }
}

fn collect_tracks(section: &Value, provenance: Provenance, tracks: &mut Vec<CaptionTrack>) {
    let Some(languages) = section.as_object() else {
        return;
    };

    for (language_code, entries) in languages {
        if language_code == LIVE_CHAT {
            continue;
        }
        let Some(entries) = entries.as_array() else {
            continue;
        };
        if let Some(track) = pick_entry(language_code, provenance, entries) {
            // Pre-translated automatic captions are reached through `translate`
            if provenance == Provenance::Generated && translation_target(&track).is_some() {
                continue;
            }
            tracks.push(track);
        }
    }
}

/// The json3 rendition of a language. Languages without one are not listed.
fn pick_entry(language_code: &str, provenance: Provenance, entries: &[Value]) -> Option<CaptionTrack> {
    let entry = entries.iter().find(|e| {
        CaptionFormat::from_extension(e["ext"].as_str().unwrap_or_default()) == CaptionFormat::Json3
    })?;

    let url = entry["url"].as_str()?;

    Some(CaptionTrack {
        language_code: language_code.to_string(),
        provenance,
        locator: PayloadLocator::Remote(url.to_string()),
        format: CaptionFormat::Json3,
        name: entry["name"].as_str().map(|s| s.to_string()),
    })
}

fn translation_target(track: &CaptionTrack) -> Option<String> {
    let PayloadLocator::Remote(url) = &track.locator else {
        return None;
    };
    let url = Url::parse(url).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == TRANSLATION_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// Point a remote json3 track at its machine translation.
fn translated_track(track: &CaptionTrack, target_language: &str) -> Option<CaptionTrack> {
    if track.format != CaptionFormat::Json3 {
        return None;
    }
    let PayloadLocator::Remote(url) = &track.locator else {
        return None;
    };
    let mut url = Url::parse(url).ok()?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != TRANSLATION_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(TRANSLATION_PARAM, target_language);

    Some(CaptionTrack {
        language_code: target_language.to_string(),
        provenance: track.provenance,
        locator: PayloadLocator::Remote(url.to_string()),
        format: CaptionFormat::Json3,
        name: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TIMEDTEXT: &str = "https://www.youtube.com/api/timedtext?v=dQw4w9WgXcQ";

    fn sample() -> Value {
        json!({
            "id": "dQw4w9WgXcQ",
            "title": "Never Gonna Give You Up",
            "subtitles": {
                "ko": [
                    {"ext": "vtt", "url": format!("{TIMEDTEXT}&lang=ko&fmt=vtt"), "name": "Korean"},
                    {"ext": "json3", "url": format!("{TIMEDTEXT}&lang=ko&fmt=json3"), "name": "Korean"}
                ],
                "live_chat": [
                    {"ext": "json", "url": "https://www.youtube.com/live_chat_replay"}
                ],
                "en-GB": [
                    {"ext": "srv3", "url": format!("{TIMEDTEXT}&lang=en-GB&fmt=srv3")}
                ]
            },
            "automatic_captions": {
                "en": [
                    {"ext": "json3", "url": format!("{TIMEDTEXT}&lang=en&kind=asr&fmt=json3")}
                ],
                "fr": [
                    {"ext": "json3", "url": format!("{TIMEDTEXT}&lang=en&kind=asr&fmt=json3&tlang=fr")}
                ]
            }
        })
    }

    #[test]
    fn test_parse_listing_order_and_provenance() {
        let listing = parse_listing(&sample());
        assert_eq!(listing.title.as_deref(), Some("Never Gonna Give You Up"));

        let summary: Vec<_> = listing
            .tracks
            .iter()
            .map(|t| (t.language_code.as_str(), t.provenance))
            .collect();
        assert_eq!(
            summary,
            vec![("ko", Provenance::Authored), ("en", Provenance::Generated)]
        );
    }

    #[test]
    fn test_parse_listing_prefers_json3() {
        let listing = parse_listing(&sample());
        let ko = &listing.tracks[0];
        assert_eq!(ko.format, CaptionFormat::Json3);
        assert_eq!(ko.name.as_deref(), Some("Korean"));
        assert!(matches!(&ko.locator, PayloadLocator::Remote(u) if u.ends_with("fmt=json3")));
    }

    #[test]
    fn test_languages_without_json3_are_skipped() {
        let listing = parse_listing(&sample());
        assert!(listing.tracks.iter().all(|t| t.format == CaptionFormat::Json3));
        assert!(!listing.tracks.iter().any(|t| t.language_code == "en-GB"));
    }

    #[test]
    fn test_parse_listing_without_captions() {
        let listing = parse_listing(&json!({"id": "dQw4w9WgXcQ"}));
        assert!(listing.title.is_none());
        assert!(listing.is_empty());

        let listing = parse_listing(&json!({"title": "x", "subtitles": {}, "automatic_captions": null}));
        assert!(listing.is_empty());
    }

    #[test]
    fn test_translated_track_sets_tlang() {
        let track = CaptionTrack::remote(
            "en",
            Provenance::Generated,
            &format!("{TIMEDTEXT}&lang=en&fmt=json3"),
        );
        let translated = translated_track(&track, "ko").unwrap();
        assert_eq!(translated.language_code, "ko");
        assert_eq!(translated.provenance, Provenance::Generated);
        assert_eq!(translation_target(&translated).as_deref(), Some("ko"));
    }

    #[test]
    fn test_translated_track_replaces_existing_tlang() {
        let track = CaptionTrack::remote(
            "en",
            Provenance::Authored,
            &format!("{TIMEDTEXT}&tlang=fr&lang=en&fmt=json3"),
        );
        let translated = translated_track(&track, "ja").unwrap();
        let PayloadLocator::Remote(url) = &translated.locator else {
            panic!("expected remote locator");
        };
        assert_eq!(url.matches("tlang=").count(), 1);
        assert!(url.contains("lang=en"));
        assert!(url.ends_with("tlang=ja"));
    }

    #[test]
    fn test_only_remote_json3_tracks_translate() {
        let mut vtt = CaptionTrack::remote("en", Provenance::Authored, TIMEDTEXT);
        vtt.format = CaptionFormat::Other("vtt".to_string());
        assert!(translated_track(&vtt, "ko").is_none());

        let mut local = CaptionTrack::remote("en", Provenance::Authored, TIMEDTEXT);
        local.locator = PayloadLocator::LocalFile(PathBuf::from("/tmp/x.en.json3"));
        assert!(translated_track(&local, "ko").is_none());
    }

    #[test]
    fn test_classify_failure() {
        let err = classify_failure(
            "dQw4w9WgXcQ",
            "ERROR: [youtube] dQw4w9WgXcQ: Subtitles are disabled for this video",
        );
        assert!(matches!(err, UndertekstError::CaptionsDisabled(id) if id == "dQw4w9WgXcQ"));

        let err = classify_failure("dQw4w9WgXcQ", "ERROR: Unable to download webpage\n");
        assert!(
            matches!(err, UndertekstError::CatalogUnreachable(m) if m == "ERROR: Unable to download webpage")
        );
    }

    #[tokio::test]
    async fn test_missing_binary_is_tool_not_found() {
        let mut settings = Settings::default();
        settings.captions.ytdlp_path = "/nonexistent/yt-dlp-binary".to_string();
        let catalog = YtDlpCatalog::new(&settings).unwrap();

        let err = catalog.list_tracks("dQw4w9WgXcQ").await.unwrap_err();
        assert!(matches!(err, UndertekstError::ToolNotFound(tool) if tool == "yt-dlp"));
    }

    #[tokio::test]
    async fn test_local_track_is_read_directly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dQw4w9WgXcQ.ko.json3");
        std::fs::write(&path, r#"{"events":[]}"#).unwrap();

        let mut settings = Settings::default();
        settings.captions.fetch_mode = FetchMode::Materialize;
        let catalog = YtDlpCatalog::new(&settings).unwrap();

        let mut track = CaptionTrack::remote("ko", Provenance::Authored, TIMEDTEXT);
        track.locator = PayloadLocator::LocalFile(path);
        let payload = catalog.fetch_payload("dQw4w9WgXcQ", &track).await.unwrap();
        assert_eq!(payload, Payload::Raw(br#"{"events":[]}"#.to_vec()));
    }
    /// Listing printed by the fake yt-dlp for `--dump-json`.
    fn fake_listing() -> Value {
        json!({
            "id": "dQw4w9WgXcQ",
            "title": "Never Gonna Give You Up",
            "subtitles": {
                "en": [{"ext": "json3", "url": format!("{TIMEDTEXT}&lang=en&fmt=json3")}]
            },
            "automatic_captions": {
                "en": [{"ext": "json3", "url": format!("{TIMEDTEXT}&lang=en&kind=asr&fmt=json3")}],
                "ko": [{"ext": "json3", "url": format!("{TIMEDTEXT}&lang=en&kind=asr&fmt=json3&tlang=ko")}]
            }
        })
    }

    /// Write a shell script standing in for yt-dlp.
    ///
    /// It writes `<id>.<lang>.json3` only when `lang` is available under the
    /// section selected by the write flag, and the caption text names that flag.
    /// Every invocation's arguments are appended to `args.log` next to it.
    #[cfg(unix)]
    fn fake_ytdlp(dir: &std::path::Path, authored: &str, automatic: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let log = dir.join("args.log");
        let script = r#"#!/bin/sh
echo "$*" >> "@LOG@"
flag=""; lang=""; out=""
while [ $# -gt 0 ]; do
  case "$1" in
    --dump-json) printf '%s\n' '@LISTING@'; exit 0 ;;
    --write-subs|--write-auto-subs) flag="$1" ;;
    --sub-langs) shift; lang="$1" ;;
    -o) shift; out="$1" ;;
  esac
  shift
done
case "$flag" in
  --write-subs) available="@AUTHORED@" ;;
  *) available="@AUTOMATIC@" ;;
esac
for l in $available; do
  if [ "$l" = "$lang" ]; then
    printf '{"events":[{"segs":[{"utf8":"%s"}]}]}' "$flag" > "$(dirname "$out")/dQw4w9WgXcQ.$lang.json3"
  fi
done
exit 0
"#
        .replace("@LOG@", &log.to_string_lossy())
        .replace("@LISTING@", &fake_listing().to_string())
        .replace("@AUTHORED@", authored)
        .replace("@AUTOMATIC@", automatic);

        let path = dir.join("yt-dlp");
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    fn materialize_settings(dir: &std::path::Path) -> Settings {
        let mut settings = Settings::default();
        settings.captions.fetch_mode = FetchMode::Materialize;
        settings.captions.ytdlp_path = fake_ytdlp(dir, "en", "en ko").to_string_lossy().into_owned();
        settings.general.temp_dir = dir.join("scratch").to_string_lossy().into_owned();
        settings
    }

    #[cfg(unix)]
    fn scratch_is_empty(dir: &std::path::Path) -> bool {
        std::fs::read_dir(dir.join("scratch")).unwrap().next().is_none()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_materialize_authored_track() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = YtDlpCatalog::new(&materialize_settings(dir.path())).unwrap();

        let track = CaptionTrack::remote("en", Provenance::Authored, TIMEDTEXT);
        let payload = catalog.fetch_payload("dQw4w9WgXcQ", &track).await.unwrap();
        assert_eq!(
            crate::captions::decode_payload(&payload).unwrap(),
            "--write-subs "
        );

        let args = std::fs::read_to_string(dir.path().join("args.log")).unwrap();
        assert!(args.contains("--skip-download"));
        assert!(args.contains("--sub-langs en --sub-format json3"));
        assert!(args.ends_with("https://www.youtube.com/watch?v=dQw4w9WgXcQ\n"));
        assert!(scratch_is_empty(dir.path()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_materialize_generated_track() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = YtDlpCatalog::new(&materialize_settings(dir.path())).unwrap();

        let track = CaptionTrack::remote("en", Provenance::Generated, TIMEDTEXT);
        let payload = catalog.fetch_payload("dQw4w9WgXcQ", &track).await.unwrap();
        assert_eq!(
            crate::captions::decode_payload(&payload).unwrap(),
            "--write-auto-subs "
        );
        assert!(scratch_is_empty(dir.path()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_materialize_translation_of_authored_track() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = YtDlpCatalog::new(&materialize_settings(dir.path())).unwrap();

        let source = CaptionTrack::remote(
            "en",
            Provenance::Authored,
            &format!("{TIMEDTEXT}&lang=en&fmt=json3"),
        );
        let translated = catalog.translate(&source, "ko").await.unwrap().unwrap();
        assert_eq!(translated.provenance, Provenance::Authored);

        let payload = catalog.fetch_payload("dQw4w9WgXcQ", &translated).await.unwrap();
        assert_eq!(
            crate::captions::decode_payload(&payload).unwrap(),
            "--write-auto-subs "
        );
        assert!(scratch_is_empty(dir.path()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_materialize_missing_file_is_retrieval_error() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = YtDlpCatalog::new(&materialize_settings(dir.path())).unwrap();

        let track = CaptionTrack::remote("ja", Provenance::Generated, TIMEDTEXT);
        let err = catalog.fetch_payload("dQw4w9WgXcQ", &track).await.unwrap_err();
        assert!(matches!(err, UndertekstError::Retrieval(msg) if msg.contains("No ja caption file")));
        assert!(scratch_is_empty(dir.path()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_materialized_translation_resolves() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = crate::resolver::TranscriptResolver::new(&materialize_settings(dir.path())).unwrap();

        let result = resolver.resolve("dQw4w9WgXcQ", Some("ko")).await;
        assert_eq!(result.subtitle_type, crate::captions::SubtitleType::Translated);
        assert_eq!(result.subtitle_text, "--write-auto-subs ");
        assert_eq!(result.video_title, "Never Gonna Give You Up");
        assert!(scratch_is_empty(dir.path()));
    }
}
