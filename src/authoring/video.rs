//! Video URL classification, validation and embed-URL generation.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};
use crate::types::ActivitySource;

/// Anchored YouTube shape accepted by the activity editor.
static YOUTUBE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:www\.|m\.)?(?:youtube\.com/(?:watch\?v=|embed/|v/)|youtu\.be/)([a-zA-Z0-9_-]{11})(?:\S+)?$",
    )
    .expect("valid regex")
});

static VIMEO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.)?vimeo\.com/([0-9]+)(?:\S+)?$").expect("valid regex")
});

static VIMEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"vimeo\.com/(\d+)").expect("valid regex"));

static YOUTUBE_WATCH_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]v=([^&]+)").expect("valid regex"));

/// Hosting platform (or embed flavour) of a video reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VideoKind {
    Youtube,
    Vimeo,
    Vdocipher,
    Gumlet,
    Iframe,
    Script,
}

/// A validated video reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRef {
    pub kind: VideoKind,
    /// Platform id, only known for YouTube and Vimeo.
    pub video_id: Option<String>,
}

#[must_use]
pub fn video_kind_from_url(url: &str) -> VideoKind {
    let url = url.trim().to_lowercase();

    if url.contains("vimeo.com") {
        VideoKind::Vimeo
    } else if url.contains("youtube.com") || url.contains("youtu.be") {
        VideoKind::Youtube
    } else if url.contains("vdocipher") {
        VideoKind::Vdocipher
    } else if url.contains("gumlet") {
        VideoKind::Gumlet
    } else if url.contains("<script") {
        VideoKind::Script
    } else {
        VideoKind::Iframe
    }
}

fn is_absolute_url(s: &str) -> bool {
    Url::parse(s).is_ok()
}

pub fn validate_video_url(url: &str, kind: VideoKind) -> Result<VideoRef> {
    let url = url.trim();
    if url.is_empty() {
        return Err(Error::validation("URL is required"));
    }

    let video_id = match kind {
        VideoKind::Vimeo => {
            let id = VIMEO_ID_RE
                .captures(url)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
                .ok_or_else(|| {
                    Error::validation("Invalid Vimeo URL. Use format: https://vimeo.com/123456789")
                })?;
            Some(id)
        }
        VideoKind::Youtube => {
            let id = if url.contains("youtube.com/watch") {
                YOUTUBE_WATCH_ID_RE
                    .captures(url)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().to_string())
            } else if let Some((_, rest)) = url.split_once("youtu.be/") {
                rest.split('?')
                    .next()
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
            } else {
                None
            };
            Some(id.ok_or_else(|| Error::validation("Invalid YouTube URL"))?)
        }
        VideoKind::Vdocipher | VideoKind::Gumlet => {
            if !is_absolute_url(url) {
                return Err(Error::validation("Invalid URL format"));
            }
            None
        }
        VideoKind::Iframe => {
            if !url.contains("<iframe") && !is_absolute_url(url) {
                return Err(Error::validation("Invalid URL or iframe code"));
            }
            None
        }
        VideoKind::Script => None,
    };

    Ok(VideoRef { kind, video_id })
}

/// Player URL for `url`; platforms without a player URL pass through trimmed.
pub fn embed_url(url: &str, kind: VideoKind) -> Result<String> {
    let video = validate_video_url(url, kind)?;

    Ok(match (kind, video.video_id) {
        (VideoKind::Youtube, Some(id)) => {
            format!("https://www.youtube.com/embed/{id}?rel=0&modestbranding=1")
        }
        (VideoKind::Vimeo, Some(id)) => {
            format!("https://player.vimeo.com/video/{id}?title=0&byline=0&portrait=0")
        }
        _ => url.trim().to_string(),
    })
}

/// True for absolute URLs and for anything that looks like embed markup.
#[must_use]
pub fn is_valid_video_url(url: &str) -> bool {
    let url = url.trim();
    if url.is_empty() {
        return false;
    }
    is_absolute_url(url) || (url.contains('<') && url.contains('>'))
}

/// Shape check applied before a video activity is accepted.
///
/// Only YouTube and Vimeo sources are checked; everything else passes.
pub fn validate_source_url(source: ActivitySource, url: &str) -> Result<()> {
    let url = url.trim();
    match source {
        ActivitySource::Youtube if !YOUTUBE_RE.is_match(url) => Err(Error::validation(
            "Please enter a valid YouTube URL (e.g., https://www.youtube.com/watch?v=... or https://youtu.be/...)",
        )),
        ActivitySource::Vimeo if !VIMEO_RE.is_match(url) => Err(Error::validation(
            "Please enter a valid Vimeo URL (e.g., https://vimeo.com/...)",
        )),
        _ => Ok(()),
    }
}

/// Rewrites a YouTube link into its bare embed form, as stored on activities.
///
/// Links that carry no recognizable id come back unchanged.
#[must_use]
pub fn youtube_embed_form(url: &str) -> String {
    YOUTUBE_RE
        .captures(url.trim())
        .and_then(|c| c.get(1))
        .map(|id| format!("https://www.youtube.com/embed/{}", id.as_str()))
        .unwrap_or_else(|| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iframe_embed_code_is_iframe() {
        assert_eq!(
            video_kind_from_url(r#"<iframe src="https://example.com"></iframe>"#),
            VideoKind::Iframe
        );
        assert_eq!(video_kind_from_url(""), VideoKind::Iframe);
        assert_eq!(
            video_kind_from_url("<script src=\"https://player.example\"></script>"),
            VideoKind::Script
        );
    }

    #[test]
    fn test_video_kind_from_url_platforms() {
        assert_eq!(
            video_kind_from_url("https://VIMEO.com/123456"),
            VideoKind::Vimeo
        );
        assert_eq!(video_kind_from_url("https://youtu.be/abc"), VideoKind::Youtube);
        assert_eq!(
            video_kind_from_url("https://player.vdocipher.com/v2/?otp=1"),
            VideoKind::Vdocipher
        );
        assert_eq!(
            video_kind_from_url("https://play.gumlet.io/embed/x"),
            VideoKind::Gumlet
        );
    }

    #[test]
    fn test_validate_video_url_messages() {
        let err = validate_video_url("  ", VideoKind::Youtube).unwrap_err();
        assert_eq!(err.to_string(), "URL is required");

        let err = validate_video_url("https://vimeo.com/abc", VideoKind::Vimeo).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid Vimeo URL. Use format: https://vimeo.com/123456789"
        );

        let err = validate_video_url("https://youtube.com/", VideoKind::Youtube).unwrap_err();
        assert_eq!(err.to_string(), "Invalid YouTube URL");

        let err = validate_video_url("not a url", VideoKind::Gumlet).unwrap_err();
        assert_eq!(err.to_string(), "Invalid URL format");

        let err = validate_video_url("nope", VideoKind::Iframe).unwrap_err();
        assert_eq!(err.to_string(), "Invalid URL or iframe code");

        assert!(validate_video_url("anything", VideoKind::Script).is_ok());
    }

    #[test]
    fn test_embed_urls() {
        assert_eq!(
            embed_url("https://www.youtube.com/watch?v=abc12345678&t=3", VideoKind::Youtube)
                .unwrap(),
            "https://www.youtube.com/embed/abc12345678?rel=0&modestbranding=1"
        );
        assert_eq!(
            embed_url("https://youtu.be/abc12345678?si=x", VideoKind::Youtube).unwrap(),
            "https://www.youtube.com/embed/abc12345678?rel=0&modestbranding=1"
        );
        assert_eq!(
            embed_url("https://vimeo.com/76979871", VideoKind::Vimeo).unwrap(),
            "https://player.vimeo.com/video/76979871?title=0&byline=0&portrait=0"
        );
        assert_eq!(
            embed_url("  https://play.gumlet.io/embed/x ", VideoKind::Gumlet).unwrap(),
            "https://play.gumlet.io/embed/x"
        );
    }

    #[test]
    fn test_is_valid_video_url() {
        assert!(is_valid_video_url("https://example.com/video.mp4"));
        assert!(is_valid_video_url("<div>embed</div>"));
        assert!(!is_valid_video_url("example"));
        assert!(!is_valid_video_url(""));
    }

    #[test]
    fn test_source_url_shapes() {
        assert!(
            validate_source_url(
                ActivitySource::Youtube,
                "https://www.youtube.com/watch?v=abc12345678"
            )
            .is_ok()
        );
        assert!(validate_source_url(ActivitySource::Youtube, "https://notyoutube.com/x").is_err());
        assert!(validate_source_url(ActivitySource::Vimeo, "vimeo.com/123").is_ok());
        assert!(validate_source_url(ActivitySource::Vimeo, "https://vimeo.com/channel").is_err());
        assert!(validate_source_url(ActivitySource::Url, "whatever").is_ok());
    }

    #[test]
    fn test_youtube_embed_form() {
        assert_eq!(
            youtube_embed_form("https://youtu.be/abc12345678"),
            "https://www.youtube.com/embed/abc12345678"
        );
        assert_eq!(youtube_embed_form("https://example.com"), "https://example.com");
    }
}
