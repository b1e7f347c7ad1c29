//! Embed type detection
//!
//! This module decides how an embedded URL should be rendered: YouTube links
//! are recognised syntactically, everything else is resolved by sniffing the
//! `Content-Type` the host declares for a `HEAD` request.

use std::sync::OnceLock;

use networking::{ContentProbe, ProbeError, Url};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while classifying an embed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// The embed URL is not an absolute http(s) URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The `HEAD` probe errored, timed out or returned a non-2xx status
    #[error("Probe failed: {0}")]
    ProbeFailed(#[from] ProbeError),

    /// Strict mode only: the declared type is not image, video or audio
    #[error("Unsupported content type: {0:?}")]
    UnsupportedContentType(String),

    /// No embed entry carries a URL
    #[error("Object has no URL")]
    NoEmbedUrl,
}

/// Result type for embed classification
pub type Result<T> = std::result::Result<T, ClassifyError>;

/// How a cast's embed is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedType {
    /// Still or animated image
    Image,
    /// Video file or stream
    Video,
    /// Audio file
    Audio,
    /// YouTube video (rendered as an embedded player)
    Youtube,
    /// Interactive frame
    Frame,
    /// Anything else (link card or plain text)
    Other,
}

impl EmbedType {
    /// Get the embed type as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbedType::Image => "image",
            EmbedType::Video => "video",
            EmbedType::Audio => "audio",
            EmbedType::Youtube => "youtube",
            EmbedType::Frame => "frame",
            EmbedType::Other => "other",
        }
    }

    /// Check if this type needs a media player or image viewer
    pub fn is_media(&self) -> bool {
        matches!(
            self,
            EmbedType::Image | EmbedType::Video | EmbedType::Audio | EmbedType::Youtube
        )
    }
}

impl std::fmt::Display for EmbedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do with content types outside image/video/audio
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClassifyMode {
    /// Fail with [`ClassifyError::UnsupportedContentType`]
    #[default]
    Strict,
    /// Fall back to [`EmbedType::Other`]
    Permissive,
}

/// Parse an embed URL, accepting only absolute http(s) URLs
pub fn parse_embed_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|_| ClassifyError::InvalidUrl(raw.to_string()))?;

    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(ClassifyError::InvalidUrl(raw.to_string())),
    }
}

/// Check if a URL points at a YouTube video
///
/// Matches watch, embed, shorts, live and `/v/` paths on youtube.com (and its
/// `www.`, `m.`, `music.` and nocookie variants) plus `youtu.be` short links.
pub fn is_youtube_url(url: &Url) -> bool {
    static YOUTUBE_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = YOUTUBE_REGEX.get_or_init(|| {
        Regex::new(
            r"^(?:(?:www|m|music)\.)?(?:youtube\.com|youtube-nocookie\.com)/(?:watch\?(?:[^#]*&)?v=[\w-]+|(?:embed|shorts|live|v)/[\w-]+)|^youtu\.be/[\w-]+",
        )
        .unwrap()
    });

    let Some(host) = url.host_str() else {
        return false;
    };

    let mut target = format!("{}{}", host, url.path());
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }

    re.is_match(&target)
}

/// Map a `Content-Type` header to an embed type
///
/// Only the primary token is inspected; parameters such as `charset` and
/// letter case are ignored. Returns `None` for anything that is not image,
/// video or audio.
pub fn embed_type_for_mime(content_type: &str) -> Option<EmbedType> {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    let (primary, _) = essence.split_once('/')?;

    match primary.to_ascii_lowercase().as_str() {
        "image" => Some(EmbedType::Image),
        "video" => Some(EmbedType::Video),
        "audio" => Some(EmbedType::Audio),
        _ => None,
    }
}

/// Resolve the embed type of a single URL
///
/// YouTube links never touch the network. Every other URL costs exactly one
/// call to `probe`.
pub async fn resolve_url<P>(probe: &P, raw_url: &str, mode: ClassifyMode) -> Result<EmbedType>
where
    P: ContentProbe + ?Sized,
{
    let url = parse_embed_url(raw_url)?;

    if is_youtube_url(&url) {
        return Ok(EmbedType::Youtube);
    }

    let response = probe.probe(&url).await?;

    match (embed_type_for_mime(&response.content_type), mode) {
        (Some(embed_type), _) => Ok(embed_type),
        (None, ClassifyMode::Permissive) => Ok(EmbedType::Other),
        (None, ClassifyMode::Strict) => {
            Err(ClassifyError::UnsupportedContentType(response.content_type))
        }
    }
}
