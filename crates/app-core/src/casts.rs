//! Cast data model
//!
//! Casts arrive as JSON from the social-graph API. Only the fields the
//! classifier reads are typed; everything else is carried through untouched
//! so the UI sees the original object plus `embedType`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::embeds::EmbedType;

/// A single embed entry on a cast
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CastEmbed {
    /// Embedded URL, if this entry is a link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Remaining fields (e.g. `cast_id` for quote embeds)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CastEmbed {
    /// Create an embed pointing at `url`
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            extra: Map::new(),
        }
    }
}

/// An externally supplied cast object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cast {
    /// Ordered embed entries
    #[serde(default)]
    pub embeds: Vec<CastEmbed>,
    /// Interactive frame marker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames: Option<Value>,
    /// Every other field of the cast, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Cast {
    /// Create an empty cast
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an embed with the given URL
    pub fn with_embed_url(mut self, url: impl Into<String>) -> Self {
        self.embeds.push(CastEmbed::with_url(url));
        self
    }

    /// Set the frames marker
    pub fn with_frames(mut self, frames: Value) -> Self {
        self.frames = Some(frames);
        self
    }

    /// Set an arbitrary passthrough field
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// First embed entry carrying a non-empty URL
    pub fn first_embed_url(&self) -> Option<&str> {
        self.embeds
            .iter()
            .filter_map(|embed| embed.url.as_deref())
            .find(|url| !url.trim().is_empty())
    }

    /// Check if the cast is an interactive frame
    ///
    /// `null`, `false`, empty strings, arrays and objects do not count.
    pub fn has_frames(&self) -> bool {
        match &self.frames {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(items)) => !items.is_empty(),
            Some(Value::Object(map)) => !map.is_empty(),
            Some(_) => true,
        }
    }

    /// Cast hash, when present
    pub fn hash(&self) -> Option<&str> {
        self.extra.get("hash").and_then(Value::as_str)
    }
}

/// Where a batch of casts is being rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastContext {
    /// Feed, channel or profile listing
    #[default]
    Normal,
    /// Reply thread under a cast; text-only casts are allowed
    Comment,
}

/// A cast with its resolved embed type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedCast {
    /// The original cast
    #[serde(flatten)]
    pub cast: Cast,
    /// How the UI should render the cast's embed
    #[serde(rename = "embedType")]
    pub embed_type: EmbedType,
}

impl ClassifiedCast {
    /// Attach an embed type to a copy of `cast`
    pub fn new(cast: &Cast, embed_type: EmbedType) -> Self {
        Self {
            cast: cast.clone(),
            embed_type,
        }
    }
}
