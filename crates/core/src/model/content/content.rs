use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::content::{Format, MediaError, MediaUri};

//
// ─── CONTENT ───────────────────────────────────────────────────────────────────
//

/// What a question shows, or what an answer reveals.
///
/// Each variant carries only the data its format needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum Content {
    Text { body: String },
    Image { uri: MediaUri },
    Audio { uri: MediaUri },
    Video { uri: MediaUri },
}

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("Text content cannot be empty.")]
    EmptyText,

    #[error("{format} content needs a valid URL: {source}")]
    Media {
        format: Format,
        #[source]
        source: MediaError,
    },
}

//
// ─── CONSTRUCTION ──────────────────────────────────────────────────────────────
//

impl Content {
    /// Builds content from a server format tag plus its text and URL fields.
    ///
    /// The tag goes through [`Format::from_tag`], so unknown tags build image content.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::EmptyText` for blank text content and
    /// `ContentError::Media` when a non-text format has no usable URL.
    pub fn from_parts(tag: &str, text: &str, url: &str) -> Result<Self, ContentError> {
        let format = Format::from_tag(tag);
        if format == Format::Text {
            return Self::text(text);
        }
        let uri = MediaUri::parse(url).map_err(|source| ContentError::Media { format, source })?;
        Ok(Self::media(format, uri))
    }

    /// # Errors
    ///
    /// Returns `ContentError::EmptyText` if `body` is blank.
    pub fn text(body: impl Into<String>) -> Result<Self, ContentError> {
        let body = body.into();
        if body.trim().is_empty() {
            return Err(ContentError::EmptyText);
        }
        Ok(Content::Text { body })
    }

    /// Empty text, for content the server sent without anything usable.
    #[must_use]
    pub fn blank() -> Self {
        Content::Text {
            body: String::new(),
        }
    }

    /// Wraps a URI in the variant for `format`; `Format::Text` falls back to image.
    #[must_use]
    pub fn media(format: Format, uri: MediaUri) -> Self {
        match format {
            Format::Audio => Content::Audio { uri },
            Format::Video => Content::Video { uri },
            Format::Text | Format::Image => Content::Image { uri },
        }
    }

    #[must_use]
    pub fn format(&self) -> Format {
        match self {
            Content::Text { .. } => Format::Text,
            Content::Image { .. } => Format::Image,
            Content::Audio { .. } => Format::Audio,
            Content::Video { .. } => Format::Video,
        }
    }

    #[must_use]
    pub fn text_body(&self) -> Option<&str> {
        match self {
            Content::Text { body } => Some(body),
            _ => None,
        }
    }

    /// URI of any non-text content.
    #[must_use]
    pub fn uri(&self) -> Option<&MediaUri> {
        match self {
            Content::Text { .. } => None,
            Content::Image { uri } | Content::Audio { uri } | Content::Video { uri } => Some(uri),
        }
    }

    /// URI of content that needs the playback surface (audio or video).
    #[must_use]
    pub fn media_uri(&self) -> Option<&MediaUri> {
        match self {
            Content::Audio { uri } | Content::Video { uri } => Some(uri),
            Content::Text { .. } | Content::Image { .. } => None,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
