use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MediaError {
    #[error("Media URI cannot be empty.")]
    EmptyUri,

    #[error("Media URI is neither a URL nor an absolute path: {0}")]
    InvalidUri(String),
}

//
// ─── MEDIA URI ─────────────────────────────────────────────────────────────────
//

/// Location of a playable or displayable media resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MediaUri {
    FilePath(PathBuf),
    Url(Url),
}

impl MediaUri {
    /// Parses a raw content location.
    ///
    /// Anything `Url` accepts becomes `MediaUri::Url`; otherwise the value must be
    /// an absolute filesystem path.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::EmptyUri` for blank input and `MediaError::InvalidUri`
    /// for relative paths or malformed URLs.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, MediaError> {
        let s = raw.as_ref().trim();
        if s.is_empty() {
            return Err(MediaError::EmptyUri);
        }
        if let Ok(url) = Url::parse(s) {
            return Ok(MediaUri::Url(url));
        }
        let path = Path::new(s);
        if path.is_absolute() {
            return Ok(MediaUri::FilePath(path.to_path_buf()));
        }
        Err(MediaError::InvalidUri(s.to_owned()))
    }

    /// # Errors
    ///
    /// Returns `MediaError::EmptyUri` for an empty path.
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, MediaError> {
        let p = path.into();
        if p.as_os_str().is_empty() {
            return Err(MediaError::EmptyUri);
        }
        Ok(MediaUri::FilePath(p))
    }

    #[must_use]
    pub fn as_url(&self) -> Option<&Url> {
        match self {
            MediaUri::Url(u) => Some(u),
            MediaUri::FilePath(_) => None,
        }
    }

    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            MediaUri::FilePath(p) => Some(p.as_path()),
            MediaUri::Url(_) => None,
        }
    }

    /// True for http(s) URLs, the only locations worth routing through a cache proxy.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        self.as_url()
            .is_some_and(|u| matches!(u.scheme(), "http" | "https"))
    }
}

impl fmt::Display for MediaUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaUri::FilePath(p) => write!(f, "{}", p.display()),
            MediaUri::Url(u) => f.write_str(u.as_str()),
        }
    }
}

impl TryFrom<String> for MediaUri {
    type Error = MediaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        MediaUri::parse(value)
    }
}

impl From<MediaUri> for String {
    fn from(value: MediaUri) -> Self {
        value.to_string()
    }
}
