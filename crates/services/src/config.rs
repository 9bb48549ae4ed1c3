use std::env;
use std::time::Duration;

use quiz_core::model::QuizId;

use crate::error::ConfigError;
use crate::provider::QuizRequest;

pub const ENV_BASE_URL: &str = "QUIZ_API_BASE_URL";
pub const ENV_USER_UUID: &str = "QUIZ_USER_UUID";
pub const ENV_API_TOKEN: &str = "QUIZ_API_TOKEN";
pub const ENV_QUIZ_ID: &str = "QUIZ_ID";
pub const ENV_DB_URL: &str = "QUIZ_DB_URL";
pub const ENV_TIMEOUT_SECS: &str = "QUIZ_REQUEST_TIMEOUT_SECS";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the quiz comes from and who is asking for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizConfig {
    pub base_url: Option<String>,
    pub user_uuid: String,
    pub api_token: String,
    pub quiz_id: Option<QuizId>,
    pub db_url: Option<String>,
    pub request_timeout: Duration,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            user_uuid: String::new(),
            api_token: String::new(),
            quiz_id: None,
            db_url: None,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl QuizConfig {
    /// Read configuration from `QUIZ_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`QuizConfig::from_env`] with an injectable variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a value is present but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let base_url = get(ENV_BASE_URL).map(normalize_base_url).transpose()?;
        let quiz_id = get(ENV_QUIZ_ID).map(|raw| parse_quiz_id(&raw)).transpose()?;
        let request_timeout = match get(ENV_TIMEOUT_SECS) {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidTimeout(raw))?,
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            base_url,
            user_uuid: get(ENV_USER_UUID).unwrap_or_default(),
            api_token: get(ENV_API_TOKEN).unwrap_or_default(),
            quiz_id,
            db_url: get(ENV_DB_URL),
            request_timeout,
        })
    }

    /// The provider request key.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` when no quiz id is configured.
    pub fn request(&self) -> Result<QuizRequest, ConfigError> {
        let quiz_id = self.quiz_id.ok_or(ConfigError::Missing(ENV_QUIZ_ID))?;
        Ok(QuizRequest::new(
            self.user_uuid.clone(),
            self.api_token.clone(),
            quiz_id,
        ))
    }
}

/// # Errors
///
/// Returns `ConfigError::InvalidQuizId` unless `raw` is an unsigned integer.
pub fn parse_quiz_id(raw: &str) -> Result<QuizId, ConfigError> {
    raw.parse::<QuizId>()
        .map_err(|_| ConfigError::InvalidQuizId(raw.to_string()))
}

/// Validate a base URL and strip trailing slashes.
///
/// # Errors
///
/// Returns `ConfigError::InvalidBaseUrl` unless `raw` is an http(s) URL.
pub fn normalize_base_url(raw: String) -> Result<String, ConfigError> {
    let parsed = reqwest::Url::parse(raw.trim())
        .map_err(|_| ConfigError::InvalidBaseUrl(raw.clone()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl(raw));
    }
    Ok(raw.trim().trim_end_matches('/').to_string())
}
