//! Connection settings for the Supabase project.

use std::time::Duration;

use liftlog_core::constants::{DEFAULT_PENDING_WINDOW_SECS, DEFAULT_REQUEST_TIMEOUT_SECS};
use liftlog_core::env_parse_with_default;

use crate::error::RequestError;

/// Where and how to reach the backend.
#[derive(Clone)]
pub struct ClientConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub url: String,
    /// Public anon key, sent as `apikey` on every request.
    pub anon_key: String,
    /// Signed-in user's JWT. Falls back to the anon key when absent.
    pub access_token: Option<String>,
    pub request_timeout: Duration,
    /// Jobs not updated within this window no longer count as pending.
    pub pending_window: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("anon_key", &"***")
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .field("request_timeout", &self.request_timeout)
            .field("pending_window", &self.pending_window)
            .finish()
    }
}

impl ClientConfig {
    #[must_use]
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
            access_token: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            pending_window: Duration::from_secs(DEFAULT_PENDING_WINDOW_SECS),
        }
    }

    /// Reads `LIFTLOG_SUPABASE_URL`, `LIFTLOG_SUPABASE_ANON_KEY`,
    /// `LIFTLOG_ACCESS_TOKEN`, `LIFTLOG_REQUEST_TIMEOUT_SECS` and
    /// `LIFTLOG_PENDING_WINDOW_SECS`.
    ///
    /// # Errors
    /// Returns [`RequestError::ClientInit`] if the URL or anon key is unset.
    pub fn from_env() -> Result<Self, RequestError> {
        Self::from_env_or(None, None)
    }

    /// Like [`Self::from_env`], but an explicit `url` or `anon_key` takes the
    /// place of its environment variable.
    ///
    /// # Errors
    /// Returns [`RequestError::ClientInit`] if a value is neither given nor set.
    pub fn from_env_or(
        url: Option<String>,
        anon_key: Option<String>,
    ) -> Result<Self, RequestError> {
        let url = url.map_or_else(|| required_env("LIFTLOG_SUPABASE_URL"), Ok)?;
        let anon_key = anon_key.map_or_else(|| required_env("LIFTLOG_SUPABASE_ANON_KEY"), Ok)?;
        let mut config = Self::new(url, anon_key);
        config.access_token = std::env::var("LIFTLOG_ACCESS_TOKEN")
            .ok()
            .map(|token| token.trim().to_owned())
            .filter(|token| !token.is_empty());
        config.request_timeout = Duration::from_secs(env_parse_with_default(
            "LIFTLOG_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        ));
        config.pending_window = Duration::from_secs(env_parse_with_default(
            "LIFTLOG_PENDING_WINDOW_SECS",
            DEFAULT_PENDING_WINDOW_SECS,
        ));
        Ok(config)
    }

    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    #[must_use]
    pub const fn with_pending_window(mut self, window: Duration) -> Self {
        self.pending_window = window;
        self
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

fn required_env(var: &str) -> Result<String, RequestError> {
    std::env::var(var)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| RequestError::ClientInit(format!("{var} environment variable must be set")))
}
