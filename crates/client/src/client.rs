use chrono::{DateTime, Utc};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::RequestError;

/// `Prefer` header asking PostgREST to echo the written rows back.
pub(crate) const RETURN_REPRESENTATION: &str = "return=representation";

/// Client for the project's PostgREST endpoint.
///
/// Construct one per process and share it behind an `Arc`; the underlying
/// `reqwest::Client` pools connections.
pub struct SupabaseClient {
    pub(crate) client: reqwest::Client,
    pub(crate) rest_url: String,
    pub(crate) anon_key: String,
    pub(crate) bearer: String,
    pub(crate) pending_window: chrono::Duration,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("client", &self.client)
            .field("rest_url", &self.rest_url)
            .field("anon_key", &"***")
            .field("bearer", &"***")
            .field("pending_window", &self.pending_window)
            .finish()
    }
}

impl SupabaseClient {
    /// Creates a client for the project described by `config`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure)
    /// or the pending window does not fit a timestamp offset.
    pub fn new(config: &ClientConfig) -> Result<Self, RequestError> {
        let rest_url = format!("{}/rest/v1", config.url.trim_end_matches('/'));
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| RequestError::ClientInit(e.to_string()))?;
        let pending_window = chrono::Duration::from_std(config.pending_window)
            .map_err(|e| RequestError::ClientInit(format!("pending window out of range: {e}")))?;
        let bearer = config.access_token.clone().unwrap_or_else(|| config.anon_key.clone());
        Ok(Self { client, rest_url, anon_key: config.anon_key.clone(), bearer, pending_window })
    }

    /// Returns the REST base URL (`<project>/rest/v1`).
    #[must_use]
    pub fn rest_url(&self) -> &str {
        &self.rest_url
    }

    /// Starts a request against `table` carrying the project's auth headers.
    pub(crate) fn table(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{table}", self.rest_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.bearer)
    }

    /// Sends `request` and decodes a PostgREST row array.
    pub(crate) async fn fetch_rows<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<Vec<T>, RequestError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(RequestError::HttpStatus { code: status.as_u16(), body });
        }

        serde_json::from_str(&body).map_err(|e| RequestError::JsonParse {
            context: format!("{context} (body: {})", truncate(&body, 200)),
            source: e,
        })
    }

    /// Like [`Self::fetch_rows`] for calls addressing one row by id.
    pub(crate) async fn fetch_one<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        entity: &'static str,
        id: &str,
    ) -> Result<T, RequestError> {
        let rows: Vec<T> = self.fetch_rows(request, entity).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RequestError::NotFound { entity, id: id.to_owned() })
    }

    /// Lower bound on `updated_at` for a pending-job listing issued at `now`.
    pub(crate) fn pending_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        pending_since(now, self.pending_window)
    }
}

/// `now` minus the pending window.
#[must_use]
pub fn pending_since(now: DateTime<Utc>, window: chrono::Duration) -> DateTime<Utc> {
    now.checked_sub_signed(window).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Truncates a string to the given maximum length at a char boundary.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}
