//! `TmdbClient` - TMDB API client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::LocalTmdbApi;
use super::pacer::{self, RequestPacer};
use super::request::TmdbRequest;
use super::types::{
    KeywordResponse, MediaType, Season, Show, ShowDetails, TmdbErrorResponse, TmdbPagingResponse,
};
use crate::error::CatalogError;

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default response timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Language requested for lookups and search.
const LANGUAGE: &str = "en-US";

/// Per-call options for [`TmdbClient::fetch_with_auth`].
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Response timeout; the client's timeout (15s) applies when `None`.
    pub timeout: Option<Duration>,
    /// Extra request headers.
    pub headers: HeaderMap,
}

impl FetchOptions {
    /// Overrides the response timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds a request header.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// TMDB API client.
///
/// Authenticates with a bearer token and falls back to an `api_key` query
/// parameter once when the provider answers 401.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Bearer API token.
    api_token: String,
    /// API key used after a 401.
    api_key: Option<String>,
    /// Default response timeout.
    timeout: Duration,
    /// Start-slot pacer shared by concurrent requests.
    pacer: Arc<Mutex<RequestPacer>>,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    api_key: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    request_spacing: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            api_key: None,
            user_agent: None,
            timeout: None,
            request_spacing: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token (required).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the API key used when the bearer token is rejected.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the default response timeout (default: 15s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the minimum spacing between request starts (default: 25ms).
    #[must_use]
    pub const fn request_spacing(mut self, spacing: Duration) -> Self {
        self.request_spacing = Some(spacing);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_token` is not set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_token = self.api_token.context("api_token is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let pacer = self
            .request_spacing
            .map_or_else(RequestPacer::with_default_spacing, RequestPacer::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_token,
            api_key: self.api_key.filter(|k| !k.is_empty()),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            pacer: Arc::new(Mutex::new(pacer)),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether `url` points at the configured provider (same host and port).
    fn is_provider_url(&self, url: &Url) -> bool {
        url.host_str() == self.base_url.host_str()
            && url.port_or_known_default() == self.base_url.port_or_known_default()
    }

    /// Sends one GET request once its start slot comes up.
    async fn send(&self, url: Url, options: &FetchOptions, bearer: bool) -> Result<Response> {
        pacer::pace(&self.pacer).await;

        let mut builder = self
            .http_client
            .get(url)
            .headers(options.headers.clone())
            .header(CONTENT_TYPE, "application/json")
            .timeout(options.timeout.unwrap_or(self.timeout));
        if bearer {
            builder = builder.bearer_auth(&self.api_token);
        }
        let request = builder.build().context("failed to build request")?;

        let path = String::from(request.url().path());
        tracing::debug!(path = %path, bearer, "TMDB API request");

        let result = self.http_client.execute(request).await;
        result.with_context(|| format!("request failed: {path}"))
    }

    /// Sends a GET request with provider authentication.
    ///
    /// Requests to the provider carry `Authorization: Bearer <token>`. When
    /// the provider answers 401 and an API key is configured, the request is
    /// retried once without the bearer header and with `api_key=<key>`
    /// appended to the query.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] when the final status is not a
    /// success, or a transport error (including timeouts).
    #[instrument(skip_all)]
    pub async fn fetch_with_auth(&self, url: Url, options: &FetchOptions) -> Result<Response> {
        let provider = self.is_provider_url(&url);
        let mut response = self.send(url.clone(), options, provider).await?;

        if response.status() == StatusCode::UNAUTHORIZED
            && provider
            && let Some(api_key) = &self.api_key
        {
            tracing::warn!(
                path = url.path(),
                "TMDB bearer token rejected (401). Retrying with API key..."
            );
            let mut fallback = url;
            fallback.query_pairs_mut().append_pair("api_key", api_key);
            response = self.send(fallback, options, false).await?;
        }

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            let message = match serde_json::from_str::<TmdbErrorResponse>(&body) {
                Ok(error_response) => error_response.status_message,
                Err(_) => body,
            };
            return Err(CatalogError::Http {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        Ok(response)
    }

    /// Joins `path` (which may carry its own query) onto the base URL,
    /// appends `query`, and decodes the JSON response.
    #[instrument(skip_all)]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let mut url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        let response = self.fetch_with_auth(url, &FetchOptions::default()).await?;

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {path}"))?;
        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        let parsed =
            raw_result.with_context(|| format!("failed to decode JSON response: {path}"))?;
        Ok(parsed)
    }
}

impl LocalTmdbApi for TmdbClient {
    #[instrument(skip_all)]
    async fn movie(&self, id: u64) -> Result<Show> {
        let path = format!("movie/{id}");
        let query = [("append_to_response", String::from("keywords"))];
        self.get_json(&path, &query).await
    }

    #[instrument(skip_all)]
    async fn tv_series(&self, id: u64) -> Result<Show> {
        let path = format!("tv/{id}");
        let query = [("append_to_response", String::from("keywords"))];
        self.get_json(&path, &query).await
    }

    #[instrument(skip_all)]
    async fn details(&self, id: u64, media_type: MediaType) -> Result<ShowDetails> {
        let path = format!("{}/{id}", media_type.endpoint());
        let query = [
            ("language", String::from(LANGUAGE)),
            ("append_to_response", String::from("videos,keywords")),
        ];
        self.get_json(&path, &query).await
    }

    #[instrument(skip_all)]
    async fn keywords(&self, id: u64, media_type: MediaType) -> Result<KeywordResponse> {
        let path = format!("{}/{id}/keywords", media_type.endpoint());
        self.get_json(&path, &[]).await
    }

    #[instrument(skip_all)]
    async fn season(&self, series_id: u64, season_number: u32) -> Result<Season> {
        let path = format!("tv/{series_id}/season/{season_number}");
        self.get_json(&path, &[]).await
    }

    #[instrument(skip_all, fields(request_type = %request.request_type))]
    async fn listing(&self, request: &TmdbRequest) -> Result<TmdbPagingResponse> {
        let path = request.build_path()?;
        self.get_json(&path, &[]).await
    }

    #[instrument(skip_all)]
    async fn search_multi(&self, query: &str, page: u32) -> Result<TmdbPagingResponse> {
        let params = [
            ("query", String::from(query)),
            ("language", String::from(LANGUAGE)),
            ("page", page.to_string()),
        ];
        self.get_json("search/multi", &params).await
    }
}
