//! Shared HTTP plumbing: timeout, user agent and a per-client rate limiter.

use crate::error::{ProviderError, Result};
use governor::{Quota, RateLimiter};
use market_pulse_core::HttpConfig;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

#[derive(Clone)]
pub struct HttpClient {
    http: Client,
    rate_limiter: Arc<DirectRateLimiter>,
    requests_per_minute: NonZeroU32,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("requests_per_minute", &self.requests_per_minute)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Builds a client from the shared HTTP settings.
    ///
    /// # Errors
    /// Returns error if the rate is zero or the TLS backend fails to initialize.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let requests_per_minute = NonZeroU32::new(config.requests_per_minute).ok_or_else(|| {
            ProviderError::Configuration("requests_per_minute must be at least 1".to_string())
        })?;
        Self::with_settings(config.timeout(), &config.user_agent, requests_per_minute)
    }

    /// # Errors
    /// Returns error if the TLS backend fails to initialize.
    pub fn with_settings(
        timeout: Duration,
        user_agent: &str,
        requests_per_minute: NonZeroU32,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ProviderError::Network(format!("failed to build HTTP client: {e}")))?;

        let quota = Quota::per_minute(requests_per_minute);
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Ok(Self {
            http,
            rate_limiter,
            requests_per_minute,
        })
    }

    /// Starts a GET request; send it with [`HttpClient::send_json`].
    pub fn get(&self, url: &str) -> RequestBuilder {
        tracing::debug!("GET {}", url);
        self.http.get(url).header("Accept", "application/json")
    }

    /// Waits for the rate limiter, sends the request and decodes a JSON body.
    ///
    /// # Errors
    /// Returns error on transport failure, non-2xx status or undecodable body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        Self::handle_response(response).await
    }

    /// Like [`HttpClient::send_json`] but maps 404 to `Ok(None)`.
    ///
    /// # Errors
    /// Same as [`HttpClient::send_json`] for every status except 404.
    pub async fn send_json_optional<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Option<T>> {
        let response = self.send(request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::handle_response(response).await.map(Some)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        self.rate_limiter.until_ready().await;
        Ok(request.send().await?)
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(ProviderError::rate_limit(retry_after));
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::api(status.as_u16(), text));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
