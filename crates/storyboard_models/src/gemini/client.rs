//! HTTP plumbing for the Gemini REST client: construction, status mapping, retry.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Response};
use serde::{Serialize, de::DeserializeOwned};
use storyboard_config::{Credential, ProviderConfig, StoryboardConfig};
use storyboard_error::{
    GenerationError, GenerationErrorKind, HttpError, JsonError, RetryableError, StoryboardResult,
};
use tokio_retry2::{Retry, RetryError, strategy::ExponentialBackoff, strategy::jitter};
use tracing::{debug, info, instrument, warn};

use super::protocol;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for the Google Generative Language REST API.
///
/// Holds one pooled `reqwest` client and the provider credential. Cheap to
/// clone; share it behind an `Arc<dyn GenerationProvider>`.
///
/// Transient provider statuses (408, 429, 5xx) are retried with exponential
/// backoff and jitter. The per-status strategy comes from
/// [`GenerationErrorKind::retry_strategy_params`] and can be overridden or
/// disabled through [`ProviderConfig`].
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    credential: Credential,
    base_url: String,
    no_retry: bool,
    max_retries: Option<usize>,
    retry_backoff_ms: Option<u64>,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("no_retry", &self.no_retry)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client with the default endpoint and retry behaviour.
    ///
    /// # Example
    ///
    /// ```
    /// use storyboard_config::Credential;
    /// use storyboard_models::GeminiClient;
    ///
    /// let client = GeminiClient::new(Credential::new("test-key")).unwrap();
    /// assert!(format!("{:?}", client).contains("generativelanguage"));
    /// ```
    pub fn new(credential: Credential) -> StoryboardResult<Self> {
        Self::with_config(credential, &ProviderConfig::default())
    }

    /// Create a client with an explicit endpoint and retry configuration.
    #[instrument(name = "gemini_client_with_config", skip(credential))]
    pub fn with_config(credential: Credential, config: &ProviderConfig) -> StoryboardResult<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            credential,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            no_retry: config.no_retry,
            max_retries: config.max_retries,
            retry_backoff_ms: config.retry_backoff_ms,
        })
    }

    /// Create a client from the environment credential and layered configuration.
    ///
    /// # Errors
    ///
    /// [`GenerationErrorKind::MissingCredential`] when no API key is set, or a
    /// configuration error when the TOML sources fail to parse.
    #[instrument(name = "gemini_client_from_env")]
    pub fn from_env() -> StoryboardResult<Self> {
        let credential = Credential::from_env()?;
        let config = StoryboardConfig::load()?;
        Self::with_config(credential, &config.provider)
    }

    /// URL of a model method, e.g. `models/gemini-2.5-flash:generateContent`.
    pub(crate) fn model_url(&self, model: &str, method: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    /// URL of an operation resource.
    pub(crate) fn operation_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name.trim_start_matches('/'))
    }

    /// POST a JSON body and decode the JSON response, retrying transient statuses.
    pub(crate) async fn post_json<B, R>(&self, url: &str, body: &B) -> StoryboardResult<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        self.with_retry(url, || async move {
            debug!(url, "Sending provider request");
            let response = self
                .http
                .post(url)
                .header(API_KEY_HEADER, self.credential.api_key())
                .json(body)
                .send()
                .await
                .map_err(|e| HttpError::request(url, e))?;
            Self::decode(response).await
        })
        .await
    }

    /// GET a JSON resource, retrying transient statuses.
    pub(crate) async fn get_json<R>(&self, url: &str) -> StoryboardResult<R>
    where
        R: DeserializeOwned,
    {
        self.with_retry(url, || async move {
            debug!(url, "Querying provider resource");
            let response = self
                .http
                .get(url)
                .header(API_KEY_HEADER, self.credential.api_key())
                .send()
                .await
                .map_err(|e| HttpError::request(url, e))?;
            Self::decode(response).await
        })
        .await
    }

    /// Download raw bytes with the credential attached. Never retried.
    ///
    /// Any failure, transport or status, is a [`GenerationErrorKind::Network`].
    #[instrument(skip(self))]
    pub(crate) async fn download(&self, uri: &str) -> StoryboardResult<Vec<u8>> {
        let response = self
            .http
            .get(uri)
            .header(API_KEY_HEADER, self.credential.api_key())
            .send()
            .await
            .map_err(|e| {
                GenerationError::new(GenerationErrorKind::Network(format!(
                    "download request failed: {}",
                    e
                )))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::new(GenerationErrorKind::Network(format!(
                "download returned HTTP {}",
                status.as_u16()
            )))
            .into());
        }

        let bytes = response.bytes().await.map_err(|e| {
            GenerationError::new(GenerationErrorKind::Network(format!(
                "download body read failed: {}",
                e
            )))
        })?;
        debug!(bytes = bytes.len(), "Downloaded media");
        Ok(bytes.to_vec())
    }

    /// Map a response to its decoded body, or to a provider status error.
    async fn decode<R: DeserializeOwned>(response: Response) -> StoryboardResult<R> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HttpError::new(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            let message = protocol::error_message(&body).unwrap_or(body);
            return Err(GenerationError::new(GenerationErrorKind::ProviderStatus {
                status_code: status.as_u16(),
                message,
            })
            .into());
        }

        serde_json::from_str(&body).map_err(|e| JsonError::provider_response(e, &body).into())
    }

    /// Run `call`, retrying it while it fails with a retryable error.
    async fn with_retry<T, F, Fut>(&self, target: &str, mut call: F) -> StoryboardResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = StoryboardResult<T>>,
    {
        let first = call().await;
        let err = match first {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if self.no_retry || !err.is_retryable() {
            return Err(err);
        }

        let (mut initial_ms, mut retries, max_delay_secs) = err.retry_strategy_params();
        if let Some(override_backoff) = self.retry_backoff_ms {
            initial_ms = override_backoff;
        }
        if let Some(override_retries) = self.max_retries {
            retries = override_retries;
        }

        info!(
            error = %err,
            target,
            initial_backoff_ms = initial_ms,
            max_retries = retries,
            max_delay_secs,
            "Provider request failed, will retry with configured strategy"
        );

        let retry_strategy = ExponentialBackoff::from_millis(initial_ms)
            .factor(2)
            .max_delay(Duration::from_secs(max_delay_secs))
            .map(jitter)
            .take(retries);

        Retry::spawn(retry_strategy, || {
            let attempt = call();
            async move {
                attempt.await.map_err(|e| {
                    if e.is_retryable() {
                        warn!(error = %e, "Provider request failed, will retry");
                        RetryError::Transient {
                            err: e,
                            retry_after: None,
                        }
                    } else {
                        warn!(error = %e, "Permanent provider error, failing immediately");
                        RetryError::Permanent(e)
                    }
                })
            }
        })
        .await
    }
}
