//! Client layer: request execution, configuration and the service façades.

mod templates;
mod verify;
mod webhooks;

use std::borrow::Cow;
use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};

use crate::domain::{ApiKey, ValidationError};

pub use templates::Templates;
pub use verify::{Sessions, Verify};
pub use webhooks::Webhooks;

const DEFAULT_BASE_URL: &str = "https://sendly.live/api/v1";
const DEFAULT_USER_AGENT: &str = concat!("sendly-rust/", env!("CARGO_PKG_VERSION"));
const BASE_URL_ENV_VAR: &str = "SENDLY_BASE_URL";
const JSON: &str = "application/json";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Clone)]
struct HttpRequest {
    method: Method,
    url: String,
    api_key: ApiKey,
    body: Option<String>,
}

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn send<'a>(&'a self, request: HttpRequest) -> BoxFuture<'a, Result<HttpResponse, BoxError>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
    user_agent: String,
}

impl HttpTransport for ReqwestTransport {
    fn send<'a>(&'a self, request: HttpRequest) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
        Box::pin(async move {
            let mut builder = self
                .client
                .request(request.method, &request.url)
                .bearer_auth(request.api_key.as_str())
                .header(ACCEPT, JSON)
                .header(USER_AGENT, &self.user_agent);
            if let Some(body) = request.body {
                builder = builder.header(CONTENT_TYPE, JSON).body(body);
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SendlyClient`] and its façades.
///
/// Local validation failures never reach the network. Everything else is reported as
/// received: there is no retry and no reclassification.
pub enum SendlyError {
    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// Non-successful HTTP status with the API error envelope (`error`, `message`).
    #[error("API error (HTTP {status}): {code:?} {message:?}")]
    Api {
        status: u16,
        code: Option<String>,
        message: Option<String>,
    },

    /// Non-successful HTTP status with any other body.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Response body could not be decoded into the expected shape.
    #[error("parse error: {0}")]
    Parse(#[source] BoxError),

    /// Request body could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[source] BoxError),
}

impl SendlyError {
    /// HTTP status of the failed response, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn parse_error<E>(err: E) -> SendlyError
where
    E: StdError + Send + Sync + 'static,
{
    SendlyError::Parse(Box::new(err))
}

fn encode_error<E>(err: E) -> SendlyError
where
    E: StdError + Send + Sync + 'static,
{
    SendlyError::Encode(Box::new(err))
}

fn error_from_response(response: HttpResponse) -> SendlyError {
    if let Some(api) = crate::transport::decode_api_error(&response.body) {
        return SendlyError::Api {
            status: response.status,
            code: api.code,
            message: api.message,
        };
    }

    let body = if response.body.trim().is_empty() {
        None
    } else {
        Some(response.body)
    };
    SendlyError::HttpStatus {
        status: response.status,
        body,
    }
}

/// Percent-encode an id so it always stays a single path segment.
fn path_segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

fn normalize_base_url(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim().trim_end_matches('/');
    let invalid = || ValidationError::InvalidUrl {
        field: "base_url",
        input: value.to_owned(),
    };

    let parsed = url::Url::parse(trimmed).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }
    Ok(trimmed.to_owned())
}

// An unset or blank override keeps the default base URL.
fn with_base_url_override(
    builder: SendlyClientBuilder,
    base_url: Option<String>,
) -> SendlyClientBuilder {
    match base_url.filter(|value| !value.trim().is_empty()) {
        Some(base_url) => builder.base_url(base_url),
        None => builder,
    }
}

#[derive(Debug, Clone)]
/// Builder for [`SendlyClient`].
///
/// Use this when you need to customize the base URL, timeout, or user-agent.
pub struct SendlyClientBuilder {
    api_key: ApiKey,
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl SendlyClientBuilder {
    /// Create a builder with the default base URL and no timeout/user-agent override.
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the versioned API base URL (default `https://sendly.live/api/v1`).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`SendlyClient`].
    pub fn build(self) -> Result<SendlyClient, SendlyError> {
        let base_url = normalize_base_url(&self.base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| SendlyError::Transport(Box::new(err)))?;

        Ok(SendlyClient {
            api_key: self.api_key,
            base_url,
            http: Arc::new(ReqwestTransport {
                client,
                user_agent: self
                    .user_agent
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned()),
            }),
        })
    }
}

#[derive(Clone)]
/// High-level Sendly client.
///
/// Cheap to clone and safe to share between tasks. Operations are grouped into façades:
///
/// ```rust,no_run
/// use sendly::{ApiKey, SendlyClient, WebhookId};
///
/// # async fn run() -> Result<(), sendly::SendlyError> {
/// let client = SendlyClient::new(ApiKey::new("sk_test_...")?);
/// let webhook = client.webhooks().get(&WebhookId::new("whk_123")?).await?;
/// println!("{} -> {}", webhook.id.as_str(), webhook.url);
/// # Ok(())
/// # }
/// ```
pub struct SendlyClient {
    api_key: ApiKey,
    base_url: String,
    http: Arc<dyn HttpTransport>,
}

impl SendlyClient {
    /// Create a client using the default base URL.
    ///
    /// For more customization, use [`SendlyClient::builder`].
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_owned(),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
                user_agent: DEFAULT_USER_AGENT.to_owned(),
            }),
        }
    }

    /// Create a client from `SENDLY_API_KEY` and, if set, `SENDLY_BASE_URL`.
    pub fn from_env() -> Result<Self, SendlyError> {
        let builder = SendlyClientBuilder::new(ApiKey::from_env()?);
        with_base_url_override(builder, std::env::var(BASE_URL_ENV_VAR).ok()).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(api_key: ApiKey) -> SendlyClientBuilder {
        SendlyClientBuilder::new(api_key)
    }

    /// Base URL every request path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Webhook endpoint management.
    pub fn webhooks(&self) -> Webhooks<'_> {
        Webhooks::new(self)
    }

    /// OTP verification and hosted verification sessions.
    pub fn verify(&self) -> Verify<'_> {
        Verify::new(self)
    }

    /// Message template management.
    pub fn templates(&self) -> Templates<'_> {
        Templates::new(self)
    }

    /// Issue one request and return the body of a 2xx response.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<String, SendlyError> {
        tracing::debug!(%method, path, "sending Sendly API request");

        let request = HttpRequest {
            method: method.clone(),
            url: format!("{}{}", self.base_url, path),
            api_key: self.api_key.clone(),
            body,
        };
        let response = self
            .http
            .send(request)
            .await
            .map_err(SendlyError::Transport)?;

        if !(200..=299).contains(&response.status) {
            tracing::debug!(%method, path, status = response.status, "Sendly API request failed");
            return Err(error_from_response(response));
        }

        tracing::debug!(%method, path, status = response.status, "Sendly API request succeeded");
        Ok(response.body)
    }
}
