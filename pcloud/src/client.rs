//! Client construction and the request dispatch path
//!
//! Every endpoint wrapper funnels through [`Client::dispatch`]: attach the
//! credential, pass the rate-limiter gate, build the signed URL, run the
//! transport call under the caller's cancellation, decode the envelope, and
//! translate the result code.

use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};
use url::Url;

use pcloud_transport::{HttpClient, HttpRequest, StreamingBody};

use crate::credentials::{Credential, TokenSource};
use crate::envelope::ApiResponse;
use crate::error::{Error, Result};
use crate::limiter::{RateLimiter, DEFAULT_RATE_PER_MINUTE};
use crate::params::Params;

/// Default (US) API region
pub const BASE_URL_US: &str = "https://api.pcloud.com";
/// EU API region
pub const BASE_URL_EU: &str = "https://eapi.pcloud.com";

/// A handle to one account's view of the API.
///
/// Cheap to share behind an `Arc`; all state (credential, rate limiter) is
/// safe under concurrent calls. The credential is owned by this instance and
/// never shared across clients.
pub struct Client {
    base_url: Url,
    transport: Arc<dyn HttpClient>,
    credential: RwLock<Credential>,
    limiter: RwLock<Arc<RateLimiter>>,
}

impl Client {
    /// Client against `base_url` with the default transport.
    ///
    /// See [`BASE_URL_US`] and [`BASE_URL_EU`] for the two regions.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::builder(base_url).build()
    }

    pub fn builder(base_url: &str) -> ClientBuilder {
        ClientBuilder {
            base_url: base_url.to_string(),
            transport: None,
            credential: Credential::Anonymous,
            rate_per_minute: DEFAULT_RATE_PER_MINUTE,
        }
    }

    /// Replace the credential with a static bearer token
    pub async fn set_auth(&self, token: impl Into<String>) {
        *self.credential.write().await = Credential::Token(token.into());
    }

    /// Replace the credential with a refreshable token source
    pub async fn set_token_source(&self, source: Arc<dyn TokenSource>) {
        *self.credential.write().await = Credential::Source(source);
    }

    pub(crate) async fn clear_auth(&self) {
        *self.credential.write().await = Credential::Anonymous;
    }

    /// Swap in a new rate limit.
    ///
    /// The limiter is replaced wholesale; calls already suspended keep
    /// waiting against the instance they hold. Rates below one permit per
    /// minute are clamped up.
    pub async fn set_rate_limit(&self, permits_per_minute: u32) {
        *self.limiter.write().await = Arc::new(RateLimiter::per_minute(permits_per_minute));
    }

    fn endpoint_url(&self, endpoint: &str, params: &Params) -> String {
        let mut url = self.base_url.clone();
        url.set_path(endpoint);
        if !params.is_empty() {
            url.set_query(Some(&params.encode()));
        }
        url.to_string()
    }

    /// Sign the parameter set and pass the admission gate
    async fn admit(&self, cancel: &CancellationToken, params: &mut Params) -> Result<()> {
        let credential = self.credential.read().await.clone();
        credential.attach(cancel, params).await?;

        let limiter = Arc::clone(&*self.limiter.read().await);
        limiter.acquire(cancel).await
    }

    /// Query-style GET against an endpoint
    pub(crate) async fn invoke<T: ApiResponse>(
        &self,
        cancel: &CancellationToken,
        endpoint: &str,
        params: Params,
    ) -> Result<T> {
        self.dispatch(cancel, endpoint, params, None).await
    }

    /// POST with a prepared body and its declared content type
    pub(crate) async fn invoke_post<T: ApiResponse>(
        &self,
        cancel: &CancellationToken,
        endpoint: &str,
        params: Params,
        body: Bytes,
        content_type: String,
    ) -> Result<T> {
        self.dispatch(cancel, endpoint, params, Some((body, content_type)))
            .await
    }

    async fn dispatch<T: ApiResponse>(
        &self,
        cancel: &CancellationToken,
        endpoint: &str,
        mut params: Params,
        body: Option<(Bytes, String)>,
    ) -> Result<T> {
        self.admit(cancel, &mut params).await?;

        let url = self.endpoint_url(endpoint, &params);
        debug!(endpoint, "dispatching api call");

        let request = match body {
            None => HttpRequest::get(url),
            Some((bytes, content_type)) => HttpRequest::post(url).body(bytes, content_type),
        };

        // Dropping the transport future on cancellation aborts the in-flight
        // connection; the buffered-body contract of `execute` releases it on
        // every other path.
        let response = tokio::select! {
            result = self.transport.execute(request) => result.map_err(|e| {
                error!(endpoint, error = %e, "transport failure");
                Error::Transport(e)
            })?,
            _ = cancel.cancelled() => return Err(Error::Cancelled),
        };

        let decoded: T = serde_json::from_slice(&response.body).map_err(|e| {
            error!(endpoint, error = %e, "failed to decode response");
            Error::Decode(e.to_string())
        })?;

        decoded.envelope().check()?;
        Ok(decoded)
    }

    /// Admitted, signed streaming GET against an API endpoint
    pub(crate) async fn invoke_stream(
        &self,
        cancel: &CancellationToken,
        endpoint: &str,
        mut params: Params,
    ) -> Result<StreamingBody> {
        self.admit(cancel, &mut params).await?;

        let url = self.endpoint_url(endpoint, &params);
        debug!(endpoint, "dispatching streaming api call");

        tokio::select! {
            result = self.transport.fetch_stream(HttpRequest::get(url)) => result.map_err(|e| {
                error!(endpoint, error = %e, "transport failure");
                Error::Transport(e)
            }),
            _ = cancel.cancelled() => Err(Error::Cancelled),
        }
    }

    /// Raw content fetch from a link host.
    ///
    /// Content hosts are not the API host, so these reads skip the rate
    /// limiter; only API calls are admission-controlled.
    pub(crate) async fn fetch_content(
        &self,
        cancel: &CancellationToken,
        url: String,
    ) -> Result<StreamingBody> {
        debug!(url = %url, "fetching content");

        tokio::select! {
            result = self.transport.fetch_stream(HttpRequest::get(url)) => result.map_err(|e| {
                error!(error = %e, "content fetch failure");
                Error::Transport(e)
            }),
            _ = cancel.cancelled() => Err(Error::Cancelled),
        }
    }
}

/// Configuration surface for [`Client`]
///
/// Capabilities (a custom transport, an initial credential, a rate limit)
/// are injected here; everything has a sensible default.
pub struct ClientBuilder {
    base_url: String,
    transport: Option<Arc<dyn HttpClient>>,
    credential: Credential,
    rate_per_minute: u32,
}

impl ClientBuilder {
    /// Use a custom transport (proxy/TLS configuration, test double)
    pub fn transport(mut self, transport: Arc<dyn HttpClient>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Start with a static bearer token
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.credential = Credential::Token(token.into());
        self
    }

    /// Start with a refreshable token source
    pub fn token_source(mut self, source: Arc<dyn TokenSource>) -> Self {
        self.credential = Credential::Source(source);
        self
    }

    /// Outbound call allowance in permits per minute (burst 1)
    pub fn rate_limit(mut self, permits_per_minute: u32) -> Self {
        self.rate_per_minute = permits_per_minute;
        self
    }

    pub fn build(self) -> Result<Client> {
        let base_url = Url::parse(&self.base_url)
            .map_err(|e| Error::InvalidArgument(format!("invalid base url {:?}: {}", self.base_url, e)))?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => default_transport()?,
        };

        Ok(Client {
            base_url,
            transport,
            credential: RwLock::new(self.credential),
            limiter: RwLock::new(Arc::new(RateLimiter::per_minute(self.rate_per_minute))),
        })
    }
}

#[cfg(feature = "reqwest")]
fn default_transport() -> Result<Arc<dyn HttpClient>> {
    Ok(Arc::new(pcloud_transport::ReqwestHttpClient::new()))
}

#[cfg(not(feature = "reqwest"))]
fn default_transport() -> Result<Arc<dyn HttpClient>> {
    Err(Error::InvalidArgument(
        "no transport configured; enable the `reqwest` feature or supply one".to_string(),
    ))
}
