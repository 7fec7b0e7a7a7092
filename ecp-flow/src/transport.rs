use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{HttpRequest, HttpResponse};

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error(transparent)]
    Http(reqwest::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        match value.is_timeout() {
            true => Self::Timeout,
            false => Self::Http(value),
        }
    }
}

/// Sends one request and returns the whole response.
///
/// Implementations are expected to keep cookies between calls: the session
/// cookie set by the SP at the end of the handshake is the whole point of
/// logging in.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

pub type ArcHttpClient = Arc<dyn HttpClient>;

/// `reqwest` with its cookie store enabled
#[derive(Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Result<Self, TransportError> {
        let inner = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self { inner })
    }

    /// Reuse a client configured by the caller (proxy, custom roots, shared cookie jar...)
    pub fn with_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        tracing::trace!(method=%request.method, url=%request.url, "sending request");
        let mut builder = self
            .inner
            .request(request.method, request.url)
            .headers(request.headers)
            .timeout(request.timeout);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await?.to_vec();
        tracing::trace!(status=%status, len = body.len(), "received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
