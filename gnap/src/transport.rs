//! The HTTP seam: every exchange with resource and authorization servers goes through a
//! [Transport] so that the engine can run against a scripted server in tests.

use http::{HeaderMap, Method, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::prelude::*;

/// An outgoing request. A signed request is just a request carrying signature headers.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

/// Ephemeral result of [GnapClient::sign_request], never persisted
pub type SignedRequest = HttpRequest;

impl HttpRequest {
    /// Bodiless and unauthenticated
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json_body<T: DeserializeOwned>(&self) -> RustyGnapResult<T> {
        let body = self
            .body
            .as_deref()
            .ok_or(RustyGnapError::ClientImplementationError("request has no body"))?;
        Ok(serde_json::from_str(body)?)
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Deserializes the body of a successful response
    pub fn json<T: DeserializeOwned>(&self) -> RustyGnapResult<T> {
        if !self.status.is_success() {
            return Err(RustyGnapError::UnexpectedStatus {
                status: self.status.as_u16(),
                body: String::from_utf8_lossy(&self.body).into_owned(),
            });
        }
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// A response carrying a JSON document
    pub fn json_body(status: u16, body: serde_json::Value) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(http::header::CONTENT_TYPE, http::HeaderValue::from_static("application/json"));
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            headers,
            body: body.to_string().into_bytes(),
        }
    }
}

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> RustyGnapResult<HttpResponse>;
}

/// [Transport] over a pooled `reqwest` client with bounded timeouts
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &GnapConfig) -> RustyGnapResult<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;
        Ok(Self { client })
    }

    /// Timeouts and unreachable hosts become [RustyGnapError::TransportError]
    fn delivery_error(url: &Url, e: reqwest::Error) -> RustyGnapError {
        if e.is_timeout() {
            RustyGnapError::TransportError(format!("request to '{url}' timed out"))
        } else if e.is_connect() {
            RustyGnapError::TransportError(format!("cannot connect to '{url}': {e}"))
        } else {
            RustyGnapError::HttpClientError(e)
        }
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> RustyGnapResult<HttpResponse> {
        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        let url = request.url.clone();
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        let response = builder.send().await.map_err(|e| Self::delivery_error(&url, e))?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| Self::delivery_error(&url, e))?
            .to_vec();
        tracing::debug!(%status, "received response");
        Ok(HttpResponse { status, headers, body })
    }
}
