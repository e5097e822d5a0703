//! HTTP transport abstraction
//!
//! The SDK never talks to the network directly; it goes through the
//! [`HttpClient`] trait so the owner can swap in a custom transport
//! (proxy/TLS configuration, instrumentation, test doubles).

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use tokio::io::AsyncRead;

use crate::error::Result;

/// HTTP method types
///
/// The pCloud protocol only ever issues query-style GETs and multipart POSTs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A fully-composed outbound request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Bytes>,
    pub content_type: Option<String>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
            content_type: None,
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Attach a body with its declared content type
    pub fn body(mut self, body: Bytes, content_type: impl Into<String>) -> Self {
        self.body = Some(body);
        self.content_type = Some(content_type.into());
        self
    }
}

/// A fully-buffered response
///
/// `execute` drains the wire before returning, so the connection is always
/// released regardless of what the caller does with the body.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl HttpResponse {
    /// Whether the response status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// An incrementally-readable response body for downloads
///
/// `content_length` is whatever the server declared, if anything.
pub struct StreamingBody {
    pub status: u16,
    pub content_length: Option<u64>,
    pub reader: Box<dyn AsyncRead + Send + Unpin>,
}

/// Async HTTP client trait
///
/// Implementations must be safe to share across concurrent calls.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute a request and buffer the entire response body.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`](crate::TransportError) if the connection
    /// fails, the request times out, or the body cannot be read. HTTP error
    /// statuses are not transport errors; they come back as a normal
    /// [`HttpResponse`].
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Execute a request and hand the body back as an async reader.
    ///
    /// Used for content downloads and zip archives that should not be
    /// buffered in memory.
    async fn fetch_stream(&self, request: HttpRequest) -> Result<StreamingBody>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = HttpRequest::get("https://api.pcloud.com/userinfo")
            .header("Accept", "application/json");

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.url, "https://api.pcloud.com/userinfo");
        assert_eq!(
            request.headers.get("Accept"),
            Some(&"application/json".to_string())
        );
        assert!(request.body.is_none());
    }

    #[test]
    fn test_post_body_sets_content_type() {
        let request = HttpRequest::post("https://api.pcloud.com/uploadfile")
            .body(Bytes::from_static(b"data"), "multipart/form-data; boundary=x");

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.body.as_deref(), Some(&b"data"[..]));
        assert_eq!(
            request.content_type.as_deref(),
            Some("multipart/form-data; boundary=x")
        );
    }

    #[test]
    fn test_response_status_checks() {
        let response = HttpResponse {
            status: 200,
            headers: HashMap::new(),
            body: Bytes::from_static(b"{}"),
        };
        assert!(response.is_success());

        let response = HttpResponse {
            status: 404,
            headers: HashMap::new(),
            body: Bytes::new(),
        };
        assert!(!response.is_success());
    }
}
