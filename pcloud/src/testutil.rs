//! Shared test doubles
//!
//! A mockall double of the transport trait plus canned-response helpers,
//! used by the unit tests across modules.

use bytes::Bytes;
use mockall::mock;
use std::collections::HashMap;
use std::sync::Arc;

use pcloud_transport::{
    error::Result as TransportResult, HttpClient, HttpRequest, HttpResponse, StreamingBody,
};

use crate::client::{Client, BASE_URL_US};

mock! {
    pub Transport {}

    #[async_trait::async_trait]
    impl HttpClient for Transport {
        async fn execute(&self, request: HttpRequest) -> TransportResult<HttpResponse>;
        async fn fetch_stream(&self, request: HttpRequest) -> TransportResult<StreamingBody>;
    }
}

/// 200 response with a JSON body
pub fn json_response(body: &str) -> HttpResponse {
    HttpResponse {
        status: 200,
        headers: HashMap::new(),
        body: Bytes::from(body.to_string()),
    }
}

/// 200 streaming response over in-memory bytes
pub fn stream_response(body: &[u8]) -> StreamingBody {
    StreamingBody {
        status: 200,
        content_length: Some(body.len() as u64),
        reader: Box::new(std::io::Cursor::new(body.to_vec())),
    }
}

/// Client wired to the given transport double.
///
/// The rate limit is set high enough that sequential test dispatches never
/// sleep; limiter behavior has its own tests under virtual time.
pub fn test_client(transport: MockTransport) -> Client {
    Client::builder(BASE_URL_US)
        .transport(Arc::new(transport))
        .rate_limit(60_000)
        .build()
        .unwrap()
}
