//! End-to-end flow against a scripted transport
//!
//! Exercises the full dispatch path the way a session would use it:
//! login, upload, stat, link fetch, and content download, asserting that the
//! bytes written come back unchanged and every call is signed after login.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;

use pcloud::{Client, DownloadOpts, UploadOpts, BASE_URL_US};
use pcloud_transport::{
    error::Result as TransportResult, HttpClient, HttpRequest, HttpResponse, StreamingBody,
};

#[derive(Debug)]
enum Scripted {
    Json(&'static str),
    Stream(&'static [u8]),
}

/// Serves a fixed sequence of responses and records every request
struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn request_urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.url.clone())
            .collect()
    }

    fn request_bodies(&self) -> Vec<Option<Bytes>> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.body.clone())
            .collect()
    }
}

#[async_trait]
impl HttpClient for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> TransportResult<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Json(body)) => Ok(HttpResponse {
                status: 200,
                headers: HashMap::new(),
                body: Bytes::from_static(body.as_bytes()),
            }),
            other => panic!("unexpected execute call, script served {:?}", other),
        }
    }

    async fn fetch_stream(&self, request: HttpRequest) -> TransportResult<StreamingBody> {
        self.requests.lock().unwrap().push(request);
        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Stream(body)) => Ok(StreamingBody {
                status: 200,
                content_length: Some(body.len() as u64),
                reader: Box::new(std::io::Cursor::new(body.to_vec())),
            }),
            other => panic!("unexpected fetch_stream call, script served {:?}", other),
        }
    }
}

const CONTENT: &[u8] = b"round trip payload";

#[tokio::test]
async fn test_upload_stat_download_round_trip() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        // login
        Scripted::Json(r#"{"result": 0, "auth": "session-token"}"#),
        // uploadfile
        Scripted::Json(
            r#"{"result": 0, "fileids": [500],
                "metadata": [{"name": "payload.bin", "fileid": 500, "size": 18,
                              "parentfolderid": 0}]}"#,
        ),
        // stat
        Scripted::Json(
            r#"{"result": 0,
                "metadata": {"name": "payload.bin", "fileid": 500, "size": 18}}"#,
        ),
        // getfilelink
        Scripted::Json(r#"{"result": 0, "path": "/payload.bin", "hosts": ["c1.pcloud.com"]}"#),
        // content fetch
        Scripted::Stream(CONTENT),
    ]));

    let client = Client::builder(BASE_URL_US)
        .transport(transport.clone() as Arc<dyn HttpClient>)
        .rate_limit(6000)
        .build()
        .unwrap();
    let cancel = CancellationToken::new();

    client
        .login(&cancel, "user@example.com", "password")
        .await
        .unwrap();

    let uploaded = client
        .upload(
            &cancel,
            0,
            "payload.bin",
            CONTENT.to_vec(),
            UploadOpts::default(),
        )
        .await
        .unwrap();
    assert_eq!(uploaded.size, Some(CONTENT.len() as u64));

    let stat = client.stat(&cancel, 500).await.unwrap();
    assert_eq!(stat.size, Some(CONTENT.len() as u64));

    let mut reader = client
        .download(&cancel, 500, DownloadOpts::default())
        .await
        .unwrap();
    let mut fetched = Vec::new();
    reader.read_to_end(&mut fetched).await.unwrap();
    assert_eq!(fetched, CONTENT);

    let urls = transport.request_urls();
    assert_eq!(urls.len(), 5);
    // Login goes out unauthenticated; everything after is signed
    assert!(urls[0].contains("getauth=1"));
    assert!(!urls[0].contains("auth=session-token"));
    for url in &urls[1..4] {
        assert!(url.contains("auth=session-token"), "unsigned call: {}", url);
    }
    // The content read goes to the link host, not the API host
    assert_eq!(urls[4], "https://c1.pcloud.com/payload.bin");

    // The multipart upload body carried the exact payload
    let bodies = transport.request_bodies();
    let upload_body = bodies[1].as_ref().expect("upload carried a body");
    let start = upload_body
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .unwrap()
        + 4;
    let end = (start..upload_body.len() - 3)
        .rev()
        .find(|&i| &upload_body[i..i + 4] == b"\r\n--")
        .unwrap();
    assert_eq!(&upload_body[start..end], CONTENT);
}

#[tokio::test]
async fn test_api_error_aborts_the_flow() {
    let transport = Arc::new(ScriptedTransport::new(vec![Scripted::Json(
        r#"{"result": 2000, "error": "Log in failed."}"#,
    )]));

    let client = Client::builder(BASE_URL_US)
        .transport(transport.clone() as Arc<dyn HttpClient>)
        .build()
        .unwrap();
    let cancel = CancellationToken::new();

    let result = client.login(&cancel, "user@example.com", "wrong").await;
    match result {
        Err(pcloud::Error::Api { code, message }) => {
            assert_eq!(code, 2000);
            assert_eq!(message, "Log in failed.");
        }
        other => panic!("expected api error, got {:?}", other),
    }

    // The failed login left no credential behind
    assert_eq!(transport.request_urls().len(), 1);
}
