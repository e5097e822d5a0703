//! Zip archiving

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::sync::CancellationToken;

use crate::client::Client;
use crate::envelope::Envelope;
use crate::error::{Error, Result};
use crate::params::Params;
use crate::types::FileLink;

/// Which files and folders go into the archive
#[derive(Debug, Clone, Default)]
pub struct ZipSelection {
    pub folder_ids: Vec<u64>,
    pub file_ids: Vec<u64>,
}

/// Options for zip generation
#[derive(Debug, Clone, Default)]
pub struct ZipOpts {
    pub force_download: bool,
    /// Name the served archive
    pub filename: Option<String>,
    /// Timezone offset applied to entry timestamps, e.g. `"+0200"`
    pub time_offset: Option<String>,
    /// Serving speed cap, bytes per second (link variant only)
    pub max_speed: Option<u32>,
}

fn join_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn apply_zip_params(params: &mut Params, selection: &ZipSelection, opts: &ZipOpts) {
    if !selection.folder_ids.is_empty() {
        params.set("folderids", join_ids(&selection.folder_ids));
    }
    if !selection.file_ids.is_empty() {
        params.set("fileids", join_ids(&selection.file_ids));
    }
    if opts.force_download {
        params.set("forcedownload", "1");
    }
    if let Some(filename) = &opts.filename {
        params.set("filename", filename.clone());
    }
    if let Some(time_offset) = &opts.time_offset {
        params.set("timeoffset", time_offset.clone());
    }
}

impl Client {
    /// Derived download URLs for a prepared zip, one per candidate host
    pub async fn zip_link(
        &self,
        cancel: &CancellationToken,
        selection: &ZipSelection,
        opts: ZipOpts,
    ) -> Result<Vec<String>> {
        let mut params = Params::new();
        apply_zip_params(&mut params, selection, &opts);
        if let Some(max_speed) = opts.max_speed {
            params.set("maxspeed", max_speed.to_string());
        }

        let response: FileLink = self.invoke(cancel, "getziplink", params).await?;
        Ok(response
            .hosts
            .iter()
            .map(|host| format!("https://{}{}", host, response.path))
            .collect())
    }

    /// Stream a zip of the selection straight off the API host.
    ///
    /// A non-200 answer carries a JSON envelope instead of zip bytes; it is
    /// drained and translated into the usual error taxonomy.
    pub async fn zip_stream(
        &self,
        cancel: &CancellationToken,
        selection: &ZipSelection,
        opts: ZipOpts,
    ) -> Result<Box<dyn AsyncRead + Send + Unpin>> {
        let mut params = Params::new();
        apply_zip_params(&mut params, selection, &opts);

        let mut body = self.invoke_stream(cancel, "getzip", params).await?;
        if body.status != 200 {
            let mut buf = Vec::new();
            body.reader
                .read_to_end(&mut buf)
                .await
                .map_err(|e| Error::Transport(e.into()))?;
            let envelope: Envelope =
                serde_json::from_slice(&buf).map_err(|e| Error::Decode(e.to_string()))?;
            envelope.check()?;
            return Err(Error::Decode(format!(
                "zip request answered status {} without an envelope",
                body.status
            )));
        }

        Ok(body.reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{json_response, stream_response, test_client, MockTransport};
    use pcloud_transport::StreamingBody;

    #[tokio::test]
    async fn test_zip_link_derives_one_url_per_host() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .times(1)
            .withf(|request| {
                request.url.contains("getziplink") && request.url.contains("folderids=1%2C2")
            })
            .returning(|_| {
                Ok(json_response(
                    r#"{"result": 0, "path": "/z.zip", "hosts": ["h1", "h2"]}"#,
                ))
            });

        let client = test_client(transport);
        let links = client
            .zip_link(
                &CancellationToken::new(),
                &ZipSelection {
                    folder_ids: vec![1, 2],
                    ..Default::default()
                },
                ZipOpts::default(),
            )
            .await
            .unwrap();

        assert_eq!(links, vec!["https://h1/z.zip", "https://h2/z.zip"]);
    }

    #[tokio::test]
    async fn test_zip_stream_returns_raw_bytes() {
        let mut transport = MockTransport::new();
        transport
            .expect_fetch_stream()
            .times(1)
            .withf(|request| request.url.contains("getzip") && request.url.contains("fileids=7"))
            .returning(|_| Ok(stream_response(b"PK\x03\x04zipdata")));

        let client = test_client(transport);
        let mut reader = client
            .zip_stream(
                &CancellationToken::new(),
                &ZipSelection {
                    file_ids: vec![7],
                    ..Default::default()
                },
                ZipOpts::default(),
            )
            .await
            .unwrap();

        let mut content = Vec::new();
        reader.read_to_end(&mut content).await.unwrap();
        assert_eq!(&content[..2], b"PK");
    }

    #[tokio::test]
    async fn test_zip_stream_translates_error_envelopes() {
        let mut transport = MockTransport::new();
        transport.expect_fetch_stream().times(1).returning(|_| {
            let body = br#"{"result": 1000, "error": "Log in required."}"#;
            Ok(StreamingBody {
                status: 400,
                content_length: Some(body.len() as u64),
                reader: Box::new(std::io::Cursor::new(body.to_vec())),
            })
        });

        let client = test_client(transport);
        let result = client
            .zip_stream(
                &CancellationToken::new(),
                &ZipSelection::default(),
                ZipOpts::default(),
            )
            .await;

        assert!(matches!(result.err(), Some(Error::Api { code: 1000, .. })));
    }
}
