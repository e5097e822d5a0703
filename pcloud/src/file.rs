//! File operations: upload, download, and file CRUD
//!
//! Uploads are at-least-once: if the server stores the file but the response
//! is lost or undecodable, the error surfaces here and nothing is rolled
//! back. Callers that retry must be prepared for duplicates (or set
//! `rename_if_exists`).

use bytes::Bytes;
use serde::Deserialize;
use std::fmt;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};
use tokio_util::sync::CancellationToken;

use pcloud_transport::TransportError;

use crate::client::Client;
use crate::envelope::{Ack, ApiResponse, Envelope};
use crate::error::{Error, Result};
use crate::multipart::MultipartBody;
use crate::params::Params;
use crate::types::{FileLink, Metadata, MetadataResponse};

/// Field name the upload endpoint expects the file part under
const UPLOAD_FIELD: &str = "file";

const UPLOAD_CHUNK: usize = 64 * 1024;

/// Progress observer: cumulative bytes transferred, total when known
pub type ProgressFn = Arc<dyn Fn(u64, Option<u64>) + Send + Sync>;

#[derive(Clone, Default)]
pub struct UploadOpts {
    /// Reject partial uploads server-side
    pub no_partial: bool,
    /// Rename instead of overwriting an existing file of the same name
    pub rename_if_exists: bool,
    /// Unix mtime to record on the uploaded file
    pub modified_time: Option<i64>,
    /// Unix ctime to record on the uploaded file
    pub created_time: Option<i64>,
    pub on_progress: Option<ProgressFn>,
}

impl fmt::Debug for UploadOpts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadOpts")
            .field("no_partial", &self.no_partial)
            .field("rename_if_exists", &self.rename_if_exists)
            .field("modified_time", &self.modified_time)
            .field("created_time", &self.created_time)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

#[derive(Clone, Default)]
pub struct DownloadOpts {
    pub on_progress: Option<ProgressFn>,
}

impl fmt::Debug for DownloadOpts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadOpts")
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

/// Upload content plus its length, when the length is cheaply known.
///
/// In-memory bytes report their length; files report it from metadata; a
/// plain reader does not.
pub struct UploadSource {
    reader: Box<dyn AsyncRead + Send + Unpin>,
    len: Option<u64>,
}

impl UploadSource {
    /// A reader of unknown length
    pub fn reader(reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self {
            reader: Box::new(reader),
            len: None,
        }
    }

    /// In-memory bytes
    pub fn bytes(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        let len = bytes.len() as u64;
        Self {
            reader: Box::new(io::Cursor::new(bytes)),
            len: Some(len),
        }
    }

    /// A file on disk; length comes from its metadata
    pub async fn file(file: tokio::fs::File) -> io::Result<Self> {
        let len = file.metadata().await?.len();
        Ok(Self {
            reader: Box::new(file),
            len: Some(len),
        })
    }

    pub fn len(&self) -> Option<u64> {
        self.len
    }
}

impl From<Bytes> for UploadSource {
    fn from(bytes: Bytes) -> Self {
        Self::bytes(bytes)
    }
}

impl From<Vec<u8>> for UploadSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::bytes(Bytes::from(bytes))
    }
}

impl From<&'static str> for UploadSource {
    fn from(text: &'static str) -> Self {
        Self::bytes(Bytes::from_static(text.as_bytes()))
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(flatten)]
    envelope: Envelope,
    #[serde(default)]
    metadata: Vec<Metadata>,
}

impl ApiResponse for UploadResponse {
    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

fn apply_upload_opts(params: &mut Params, opts: &UploadOpts) {
    if opts.no_partial {
        params.set("nopartial", "1");
    }
    if opts.rename_if_exists {
        params.set("renameifexists", "1");
    }
    if let Some(mtime) = opts.modified_time {
        params.set("mtime", mtime.to_string());
    }
    if let Some(ctime) = opts.created_time {
        params.set("ctime", ctime.to_string());
    }
}

/// Reports cumulative bytes to a callback; never alters the bytes
struct ProgressReader<R> {
    inner: R,
    transferred: u64,
    total: Option<u64>,
    on_progress: ProgressFn,
}

impl<R: AsyncRead + Unpin> AsyncRead for ProgressReader<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let me = self.get_mut();
        let before = buf.filled().len();
        match Pin::new(&mut me.inner).poll_read(cx, buf) {
            Poll::Ready(Ok(())) => {
                let read = buf.filled().len() - before;
                if read > 0 {
                    me.transferred += read as u64;
                    (me.on_progress)(me.transferred, me.total);
                }
                Poll::Ready(Ok(()))
            }
            other => other,
        }
    }
}

impl Client {
    /// Upload into a folder by id
    pub async fn upload(
        &self,
        cancel: &CancellationToken,
        folder_id: u64,
        filename: &str,
        content: impl Into<UploadSource>,
        opts: UploadOpts,
    ) -> Result<Metadata> {
        let mut params = Params::new();
        params.set("folderid", folder_id.to_string());
        params.set("filename", filename);
        self.upload_inner(cancel, params, filename, content.into(), opts)
            .await
    }

    /// Upload into a folder addressed by path
    pub async fn upload_by_path(
        &self,
        cancel: &CancellationToken,
        path: &str,
        filename: &str,
        content: impl Into<UploadSource>,
        opts: UploadOpts,
    ) -> Result<Metadata> {
        let mut params = Params::new();
        params.set("path", path);
        params.set("filename", filename);
        self.upload_inner(cancel, params, filename, content.into(), opts)
            .await
    }

    async fn upload_inner(
        &self,
        cancel: &CancellationToken,
        mut params: Params,
        filename: &str,
        mut source: UploadSource,
        opts: UploadOpts,
    ) -> Result<Metadata> {
        apply_upload_opts(&mut params, &opts);

        let total = source.len();
        let mut body = MultipartBody::new();
        body.begin_file_part(UPLOAD_FIELD, filename);

        // The read path is only observed, never transformed: every byte read
        // lands in the part unchanged.
        let mut chunk = vec![0u8; UPLOAD_CHUNK];
        let mut transferred: u64 = 0;
        loop {
            let read = source
                .reader
                .read(&mut chunk)
                .await
                .map_err(|e| Error::Transport(TransportError::Io(e)))?;
            if read == 0 {
                break;
            }
            body.extend_content(&chunk[..read]);
            transferred += read as u64;
            if let Some(progress) = &opts.on_progress {
                progress(transferred, total);
            }
        }

        let content_type = body.content_type();
        let response: UploadResponse = self
            .invoke_post(cancel, "uploadfile", params, body.finish(), content_type)
            .await?;

        response
            .metadata
            .into_iter()
            .next()
            .ok_or_else(|| Error::Decode("upload response carried no metadata".to_string()))
    }

    /// Fetch a direct link, then stream the content.
    ///
    /// The content read goes to the link host, not the API host, so only the
    /// link fetch counts against the rate limit.
    pub async fn download(
        &self,
        cancel: &CancellationToken,
        file_id: u64,
        opts: DownloadOpts,
    ) -> Result<Box<dyn AsyncRead + Send + Unpin>> {
        let link = self.file_link(cancel, file_id).await?;
        self.download_from_link(cancel, &link, opts).await
    }

    /// Same as [`download`](Client::download), addressed by path
    pub async fn download_by_path(
        &self,
        cancel: &CancellationToken,
        path: &str,
        opts: DownloadOpts,
    ) -> Result<Box<dyn AsyncRead + Send + Unpin>> {
        let link = self.file_link_by_path(cancel, path).await?;
        self.download_from_link(cancel, &link, opts).await
    }

    async fn download_from_link(
        &self,
        cancel: &CancellationToken,
        link: &FileLink,
        opts: DownloadOpts,
    ) -> Result<Box<dyn AsyncRead + Send + Unpin>> {
        let url = link.url();
        if url.is_empty() {
            return Err(Error::InvalidArgument("file link has no hosts".to_string()));
        }

        let body = self.fetch_content(cancel, url).await?;
        if body.status != 200 {
            return Err(Error::Transport(TransportError::Request(format!(
                "download failed with status {}",
                body.status
            ))));
        }

        match opts.on_progress {
            Some(on_progress) => Ok(Box::new(ProgressReader {
                inner: body.reader,
                transferred: 0,
                total: body.content_length,
                on_progress,
            })),
            None => Ok(body.reader),
        }
    }

    /// Metadata for a file
    pub async fn stat(&self, cancel: &CancellationToken, file_id: u64) -> Result<Metadata> {
        let mut params = Params::new();
        params.set("fileid", file_id.to_string());

        let response: MetadataResponse = self.invoke(cancel, "stat", params).await?;
        Ok(response.metadata)
    }

    pub async fn stat_by_path(&self, cancel: &CancellationToken, path: &str) -> Result<Metadata> {
        let mut params = Params::new();
        params.set("path", path);

        let response: MetadataResponse = self.invoke(cancel, "stat", params).await?;
        Ok(response.metadata)
    }

    pub async fn delete_file(&self, cancel: &CancellationToken, file_id: u64) -> Result<()> {
        let mut params = Params::new();
        params.set("fileid", file_id.to_string());

        let _: Ack = self.invoke(cancel, "deletefile", params).await?;
        Ok(())
    }

    pub async fn delete_file_by_path(
        &self,
        cancel: &CancellationToken,
        path: &str,
    ) -> Result<()> {
        let mut params = Params::new();
        params.set("path", path);

        let _: Ack = self.invoke(cancel, "deletefile", params).await?;
        Ok(())
    }

    pub async fn rename_file(
        &self,
        cancel: &CancellationToken,
        file_id: u64,
        new_name: &str,
    ) -> Result<Metadata> {
        let mut params = Params::new();
        params.set("fileid", file_id.to_string());
        params.set("toname", new_name);

        let response: MetadataResponse = self.invoke(cancel, "renamefile", params).await?;
        Ok(response.metadata)
    }

    pub async fn move_file(
        &self,
        cancel: &CancellationToken,
        file_id: u64,
        to_folder_id: u64,
        name: &str,
    ) -> Result<Metadata> {
        let mut params = Params::new();
        params.set("fileid", file_id.to_string());
        params.set("tofolderid", to_folder_id.to_string());
        params.set("toname", name);

        let response: MetadataResponse = self.invoke(cancel, "renamefile", params).await?;
        Ok(response.metadata)
    }

    pub async fn copy_file(
        &self,
        cancel: &CancellationToken,
        file_id: u64,
        to_folder_id: u64,
    ) -> Result<Metadata> {
        let mut params = Params::new();
        params.set("fileid", file_id.to_string());
        params.set("tofolderid", to_folder_id.to_string());

        let response: MetadataResponse = self.invoke(cancel, "copyfile", params).await?;
        Ok(response.metadata)
    }
}
