//! Streaming links: direct download, video, audio, HLS

use tokio_util::sync::CancellationToken;

use crate::client::Client;
use crate::error::Result;
use crate::params::Params;
use crate::types::FileLink;

/// Options for [`Client::file_link_with_opts`]
#[derive(Debug, Clone, Default)]
pub struct FileLinkOpts {
    /// Serve with a content-disposition forcing a save dialog
    pub force_download: bool,
    /// Override the served content type
    pub content_type: Option<String>,
    /// Cap the serving speed, bytes per second
    pub max_speed: Option<u32>,
}

fn apply_link_opts(params: &mut Params, opts: &FileLinkOpts) {
    if opts.force_download {
        params.set("forcedownload", "1");
    }
    if let Some(content_type) = &opts.content_type {
        params.set("contenttype", content_type.clone());
    }
    if let Some(max_speed) = opts.max_speed {
        params.set("maxspeed", max_speed.to_string());
    }
}

impl Client {
    /// Direct download link for a file
    pub async fn file_link(&self, cancel: &CancellationToken, file_id: u64) -> Result<FileLink> {
        self.file_link_with_opts(cancel, file_id, FileLinkOpts::default())
            .await
    }

    pub async fn file_link_with_opts(
        &self,
        cancel: &CancellationToken,
        file_id: u64,
        opts: FileLinkOpts,
    ) -> Result<FileLink> {
        let mut params = Params::new();
        params.set("fileid", file_id.to_string());
        apply_link_opts(&mut params, &opts);

        self.invoke(cancel, "getfilelink", params).await
    }

    pub async fn file_link_by_path(
        &self,
        cancel: &CancellationToken,
        path: &str,
    ) -> Result<FileLink> {
        self.file_link_by_path_with_opts(cancel, path, FileLinkOpts::default())
            .await
    }

    pub async fn file_link_by_path_with_opts(
        &self,
        cancel: &CancellationToken,
        path: &str,
        opts: FileLinkOpts,
    ) -> Result<FileLink> {
        let mut params = Params::new();
        params.set("path", path);
        apply_link_opts(&mut params, &opts);

        self.invoke(cancel, "getfilelink", params).await
    }

    /// Link to a transcoded video stream
    pub async fn video_link(&self, cancel: &CancellationToken, file_id: u64) -> Result<FileLink> {
        self.media_link(cancel, file_id, "getvideolink").await
    }

    /// Link to a transcoded audio stream
    pub async fn audio_link(&self, cancel: &CancellationToken, file_id: u64) -> Result<FileLink> {
        self.media_link(cancel, file_id, "getaudiolink").await
    }

    /// Link to an HLS playlist for the file
    pub async fn hls_link(&self, cancel: &CancellationToken, file_id: u64) -> Result<FileLink> {
        self.media_link(cancel, file_id, "gethlslink").await
    }

    async fn media_link(
        &self,
        cancel: &CancellationToken,
        file_id: u64,
        endpoint: &str,
    ) -> Result<FileLink> {
        let mut params = Params::new();
        params.set("fileid", file_id.to_string());

        self.invoke(cancel, endpoint, params).await
    }
}
