//! File revision history

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::client::Client;
use crate::envelope::{ApiResponse, Envelope};
use crate::error::Result;
use crate::params::Params;
use crate::types::{Metadata, MetadataResponse, Revision};

#[derive(Debug, Deserialize)]
struct RevisionsResponse {
    #[serde(flatten)]
    envelope: Envelope,
    #[serde(default)]
    revisions: Vec<Revision>,
}

impl ApiResponse for RevisionsResponse {
    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

impl Client {
    /// Stored revisions of a file, oldest last as the server orders them
    pub async fn list_revisions(
        &self,
        cancel: &CancellationToken,
        file_id: u64,
    ) -> Result<Vec<Revision>> {
        let mut params = Params::new();
        params.set("fileid", file_id.to_string());

        let response: RevisionsResponse = self.invoke(cancel, "listrevisions", params).await?;
        Ok(response.revisions)
    }

    pub async fn list_revisions_by_path(
        &self,
        cancel: &CancellationToken,
        path: &str,
    ) -> Result<Vec<Revision>> {
        let mut params = Params::new();
        params.set("path", path);

        let response: RevisionsResponse = self.invoke(cancel, "listrevisions", params).await?;
        Ok(response.revisions)
    }

    /// Make an older revision the file's current content
    pub async fn revert_revision(
        &self,
        cancel: &CancellationToken,
        file_id: u64,
        revision_id: u64,
    ) -> Result<Metadata> {
        let mut params = Params::new();
        params.set("fileid", file_id.to_string());
        params.set("revisionid", revision_id.to_string());

        let response: MetadataResponse = self.invoke(cancel, "revertrevision", params).await?;
        Ok(response.metadata)
    }

    pub async fn revert_revision_by_path(
        &self,
        cancel: &CancellationToken,
        path: &str,
        revision_id: u64,
    ) -> Result<Metadata> {
        let mut params = Params::new();
        params.set("path", path);
        params.set("revisionid", revision_id.to_string());

        let response: MetadataResponse = self.invoke(cancel, "revertrevision", params).await?;
        Ok(response.metadata)
    }
}
