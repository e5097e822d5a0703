//! Folder operations

use tokio_util::sync::CancellationToken;

use crate::client::Client;
use crate::envelope::Ack;
use crate::error::Result;
use crate::params::Params;
use crate::types::{Metadata, MetadataResponse};

/// Options for folder listings
#[derive(Debug, Clone, Copy, Default)]
pub struct ListFolderOpts {
    /// Fetch the whole subtree in one response instead of a single level
    pub recursive: bool,
    pub show_deleted: bool,
    pub no_files: bool,
    pub no_shares: bool,
}

fn apply_list_folder_opts(params: &mut Params, opts: ListFolderOpts) {
    if opts.recursive {
        params.set("recursive", "1");
    }
    if opts.show_deleted {
        params.set("showdeleted", "1");
    }
    if opts.no_files {
        params.set("nofiles", "1");
    }
    if opts.no_shares {
        params.set("noshares", "1");
    }
}

impl Client {
    /// List a folder's contents; folder id `0` is the root
    pub async fn list_folder(
        &self,
        cancel: &CancellationToken,
        folder_id: u64,
        opts: ListFolderOpts,
    ) -> Result<Metadata> {
        let mut params = Params::new();
        params.set("folderid", folder_id.to_string());
        apply_list_folder_opts(&mut params, opts);

        let response: MetadataResponse = self.invoke(cancel, "listfolder", params).await?;
        Ok(response.metadata)
    }

    /// List a folder's contents, addressed by path
    pub async fn list_folder_by_path(
        &self,
        cancel: &CancellationToken,
        path: &str,
        opts: ListFolderOpts,
    ) -> Result<Metadata> {
        let mut params = Params::new();
        params.set("path", path);
        apply_list_folder_opts(&mut params, opts);

        let response: MetadataResponse = self.invoke(cancel, "listfolder", params).await?;
        Ok(response.metadata)
    }

    /// Metadata for a folder without its contents
    pub async fn stat_folder(
        &self,
        cancel: &CancellationToken,
        folder_id: u64,
    ) -> Result<Metadata> {
        let mut params = Params::new();
        params.set("folderid", folder_id.to_string());

        let response: MetadataResponse = self.invoke(cancel, "stat", params).await?;
        Ok(response.metadata)
    }

    pub async fn create_folder(
        &self,
        cancel: &CancellationToken,
        parent_id: u64,
        name: &str,
    ) -> Result<Metadata> {
        let mut params = Params::new();
        params.set("folderid", parent_id.to_string());
        params.set("name", name);

        let response: MetadataResponse = self.invoke(cancel, "createfolder", params).await?;
        Ok(response.metadata)
    }

    pub async fn create_folder_by_path(
        &self,
        cancel: &CancellationToken,
        path: &str,
    ) -> Result<Metadata> {
        let mut params = Params::new();
        params.set("path", path);

        let response: MetadataResponse = self.invoke(cancel, "createfolder", params).await?;
        Ok(response.metadata)
    }

    /// Create a folder, or return the existing one of the same name
    pub async fn create_folder_if_not_exists(
        &self,
        cancel: &CancellationToken,
        parent_id: u64,
        name: &str,
    ) -> Result<Metadata> {
        let mut params = Params::new();
        params.set("folderid", parent_id.to_string());
        params.set("name", name);

        let response: MetadataResponse =
            self.invoke(cancel, "createfolderifnotexists", params).await?;
        Ok(response.metadata)
    }

    pub async fn rename_folder(
        &self,
        cancel: &CancellationToken,
        folder_id: u64,
        new_name: &str,
    ) -> Result<Metadata> {
        let mut params = Params::new();
        params.set("folderid", folder_id.to_string());
        params.set("toname", new_name);

        let response: MetadataResponse = self.invoke(cancel, "renamefolder", params).await?;
        Ok(response.metadata)
    }

    pub async fn move_folder(
        &self,
        cancel: &CancellationToken,
        folder_id: u64,
        to_folder_id: u64,
        name: &str,
    ) -> Result<Metadata> {
        let mut params = Params::new();
        params.set("folderid", folder_id.to_string());
        params.set("tofolderid", to_folder_id.to_string());
        params.set("toname", name);

        let response: MetadataResponse = self.invoke(cancel, "renamefolder", params).await?;
        Ok(response.metadata)
    }

    pub async fn copy_folder(
        &self,
        cancel: &CancellationToken,
        folder_id: u64,
        to_folder_id: u64,
    ) -> Result<Metadata> {
        let mut params = Params::new();
        params.set("folderid", folder_id.to_string());
        params.set("tofolderid", to_folder_id.to_string());

        let response: MetadataResponse = self.invoke(cancel, "copyfolder", params).await?;
        Ok(response.metadata)
    }

    /// Delete an empty folder
    pub async fn delete_folder(&self, cancel: &CancellationToken, folder_id: u64) -> Result<()> {
        let mut params = Params::new();
        params.set("folderid", folder_id.to_string());

        let _: Ack = self.invoke(cancel, "deletefolder", params).await?;
        Ok(())
    }

    /// Delete a folder and everything under it
    pub async fn delete_folder_recursive(
        &self,
        cancel: &CancellationToken,
        folder_id: u64,
    ) -> Result<()> {
        let mut params = Params::new();
        params.set("folderid", folder_id.to_string());

        let _: Ack = self.invoke(cancel, "deletefolderrecursive", params).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testutil::{json_response, test_client, MockTransport};

    #[tokio::test]
    async fn test_list_folder_sets_recursive_flag() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .times(1)
            .withf(|request| {
                request.url.contains("folderid=0") && request.url.contains("recursive=1")
            })
            .returning(|_| {
                Ok(json_response(
                    r#"{"result": 0, "metadata": {"name": "/", "isfolder": true, "folderid": 0}}"#,
                ))
            });

        let client = test_client(transport);
        let folder = client
            .list_folder(
                &CancellationToken::new(),
                0,
                ListFolderOpts {
                    recursive: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(folder.is_folder);
        assert_eq!(folder.folder_id, Some(0));
    }

    #[tokio::test]
    async fn test_create_folder_returns_new_metadata() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .times(1)
            .withf(|request| {
                request.url.contains("createfolder")
                    && request.url.contains("name=backups")
                    && request.url.contains("folderid=0")
            })
            .returning(|_| {
                Ok(json_response(
                    r#"{"result": 0, "metadata": {"name": "backups", "isfolder": true, "folderid": 11}}"#,
                ))
            });

        let client = test_client(transport);
        let folder = client
            .create_folder(&CancellationToken::new(), 0, "backups")
            .await
            .unwrap();

        assert_eq!(folder.folder_id, Some(11));
    }

    #[tokio::test]
    async fn test_delete_missing_folder_surfaces_api_error() {
        let mut transport = MockTransport::new();
        transport.expect_execute().times(1).returning(|_| {
            Ok(json_response(
                r#"{"result": 2005, "error": "Directory does not exist."}"#,
            ))
        });

        let client = test_client(transport);
        let result = client.delete_folder(&CancellationToken::new(), 99).await;

        assert!(matches!(result, Err(Error::Api { code: 2005, .. })));
    }
}
