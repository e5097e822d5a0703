//! Public (unauthenticated) links

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::client::Client;
use crate::envelope::{Ack, ApiResponse, Envelope};
use crate::error::Result;
use crate::params::Params;
use crate::types::PublicLink;

/// Limits applied to a public link
#[derive(Debug, Clone, Default)]
pub struct PublicLinkOpts {
    pub max_downloads: Option<u32>,
    /// Traffic cap in bytes
    pub max_traffic: Option<u64>,
    /// Unix timestamp after which the link dies
    pub expire_time: Option<i64>,
    /// Also mint a short link
    pub short_link: bool,
}

#[derive(Debug, Deserialize)]
struct ListPublicLinksResponse {
    #[serde(flatten)]
    envelope: Envelope,
    #[serde(default, rename = "publinks")]
    links: Vec<PublicLink>,
}

impl ApiResponse for ListPublicLinksResponse {
    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

fn apply_public_link_opts(params: &mut Params, opts: &PublicLinkOpts) {
    if let Some(max_downloads) = opts.max_downloads {
        params.set("maxdownloads", max_downloads.to_string());
    }
    if let Some(max_traffic) = opts.max_traffic {
        params.set("maxtraffic", max_traffic.to_string());
    }
    if let Some(expire_time) = opts.expire_time {
        params.set("expire", expire_time.to_string());
    }
    if opts.short_link {
        params.set("shortlink", "1");
    }
}

impl Client {
    pub async fn create_file_public_link(
        &self,
        cancel: &CancellationToken,
        file_id: u64,
        opts: PublicLinkOpts,
    ) -> Result<PublicLink> {
        let mut params = Params::new();
        params.set("fileid", file_id.to_string());
        apply_public_link_opts(&mut params, &opts);

        self.invoke(cancel, "getfilepublink", params).await
    }

    pub async fn create_file_public_link_by_path(
        &self,
        cancel: &CancellationToken,
        path: &str,
        opts: PublicLinkOpts,
    ) -> Result<PublicLink> {
        let mut params = Params::new();
        params.set("path", path);
        apply_public_link_opts(&mut params, &opts);

        self.invoke(cancel, "getfilepublink", params).await
    }

    pub async fn create_folder_public_link(
        &self,
        cancel: &CancellationToken,
        folder_id: u64,
        opts: PublicLinkOpts,
    ) -> Result<PublicLink> {
        let mut params = Params::new();
        params.set("folderid", folder_id.to_string());
        apply_public_link_opts(&mut params, &opts);

        self.invoke(cancel, "getfolderpublink", params).await
    }

    pub async fn create_folder_public_link_by_path(
        &self,
        cancel: &CancellationToken,
        path: &str,
        opts: PublicLinkOpts,
    ) -> Result<PublicLink> {
        let mut params = Params::new();
        params.set("path", path);
        apply_public_link_opts(&mut params, &opts);

        self.invoke(cancel, "getfolderpublink", params).await
    }

    /// Every public link on the account
    pub async fn list_public_links(&self, cancel: &CancellationToken) -> Result<Vec<PublicLink>> {
        let response: ListPublicLinksResponse =
            self.invoke(cancel, "listpublinks", Params::new()).await?;
        Ok(response.links)
    }

    pub async fn delete_public_link(
        &self,
        cancel: &CancellationToken,
        link_id: u64,
    ) -> Result<()> {
        let mut params = Params::new();
        params.set("linkid", link_id.to_string());

        let _: Ack = self.invoke(cancel, "deletepublink", params).await?;
        Ok(())
    }

    /// Rewrite an existing link's limits
    pub async fn change_public_link(
        &self,
        cancel: &CancellationToken,
        link_id: u64,
        opts: PublicLinkOpts,
    ) -> Result<PublicLink> {
        let mut params = Params::new();
        params.set("linkid", link_id.to_string());
        apply_public_link_opts(&mut params, &opts);

        self.invoke(cancel, "changepublink", params).await
    }

    /// Details for a link code, as its visitors would resolve it
    pub async fn public_link_info(
        &self,
        cancel: &CancellationToken,
        code: &str,
    ) -> Result<PublicLink> {
        let mut params = Params::new();
        params.set("code", code);

        self.invoke(cancel, "showpublink", params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{json_response, test_client, MockTransport};

    #[tokio::test]
    async fn test_create_file_public_link_applies_limits() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .times(1)
            .withf(|request| {
                request.url.contains("getfilepublink")
                    && request.url.contains("maxdownloads=5")
                    && request.url.contains("shortlink=1")
            })
            .returning(|_| {
                Ok(json_response(
                    r#"{"result": 0, "linkid": 77, "code": "XZabc", "link": "https://u.pcloud.link/XZabc",
                        "shortlink": "https://u.pc.cd/abc"}"#,
                ))
            });

        let client = test_client(transport);
        let link = client
            .create_file_public_link(
                &CancellationToken::new(),
                42,
                PublicLinkOpts {
                    max_downloads: Some(5),
                    short_link: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(link.link_id, 77);
        assert_eq!(link.short_link.as_deref(), Some("https://u.pc.cd/abc"));
    }

    #[tokio::test]
    async fn test_list_public_links_decodes_nested_metadata() {
        let mut transport = MockTransport::new();
        transport.expect_execute().times(1).returning(|_| {
            Ok(json_response(
                r#"{"result": 0, "publinks": [
                    {"linkid": 1, "code": "a", "metadata": {"name": "shared.txt", "fileid": 5}}
                ]}"#,
            ))
        });

        let client = test_client(transport);
        let links = client
            .list_public_links(&CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].metadata.name, "shared.txt");
    }

    #[tokio::test]
    async fn test_public_link_info_queries_by_code() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .times(1)
            .withf(|request| request.url.contains("showpublink") && request.url.contains("code=XZabc"))
            .returning(|_| Ok(json_response(r#"{"result": 0, "linkid": 77, "code": "XZabc"}"#)));

        let client = test_client(transport);
        let link = client
            .public_link_info(&CancellationToken::new(), "XZabc")
            .await
            .unwrap();
        assert_eq!(link.code, "XZabc");
    }
}
