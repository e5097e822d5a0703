//! Folder sharing

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::client::Client;
use crate::envelope::{Ack, ApiResponse, Envelope};
use crate::error::Result;
use crate::params::Params;
use crate::types::Share;

/// What a share grants its recipient
#[derive(Debug, Clone, Copy, Default)]
pub struct SharePermissions {
    pub can_read: bool,
    pub can_create: bool,
    pub can_modify: bool,
    pub can_delete: bool,
}

/// Options for creating a share
#[derive(Debug, Clone, Default)]
pub struct ShareOpts {
    /// Message shown to the invitee
    pub message: Option<String>,
}

/// Outgoing shares and incoming share requests, as one listing
#[derive(Debug, Clone)]
pub struct ShareList {
    pub shares: Vec<Share>,
    pub requests: Vec<Share>,
}

#[derive(Debug, Deserialize)]
struct ListSharesResponse {
    #[serde(flatten)]
    envelope: Envelope,
    #[serde(default)]
    shares: Vec<Share>,
    #[serde(default)]
    requests: Vec<Share>,
}

impl ApiResponse for ListSharesResponse {
    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

/// Grants are flags: present means granted
fn apply_granted_permissions(params: &mut Params, perms: SharePermissions) {
    if perms.can_read {
        params.set("canread", "1");
    }
    if perms.can_create {
        params.set("cancreate", "1");
    }
    if perms.can_modify {
        params.set("canmodify", "1");
    }
    if perms.can_delete {
        params.set("candelete", "1");
    }
}

/// Changes are explicit: every flag is written, granted or revoked
fn apply_explicit_permissions(params: &mut Params, perms: SharePermissions) {
    params.set("canread", if perms.can_read { "1" } else { "0" });
    params.set("cancreate", if perms.can_create { "1" } else { "0" });
    params.set("canmodify", if perms.can_modify { "1" } else { "0" });
    params.set("candelete", if perms.can_delete { "1" } else { "0" });
}

impl Client {
    /// Invite `email` to a folder with the given permissions
    pub async fn share_folder(
        &self,
        cancel: &CancellationToken,
        folder_id: u64,
        email: &str,
        perms: SharePermissions,
        opts: ShareOpts,
    ) -> Result<Share> {
        let mut params = Params::new();
        params.set("folderid", folder_id.to_string());
        self.share_folder_inner(cancel, params, email, perms, opts)
            .await
    }

    pub async fn share_folder_by_path(
        &self,
        cancel: &CancellationToken,
        path: &str,
        email: &str,
        perms: SharePermissions,
        opts: ShareOpts,
    ) -> Result<Share> {
        let mut params = Params::new();
        params.set("path", path);
        self.share_folder_inner(cancel, params, email, perms, opts)
            .await
    }

    async fn share_folder_inner(
        &self,
        cancel: &CancellationToken,
        mut params: Params,
        email: &str,
        perms: SharePermissions,
        opts: ShareOpts,
    ) -> Result<Share> {
        params.set("mail", email);
        apply_granted_permissions(&mut params, perms);
        if let Some(message) = opts.message {
            params.set("message", message);
        }

        self.invoke(cancel, "sharefolder", params).await
    }

    /// Everything shared by and with this account
    pub async fn list_shares(&self, cancel: &CancellationToken) -> Result<ShareList> {
        let response: ListSharesResponse =
            self.invoke(cancel, "listshares", Params::new()).await?;
        Ok(ShareList {
            shares: response.shares,
            requests: response.requests,
        })
    }

    pub async fn accept_share(
        &self,
        cancel: &CancellationToken,
        share_request_id: u64,
    ) -> Result<()> {
        let mut params = Params::new();
        params.set("sharerequestid", share_request_id.to_string());

        let _: Ack = self.invoke(cancel, "acceptshare", params).await?;
        Ok(())
    }

    pub async fn decline_share(
        &self,
        cancel: &CancellationToken,
        share_request_id: u64,
    ) -> Result<()> {
        let mut params = Params::new();
        params.set("sharerequestid", share_request_id.to_string());

        let _: Ack = self.invoke(cancel, "declineshare", params).await?;
        Ok(())
    }

    pub async fn remove_share(&self, cancel: &CancellationToken, share_id: u64) -> Result<()> {
        let mut params = Params::new();
        params.set("shareid", share_id.to_string());

        let _: Ack = self.invoke(cancel, "removeshare", params).await?;
        Ok(())
    }

    pub async fn cancel_share_request(
        &self,
        cancel: &CancellationToken,
        share_request_id: u64,
    ) -> Result<()> {
        let mut params = Params::new();
        params.set("sharerequestid", share_request_id.to_string());

        let _: Ack = self.invoke(cancel, "cancelsharerequest", params).await?;
        Ok(())
    }

    /// Rewrite an existing share's permissions
    pub async fn change_share(
        &self,
        cancel: &CancellationToken,
        share_id: u64,
        perms: SharePermissions,
    ) -> Result<()> {
        let mut params = Params::new();
        params.set("shareid", share_id.to_string());
        apply_explicit_permissions(&mut params, perms);

        let _: Ack = self.invoke(cancel, "changeshare", params).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{json_response, test_client, MockTransport};

    #[tokio::test]
    async fn test_share_folder_sends_granted_flags_only() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .times(1)
            .withf(|request| {
                request.url.contains("sharefolder")
                    && request.url.contains("mail=friend%40example.com")
                    && request.url.contains("canread=1")
                    && !request.url.contains("candelete")
            })
            .returning(|_| {
                Ok(json_response(
                    r#"{"result": 0, "sharerequestid": 5, "folderid": 9}"#,
                ))
            });

        let client = test_client(transport);
        let share = client
            .share_folder(
                &CancellationToken::new(),
                9,
                "friend@example.com",
                SharePermissions {
                    can_read: true,
                    ..Default::default()
                },
                ShareOpts::default(),
            )
            .await
            .unwrap();

        assert_eq!(share.share_request_id, 5);
    }

    #[tokio::test]
    async fn test_change_share_writes_every_flag() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .times(1)
            .withf(|request| {
                request.url.contains("changeshare")
                    && request.url.contains("canread=1")
                    && request.url.contains("cancreate=0")
                    && request.url.contains("canmodify=1")
                    && request.url.contains("candelete=0")
            })
            .returning(|_| Ok(json_response(r#"{"result": 0}"#)));

        let client = test_client(transport);
        client
            .change_share(
                &CancellationToken::new(),
                3,
                SharePermissions {
                    can_read: true,
                    can_modify: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_shares_splits_shares_and_requests() {
        let mut transport = MockTransport::new();
        transport.expect_execute().times(1).returning(|_| {
            Ok(json_response(
                r#"{"result": 0,
                    "shares": [{"shareid": 1, "folderid": 9, "tomail": "a@example.com"}],
                    "requests": [{"sharerequestid": 2, "folderid": 10, "incoming": true}]}"#,
            ))
        });

        let client = test_client(transport);
        let listing = client.list_shares(&CancellationToken::new()).await.unwrap();

        assert_eq!(listing.shares.len(), 1);
        assert_eq!(listing.shares[0].share_id, 1);
        assert_eq!(listing.requests.len(), 1);
        assert!(listing.requests[0].incoming);
    }
}
