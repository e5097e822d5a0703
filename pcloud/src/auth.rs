//! Session endpoints: login, logout, account info

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::client::Client;
use crate::envelope::{Ack, ApiResponse, Envelope};
use crate::error::Result;
use crate::params::Params;
use crate::types::UserInfo;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(flatten)]
    envelope: Envelope,
    #[serde(default)]
    auth: String,
}

impl ApiResponse for LoginResponse {
    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

impl Client {
    /// Exchange username/password for a bearer token and store it on the
    /// client. The exchange itself goes out unauthenticated.
    pub async fn login(
        &self,
        cancel: &CancellationToken,
        username: &str,
        password: &str,
    ) -> Result<()> {
        let mut params = Params::new();
        params.set("getauth", "1");
        params.set("username", username);
        params.set("password", password);

        let response: LoginResponse = self.invoke(cancel, "userinfo", params).await?;
        self.set_auth(response.auth).await;
        Ok(())
    }

    /// Invalidate the current token server-side and clear it locally
    pub async fn logout(&self, cancel: &CancellationToken) -> Result<()> {
        let _: Ack = self.invoke(cancel, "logout", Params::new()).await?;
        self.clear_auth().await;
        Ok(())
    }

    /// Account details and quota for the authenticated user
    pub async fn user_info(&self, cancel: &CancellationToken) -> Result<UserInfo> {
        self.invoke(cancel, "userinfo", Params::new()).await
    }
}
