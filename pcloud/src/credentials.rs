//! Credential attachment
//!
//! The client signs requests by copying a bearer token into the parameter
//! set under the fixed `auth` key. The token is either set statically (after
//! a login or by the owner) or fetched per call from a refreshable source.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::params::Params;

/// Query parameter the bearer token rides in
pub(crate) const AUTH_PARAM: &str = "auth";

/// A refreshable source of bearer tokens.
///
/// Queried on every dispatched call, so implementations are free to rotate
/// tokens underneath the client. A source may itself perform I/O (an OAuth
/// refresh, a secret-store read); if it fails, the dispatch aborts before any
/// request is made.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self, cancel: &CancellationToken) -> Result<String>;
}

/// How calls made through a client authenticate
#[derive(Clone, Default)]
pub(crate) enum Credential {
    /// No credential; the parameter set is left untouched (login itself)
    #[default]
    Anonymous,
    /// A static token copied into every call
    Token(String),
    /// A refreshable source queried per call
    Source(Arc<dyn TokenSource>),
}

impl Credential {
    /// Sign the parameter set in place
    pub(crate) async fn attach(
        &self,
        cancel: &CancellationToken,
        params: &mut Params,
    ) -> Result<()> {
        match self {
            Credential::Anonymous => Ok(()),
            Credential::Token(token) => {
                params.set(AUTH_PARAM, token.clone());
                Ok(())
            }
            Credential::Source(source) => {
                let token = source.access_token(cancel).await?;
                params.set(AUTH_PARAM, token);
                Ok(())
            }
        }
    }
}

// Tokens must not leak into logs
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Anonymous => f.write_str("Credential::Anonymous"),
            Credential::Token(_) => f.write_str("Credential::Token(..)"),
            Credential::Source(_) => f.write_str("Credential::Source(..)"),
        }
    }
}
