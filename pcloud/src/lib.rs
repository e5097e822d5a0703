//! # pCloud client
//!
//! A typed client for the pCloud HTTP API: authentication, folder and file
//! CRUD, uploads and downloads, revisions, sharing, public links, streaming
//! links, and zip archiving.
//!
//! Every operation funnels through one dispatch path: the credential is
//! attached, the call passes a token-bucket admission gate, the endpoint and
//! parameters become a signed URL, and the JSON `{result, error}` envelope in
//! the response is translated into [`Error::Api`] on any non-zero result.
//!
//! ## Usage
//!
//! ```no_run
//! use pcloud::{Client, ListFolderOpts, BASE_URL_US};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), pcloud::Error> {
//! let client = Client::new(BASE_URL_US)?;
//! let cancel = CancellationToken::new();
//!
//! client.login(&cancel, "user@example.com", "password").await?;
//!
//! let root = client
//!     .list_folder(&cancel, 0, ListFolderOpts::default())
//!     .await?;
//! for item in &root.contents {
//!     println!("{}", item.name);
//! }
//!
//! client.logout(&cancel).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Walking a tree
//!
//! [`Client::walk`] fetches a folder's whole subtree in one call and yields
//! it as a lazy, depth-first stream:
//!
//! ```no_run
//! # use pcloud::{Client, BASE_URL_US};
//! # use tokio_util::sync::CancellationToken;
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), pcloud::Error> {
//! # let client = Client::new(BASE_URL_US)?;
//! # let cancel = CancellationToken::new();
//! let mut walk = std::pin::pin!(client.walk(&cancel, 0));
//! while let Some(item) = walk.next().await {
//!     println!("{}", item?.path);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Cancellation
//!
//! Every operation takes a [`CancellationToken`](tokio_util::sync::CancellationToken)
//! honored at each suspension point (admission wait, token refresh, the wire
//! call); a fired token surfaces as [`Error::Cancelled`] and aborts in-flight
//! I/O.
//!
//! ## At-least-once side effects
//!
//! The client never retries, but it also cannot roll back: a mutation the
//! server applied before the response was lost (or failed to decode) stays
//! applied. Treat uploads and copies as at-least-once when handling errors.
//!
//! ## Observability
//!
//! Calls emit `tracing` debug events (one per dispatched endpoint) and error
//! events on transport or decode failures. With no subscriber installed this
//! is a no-op.

mod archiving;
mod auth;
mod client;
mod credentials;
mod envelope;
mod error;
mod file;
mod folder;
mod limiter;
mod multipart;
mod params;
mod publink;
mod revision;
mod sharing;
mod stream;
#[cfg(test)]
mod testutil;
mod types;
mod walk;

pub use archiving::{ZipOpts, ZipSelection};
pub use client::{Client, ClientBuilder, BASE_URL_EU, BASE_URL_US};
pub use credentials::TokenSource;
pub use envelope::Envelope;
pub use error::{Error, Result};
pub use file::{DownloadOpts, ProgressFn, UploadOpts, UploadSource};
pub use folder::ListFolderOpts;
pub use limiter::{RateLimiter, DEFAULT_RATE_PER_MINUTE, MIN_RATE_PER_MINUTE};
pub use params::Params;
pub use publink::PublicLinkOpts;
pub use sharing::{ShareList, ShareOpts, SharePermissions};
pub use stream::FileLinkOpts;
pub use types::{FileLink, Metadata, PublicLink, Revision, Share, UserInfo};
