//! # pCloud transport boundary
//!
//! Defines the contract between the pCloud SDK and whatever actually moves
//! bytes over the wire. The SDK composes requests and decodes envelopes; this
//! crate's [`HttpClient`] trait performs them.
//!
//! A reqwest-backed implementation ships behind the default `reqwest`
//! feature. Owners who need custom TLS, proxying, or hermetic tests implement
//! the trait themselves and hand the SDK an `Arc<dyn HttpClient>`.
//!
//! ## Example
//!
//! ```ignore
//! use pcloud_transport::{HttpClient, HttpRequest, ReqwestHttpClient};
//!
//! let transport = ReqwestHttpClient::new();
//! let response = transport
//!     .execute(HttpRequest::get("https://api.pcloud.com/userinfo"))
//!     .await?;
//! ```

pub mod error;
pub mod http;
#[cfg(feature = "reqwest")]
pub mod native;

pub use error::TransportError;
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, StreamingBody};
#[cfg(feature = "reqwest")]
pub use native::ReqwestHttpClient;
