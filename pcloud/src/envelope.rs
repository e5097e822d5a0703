//! The universal `{result, error}` response envelope
//!
//! Every response the API serves embeds this pair. `result == 0` means the
//! rest of the payload is meaningful; anything else means the payload besides
//! `error` is undefined and must not be read.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub result: u64,
    #[serde(default)]
    pub error: Option<String>,
}

impl Envelope {
    /// Translate the result code: `Ok(())` iff `result == 0`.
    ///
    /// Pure; the dispatcher calls this exactly once per decoded response,
    /// before any payload field is handed to the caller.
    pub fn check(&self) -> Result<()> {
        if self.result == 0 {
            return Ok(());
        }
        Err(Error::Api {
            code: self.result,
            message: self.error.clone().unwrap_or_default(),
        })
    }
}

/// One of the closed set of typed response variants.
///
/// Each decodable response embeds an [`Envelope`] (via `#[serde(flatten)]`)
/// and exposes it here so the dispatcher can run the result-code check
/// without knowing the payload shape.
pub(crate) trait ApiResponse: DeserializeOwned {
    fn envelope(&self) -> &Envelope;
}

/// Response carrying nothing beyond the envelope
#[derive(Debug, Deserialize)]
pub(crate) struct Ack {
    #[serde(flatten)]
    envelope: Envelope,
}

impl ApiResponse for Ack {
    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}
