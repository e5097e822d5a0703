//! Wire types returned by the API
//!
//! Data structures for deserializing API responses. Values are immutable
//! after decode and never persisted by the SDK.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::envelope::{ApiResponse, Envelope};

/// The API serves timestamps as RFC 2822 strings
/// (`"Thu, 16 Mar 2023 12:33:26 +0000"`).
pub(crate) mod api_date {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<String> = Option::deserialize(deserializer)?;
        match value {
            None => Ok(None),
            Some(raw) => DateTime::parse_from_rfc2822(&raw)
                .map(|parsed| Some(parsed.with_timezone(&Utc)))
                .map_err(serde::de::Error::custom),
        }
    }
}

/// A file or folder as the service describes it.
///
/// Exactly one of `file_id`/`folder_id` is set, matching the node's role.
/// Folders fetched with the recursive listing option carry their children in
/// `contents`, in server order; that order is the traversal order for
/// [`Client::walk`](crate::Client::walk).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, deserialize_with = "api_date::deserialize")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "api_date::deserialize")]
    pub modified: Option<DateTime<Utc>>,
    #[serde(default, rename = "isfolder")]
    pub is_folder: bool,
    #[serde(default, rename = "ismine")]
    pub is_mine: bool,
    #[serde(default, rename = "isshared")]
    pub is_shared: bool,
    #[serde(default)]
    pub icon: String,
    #[serde(default, rename = "fileid")]
    pub file_id: Option<u64>,
    #[serde(default, rename = "folderid")]
    pub folder_id: Option<u64>,
    #[serde(default, rename = "parentfolderid")]
    pub parent_folder_id: Option<u64>,
    /// File size in bytes (absent for folders)
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default, rename = "contenttype")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub category: Option<i64>,
    #[serde(default)]
    pub thumb: bool,
    /// Children in server order; populated only by recursive listings
    #[serde(default)]
    pub contents: Vec<Metadata>,
}

/// Response shape shared by every endpoint that answers with one node
#[derive(Debug, Deserialize)]
pub(crate) struct MetadataResponse {
    #[serde(flatten)]
    envelope: Envelope,
    #[serde(default)]
    pub(crate) metadata: Metadata,
}

impl ApiResponse for MetadataResponse {
    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

/// One historical revision of a file
#[derive(Debug, Clone, Deserialize)]
pub struct Revision {
    #[serde(default, rename = "revisionid")]
    pub revision_id: u64,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default, deserialize_with = "api_date::deserialize")]
    pub created: Option<DateTime<Utc>>,
}

/// Account information
#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    #[serde(flatten)]
    pub(crate) envelope: Envelope,
    #[serde(default, rename = "userid")]
    pub user_id: u64,
    #[serde(default)]
    pub email: String,
    #[serde(default, rename = "emailverified")]
    pub email_verified: bool,
    #[serde(default, deserialize_with = "api_date::deserialize")]
    pub registered: Option<DateTime<Utc>>,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub premium: bool,
    #[serde(default, rename = "premiumexpires", deserialize_with = "api_date::deserialize")]
    pub premium_expires: Option<DateTime<Utc>>,
    /// Total quota in bytes
    #[serde(default)]
    pub quota: u64,
    #[serde(default, rename = "usedquota")]
    pub used_quota: u64,
}

impl ApiResponse for UserInfo {
    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

/// A direct link to file content, served as a path plus candidate hosts
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileLink {
    #[serde(flatten)]
    pub(crate) envelope: Envelope,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub expires: Option<String>,
    #[serde(default)]
    pub hosts: Vec<String>,
}

impl FileLink {
    /// Usable download URL: the first host joined with the path.
    ///
    /// Empty when the server returned no hosts; that is a signal for the
    /// caller, not a failure.
    pub fn url(&self) -> String {
        match self.hosts.first() {
            Some(host) => format!("https://{}{}", host, self.path),
            None => String::new(),
        }
    }
}

impl ApiResponse for FileLink {
    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

/// A public (unauthenticated) link to a file or folder
#[derive(Debug, Clone, Deserialize)]
pub struct PublicLink {
    #[serde(flatten)]
    pub(crate) envelope: Envelope,
    #[serde(default, rename = "linkid")]
    pub link_id: u64,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub link: String,
    #[serde(default, deserialize_with = "api_date::deserialize")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "api_date::deserialize")]
    pub modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub traffic: u64,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default, rename = "shortlink")]
    pub short_link: Option<String>,
    #[serde(default, rename = "shortcode")]
    pub short_code: Option<String>,
}

impl ApiResponse for PublicLink {
    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

/// An active share or a pending share request
#[derive(Debug, Clone, Deserialize)]
pub struct Share {
    #[serde(flatten)]
    pub(crate) envelope: Envelope,
    #[serde(default, rename = "shareid")]
    pub share_id: u64,
    #[serde(default, rename = "sharerequestid")]
    pub share_request_id: u64,
    #[serde(default, rename = "folderid")]
    pub folder_id: u64,
    #[serde(default, rename = "tomail")]
    pub to_email: String,
    #[serde(default, rename = "touserid")]
    pub to_user_id: u64,
    #[serde(default, rename = "fromuserid")]
    pub from_user_id: u64,
    #[serde(default, rename = "canread")]
    pub can_read: bool,
    #[serde(default, rename = "cancreate")]
    pub can_create: bool,
    #[serde(default, rename = "canmodify")]
    pub can_modify: bool,
    #[serde(default, rename = "candelete")]
    pub can_delete: bool,
    #[serde(default, deserialize_with = "api_date::deserialize")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "sharename")]
    pub share_name: Option<String>,
    #[serde(default)]
    pub accepted: bool,
    #[serde(default, rename = "incoming")]
    pub incoming: bool,
}

impl ApiResponse for Share {
    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}
