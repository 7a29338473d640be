// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

use crate::hetzner::transport::{HttpResponse, TransportError};

/// Everything a [`HetznerDnsClient`](crate::hetzner::client::HetznerDnsClient)
/// operation can fail with.
#[derive(Debug, Error)]
pub enum DnsError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("failed to read zone file {}: {source}", path.display())]
    ZoneFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DnsError {
    pub fn not_found(what: impl Into<String>) -> Self {
        DnsError::NotFound(what.into())
    }

    /// HTTP status carried by an [`DnsError::Api`] failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            DnsError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DnsError::NotFound(_))
    }
}

pub type Result<T, E = DnsError> = std::result::Result<T, E>;

/// Turn a response that did not carry the expected success status into an
/// [`DnsError::Api`]. The body is kept verbatim (lossy UTF-8) and uncapped.
pub fn classify_response(response: HttpResponse) -> DnsError {
    let body = String::from_utf8(response.body)
        .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned());
    DnsError::Api {
        status: response.status.as_u16(),
        body,
    }
}
