use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,   // "aB3kPq..."
    pub name: String, // "example.com"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

/// Record as returned by the API (read model).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(rename = "type")]
    pub rrtype: String, // "A", "TXT", ...
    pub name: String,   // "_acme-challenge", "@", "www"
    pub value: String,
    pub zone_id: String,
    // absent when the zone default applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}

impl Record {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created.as_deref().and_then(parse_api_timestamp)
    }

    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modified.as_deref().and_then(parse_api_timestamp)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Type: {}, Name: {}, Value: {}",
            self.id, self.rrtype, self.name, self.value
        )?;
        if let Some(ttl) = self.ttl {
            write!(f, ", TTL: {ttl}")?;
        }
        if let Some(created) = &self.created {
            write!(f, ", Created: {created}")?;
        }
        if let Some(modified) = &self.modified {
            write!(f, ", Modified: {modified}")?;
        }
        Ok(())
    }
}

/// Body of record create/update requests (write model).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordWrite {
    // omitted on create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub zone_id: String,
    #[serde(rename = "type")]
    pub rrtype: String,
    pub name: String,
    pub value: String,
}

impl RecordWrite {
    pub fn new(
        zone_id: impl Into<String>,
        rrtype: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            zone_id: zone_id.into(),
            rrtype: rrtype.into(),
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl From<&Record> for RecordWrite {
    fn from(record: &Record) -> Self {
        RecordWrite::new(
            record.zone_id.clone(),
            record.rrtype.clone(),
            record.name.clone(),
            record.value.clone(),
        )
        .with_id(record.id.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryServer {
    pub id: String,
    pub zone_id: String,
    pub address: String, // "1.1.1.1" or "ns1.example.net"
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}

impl PrimaryServer {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created.as_deref().and_then(parse_api_timestamp)
    }

    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modified.as_deref().and_then(parse_api_timestamp)
    }
}

// Used when creating or updating a primary server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryServerWrite {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub zone_id: String,
    pub address: String,
    pub port: u16,
}

// Used when creating a zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneCreate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

/// Which branch [`create_or_update_record`] took.
///
/// [`create_or_update_record`]: crate::hetzner::client::HetznerDnsClient::create_or_update_record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// No record with the name existed, so one was created.
    Created,
    /// The first record with the name was rewritten with the new value.
    Updated { id: String },
}

/// Parse a timestamp as the API renders it (`2019-12-23 13:33:56.816 +0000 UTC`)
/// or as RFC 3339.
pub fn parse_api_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    let trimmed = raw.strip_suffix(" UTC").unwrap_or(raw);
    DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f %z")
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}
