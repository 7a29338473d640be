//! Crate entrypoint: a Hetzner DNS API client built from a pluggable
//! transport, a JSON codec, and a status-based error classifier.

pub mod config;
pub mod error;
pub mod hetzner;

pub use config::ClientConfig;
pub use error::DnsError;
pub use hetzner::client::HetznerDnsClient;
pub use hetzner::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use hetzner::types::{
    PrimaryServer, PrimaryServerWrite, Reconciliation, Record, RecordWrite, Zone, ZoneCreate,
};
