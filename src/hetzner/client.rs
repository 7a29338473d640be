use std::path::Path;
use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderName};
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::{DnsError, Result, classify_response};
use crate::hetzner::codec::{self, *};
use crate::hetzner::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
use crate::hetzner::types::*;

const AUTH_HEADER: &str = "auth-api-token";

/// Hetzner DNS API client. Cheap to clone; clones share the transport.
///
/// Every operation is a single round trip except
/// [`create_or_update_record`](Self::create_or_update_record), which reads
/// then writes. Nothing guards against two callers reconciling the same
/// name at once: both may see no record and both create one.
#[derive(Clone)]
pub struct HetznerDnsClient {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
    base_url: Url,
}

impl HetznerDnsClient {
    /// Client for the public API with the bundled reqwest transport.
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig::new(api_token))
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let base_url = Url::parse(config.base_url())
            .map_err(|e| DnsError::InvalidBaseUrl(format!("{}: {e}", config.base_url())))?;
        if base_url.cannot_be_a_base() {
            return Err(DnsError::InvalidBaseUrl(config.base_url().to_string()));
        }
        Ok(Self {
            transport,
            config,
            base_url,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn json_request<T: Serialize + ?Sized>(
        method: Method,
        url: Url,
        body: &T,
    ) -> Result<HttpRequest> {
        Ok(HttpRequest::new(method, url)
            .header(CONTENT_TYPE, "application/json")
            .body(codec::encode(body)?))
    }

    fn zone_file_request(method: Method, url: Url, zone_file: &[u8]) -> HttpRequest {
        HttpRequest::new(method, url)
            .header(CONTENT_TYPE, "text/plain")
            .body(zone_file.to_vec())
    }

    async fn send(&self, request: HttpRequest, expected: StatusCode) -> Result<HttpResponse> {
        let request = request.header(
            HeaderName::from_static(AUTH_HEADER),
            self.config.api_token.as_str(),
        );
        let method = request.method.clone();
        let url = request.url.clone();
        debug!(%method, %url, "sending Hetzner DNS request");

        let res = self.transport.execute(request).await?;
        debug!(%method, %url, status = %res.status, "received Hetzner DNS response");
        if res.status != expected {
            return Err(classify_response(res));
        }
        Ok(res)
    }

    // ---- zones ----

    /// All zones visible to the token, in server order.
    pub async fn list_zones(&self) -> Result<Vec<Zone>> {
        let req = HttpRequest::new(Method::GET, self.url(&["zones"]));
        let res = self.send(req, StatusCode::OK).await?;
        Ok(codec::decode::<ZonesEnvelope>(&res.body)?.zones)
    }

    /// Id of the first zone whose name matches `name`, ignoring case.
    pub async fn find_zone_id_by_name(&self, name: &str) -> Result<String> {
        self.list_zones()
            .await?
            .into_iter()
            .find(|zone| names_match(&zone.name, name))
            .map(|zone| zone.id)
            .ok_or_else(|| DnsError::not_found(format!("zone for domain {name}")))
    }

    pub async fn get_zone(&self, zone_id: &str) -> Result<Zone> {
        let req = HttpRequest::new(Method::GET, self.url(&["zones", zone_id]));
        let res = self.send(req, StatusCode::OK).await?;
        Ok(codec::decode::<ZoneEnvelope>(&res.body)?.zone)
    }

    pub async fn create_zone(&self, zone: &ZoneCreate) -> Result<Zone> {
        let req = Self::json_request(Method::POST, self.url(&["zones"]), zone)?;
        let res = self.send(req, StatusCode::OK).await?;
        Ok(codec::decode::<ZoneEnvelope>(&res.body)?.zone)
    }

    pub async fn delete_zone(&self, zone_id: &str) -> Result<()> {
        let req = HttpRequest::new(Method::DELETE, self.url(&["zones", zone_id]));
        self.send(req, StatusCode::OK).await?;
        Ok(())
    }

    pub async fn import_zone_file(&self, zone_id: &str, zone_file: &[u8]) -> Result<()> {
        let url = self.url(&["zones", zone_id, "import"]);
        self.send(Self::zone_file_request(Method::POST, url, zone_file), StatusCode::OK)
            .await?;
        Ok(())
    }

    /// Raw zone file bytes exactly as served.
    pub async fn export_zone_file(&self, zone_id: &str) -> Result<Vec<u8>> {
        let req = HttpRequest::new(Method::GET, self.url(&["zones", zone_id, "export"])).header(
            CONTENT_TYPE,
            "application/x-www-form-urlencoded; charset=utf-8",
        );
        let res = self.send(req, StatusCode::OK).await?;
        Ok(res.body)
    }

    pub async fn validate_zone_file(&self, zone_file: &[u8]) -> Result<()> {
        let url = self.url(&["zones", "file", "validate"]);
        self.send(Self::zone_file_request(Method::POST, url, zone_file), StatusCode::OK)
            .await?;
        Ok(())
    }

    pub async fn import_zone_file_from_path(
        &self,
        zone_id: &str,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let zone_file = read_zone_file(path.as_ref()).await?;
        self.import_zone_file(zone_id, &zone_file).await
    }

    pub async fn validate_zone_file_from_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let zone_file = read_zone_file(path.as_ref()).await?;
        self.validate_zone_file(&zone_file).await
    }

    // ---- records ----

    /// Records of one zone. Only the first page is returned if the server
    /// paginates.
    pub async fn list_records_for_zone(&self, zone_id: &str) -> Result<Vec<Record>> {
        let mut url = self.url(&["records"]);
        url.query_pairs_mut().append_pair("zone_id", zone_id);
        let res = self.send(HttpRequest::new(Method::GET, url), StatusCode::OK).await?;
        Ok(codec::decode::<RecordsEnvelope>(&res.body)?.records)
    }

    /// Every record named `name` (case-insensitive), in server order.
    pub async fn find_records_by_name(&self, zone_id: &str, name: &str) -> Result<Vec<Record>> {
        let records = self.list_records_for_zone(zone_id).await?;
        Ok(records
            .into_iter()
            .filter(|record| names_match(&record.name, name))
            .collect())
    }

    pub async fn find_record_by_id(&self, zone_id: &str, record_id: &str) -> Result<Record> {
        self.list_records_for_zone(zone_id)
            .await?
            .into_iter()
            .find(|record| record.id == record_id)
            .ok_or_else(|| DnsError::not_found(format!("record {record_id}")))
    }

    /// Create a record. The API answers `201 Created`; anything else,
    /// including `200`, is an error.
    pub async fn create_record(
        &self,
        zone_id: &str,
        rrtype: &str,
        name: &str,
        value: &str,
    ) -> Result<()> {
        let body = RecordWrite::new(zone_id, rrtype, name, value);
        let req = Self::json_request(Method::POST, self.url(&["records"]), &body)?;
        self.send(req, StatusCode::CREATED).await?;
        Ok(())
    }

    pub async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        rrtype: &str,
        name: &str,
        value: &str,
    ) -> Result<()> {
        let body = RecordWrite::new(zone_id, rrtype, name, value).with_id(record_id);
        let req = Self::json_request(Method::PUT, self.url(&["records", record_id]), &body)?;
        self.send(req, StatusCode::OK).await?;
        Ok(())
    }

    pub async fn delete_record(&self, record_id: &str) -> Result<()> {
        let req = HttpRequest::new(Method::DELETE, self.url(&["records", record_id]));
        self.send(req, StatusCode::OK).await?;
        Ok(())
    }

    /// Create all records in one request; the batch succeeds or fails whole.
    pub async fn bulk_create_records(&self, records: &[RecordWrite]) -> Result<()> {
        let req = Self::json_request(
            Method::POST,
            self.url(&["records", "bulk"]),
            &BulkRecords { records },
        )?;
        self.send(req, StatusCode::OK).await?;
        Ok(())
    }

    /// Every record must carry its `id`; the server rejects the batch otherwise.
    pub async fn bulk_update_records(&self, records: &[RecordWrite]) -> Result<()> {
        let req = Self::json_request(
            Method::PUT,
            self.url(&["records", "bulk"]),
            &BulkRecords { records },
        )?;
        self.send(req, StatusCode::OK).await?;
        Ok(())
    }

    /// Make `name` hold `value`: rewrite the first record with that name, or
    /// create one if there is none.
    ///
    /// The update keeps the existing record's type and name and ignores
    /// `rrtype`. Further records sharing the name are left alone, so this is
    /// meant for single-valued names such as an ACME challenge token.
    pub async fn create_or_update_record(
        &self,
        zone_id: &str,
        rrtype: &str,
        name: &str,
        value: &str,
    ) -> Result<Reconciliation> {
        let existing = self.find_records_by_name(zone_id, name).await?;

        match existing.into_iter().next() {
            Some(record) => {
                info!(zone_id, record_id = %record.id, name, "updating existing record");
                self.update_record(zone_id, &record.id, &record.rrtype, &record.name, value)
                    .await?;
                Ok(Reconciliation::Updated { id: record.id })
            }
            None => {
                info!(zone_id, rrtype, name, "creating record");
                self.create_record(zone_id, rrtype, name, value).await?;
                Ok(Reconciliation::Created)
            }
        }
    }

    // ---- primary servers ----

    pub async fn list_primary_servers(&self) -> Result<Vec<PrimaryServer>> {
        let req = HttpRequest::new(Method::GET, self.url(&["primary_servers"]));
        let res = self.send(req, StatusCode::OK).await?;
        Ok(codec::decode::<PrimaryServersEnvelope>(&res.body)?.primary_servers)
    }

    pub async fn get_primary_server(&self, id: &str) -> Result<PrimaryServer> {
        let req = HttpRequest::new(Method::GET, self.url(&["primary_servers", id]));
        let res = self.send(req, StatusCode::OK).await?;
        codec::decode(&res.body)
    }

    pub async fn create_primary_server(&self, zone_id: &str, address: &str, port: u16) -> Result<()> {
        let body = PrimaryServerWrite {
            id: None,
            zone_id: zone_id.to_string(),
            address: address.to_string(),
            port,
        };
        let req = Self::json_request(Method::POST, self.url(&["primary_servers"]), &body)?;
        self.send(req, StatusCode::OK).await?;
        Ok(())
    }

    pub async fn update_primary_server(
        &self,
        zone_id: &str,
        id: &str,
        address: &str,
        port: u16,
    ) -> Result<()> {
        let body = PrimaryServerWrite {
            id: Some(id.to_string()),
            zone_id: zone_id.to_string(),
            address: address.to_string(),
            port,
        };
        let req = Self::json_request(Method::PUT, self.url(&["primary_servers"]), &body)?;
        self.send(req, StatusCode::OK).await?;
        Ok(())
    }

    /// Delete a primary server, returning the object the API echoes back.
    pub async fn delete_primary_server(&self, id: &str) -> Result<PrimaryServer> {
        let req = HttpRequest::new(Method::DELETE, self.url(&["primary_servers", id]));
        let res = self.send(req, StatusCode::OK).await?;
        codec::decode(&res.body)
    }
}

async fn read_zone_file(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|source| DnsError::ZoneFile {
        path: path.to_path_buf(),
        source,
    })
}

// Unicode case folding, so "BÜCHER.de" matches "bücher.de".
fn names_match(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
