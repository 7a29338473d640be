//! JSON bodies in and out of the API.
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::DnsError;
use crate::hetzner::types::*;

#[derive(Debug, Deserialize)]
pub struct ZonesEnvelope {
    pub zones: Vec<Zone>,
}

#[derive(Debug, Deserialize)]
pub struct ZoneEnvelope {
    pub zone: Zone,
}

#[derive(Debug, Deserialize)]
pub struct RecordsEnvelope {
    pub records: Vec<Record>,
}

#[derive(Debug, Deserialize)]
pub struct PrimaryServersEnvelope {
    pub primary_servers: Vec<PrimaryServer>,
}

#[derive(Debug, Serialize)]
pub struct BulkRecords<'a> {
    pub records: &'a [RecordWrite],
}

pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, DnsError> {
    serde_json::to_vec(value).map_err(DnsError::Encode)
}

/// Unknown fields are ignored; a missing required field is an error.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DnsError> {
    serde_json::from_slice(bytes).map_err(DnsError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn create_body_omits_id_and_uses_wire_names() {
        let body = encode(&RecordWrite::new("z1", "TXT", "_acme-challenge", "tok")).unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            value,
            json!({
                "zone_id": "z1",
                "type": "TXT",
                "name": "_acme-challenge",
                "value": "tok"
            })
        );
    }

    #[test]
    fn bulk_body_wraps_records_in_order() {
        let batch = vec![
            RecordWrite::new("z1", "A", "a", "192.0.2.1").with_id("r1"),
            RecordWrite::new("z1", "A", "b", "192.0.2.2").with_id("r2"),
        ];
        let body = encode(&BulkRecords { records: &batch }).unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["records"][0]["id"], "r1");
        assert_eq!(value["records"][1]["name"], "b");
        assert_eq!(value["records"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn write_model_decodes_as_read_model() {
        let batch = vec![RecordWrite::new("z1", "MX", "@", "10 mail.example.com.").with_id("r9")];
        let body = encode(&BulkRecords { records: &batch }).unwrap();
        let decoded: RecordsEnvelope = decode(&body).unwrap();
        let record = &decoded.records[0];
        assert_eq!(record.id, "r9");
        assert_eq!(record.zone_id, "z1");
        assert_eq!(record.rrtype, "MX");
        assert_eq!(record.name, "@");
        assert_eq!(record.value, "10 mail.example.com.");
        assert_eq!(record.ttl, None);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let body = br#"{"zones":[{"id":"1","name":"example.com","ttl":86400,"status":"verified","ns":["a"]}],"meta":{"pagination":{"page":1}}}"#;
        let decoded: ZonesEnvelope = decode(body).unwrap();
        assert_eq!(
            decoded.zones,
            vec![Zone {
                id: "1".into(),
                name: "example.com".into(),
                ttl: Some(86400),
            }]
        );
    }

    #[test]
    fn missing_required_field_fails() {
        let body = br#"{"records":[{"id":"r1","type":"A","name":"www","zone_id":"z1"}]}"#;
        let err = decode::<RecordsEnvelope>(body).unwrap_err();
        assert!(matches!(err, DnsError::Decode(_)));
        assert!(err.to_string().contains("value"));
    }

    #[test]
    fn missing_envelope_field_fails() {
        let err = decode::<PrimaryServersEnvelope>(br#"{"servers":[]}"#).unwrap_err();
        assert!(matches!(err, DnsError::Decode(_)));
    }

    #[test]
    fn primary_server_write_omits_absent_id() {
        let body = encode(&PrimaryServerWrite {
            id: None,
            zone_id: "z1".into(),
            address: "192.0.2.53".into(),
            port: 53,
        })
        .unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            value,
            json!({"zone_id": "z1", "address": "192.0.2.53", "port": 53})
        );
    }
}
