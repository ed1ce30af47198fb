//! Fixture databases for integration tests.
//!
//! Writes small IPv4-only MMDB files (24-bit records) from JSON records so
//! tests can run without a downloaded GeoLite2 database.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::io::Write;
use std::net::Ipv4Addr;
use tempfile::NamedTempFile;

const METADATA_MARKER: &[u8] = b"\xAB\xCD\xEFMaxMind.com";
const DATA_SECTION_SEPARATOR: [u8; 16] = [0; 16];

#[derive(Clone, Copy)]
enum Slot {
    Empty,
    Node(usize),
    Data(usize),
}

/// Builder for an IPv4 MaxMind database.
pub struct MmdbBuilder {
    nodes: Vec<[Slot; 2]>,
    data: Vec<u8>,
    database_type: String,
}

impl MmdbBuilder {
    pub fn new(database_type: &str) -> Self {
        Self {
            nodes: vec![[Slot::Empty; 2]],
            data: Vec::new(),
            database_type: database_type.to_string(),
        }
    }

    /// Map `network/prefix_len` to `record`. Networks must not overlap.
    pub fn insert(mut self, network: Ipv4Addr, prefix_len: u8, record: Value) -> Self {
        assert!((1..=32).contains(&prefix_len), "prefix length out of range");

        let offset = self.data.len();
        encode(&record, &mut self.data);

        let bits = u32::from(network);
        let mut node = 0;
        for depth in 0..prefix_len {
            let bit = ((bits >> (31 - depth)) & 1) as usize;
            if depth + 1 == prefix_len {
                self.nodes[node][bit] = Slot::Data(offset);
                break;
            }
            node = match self.nodes[node][bit] {
                Slot::Node(next) => next,
                Slot::Empty => {
                    self.nodes.push([Slot::Empty; 2]);
                    let next = self.nodes.len() - 1;
                    self.nodes[node][bit] = Slot::Node(next);
                    next
                }
                Slot::Data(_) => panic!("overlapping network {}/{}", network, prefix_len),
            };
        }
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let node_count = self.nodes.len();
        let mut out = Vec::new();

        for node in &self.nodes {
            for slot in node {
                let value = match *slot {
                    Slot::Empty => node_count,
                    Slot::Node(next) => next,
                    Slot::Data(offset) => node_count + DATA_SECTION_SEPARATOR.len() + offset,
                };
                out.extend_from_slice(&(value as u32).to_be_bytes()[1..]);
            }
        }

        out.extend_from_slice(&DATA_SECTION_SEPARATOR);
        out.extend_from_slice(&self.data);
        out.extend_from_slice(METADATA_MARKER);

        let metadata = json!({
            "binary_format_major_version": 2,
            "binary_format_minor_version": 0,
            "build_epoch": 1_700_000_000u64,
            "database_type": self.database_type,
            "description": { "en": "geo-reader test fixture" },
            "ip_version": 4,
            "languages": ["en"],
            "node_count": node_count,
            "record_size": 24,
        });
        encode(&metadata, &mut out);
        out
    }

    /// Write the database to a temporary file that lives as long as the handle.
    pub fn write_temp(&self) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(&self.build()).expect("write fixture");
        file.flush().expect("flush fixture");
        file
    }
}

fn control(type_num: u8, size: usize, out: &mut Vec<u8>) {
    let (size_bits, extra): (u8, Vec<u8>) = match size {
        0..=28 => (size as u8, Vec::new()),
        29..=284 => (29, vec![(size - 29) as u8]),
        285..=65_820 => (30, ((size - 285) as u16).to_be_bytes().to_vec()),
        _ => panic!("fixture value too large"),
    };

    if type_num <= 7 {
        out.push((type_num << 5) | size_bits);
    } else {
        out.push(size_bits);
        out.push(type_num - 7);
    }
    out.extend_from_slice(&extra);
}

fn encode(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::String(s) => {
            control(2, s.len(), out);
            out.extend_from_slice(s.as_bytes());
        }
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                if u <= u16::MAX as u64 {
                    control(5, 2, out);
                    out.extend_from_slice(&(u as u16).to_be_bytes());
                } else if u <= u32::MAX as u64 {
                    control(6, 4, out);
                    out.extend_from_slice(&(u as u32).to_be_bytes());
                } else {
                    control(9, 8, out);
                    out.extend_from_slice(&u.to_be_bytes());
                }
            } else if let Some(i) = n.as_i64() {
                control(8, 4, out);
                out.extend_from_slice(&(i as i32).to_be_bytes());
            } else {
                let f = n.as_f64().expect("finite number");
                control(3, 8, out);
                out.extend_from_slice(&f.to_be_bytes());
            }
        }
        Value::Bool(b) => control(14, *b as usize, out),
        Value::Object(map) => {
            control(7, map.len(), out);
            for (key, v) in map {
                encode(&Value::String(key.clone()), out);
                encode(v, out);
            }
        }
        Value::Array(items) => {
            control(11, items.len(), out);
            for v in items {
                encode(v, out);
            }
        }
        Value::Null => panic!("MMDB has no null type"),
    }
}

/// A GeoLite2-City shaped record with the fields most databases carry.
pub fn city_record(iso_code: &str, latitude: f64, longitude: f64) -> Value {
    json!({
        "city": { "geoname_id": 4_281_730u32, "names": { "en": "Wichita" } },
        "continent": { "code": "NA", "geoname_id": 6_255_149u32, "names": { "en": "North America" } },
        "country": { "geoname_id": 6_252_001u32, "iso_code": iso_code, "names": { "en": "United States" } },
        "location": {
            "accuracy_radius": 1000,
            "latitude": latitude,
            "longitude": longitude,
            "time_zone": "America/Chicago"
        },
        "registered_country": { "iso_code": iso_code },
        "traits": { "is_anonymous_proxy": false }
    })
}

/// Fixture used across the integration tests.
///
/// - `203.0.113.0/24` -> US, 37.751, -97.822 (full city record)
/// - `192.0.2.0/24`   -> location only, no country
/// - `198.51.100.0/25`-> country only, no location
pub fn fixture() -> MmdbBuilder {
    MmdbBuilder::new("GeoLite2-City")
        .insert(
            Ipv4Addr::new(203, 0, 113, 0),
            24,
            city_record("US", 37.751, -97.822),
        )
        .insert(
            Ipv4Addr::new(192, 0, 2, 0),
            24,
            json!({ "location": { "latitude": 51.5, "longitude": -0.13 } }),
        )
        .insert(
            Ipv4Addr::new(198, 51, 100, 0),
            25,
            json!({ "country": { "iso_code": "FR" } }),
        )
}
