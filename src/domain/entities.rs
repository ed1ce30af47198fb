//! Domain Entities - Core geolocation objects
//!
//! These entities carry the results of geolocation lookups.
//! They have no dependency on the database format that produced them.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Location data resolved for a single IP address.
///
/// A record has no identity of its own; it is only meaningful next to the
/// address that produced it (see [`GeoMatch`]). An address with no entry in
/// the database yields the default record: empty country, zero coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoRecord {
    /// Country code (ISO 3166-1 alpha-2), empty when unknown
    pub country_iso_code: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl GeoRecord {
    pub fn new(country_iso_code: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            country_iso_code: country_iso_code.into(),
            latitude,
            longitude,
        }
    }

    /// True when every field holds its zero value.
    ///
    /// A miss in the database and a hit with empty fields both look like this.
    pub fn is_empty(&self) -> bool {
        self.country_iso_code.is_empty() && self.latitude == 0.0 && self.longitude == 0.0
    }
}

/// A record paired with the address it was resolved for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoMatch {
    pub ip: IpAddr,
    #[serde(flatten)]
    pub record: GeoRecord,
}

impl GeoMatch {
    pub fn new(ip: IpAddr, record: GeoRecord) -> Self {
        Self { ip, record }
    }
}

/// Metadata describing an opened geolocation database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseInfo {
    /// Database flavour, e.g. `GeoLite2-City`
    pub database_type: String,
    /// Build time as seconds since the Unix epoch
    pub build_epoch: u64,
    /// 4 for IPv4-only trees, 6 for trees that also hold IPv6 networks
    pub ip_version: u16,
    /// Number of nodes in the search tree
    pub node_count: u32,
}
