//! MaxMind Geo Reader
//!
//! Implements GeoLookup over a MaxMind GeoIP2/GeoLite2 City database.

use crate::domain::entities::{DatabaseInfo, GeoRecord};
use crate::domain::errors::GeoError;
use crate::domain::ports::GeoLookup;
use maxminddb::{MaxMindDBError, Reader};
use parking_lot::RwLock;
use serde::Deserialize;
use std::fmt;
use std::net::IpAddr;
use std::path::Path;

/// Label used in errors for databases loaded from memory.
const IN_MEMORY: &str = "<memory>";

// Only `country.iso_code` and `location.{latitude,longitude}` are decoded;
// every other key in the record is skipped by the deserializer.

#[derive(Debug, Deserialize)]
struct CountryFields {
    iso_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LocationFields {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CityProjection {
    country: Option<CountryFields>,
    location: Option<LocationFields>,
}

impl From<CityProjection> for GeoRecord {
    fn from(p: CityProjection) -> Self {
        let country_iso_code = p.country.and_then(|c| c.iso_code).unwrap_or_default();
        let (latitude, longitude) = p
            .location
            .map(|l| (l.latitude.unwrap_or_default(), l.longitude.unwrap_or_default()))
            .unwrap_or_default();

        GeoRecord {
            country_iso_code,
            latitude,
            longitude,
        }
    }
}

/// MaxMind geolocation reader.
///
/// Owns one open database. Lookups take a shared lock and may run from any
/// number of threads at once; `close` takes the exclusive lock, so it waits
/// for running lookups and the buffer is never released under a reader.
pub struct GeoReader {
    reader: RwLock<Option<Reader<Vec<u8>>>>,
}

impl GeoReader {
    /// Open a database file.
    ///
    /// Fails with [`GeoError::Open`] when the file is missing, unreadable
    /// or not a MaxMind database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GeoError> {
        let path = path.as_ref().display().to_string();
        match Reader::open_readfile(&path) {
            Ok(reader) => Ok(Self::wrap(reader, &path)),
            Err(source) => {
                tracing::warn!("failed to open geo database {}: {}", path, source);
                Err(GeoError::Open {
                    path,
                    source: Box::new(source),
                })
            }
        }
    }

    /// Load a database already held in memory.
    pub fn from_bytes(buf: Vec<u8>) -> Result<Self, GeoError> {
        match Reader::from_source(buf) {
            Ok(reader) => Ok(Self::wrap(reader, IN_MEMORY)),
            Err(source) => {
                tracing::warn!("failed to open geo database {}: {}", IN_MEMORY, source);
                Err(GeoError::Open {
                    path: IN_MEMORY.to_string(),
                    source: Box::new(source),
                })
            }
        }
    }

    fn wrap(reader: Reader<Vec<u8>>, origin: &str) -> Self {
        let info = database_info(&reader);
        tracing::info!(
            "geo database loaded from {} type={} build_epoch={} ip_version={}",
            origin,
            info.database_type,
            info.build_epoch,
            info.ip_version
        );
        Self {
            reader: RwLock::new(Some(reader)),
        }
    }

    /// Metadata of the open database.
    pub fn info(&self) -> Result<DatabaseInfo, GeoError> {
        let guard = self.reader.read();
        let reader = guard.as_ref().ok_or(GeoError::Closed)?;
        Ok(database_info(reader))
    }

    pub fn is_closed(&self) -> bool {
        self.reader.read().is_none()
    }
}

fn database_info(reader: &Reader<Vec<u8>>) -> DatabaseInfo {
    DatabaseInfo {
        database_type: reader.metadata.database_type.clone(),
        build_epoch: reader.metadata.build_epoch,
        ip_version: reader.metadata.ip_version,
        node_count: reader.metadata.node_count,
    }
}

impl GeoLookup for GeoReader {
    fn lookup(&self, ip: IpAddr) -> Result<GeoRecord, GeoError> {
        let guard = self.reader.read();
        let Some(reader) = guard.as_ref() else {
            tracing::warn!("lookup of {} on a closed geo reader", ip);
            return Err(GeoError::Closed);
        };

        // maxminddb would walk an IPv4-only tree with the leading bits of an
        // IPv6 address.
        if ip.is_ipv6() && reader.metadata.ip_version == 4 {
            return Err(GeoError::Lookup(
                format!("cannot look up IPv6 address {} in an IPv4-only database", ip).into(),
            ));
        }

        match reader.lookup::<CityProjection>(ip) {
            Ok(projection) => Ok(projection.into()),
            Err(MaxMindDBError::AddressNotFoundError(_)) => {
                tracing::debug!("no geo entry for {}", ip);
                Ok(GeoRecord::default())
            }
            Err(e) => Err(GeoError::Lookup(Box::new(e))),
        }
    }

    fn close(&self) {
        if self.reader.write().take().is_some() {
            tracing::debug!("geo database closed");
        } else {
            tracing::debug!("geo database already closed");
        }
    }
}

impl fmt::Debug for GeoReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeoReader")
            .field("closed", &self.is_closed())
            .finish()
    }
}
