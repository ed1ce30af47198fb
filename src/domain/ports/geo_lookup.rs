//! Geo Lookup Port
//!
//! Defines the interface for resolving IP addresses to geographic locations.

use crate::domain::entities::GeoRecord;
use crate::domain::errors::GeoError;
use std::net::IpAddr;

/// Lookup of an IP address in a geolocation database.
///
/// This is an outbound port that abstracts the database format.
/// Implementations must allow concurrent `lookup` calls and must serialize
/// `close` against lookups that are still running.
pub trait GeoLookup: Send + Sync {
    /// Resolve an IP address to its country code and coordinates.
    ///
    /// An address with no entry yields `Ok(GeoRecord::default())`.
    fn lookup(&self, ip: IpAddr) -> Result<GeoRecord, GeoError>;

    /// Release the underlying database. Calling it again is a no-op.
    fn close(&self);
}
