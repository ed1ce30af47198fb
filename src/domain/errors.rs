//! Domain Errors
//!
//! Every failure a geolocation lookup can surface to its caller.

use std::error::Error;

/// Error raised by the database collaborator, passed through unchanged.
pub type SourceError = Box<dyn Error + Send + Sync + 'static>;

/// Errors returned by geolocation readers and services.
///
/// An address missing from the database is not an error; lookups return
/// an empty [`GeoRecord`](crate::domain::entities::GeoRecord) instead.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    /// The database could not be opened: missing, unreadable or not MMDB.
    #[error("failed to open geo database {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: SourceError,
    },
    /// Decoding a record failed after the database was opened, or the
    /// address family is not held by the database.
    #[error("geo lookup failed: {0}")]
    Lookup(#[source] SourceError),
    /// The reader was used after `close()`.
    #[error("geo reader is closed")]
    Closed,
    /// Text that does not parse as an IPv4 or IPv6 address.
    #[error("invalid IP address: {0:?}")]
    InvalidAddress(String),
}

impl GeoError {
    /// Whether the caller can skip this address and keep going.
    ///
    /// Only open failures leave nothing to retry against.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Open { .. })
    }
}
