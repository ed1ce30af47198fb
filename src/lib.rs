//! geo-reader Library
//!
//! Narrow geolocation lookups over MaxMind (MMDB) databases: an IP address
//! resolves to a country ISO code and a latitude/longitude pair.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;

// Re-export commonly used types
pub use adapters::outbound::GeoReader;
pub use application::{LocateReport, LocateService};
pub use config::{load_config, Config};
pub use domain::entities::{DatabaseInfo, GeoMatch, GeoRecord};
pub use domain::errors::GeoError;
pub use domain::ports::GeoLookup;
