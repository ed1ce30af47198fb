//! Domain layer: entities, errors and ports with no knowledge of MMDB.

pub mod entities;
pub mod errors;
pub mod ports;

pub use entities::{DatabaseInfo, GeoMatch, GeoRecord};
pub use errors::GeoError;
pub use ports::GeoLookup;
