//! Locate Service - Main application use case
//!
//! Turns raw address text into a geolocation match through the GeoLookup port.

use crate::domain::entities::GeoMatch;
use crate::domain::errors::GeoError;
use crate::domain::ports::GeoLookup;
use std::io::{self, Write};
use std::net::IpAddr;
use std::sync::Arc;

/// Outcome of a batch written by [`LocateService::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocateReport {
    /// Addresses written as JSON lines
    pub written: usize,
    /// Addresses that failed to parse or resolve
    pub skipped: usize,
}

/// Locate service - parses addresses and resolves them.
///
/// The port only accepts parsed addresses; this service owns the parsing
/// and pairs every record with the address that produced it.
pub struct LocateService {
    geo: Arc<dyn GeoLookup>,
}

impl LocateService {
    pub fn new(geo: Arc<dyn GeoLookup>) -> Self {
        Self { geo }
    }

    /// Locate an address given as text (surrounding whitespace is ignored).
    pub fn locate(&self, raw: &str) -> Result<GeoMatch, GeoError> {
        let ip: IpAddr = raw
            .trim()
            .parse()
            .map_err(|_| GeoError::InvalidAddress(raw.to_string()))?;
        self.locate_ip(ip)
    }

    /// Locate an already parsed address.
    pub fn locate_ip(&self, ip: IpAddr) -> Result<GeoMatch, GeoError> {
        let record = self.geo.lookup(ip)?;
        Ok(GeoMatch::new(ip, record))
    }

    /// Release the underlying database.
    pub fn shutdown(&self) {
        self.geo.close();
    }

    /// Locate every input and write one JSON object per line to `out`.
    ///
    /// Blank inputs are ignored. Bad addresses and failed lookups are logged
    /// and skipped; read, write and unrecoverable errors stop the batch.
    pub fn write_matches<I, S, W>(&self, inputs: I, out: &mut W) -> io::Result<LocateReport>
    where
        I: IntoIterator<Item = io::Result<S>>,
        S: AsRef<str>,
        W: Write,
    {
        let mut report = LocateReport::default();

        for input in inputs {
            let input = input?;
            let raw = input.as_ref();
            if raw.trim().is_empty() {
                continue;
            }

            match self.locate(raw) {
                Ok(m) => {
                    serde_json::to_writer(&mut *out, &m)?;
                    writeln!(out)?;
                    report.written += 1;
                }
                Err(e) if e.is_recoverable() => {
                    tracing::error!("skipping {:?}: {}", raw.trim(), e);
                    report.skipped += 1;
                }
                Err(e) => return Err(io::Error::new(io::ErrorKind::Other, e)),
            }
        }

        out.flush()?;
        Ok(report)
    }

    /// Write every match, then release the database whatever the outcome.
    pub fn run<I, S, W>(&self, inputs: I, out: &mut W) -> io::Result<LocateReport>
    where
        I: IntoIterator<Item = io::Result<S>>,
        S: AsRef<str>,
        W: Write,
    {
        let result = self.write_matches(inputs, out);
        self.shutdown();
        if let Ok(report) = &result {
            tracing::debug!(
                "located {} addresses, skipped {}",
                report.written,
                report.skipped
            );
        }
        result
    }
}
