mod locate_service;

pub use locate_service::{LocateReport, LocateService};
