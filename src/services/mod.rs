//! Scan lifecycle services.

pub mod report;
pub mod scan;
pub mod severity;
pub mod token;
