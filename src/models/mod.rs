//! Wire models of the scanner adapter API.

pub mod artifact;
pub mod media_type;
pub mod report;
