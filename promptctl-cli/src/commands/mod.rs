//! Command implementations for the promptctl CLI

pub mod extract;
pub mod makam;

pub use extract::run_extract;
pub use makam::run_makam_report;
