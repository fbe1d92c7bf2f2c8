//! Service modules for the scan workflow

pub mod scan_pipeline;

pub use scan_pipeline::{IdentityLink, ScanPipeline, ScanReport, ScanSummary};
