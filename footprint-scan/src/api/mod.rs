//! HTTP API handlers for footprint-scan
//!
//! - `POST /scan`: run a scan for the posted query
//! - `GET /health`: liveness and uptime
//! - `GET /`: service banner

pub mod health;
pub mod scan;

pub use health::health_routes;
pub use scan::scan_routes;
