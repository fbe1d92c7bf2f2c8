//! Profile connectors
//!
//! A connector searches one external source for profiles matching the query
//! and returns them with a baseline confidence. Connectors are registered
//! explicitly in a [`ConnectorRegistry`] at startup and run concurrently.
//!
//! # Example
//! ```rust,ignore
//! use footprint_scan::connectors::{Connector, ConnectorError};
//!
//! pub struct ExampleConnector;
//!
//! #[async_trait::async_trait]
//! impl Connector for ExampleConnector {
//!     fn name(&self) -> &'static str { "example" }
//!
//!     async fn search(&self, query: &QueryInputs) -> Result<Vec<ProfileRecord>, ConnectorError> {
//!         Ok(vec![])
//!     }
//! }
//! ```

pub mod github;
pub mod registry;

pub use github::GithubConnector;
pub use registry::ConnectorRegistry;

use footprint_common::{ProfileRecord, QueryInputs};
use thiserror::Error;

/// Searches one external source for matching profiles
#[async_trait::async_trait]
pub trait Connector: Send + Sync {
    /// Connector name for logging and provenance
    fn name(&self) -> &'static str;

    /// Find profiles matching the query
    ///
    /// # Errors
    /// Returns `ConnectorError` when the source cannot be searched at all.
    /// The registry drops the contribution and keeps the other connectors.
    async fn search(&self, query: &QueryInputs) -> Result<Vec<ProfileRecord>, ConnectorError>;
}

/// Connector error
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Network communication error
    #[error("Network error: {0}")]
    Network(String),

    /// External API returned an error status
    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Failed to parse response
    #[error("Parse error: {0}")]
    Parse(String),
}

// ============================================================================
// Mock Connector for Testing
// ============================================================================
