// Connector Registry
//
// Runs every registered connector concurrently. A failing connector is
// logged and its contribution dropped; the others continue.

use super::{Connector, ConnectorError, GithubConnector};
use footprint_common::config::ScanConfig;
use footprint_common::{ProfileRecord, QueryInputs};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Default)]
pub struct ConnectorRegistry {
    connectors: Vec<Arc<dyn Connector>>,
}

impl ConnectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every connector enabled in the configuration
    pub fn from_config(config: &ScanConfig) -> Result<Self, ConnectorError> {
        let mut registry = Self::new();

        if config.github.enabled {
            registry.register(Arc::new(GithubConnector::new(&config.github)?));
        }

        info!(
            "Connector registry ready: {} connector(s) [{}]",
            registry.len(),
            registry.names().join(", ")
        );
        Ok(registry)
    }

    pub fn register(&mut self, connector: Arc<dyn Connector>) {
        debug!("Registered connector: {}", connector.name());
        self.connectors.push(connector);
    }

    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.connectors.iter().map(|c| c.name()).collect()
    }

    /// Search with all connectors concurrently
    ///
    /// # Returns
    /// All records from successful connectors, in registration order.
    /// Failures are logged but not returned (per-connector error isolation).
    pub async fn run_all(&self, query: &QueryInputs) -> Vec<ProfileRecord> {
        let searches = self.connectors.iter().map(|connector| async move {
            let name = connector.name();
            match connector.search(query).await {
                Ok(records) => {
                    debug!(connector = name, records = records.len(), "Search successful");
                    records
                }
                Err(e) => {
                    warn!(
                        connector = name,
                        error = %e,
                        "Search failed (per-connector error isolation)"
                    );
                    Vec::new()
                }
            }
        });

        join_all(searches).await.into_iter().flatten().collect()
    }
}
