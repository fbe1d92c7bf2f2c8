//! Tracing setup
//!
//! The subscriber is installed before configuration is read, so config
//! loading is logged. The configured level replaces the startup filter
//! afterwards unless `RUST_LOG` is set.

use tracing::warn;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{reload, EnvFilter, Registry};

/// Level used until configuration is loaded
pub const STARTUP_LEVEL: &str = "info";

/// Reloadable filter layer installed at startup
pub type FilterLayer = reload::Layer<EnvFilter, Registry>;

/// Handle for replacing the startup filter
pub struct LogFilter {
    handle: reload::Handle<EnvFilter, Registry>,
    env_override: bool,
}

impl LogFilter {
    /// Filter layer at `RUST_LOG`, or [`STARTUP_LEVEL`] when unset
    pub fn startup() -> (FilterLayer, Self) {
        let rust_log = EnvFilter::try_from_default_env().ok();
        let env_override = rust_log.is_some();
        let (layer, handle) =
            reload::Layer::new(rust_log.unwrap_or_else(|| EnvFilter::new(STARTUP_LEVEL)));

        (
            layer,
            Self {
                handle,
                env_override,
            },
        )
    }

    /// Switch to the configured level
    ///
    /// `RUST_LOG` wins over configuration, so this is a no-op when it is set.
    /// Returns whether the filter changed.
    pub fn apply_level(&self, level: &str) -> bool {
        if self.env_override {
            return false;
        }

        match self.handle.modify(|filter| *filter = EnvFilter::new(level)) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to apply log level {}: {}", level, e);
                false
            }
        }
    }
}

/// Install the global fmt subscriber at the startup level
pub fn init_tracing() -> LogFilter {
    let (filter, log_filter) = LogFilter::startup();
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
    log_filter
}
