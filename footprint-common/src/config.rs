//! Configuration loading for the scan service
//!
//! Resolution follows a fixed priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing config file is never fatal: the service logs a warning and
//! starts on compiled defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "FOOTPRINT_CONFIG";

/// Top-level service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Address the HTTP server binds to
    pub bind_address: String,
    /// HTTP port
    pub port: u16,
    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
    /// Allowed CORS origins
    pub cors_origins: Vec<String>,
    pub avatar: AvatarConfig,
    pub identity: IdentityConfig,
    pub github: GithubConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8000,
            log_level: "info".to_string(),
            cors_origins: vec!["http://localhost:3000".to_string()],
            avatar: AvatarConfig::default(),
            identity: IdentityConfig::default(),
            github: GithubConfig::default(),
        }
    }
}

/// Avatar fetch and hash cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    /// Per-fetch timeout
    pub fetch_timeout_secs: u64,
    /// Maximum number of cached avatar hashes
    pub cache_capacity: u64,
    /// Lifetime of a cached hash
    pub cache_ttl_secs: u64,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 10,
            cache_capacity: 10_000,
            cache_ttl_secs: 86_400,
        }
    }
}

/// Pairwise identity scoring settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Compute identity links between every pair of surviving profiles
    pub pairwise_links: bool,
    /// Bio embedding model: `all-MiniLM-L6-v2` or `hashed`
    pub embedding_model: String,
    /// Dimension of the hashed fallback embedding vectors
    pub embedding_dimensions: usize,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            pairwise_links: true,
            embedding_model: "all-MiniLM-L6-v2".to_string(),
            embedding_dimensions: 384,
        }
    }
}

/// GitHub connector settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub enabled: bool,
    /// Personal access token (raises the API rate limit)
    pub token: Option<String>,
    pub api_base: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            token: None,
            api_base: "https://api.github.com".to_string(),
        }
    }
}

impl ScanConfig {
    /// Load configuration using the full priority chain
    ///
    /// `cli_path` is the `--config` argument, if given. An explicitly named file
    /// that cannot be read or parsed is an error; the implicit per-user file is
    /// optional.
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        let explicit = cli_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    warn!(
                        "No config file at {}, using compiled defaults",
                        path.display()
                    );
                    Self::default()
                }
                None => {
                    warn!("Could not determine config directory, using compiled defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        let config: ScanConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Apply environment variable overrides on top of file values
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(port) = std::env::var("FOOTPRINT_PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("Invalid FOOTPRINT_PORT: {}", port)))?;
        }

        if let Ok(level) = std::env::var("FOOTPRINT_LOG_LEVEL") {
            if !level.trim().is_empty() {
                self.log_level = level.trim().to_string();
            }
        }

        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            let parsed: Vec<String> = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
            if !parsed.is_empty() {
                self.cors_origins = parsed;
            }
        }

        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            if !token.trim().is_empty() {
                self.github.token = Some(token.trim().to_string());
            }
        }

        Ok(())
    }
}

/// Per-user config file location, e.g. `~/.config/footprint/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("footprint").join("config.toml"))
}
