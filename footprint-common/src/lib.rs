//! # Footprint Common Library
//!
//! Shared code for the footprint scan service:
//! - Profile, content, risk and timeline data model
//! - Configuration loading (CLI → ENV → TOML → defaults)
//! - Common error type

pub mod config;
pub mod error;
pub mod models;

pub use error::{Error, Result};
pub use models::{
    ContentItem, Platform, ProfileRecord, QueryInputs, RawTimestamp, RiskAssessment, RiskMetrics,
    TimelineEvent, TimelineEventType,
};
pub use models::truncate_chars;
