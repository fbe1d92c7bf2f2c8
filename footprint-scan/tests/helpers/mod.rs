//! Test Helper Utilities
//!
//! In-memory connectors and a network-free pipeline for integration tests

#![allow(dead_code)]

pub mod log_capture;

use async_trait::async_trait;
use footprint_common::{ContentItem, Platform, ProfileRecord, QueryInputs, RawTimestamp};
use footprint_scan::connectors::{Connector, ConnectorError, ConnectorRegistry};
use footprint_scan::fusion::extractors::{AvatarCache, AvatarHasher, HashedEmbedder};
use footprint_scan::fusion::fusers::IdentityScorer;
use footprint_scan::services::ScanPipeline;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Connector returning a fixed set of records
pub struct StaticConnector {
    pub name: &'static str,
    pub records: Vec<ProfileRecord>,
}

#[async_trait]
impl Connector for StaticConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn search(&self, _query: &QueryInputs) -> Result<Vec<ProfileRecord>, ConnectorError> {
        Ok(self.records.clone())
    }
}

/// Connector that always fails
pub struct FailingConnector;

#[async_trait]
impl Connector for FailingConnector {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn search(&self, _query: &QueryInputs) -> Result<Vec<ProfileRecord>, ConnectorError> {
        Err(ConnectorError::Api(503, "Service unavailable".to_string()))
    }
}

/// Pipeline over the given connectors with a private avatar cache
pub fn test_pipeline(connectors: Vec<Arc<dyn Connector>>, cache: Arc<AvatarCache>) -> ScanPipeline {
    let mut registry = ConnectorRegistry::new();
    for connector in connectors {
        registry.register(connector);
    }
    let hasher = AvatarHasher::new(cache, Duration::from_secs(1)).unwrap();
    let scorer = IdentityScorer::new(Arc::new(hasher), Arc::new(HashedEmbedder::new(384)));
    ScanPipeline::new(registry, scorer, true)
}

pub fn empty_cache() -> Arc<AvatarCache> {
    Arc::new(AvatarCache::new(100, Duration::from_secs(3600)))
}

pub fn item(content: &str, url: Option<&str>, timestamp: &str) -> ContentItem {
    ContentItem {
        content: content.to_string(),
        url: url.map(str::to_string),
        timestamp: Some(RawTimestamp::Text(timestamp.to_string())),
        ..Default::default()
    }
}

/// Two plausible profiles of the same person plus one unrelated profile
///
/// The unrelated profile has no username, so the name veto drops it.
///
/// Avatar URLs point at an unroutable host; warm the cache with
/// [`warm_avatars`] to keep tests offline.
pub fn sample_records() -> Vec<ProfileRecord> {
    let mut github = ProfileRecord::new(Platform::Github, "https://github.com/jsmith", 0.9);
    github.username = Some("jsmith".to_string());
    github.display_name = Some("John Smith".to_string());
    github.avatar_url = Some("https://avatars.invalid/jsmith.png".to_string());
    github.bio = Some("Rust developer. Contact john@example.com".to_string());
    github.links = vec!["https://jsmith.dev".to_string()];
    github.posts = vec![
        item("A tiny parser combinator library", Some("https://github.com/jsmith/parse"), "2024-01-01T00:00:00Z"),
        item("Dotfiles", Some("https://github.com/jsmith/dotfiles"), "2023-01-01"),
    ];

    let mut reddit = ProfileRecord::new(Platform::Reddit, "https://reddit.com/user/jsmith_", 0.6);
    reddit.username = Some("jsmith_".to_string());
    reddit.display_name = Some("John Smith".to_string());
    reddit.avatar_url = Some("https://avatars.invalid/jsmith_reddit.png".to_string());
    reddit.bio = Some("Rust developer".to_string());
    reddit.links = vec!["http://www.jsmith.dev/".to_string()];
    reddit.comments = vec![
        item("YOU ARE SO STUPID AND WORTHLESS!!!!", Some("https://reddit.com/c/1"), "2023-06-01 12:00:00"),
        item("Thanks, that fixed it", None, "2023-06-02"),
    ];

    let mut other = ProfileRecord::new(Platform::Twitter, "https://twitter.com/john", 0.7);
    other.display_name = Some("John Doe".to_string());
    other.posts = vec![item("vote in the election", None, "2022-11-08")];

    vec![github, reddit, other]
}

/// Pre-populate the cache for every avatar in `sample_records`
pub fn warm_avatars(cache: &AvatarCache) {
    cache.insert("https://avatars.invalid/jsmith.png", 0xF0F0_F0F0_F0F0_F0F0);
    cache.insert("https://avatars.invalid/jsmith_reddit.png", 0xF0F0_F0F0_F0F0_F0F1);
}

pub fn john_smith_query() -> QueryInputs {
    QueryInputs {
        name: Some("John Smith".to_string()),
        usernames: vec!["jsmith".to_string()],
        email: Some("john@example.com".to_string()),
    }
}

/// Local avatar host that answers every request with 404
///
/// Returns the base URL and a counter of requests served.
pub async fn spawn_missing_avatar_host() -> (String, Arc<AtomicUsize>) {
    use axum::extract::State;
    use axum::http::StatusCode;

    let hits = Arc::new(AtomicUsize::new(0));
    let app = axum::Router::new()
        .fallback(|State(hits): State<Arc<AtomicUsize>>| async move {
            hits.fetch_add(1, Ordering::SeqCst);
            StatusCode::NOT_FOUND
        })
        .with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), hits)
}
