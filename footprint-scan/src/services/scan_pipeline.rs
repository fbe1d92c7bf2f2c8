//! Scan pipeline
//!
//! One invocation per request:
//! 1. Validate the query
//! 2. Run every connector (concurrent, failures isolated)
//! 3. Refine each record's confidence against the query
//! 4. Keep records with confidence > 0, grouped by platform, best first
//! 5. Score risk for every post and comment of every collected record
//! 6. Link surviving profiles pairwise (when enabled)
//! 7. Merge surviving profiles and risk into one timeline

use crate::connectors::ConnectorRegistry;
use crate::error::ScanError;
use crate::fusion::extractors::{load_embedder, AvatarCache, AvatarHasher};
use crate::fusion::fusers::{refine_record, ConfidenceBreakdown, IdentityScorer};
use crate::fusion::{Confidence, SignalScores};
use crate::risk::assess_profile;
use crate::timeline::build_timeline;
use chrono::{DateTime, Utc};
use footprint_common::config::ScanConfig;
use footprint_common::{ProfileRecord, QueryInputs, RiskAssessment, TimelineEvent};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

/// Pairwise identity link between two surviving profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityLink {
    pub profile_a: String,
    pub profile_b: String,
    pub signals: SignalScores,
    pub query_boost: f64,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub total_accounts: usize,
    pub total_posts: usize,
    pub total_comments: usize,
    pub total_flagged: usize,
    pub platforms_found: Vec<String>,
}

/// Complete result of one scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub scan_id: Uuid,
    pub scan_timestamp: DateTime<Utc>,
    /// Every record returned by a connector, before filtering
    pub accounts_found: usize,
    /// Surviving profiles by platform key, highest confidence first
    pub footprints: BTreeMap<String, Vec<ProfileRecord>>,
    pub confidence_scores: Vec<ConfidenceBreakdown>,
    pub identity_links: Vec<IdentityLink>,
    pub risk_analysis: Vec<RiskAssessment>,
    pub timeline: Vec<TimelineEvent>,
    pub summary: ScanSummary,
    pub exportable_report: serde_json::Value,
}

/// Self-contained export of a scan, including the query
#[derive(Serialize)]
struct ExportableReport<'a> {
    scan_id: Uuid,
    scan_timestamp: DateTime<Utc>,
    query: &'a QueryInputs,
    summary: &'a ScanSummary,
    footprints: &'a BTreeMap<String, Vec<ProfileRecord>>,
    confidence_scores: &'a [ConfidenceBreakdown],
    identity_links: &'a [IdentityLink],
    risk_analysis: &'a [RiskAssessment],
    timeline: &'a [TimelineEvent],
}

pub struct ScanPipeline {
    registry: ConnectorRegistry,
    scorer: IdentityScorer,
    pairwise_links: bool,
}

impl ScanPipeline {
    pub fn new(registry: ConnectorRegistry, scorer: IdentityScorer, pairwise_links: bool) -> Self {
        Self {
            registry,
            scorer,
            pairwise_links,
        }
    }

    /// Build the pipeline and its shared avatar cache from configuration
    pub fn from_config(config: &ScanConfig) -> Result<Self, ScanError> {
        let cache = Arc::new(AvatarCache::new(
            config.avatar.cache_capacity,
            Duration::from_secs(config.avatar.cache_ttl_secs),
        ));
        let hasher = AvatarHasher::new(
            cache,
            Duration::from_secs(config.avatar.fetch_timeout_secs),
        )
        .map_err(|e| ScanError::Pipeline(format!("Avatar client: {}", e)))?;
        let embedder = load_embedder(&config.identity);
        let registry = ConnectorRegistry::from_config(config)
            .map_err(|e| ScanError::Pipeline(format!("Connector registry: {}", e)))?;

        Ok(Self::new(
            registry,
            IdentityScorer::new(Arc::new(hasher), embedder),
            config.identity.pairwise_links,
        ))
    }

    pub fn connector_count(&self) -> usize {
        self.registry.len()
    }

    /// Run a full scan for the query
    ///
    /// # Errors
    /// `ScanError::Validation` when the query has no identifying field;
    /// `ScanError::Pipeline` when the report cannot be assembled.
    pub async fn scan(&self, query: &QueryInputs) -> Result<ScanReport, ScanError> {
        if !query.has_identifier() {
            return Err(ScanError::Validation(
                "At least one of name, usernames, or email must be provided".to_string(),
            ));
        }

        let scan_id = Uuid::new_v4();
        info!(scan_id = %scan_id, connectors = self.registry.len(), "Scan started");

        let records = self.registry.run_all(query).await;
        let report = self.scan_records(scan_id, query, records).await?;

        info!(
            scan_id = %scan_id,
            accounts = report.accounts_found,
            surviving = report.footprints.values().map(Vec::len).sum::<usize>(),
            flagged = report.summary.total_flagged,
            "Scan complete"
        );
        Ok(report)
    }

    /// Score, filter and assemble a report over already-collected records
    pub async fn scan_records(
        &self,
        scan_id: Uuid,
        query: &QueryInputs,
        mut records: Vec<ProfileRecord>,
    ) -> Result<ScanReport, ScanError> {
        let accounts_found = records.len();

        let confidence_scores: Vec<ConfidenceBreakdown> = records
            .iter_mut()
            .map(|record| refine_record(record, query))
            .collect();

        let risk_analysis: Vec<RiskAssessment> =
            records.iter().flat_map(assess_profile).collect();

        let total_posts: usize = records.iter().map(|r| r.posts.len()).sum();
        let total_comments: usize = records.iter().map(|r| r.comments.len()).sum();

        let footprints = group_surviving(records);
        let summary = ScanSummary {
            total_accounts: accounts_found,
            total_posts,
            total_comments,
            total_flagged: risk_analysis.iter().filter(|a| a.flagged).count(),
            platforms_found: footprints.keys().cloned().collect(),
        };
        debug!(
            "{} of {} records survived refinement",
            footprints.values().map(Vec::len).sum::<usize>(),
            accounts_found
        );

        let identity_links = if self.pairwise_links {
            self.link_profiles(&footprints, query).await
        } else {
            Vec::new()
        };

        let timeline = build_timeline(&footprints, &risk_analysis);
        let scan_timestamp = Utc::now();

        let exportable_report = serde_json::to_value(ExportableReport {
            scan_id,
            scan_timestamp,
            query,
            summary: &summary,
            footprints: &footprints,
            confidence_scores: &confidence_scores,
            identity_links: &identity_links,
            risk_analysis: &risk_analysis,
            timeline: &timeline,
        })
        .map_err(|e| ScanError::Pipeline(format!("Report serialization: {}", e)))?;

        Ok(ScanReport {
            scan_id,
            scan_timestamp,
            accounts_found,
            footprints,
            confidence_scores,
            identity_links,
            risk_analysis,
            timeline,
            summary,
            exportable_report,
        })
    }

    /// Identity links for every pair of surviving profiles
    async fn link_profiles(
        &self,
        footprints: &BTreeMap<String, Vec<ProfileRecord>>,
        query: &QueryInputs,
    ) -> Vec<IdentityLink> {
        let profiles: Vec<&ProfileRecord> = footprints.values().flatten().collect();
        if profiles.len() < 2 {
            return Vec::new();
        }

        let avatars = self.scorer.resolve_avatars(&profiles).await;
        debug!(
            "Resolved {} of {} avatar hash(es)",
            avatars.values().filter(|h| h.is_some()).count(),
            avatars.len()
        );

        let mut links = Vec::new();
        for (i, a) in profiles.iter().enumerate() {
            for b in &profiles[i + 1..] {
                let score = self.scorer.score_pair(a, b, query, &avatars);
                links.push(IdentityLink {
                    profile_a: a.profile_url.clone(),
                    profile_b: b.profile_url.clone(),
                    signals: score.signals,
                    query_boost: score.query_boost,
                    confidence: score.confidence,
                });
            }
        }
        links
    }
}

/// Group records with positive confidence by platform, highest confidence first
///
/// The sort is stable, so equal scores keep connector order.
fn group_surviving(records: Vec<ProfileRecord>) -> BTreeMap<String, Vec<ProfileRecord>> {
    let mut groups: BTreeMap<String, Vec<ProfileRecord>> = BTreeMap::new();
    for record in records.into_iter().filter(|r| r.confidence > 0.0) {
        groups
            .entry(record.platform.as_str().to_string())
            .or_default()
            .push(record);
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::mock::MockConnector;
    use crate::fusion::extractors::HashedEmbedder;
    use footprint_common::{ContentItem, Platform, RawTimestamp};

    fn pipeline(connectors: Vec<MockConnector>) -> ScanPipeline {
        let mut registry = ConnectorRegistry::new();
        for connector in connectors {
            registry.register(Arc::new(connector));
        }
        let cache = Arc::new(AvatarCache::new(16, Duration::from_secs(60)));
        let hasher = AvatarHasher::new(cache, Duration::from_secs(1)).unwrap();
        let scorer = IdentityScorer::new(Arc::new(hasher), Arc::new(HashedEmbedder::new(64)));
        ScanPipeline::new(registry, scorer, true)
    }

    fn record(platform: Platform, url: &str, display: &str, confidence: f64) -> ProfileRecord {
        let mut record = ProfileRecord::new(platform, url, confidence);
        record.display_name = Some(display.to_string());
        record
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected() {
        let result = pipeline(vec![]).scan(&QueryInputs::default()).await;
        assert!(matches!(result, Err(ScanError::Validation(_))));
    }

    #[tokio::test]
    async fn test_vetoed_records_dropped_but_counted() {
        let mut vetoed = record(Platform::Reddit, "https://reddit.com/u/j", "John", 0.9);
        vetoed.posts = vec![ContentItem {
            content: "stupid idiot".to_string(),
            timestamp: Some(RawTimestamp::Text("2024-01-01".to_string())),
            ..Default::default()
        }];

        let p = pipeline(vec![MockConnector::new(
            "mock",
            vec![
                vetoed,
                record(Platform::Reddit, "https://reddit.com/u/js", "John Smith", 0.5),
                record(Platform::Reddit, "https://reddit.com/u/jsx", "Smith, John", 0.5),
            ],
        )]);

        let query = QueryInputs {
            name: Some("John Smith".to_string()),
            ..Default::default()
        };
        let report = p.scan(&query).await.unwrap();

        assert_eq!(report.accounts_found, 3);
        assert_eq!(report.confidence_scores.len(), 3);

        let reddit = &report.footprints["reddit"];
        assert_eq!(reddit.len(), 2, "Vetoed record is filtered out");
        assert_eq!(reddit[0].profile_url, "https://reddit.com/u/js");
        assert!(reddit[0].confidence > reddit[1].confidence);

        // Risk still covers the vetoed record; the timeline does not
        assert_eq!(report.risk_analysis.len(), 1);
        assert!(report.timeline.is_empty());

        assert_eq!(report.summary.platforms_found, vec!["reddit"]);
        assert_eq!(report.summary.total_posts, 1);
        assert_eq!(report.identity_links.len(), 1);
        assert_eq!(report.exportable_report["summary"]["total_accounts"], 3);
        assert_eq!(report.exportable_report["query"]["name"], "John Smith");
    }

    #[tokio::test]
    async fn test_failing_connector_does_not_fail_scan() {
        let p = pipeline(vec![
            MockConnector::failing("down"),
            MockConnector::new(
                "up",
                vec![record(Platform::Github, "https://github.com/x", "x", 0.9)],
            ),
        ]);
        let query = QueryInputs {
            usernames: vec!["x".to_string()],
            ..Default::default()
        };

        let report = p.scan(&query).await.unwrap();
        assert_eq!(report.accounts_found, 1);
        assert!(report.identity_links.is_empty(), "One profile has no pairs");
    }

    #[test]
    fn test_group_surviving_orders_by_confidence() {
        let groups = group_surviving(vec![
            ProfileRecord::new(Platform::Twitter, "https://t/1", 0.4),
            ProfileRecord::new(Platform::Twitter, "https://t/2", 0.9),
            ProfileRecord::new(Platform::Medium, "https://m/1", 0.0),
            ProfileRecord::new(Platform::Other, "https://o/1", 0.1),
        ]);

        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["other", "twitter"]);
        assert_eq!(groups["twitter"][0].profile_url, "https://t/2");
    }
}
