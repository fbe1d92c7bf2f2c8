//! Scan Pipeline Integration Tests
//!
//! End-to-end scans over in-memory connectors: refinement, filtering,
//! risk, identity links and timeline assembly. No network access.

mod helpers;

use footprint_common::{Platform, ProfileRecord, QueryInputs, TimelineEventType};
use footprint_scan::connectors::Connector;
use footprint_scan::ScanError;
use helpers::*;
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn sample_connectors() -> Vec<Arc<dyn Connector>> {
    vec![Arc::new(StaticConnector {
        name: "static",
        records: sample_records(),
    })]
}

/// TC-SCAN-001: Query without any identifier is rejected before connectors run
#[tokio::test]
async fn tc_scan_001_empty_query_rejected() {
    // Given: A pipeline with connectors
    let pipeline = test_pipeline(sample_connectors(), empty_cache());

    // When: Scanning with blank fields only
    let query = QueryInputs {
        name: Some("  ".to_string()),
        usernames: vec![],
        email: None,
    };
    let result = pipeline.scan(&query).await;

    // Then: Validation error
    assert!(matches!(result, Err(ScanError::Validation(_))));
}

/// TC-SCAN-002: Name veto drops unrelated profiles, survivors sorted by confidence
#[tokio::test]
async fn tc_scan_002_refinement_and_grouping() {
    // Given: Two matching profiles and one "John Doe"
    let cache = empty_cache();
    warm_avatars(&cache);
    let pipeline = test_pipeline(sample_connectors(), cache);

    // When: Scanning for John Smith
    let report = pipeline.scan(&john_smith_query()).await.unwrap();

    // Then: All three counted, only two survive
    assert_eq!(report.accounts_found, 3);
    assert_eq!(report.summary.platforms_found, vec!["github", "reddit"]);
    assert!(!report.footprints.contains_key("twitter"));

    let github = &report.footprints["github"][0];
    assert_eq!(github.confidence, 1.0);

    let reddit = &report.footprints["reddit"][0];
    assert!(reddit.confidence > 0.9 && reddit.confidence < 1.0);

    // Every collected record is explained, including the vetoed one
    assert_eq!(report.confidence_scores.len(), 3);
    let vetoed = report
        .confidence_scores
        .iter()
        .find(|c| c.profile_url == "https://twitter.com/john")
        .unwrap();
    assert_eq!(vetoed.score, 0.0);
    assert_eq!(vetoed.factors.name_match, 0.3);
    assert_eq!(vetoed.factors.username_match, 0.0);
    assert_eq!(vetoed.factors.email_match, 0.1);
}

/// TC-SCAN-003: Risk covers every collected record; flags follow thresholds
#[tokio::test]
async fn tc_scan_003_risk_over_all_records() {
    // Given: Sample records including a shouted insult and a political post
    let cache = empty_cache();
    warm_avatars(&cache);
    let pipeline = test_pipeline(sample_connectors(), cache);

    // When: Scanning
    let report = pipeline.scan(&john_smith_query()).await.unwrap();

    // Then: 2 github posts + 2 reddit comments + 1 vetoed twitter post
    assert_eq!(report.risk_analysis.len(), 5);
    assert_eq!(report.summary.total_flagged, 2);

    let insult = report
        .risk_analysis
        .iter()
        .find(|a| a.url.as_deref() == Some("https://reddit.com/c/1"))
        .unwrap();
    assert_eq!(insult.metrics.toxicity, 1.0);
    assert!(insult.flags.contains(&"High Toxicity".to_string()));

    let political = report
        .risk_analysis
        .iter()
        .find(|a| a.content == "vote in the election")
        .unwrap();
    assert!(political.flags.contains(&"High Political Intensity".to_string()));

    for assessment in &report.risk_analysis {
        assert_eq!(assessment.flagged, !assessment.flags.is_empty());
        assert!((0.0..=100.0).contains(&assessment.metrics.overall_risk));
    }
}

/// TC-SCAN-004: Timeline is sorted, covers survivors only, carries risk
#[tokio::test]
async fn tc_scan_004_timeline_sorted_and_annotated() {
    // Given: Sample records
    let cache = empty_cache();
    warm_avatars(&cache);
    let pipeline = test_pipeline(sample_connectors(), cache);

    // When: Scanning
    let report = pipeline.scan(&john_smith_query()).await.unwrap();
    let timeline = &report.timeline;

    // Then: account_created + 2 posts (github) and 2 comments (reddit)
    assert_eq!(timeline.len(), 5);
    assert!(timeline.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

    assert_eq!(timeline[0].event_type, TimelineEventType::AccountCreated);
    assert_eq!(timeline[0].content, "Account created on github");
    assert_eq!(timeline[1].content, "Dotfiles");
    assert_eq!(timeline[4].content, "A tiny parser combinator library");

    assert!(
        timeline.iter().all(|e| e.content != "vote in the election"),
        "Vetoed profile stays out of the timeline"
    );

    let insult = timeline
        .iter()
        .find(|e| e.url.as_deref() == Some("https://reddit.com/c/1"))
        .unwrap();
    assert!(insult.risk_score >= 40.0);

    // Comment without a URL links to its profile
    let thanks = timeline
        .iter()
        .find(|e| e.content == "Thanks, that fixed it")
        .unwrap();
    assert_eq!(thanks.url.as_deref(), Some("https://reddit.com/user/jsmith_"));
}

/// TC-SCAN-005: Surviving profiles are linked with explained signals
#[tokio::test]
async fn tc_scan_005_identity_links() {
    // Given: Warm cache with near-identical avatars
    let cache = empty_cache();
    warm_avatars(&cache);
    let pipeline = test_pipeline(sample_connectors(), cache);

    // When: Scanning
    let report = pipeline.scan(&john_smith_query()).await.unwrap();

    // Then: One link between github and reddit
    assert_eq!(report.identity_links.len(), 1);
    let link = &report.identity_links[0];
    assert_eq!(link.profile_a, "https://github.com/jsmith");
    assert_eq!(link.profile_b, "https://reddit.com/user/jsmith_");
    assert_eq!(link.signals.links, 1.0);
    assert!((link.signals.avatar - (1.0 - 1.0 / 64.0)).abs() < 1e-9);
    assert!((link.query_boost - 0.2).abs() < 1e-9);
    assert!(link.confidence > 0.8 && link.confidence <= 1.0);
}

/// TC-SCAN-006: Failing connectors do not fail the scan
#[tokio::test]
async fn tc_scan_006_connector_failure_isolated() {
    // Given: One failing and one healthy connector
    let cache = empty_cache();
    warm_avatars(&cache);
    let mut connectors = sample_connectors();
    connectors.insert(0, Arc::new(FailingConnector));
    let pipeline = test_pipeline(connectors, cache);

    // When: Scanning
    let report = pipeline.scan(&john_smith_query()).await.unwrap();

    // Then: Healthy connector's records are all present
    assert_eq!(report.accounts_found, 3);
    assert_eq!(pipeline.connector_count(), 2);
}

/// TC-SCAN-007: Repeated scans on identical input produce identical output
#[tokio::test]
async fn tc_scan_007_idempotent_with_warm_cache() {
    // Given: A warm avatar cache
    let cache = empty_cache();
    warm_avatars(&cache);
    let pipeline = test_pipeline(sample_connectors(), cache);
    let query = john_smith_query();

    // When: Scanning twice
    let first = pipeline.scan(&query).await.unwrap();
    let second = pipeline.scan(&query).await.unwrap();

    // Then: Everything except scan identity matches
    assert_ne!(first.scan_id, second.scan_id);
    assert_eq!(first.footprints, second.footprints);
    assert_eq!(first.confidence_scores, second.confidence_scores);
    assert_eq!(first.identity_links, second.identity_links);
    assert_eq!(first.risk_analysis, second.risk_analysis);
    assert_eq!(first.timeline, second.timeline);
    assert_eq!(first.summary, second.summary);
}

/// TC-SCAN-008: Exportable report mirrors the response and carries the query
#[tokio::test]
async fn tc_scan_008_exportable_report() {
    // Given: Sample records
    let cache = empty_cache();
    warm_avatars(&cache);
    let pipeline = test_pipeline(sample_connectors(), cache);

    // When: Scanning
    let report = pipeline.scan(&john_smith_query()).await.unwrap();
    let export = &report.exportable_report;

    // Then: Same content, plus the query
    assert_eq!(export["scan_id"], report.scan_id.to_string());
    assert_eq!(export["query"]["email"], "john@example.com");
    assert_eq!(export["summary"]["total_accounts"], 3);
    assert_eq!(export["summary"]["total_comments"], 2);
    assert_eq!(
        export["timeline"].as_array().map(Vec::len),
        Some(report.timeline.len())
    );
    assert_eq!(export["footprints"]["github"][0]["platform"], "github");
}

/// TC-SCAN-009: A broken avatar URL is requested once per scan, not once per pair
#[tokio::test]
async fn tc_scan_009_broken_avatar_fetched_once() {
    // Given: Four surviving profiles sharing one avatar served as 404
    let (host, hits) = spawn_missing_avatar_host().await;
    let avatar = format!("{}/shared.png", host);
    let records: Vec<ProfileRecord> = [
        (Platform::Github, "https://github.com/jdoe"),
        (Platform::Reddit, "https://reddit.com/user/jdoe"),
        (Platform::Medium, "https://medium.com/@jdoe"),
        (Platform::Tumblr, "https://jdoe.tumblr.com"),
    ]
    .into_iter()
    .map(|(platform, url)| {
        let mut record = ProfileRecord::new(platform, url, 0.5);
        record.username = Some("jdoe".to_string());
        record.avatar_url = Some(avatar.clone());
        record
    })
    .collect();

    let pipeline = test_pipeline(
        vec![Arc::new(StaticConnector {
            name: "static",
            records,
        })],
        empty_cache(),
    );
    let query = QueryInputs {
        usernames: vec!["jdoe".to_string()],
        ..Default::default()
    };

    // When: Scanning
    let report = pipeline.scan(&query).await.unwrap();

    // Then: Six links, one avatar request, avatar signal zero everywhere
    assert_eq!(report.identity_links.len(), 6);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(report.identity_links.iter().all(|l| l.signals.avatar == 0.0));
}
