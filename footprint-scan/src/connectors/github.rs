// GitHub Connector
//
// Public REST API: /users/{u}, /users/{u}/repos (posts), /users/{u}/events/public (comments)
// Baseline confidence: 0.9 exact login match, 0.6 otherwise

use super::{Connector, ConnectorError};
use async_trait::async_trait;
use footprint_common::config::GithubConfig;
use footprint_common::{ContentItem, Platform, ProfileRecord, QueryInputs, RawTimestamp};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("footprint-scan/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 10;
const REQUESTS_PER_SECOND: u32 = 5;
const PAGE_SIZE: u32 = 10;

pub const EXACT_MATCH_CONFIDENCE: f64 = 0.9;
pub const PARTIAL_MATCH_CONFIDENCE: f64 = 0.6;

const COMMENT_EVENTS: [&str; 2] = ["IssueCommentEvent", "PullRequestReviewCommentEvent"];

#[derive(Debug, Deserialize)]
struct GithubUser {
    login: String,
    html_url: Option<String>,
    name: Option<String>,
    avatar_url: Option<String>,
    bio: Option<String>,
    blog: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubRepo {
    name: String,
    description: Option<String>,
    html_url: Option<String>,
    updated_at: Option<RawTimestamp>,
}

#[derive(Debug, Deserialize)]
struct GithubEvent {
    #[serde(rename = "type")]
    kind: String,
    created_at: Option<RawTimestamp>,
    #[serde(default)]
    payload: EventPayload,
}

#[derive(Debug, Default, Deserialize)]
struct EventPayload {
    comment: Option<EventComment>,
}

#[derive(Debug, Deserialize)]
struct EventComment {
    #[serde(default)]
    body: Option<String>,
    html_url: Option<String>,
}

pub struct GithubConnector {
    client: reqwest::Client,
    api_base: String,
    token: Option<String>,
    rate_limiter: DefaultDirectRateLimiter,
}

impl GithubConnector {
    pub fn new(config: &GithubConfig) -> Result<Self, ConnectorError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ConnectorError::Network(e.to_string()))?;

        let per_second = NonZeroU32::new(REQUESTS_PER_SECOND).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: config.token.clone().filter(|t| !t.is_empty()),
            rate_limiter: RateLimiter::direct(Quota::per_second(per_second)),
        })
    }

    /// GET a JSON resource, `None` on 404
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, ConnectorError> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.api_base, path);
        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .query(query);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ConnectorError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConnectorError::Api(status.as_u16(), body));
        }

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|e| ConnectorError::Parse(format!("{}: {}", url, e)))
    }

    /// Profile for one username, `None` if the account does not exist
    async fn fetch_profile(&self, username: &str) -> Result<Option<ProfileRecord>, ConnectorError> {
        let Some(user) = self
            .get_json::<GithubUser>(&format!("/users/{}", username), &[])
            .await?
        else {
            debug!("GitHub user not found: {}", username);
            return Ok(None);
        };

        // Activity lists are best-effort; the profile stands without them
        let repos = self
            .get_json::<Vec<GithubRepo>>(
                &format!("/users/{}/repos", username),
                &[("sort", "updated".to_string()), ("per_page", PAGE_SIZE.to_string())],
            )
            .await
            .unwrap_or_else(|e| {
                debug!("GitHub repos for {} unavailable: {}", username, e);
                None
            })
            .unwrap_or_default();

        let events = self
            .get_json::<Vec<GithubEvent>>(
                &format!("/users/{}/events/public", username),
                &[("per_page", PAGE_SIZE.to_string())],
            )
            .await
            .unwrap_or_else(|e| {
                debug!("GitHub events for {} unavailable: {}", username, e);
                None
            })
            .unwrap_or_default();

        Ok(Some(build_record(username, user, repos, events)))
    }
}

#[async_trait]
impl Connector for GithubConnector {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn search(&self, query: &QueryInputs) -> Result<Vec<ProfileRecord>, ConnectorError> {
        let mut records = Vec::new();

        for username in query.usernames() {
            let clean = username.trim_start_matches('@');
            if clean.is_empty() {
                continue;
            }

            match self.fetch_profile(clean).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => warn!("GitHub lookup for {} failed: {}", clean, e),
            }
        }

        Ok(records)
    }
}

/// Assemble a profile record from API responses
fn build_record(
    queried: &str,
    user: GithubUser,
    repos: Vec<GithubRepo>,
    events: Vec<GithubEvent>,
) -> ProfileRecord {
    // GitHub logins are case-insensitive
    let confidence = if user.login.eq_ignore_ascii_case(queried) {
        EXACT_MATCH_CONFIDENCE
    } else {
        PARTIAL_MATCH_CONFIDENCE
    };

    let profile_url = user
        .html_url
        .clone()
        .unwrap_or_else(|| format!("https://github.com/{}", user.login));

    let mut record = ProfileRecord::new(Platform::Github, profile_url.clone(), confidence);
    record.username = Some(user.login.clone());
    record.display_name = Some(user.name.unwrap_or_else(|| user.login.clone()));
    record.avatar_url = user.avatar_url;
    record.bio = user.bio.filter(|b| !b.trim().is_empty());

    record.posts = repos
        .into_iter()
        .map(|repo| ContentItem {
            content: repo.description.unwrap_or_default(),
            title: Some(repo.name),
            url: repo.html_url,
            timestamp: repo.updated_at,
            engagement: None,
        })
        .collect();

    record.comments = events
        .into_iter()
        .filter(|event| COMMENT_EVENTS.contains(&event.kind.as_str()))
        .filter_map(|event| {
            let comment = event.payload.comment?;
            Some(ContentItem {
                content: comment.body.unwrap_or_default(),
                url: comment.html_url,
                timestamp: event.created_at,
                ..Default::default()
            })
        })
        .collect();

    record.links = user
        .blog
        .into_iter()
        .filter(|b| !b.trim().is_empty())
        .chain(std::iter::once(profile_url))
        .collect();

    record
        .metadata
        .insert("login".to_string(), serde_json::Value::String(user.login));

    record
}
