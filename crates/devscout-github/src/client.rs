//! HTTP client for the GitHub REST API.
//!
//! Wraps `reqwest` with GitHub-specific headers, optional token
//! authentication, status-code classification (404, rate limiting) and typed
//! response deserialization. Every request goes through
//! [`retry_with_backoff`] so transient failures are retried.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, RETRY_AFTER};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::GithubError;
use crate::retry::retry_with_backoff;
use crate::types::{EventResponse, RepoResponse, SearchUsersResponse, UserResponse};

const DEFAULT_BASE_URL: &str = "https://api.github.com/";
const API_VERSION: &str = "2022-11-28";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw+json";

/// Client for the GitHub REST API.
///
/// Use [`GithubClient::new`] for production or [`GithubClient::with_base_url`]
/// to point at a mock server in tests. Cheap to share: the inner
/// `reqwest::Client` is reference-counted and the struct holds no per-call
/// state.
pub struct GithubClient {
    client: Client,
    token: Option<String>,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl GithubClient {
    /// Creates a client pointed at the public GitHub API.
    ///
    /// `token` is optional; unauthenticated calls work at a lower rate limit.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        token: Option<&str>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, GithubError> {
        Self::with_base_url(
            token,
            timeout_secs,
            max_retries,
            backoff_base_ms,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a client with a custom base URL (GitHub Enterprise, or wiremock
    /// in tests).
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`GithubError::InvalidBaseUrl`] if `base_url` is not an absolute
    /// HTTP(S) URL.
    pub fn with_base_url(
        token: Option<&str>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
        base_url: &str,
    ) -> Result<Self, GithubError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-GitHub-Api-Version",
            reqwest::header::HeaderValue::from_static(API_VERSION),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("devscout/0.1 (profile-analysis)")
            .default_headers(headers)
            .build()?;

        // Keep exactly one trailing slash so path segments are appended after
        // any API prefix (e.g. `/api/v3/` on Enterprise installs).
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| GithubError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GithubError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(Self {
            client,
            token: token
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_owned),
            base_url: parsed,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Fetches a user profile.
    ///
    /// # Errors
    ///
    /// - [`GithubError::NotFound`] if the login does not exist.
    /// - [`GithubError::RateLimited`] when the rate-limit window is exhausted.
    /// - [`GithubError::Http`] / [`GithubError::UnexpectedStatus`] on transport
    ///   or server failure after retries.
    /// - [`GithubError::Deserialize`] if the body has an unexpected shape.
    pub async fn get_user(&self, login: &str) -> Result<UserResponse, GithubError> {
        let url = self.build_url(&["users", login], &[])?;
        self.get_json(&url, &format!("get_user({login})")).await
    }

    /// Lists one page of the repositories owned by `login`.
    ///
    /// `sort` is passed through as the API's `sort` parameter; results are
    /// always in descending order.
    ///
    /// # Errors
    ///
    /// Same as [`GithubClient::get_user`].
    pub async fn list_user_repos(
        &self,
        login: &str,
        sort: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RepoResponse>, GithubError> {
        let page = page.to_string();
        let per_page = per_page.to_string();
        let url = self.build_url(
            &["users", login, "repos"],
            &[
                ("type", "owner"),
                ("sort", sort),
                ("direction", "desc"),
                ("per_page", &per_page),
                ("page", &page),
            ],
        )?;
        self.get_json(&url, &format!("list_user_repos({login}, page={page})"))
            .await
    }

    /// Returns the languages of a repository, largest byte count first.
    ///
    /// # Errors
    ///
    /// Same as [`GithubClient::get_user`].
    pub async fn get_repo_languages(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<String>, GithubError> {
        let url = self.build_url(&["repos", owner, repo, "languages"], &[])?;
        let bytes_by_language: HashMap<String, u64> = self
            .get_json(&url, &format!("get_repo_languages({owner}/{repo})"))
            .await?;
        Ok(rank_languages(bytes_by_language))
    }

    /// Fetches the raw README text of a repository.
    ///
    /// # Errors
    ///
    /// [`GithubError::NotFound`] when the repository has no README, otherwise
    /// as [`GithubClient::get_user`].
    pub async fn get_readme(&self, owner: &str, repo: &str) -> Result<String, GithubError> {
        let url = self.build_url(&["repos", owner, repo, "readme"], &[])?;
        self.get_text(&url, RAW_MEDIA_TYPE).await
    }

    /// Searches users and returns the matching logins.
    ///
    /// # Errors
    ///
    /// Same as [`GithubClient::get_user`]; an invalid query surfaces as
    /// [`GithubError::UnexpectedStatus`] with status 422.
    pub async fn search_users(
        &self,
        query: &str,
        per_page: u32,
    ) -> Result<Vec<String>, GithubError> {
        let per_page = per_page.to_string();
        let url = self.build_url(
            &["search", "users"],
            &[("q", query), ("per_page", &per_page)],
        )?;
        let response: SearchUsersResponse = self
            .get_json(&url, &format!("search_users(q={query})"))
            .await?;
        tracing::debug!(
            query,
            total_count = response.total_count,
            returned = response.items.len(),
            "GitHub user search completed"
        );
        Ok(response.items.into_iter().map(|item| item.login).collect())
    }

    /// Lists the most recent public events of `login`, newest first.
    ///
    /// # Errors
    ///
    /// Same as [`GithubClient::get_user`].
    pub async fn list_public_events(
        &self,
        login: &str,
        per_page: u32,
    ) -> Result<Vec<EventResponse>, GithubError> {
        let per_page = per_page.to_string();
        let url = self.build_url(
            &["users", login, "events", "public"],
            &[("per_page", &per_page)],
        )?;
        self.get_json(&url, &format!("list_public_events({login})"))
            .await
    }

    /// Appends percent-encoded path segments and query pairs to the base URL.
    fn build_url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, GithubError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| GithubError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: "URL cannot be a base".to_owned(),
            })?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url, context: &str) -> Result<T, GithubError> {
        let body = self.get_text(url, JSON_MEDIA_TYPE).await?;
        serde_json::from_str(&body).map_err(|e| GithubError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }

    /// Sends a GET with retries, classifies the status, and returns the body.
    async fn get_text(&self, url: &Url, accept: &str) -> Result<String, GithubError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            let mut request = self.client.get(url.clone()).header(ACCEPT, accept);
            if let Some(token) = &self.token {
                request = request.header(AUTHORIZATION, format!("Bearer {token}"));
            }

            let response = request.send().await?;
            let status = response.status();

            if status == StatusCode::NOT_FOUND {
                return Err(GithubError::NotFound {
                    url: url.to_string(),
                });
            }
            if is_rate_limited(status, response.headers()) {
                return Err(GithubError::RateLimited {
                    retry_after_secs: retry_after_secs(response.headers()),
                });
            }
            if !status.is_success() {
                return Err(GithubError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }

            Ok(response.text().await?)
        })
        .await
    }
}

/// 429 always means rate limited; GitHub also uses 403 with an exhausted
/// `x-ratelimit-remaining` for primary limits.
fn is_rate_limited(status: StatusCode, headers: &HeaderMap) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }
    status == StatusCode::FORBIDDEN
        && headers
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim() == "0")
}

/// Seconds until the rate-limit window reopens, from `Retry-After` or
/// `x-ratelimit-reset`; 60 when neither is usable.
fn retry_after_secs(headers: &HeaderMap) -> u64 {
    if let Some(secs) = headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
    {
        return secs;
    }
    headers
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<i64>().ok())
        .map(|reset| reset - chrono::Utc::now().timestamp())
        .and_then(|delta| u64::try_from(delta).ok())
        .unwrap_or(60)
}

fn rank_languages(bytes_by_language: HashMap<String, u64>) -> Vec<String> {
    let mut ranked: Vec<(String, u64)> = bytes_by_language.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().map(|(name, _)| name).collect()
}
