//! Wire types for the subset of the GitHub REST API devscout reads.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// `GET /users/{login}`
#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
    #[serde(default)]
    pub public_repos: u32,
    pub html_url: String,
}

/// One element of `GET /users/{login}/repos`.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoResponse {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub fork: bool,
}

/// `GET /search/users`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchUsersResponse {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<SearchUserItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchUserItem {
    pub login: String,
}

/// One element of `GET /users/{login}/events/public`.
#[derive(Debug, Clone, Deserialize)]
pub struct EventResponse {
    pub created_at: DateTime<Utc>,
}
