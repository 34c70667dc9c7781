//! Collaborator interfaces consumed by the analysis pipeline.
//!
//! Implementations are constructed once by the process entry point and shared
//! across concurrent workers as `Arc<dyn …>` handles. They must hold no
//! per-call mutable state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Account-level facts returned by a profile lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteProfile {
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub followers: u32,
    pub following: u32,
    pub public_repos: u32,
    pub html_url: String,
}

/// One entry of a profile's repository listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRepository {
    pub name: String,
    pub description: Option<String>,
    pub primary_language: Option<String>,
    pub stars: u64,
    pub is_fork: bool,
}

/// Ordering requested from a repository listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoSort {
    /// Most recently updated first.
    Updated,
}

impl RepoSort {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Updated => "updated",
        }
    }
}

/// Read-only access to the remote code-hosting service.
#[async_trait]
pub trait ProfileService: Send + Sync {
    /// Looks up a profile by login.
    async fn get_profile(&self, login: &str) -> Result<RemoteProfile, ServiceError>;

    /// Returns one page (1-based) of the profile's own repositories.
    ///
    /// A page shorter than `per_page` is the last one.
    async fn list_repositories(
        &self,
        login: &str,
        sort: RepoSort,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RemoteRepository>, ServiceError>;

    /// Full language set of one repository, largest share first.
    async fn repository_languages(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<String>, ServiceError>;

    /// Raw README text of a repository; [`ServiceError::NotFound`] when absent.
    async fn get_document(&self, owner: &str, repo: &str) -> Result<String, ServiceError>;

    /// Logins matching a search query, at most `limit` of them.
    async fn search_profiles(&self, query: &str, limit: u32)
        -> Result<Vec<String>, ServiceError>;

    /// Timestamps of the profile's recent public activity, newest first.
    async fn recent_activity(&self, login: &str) -> Result<Vec<DateTime<Utc>>, ServiceError>;
}

/// Parameters of a single text-completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Opaque, possibly slow and unreliable, text-generation service.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ServiceError>;
}
