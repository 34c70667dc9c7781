//! [`ProfileService`] implementation backed by [`GithubClient`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use devscout_core::{ProfileService, RemoteProfile, RemoteRepository, RepoSort, ServiceError};

use crate::client::GithubClient;
use crate::error::GithubError;

/// Events requested for the recency check; one page is enough to cover a
/// 90-day window for all but the most active accounts.
const ACTIVITY_PAGE_SIZE: u32 = 30;

impl From<GithubError> for ServiceError {
    fn from(err: GithubError) -> Self {
        match err {
            GithubError::NotFound { url } => ServiceError::NotFound(url),
            other => ServiceError::Upstream(other.to_string()),
        }
    }
}

#[async_trait]
impl ProfileService for GithubClient {
    async fn get_profile(&self, login: &str) -> Result<RemoteProfile, ServiceError> {
        let user = self.get_user(login).await?;
        Ok(RemoteProfile {
            login: user.login,
            name: user.name.filter(|n| !n.trim().is_empty()),
            bio: user.bio.filter(|b| !b.trim().is_empty()),
            location: user.location.filter(|l| !l.trim().is_empty()),
            followers: user.followers,
            following: user.following,
            public_repos: user.public_repos,
            html_url: user.html_url,
        })
    }

    async fn list_repositories(
        &self,
        login: &str,
        sort: RepoSort,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RemoteRepository>, ServiceError> {
        let repos = self
            .list_user_repos(login, sort.as_str(), page, per_page)
            .await?;
        Ok(repos
            .into_iter()
            .map(|r| RemoteRepository {
                name: r.name,
                description: r.description.filter(|d| !d.trim().is_empty()),
                primary_language: r.language,
                stars: r.stargazers_count,
                is_fork: r.fork,
            })
            .collect())
    }

    async fn repository_languages(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<String>, ServiceError> {
        Ok(self.get_repo_languages(owner, repo).await?)
    }

    async fn get_document(&self, owner: &str, repo: &str) -> Result<String, ServiceError> {
        Ok(self.get_readme(owner, repo).await?)
    }

    async fn search_profiles(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<String>, ServiceError> {
        let mut logins = self.search_users(query, limit.clamp(1, 100)).await?;
        logins.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(logins)
    }

    async fn recent_activity(&self, login: &str) -> Result<Vec<DateTime<Utc>>, ServiceError> {
        let events = self.list_public_events(login, ACTIVITY_PAGE_SIZE).await?;
        Ok(events.into_iter().map(|e| e.created_at).collect())
    }
}
