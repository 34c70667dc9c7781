//! Identifier → [`ProfileFacts`] resolution.

use std::sync::Arc;

use devscout_core::{
    parse_identifier, ProfileFacts, ProfileService, RemoteProfile, ScoutError, SelectionBudget,
    ServiceError,
};

use crate::scanner::{RepositoryScanner, ScanOutcome, StopRule};

pub struct ProfileFetcher {
    service: Arc<dyn ProfileService>,
    scanner: RepositoryScanner,
}

impl ProfileFetcher {
    #[must_use]
    pub fn new(service: Arc<dyn ProfileService>) -> Self {
        Self {
            scanner: RepositoryScanner::new(Arc::clone(&service)),
            service,
        }
    }

    /// Resolves `identifier` (login, `@login`, or profile URL) and scans the
    /// profile's repositories under `budget`.
    ///
    /// The profile document is best-effort: when it is missing or cannot be
    /// read the facts carry `None` and callers fall back to a placeholder.
    ///
    /// # Errors
    ///
    /// - [`ScoutError::InvalidIdentifier`] before any remote call.
    /// - [`ScoutError::NotFound`] when the login does not exist.
    /// - [`ScoutError::Upstream`] when the profile or its repository listing
    ///   cannot be read.
    pub async fn fetch(
        &self,
        identifier: &str,
        budget: &SelectionBudget,
    ) -> Result<ProfileFacts, ScoutError> {
        let login = parse_identifier(identifier)?;
        let (profile, document) = self.lookup(&login).await?;
        let scan = self.scanner.scan(&profile.login, budget).await?;
        Ok(assemble(profile, document, scan))
    }

    /// Like [`ProfileFetcher::fetch`] but with a caller-supplied early-exit
    /// rule for the repository scan.
    ///
    /// # Errors
    ///
    /// Same as [`ProfileFetcher::fetch`].
    pub async fn fetch_until(
        &self,
        identifier: &str,
        max_repos: usize,
        stop: StopRule<'_>,
    ) -> Result<ProfileFacts, ScoutError> {
        let login = parse_identifier(identifier)?;
        let (profile, document) = self.lookup(&login).await?;
        let scan = self
            .scanner
            .scan_until(&profile.login, max_repos, stop)
            .await?;
        Ok(assemble(profile, document, scan))
    }

    async fn lookup(&self, login: &str) -> Result<(RemoteProfile, Option<String>), ScoutError> {
        let profile = self.service.get_profile(login).await?;
        tracing::debug!(login = %profile.login, "profile resolved");

        let document = match self.service.get_document(&profile.login, &profile.login).await {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => None,
            Err(ServiceError::NotFound(_)) => {
                tracing::debug!(login = %profile.login, "no profile document");
                None
            }
            Err(e) => {
                tracing::warn!(
                    login = %profile.login,
                    error = %e,
                    "profile document lookup failed; continuing without it"
                );
                None
            }
        };
        Ok((profile, document))
    }
}

fn assemble(profile: RemoteProfile, document: Option<String>, scan: ScanOutcome) -> ProfileFacts {
    ProfileFacts {
        display_name: profile.name.unwrap_or_else(|| profile.login.clone()),
        login: profile.login,
        bio: profile.bio,
        location: profile.location,
        profile_url: profile.html_url,
        followers: profile.followers,
        following: profile.following,
        public_repos: profile.public_repos,
        profile_document: document,
        languages: scan.languages,
        repositories: scan.repositories,
    }
}
