//! Budgeted walk over a profile's repositories.

use std::sync::Arc;

use devscout_core::{
    LanguageHistogram, ProfileService, RemoteRepository, RepoSort, RepositoryDigest, ScoutError,
    SelectionBudget, ServiceError, NO_DESCRIPTION,
};

/// Repositories requested per listing page.
const PAGE_SIZE: u32 = 100;

/// Upper bound on listing pages, independent of the repository budget.
const MAX_PAGES: u32 = 10;

/// Early-exit rule evaluated after every digested repository. Returning
/// `true` ends the scan.
pub type StopRule<'a> = &'a (dyn Fn(&[RepositoryDigest]) -> bool + Send + Sync);

/// Digests and aggregate statistics produced by one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Most recently updated first.
    pub repositories: Vec<RepositoryDigest>,
    pub languages: LanguageHistogram,
}

pub struct RepositoryScanner {
    service: Arc<dyn ProfileService>,
}

impl RepositoryScanner {
    #[must_use]
    pub fn new(service: Arc<dyn ProfileService>) -> Self {
        Self { service }
    }

    /// Scans up to `budget.max_repos` repositories, stopping as soon as the
    /// cumulative star count reaches `budget.min_stars` (when non-zero).
    ///
    /// # Errors
    ///
    /// Returns the mapped [`ScoutError`] when the first listing page cannot be
    /// read. Failures on individual repositories never abort the scan.
    pub async fn scan(
        &self,
        login: &str,
        budget: &SelectionBudget,
    ) -> Result<ScanOutcome, ScoutError> {
        let min_stars = budget.min_stars;
        let stop = move |digests: &[RepositoryDigest]| reached_min_stars(digests, min_stars);
        self.scan_until(login, budget.max_repos, &stop).await
    }

    /// Scans up to `max_repos` repositories, most recently updated first,
    /// ending early once `stop` returns `true`.
    ///
    /// Forks and the profile's own self-documentation repository (named like
    /// the login) are skipped and do not count against the budget. A
    /// repository whose languages cannot be read is logged and skipped.
    ///
    /// # Errors
    ///
    /// Same as [`RepositoryScanner::scan`].
    pub async fn scan_until(
        &self,
        login: &str,
        max_repos: usize,
        stop: StopRule<'_>,
    ) -> Result<ScanOutcome, ScoutError> {
        let mut digests: Vec<RepositoryDigest> = Vec::new();

        'pages: for page in 1..=MAX_PAGES {
            if digests.len() >= max_repos {
                break;
            }

            let listing = match self
                .service
                .list_repositories(login, RepoSort::Updated, page, PAGE_SIZE)
                .await
            {
                Ok(listing) => listing,
                Err(e) if page == 1 => return Err(e.into()),
                Err(e) => {
                    tracing::warn!(
                        login,
                        page,
                        error = %e,
                        "repository listing failed; keeping repositories scanned so far"
                    );
                    break;
                }
            };
            tracing::debug!(login, page, returned = listing.len(), "repository page fetched");
            let last_page = listing.len() < PAGE_SIZE as usize;

            for repo in listing {
                if digests.len() >= max_repos {
                    break 'pages;
                }
                if repo.is_fork {
                    tracing::debug!(login, repo = %repo.name, "skipping fork");
                    continue;
                }
                if repo.name.eq_ignore_ascii_case(login) {
                    tracing::debug!(login, repo = %repo.name, "skipping profile repository");
                    continue;
                }
                let Some(digest) = self.digest(login, repo).await else {
                    continue;
                };
                digests.push(digest);
                if stop(&digests) {
                    tracing::debug!(login, scanned = digests.len(), "scan stopped early");
                    break 'pages;
                }
            }

            if last_page {
                break;
            }
        }

        let languages = histogram(&digests);
        Ok(ScanOutcome {
            repositories: digests,
            languages,
        })
    }

    async fn digest(&self, login: &str, repo: RemoteRepository) -> Option<RepositoryDigest> {
        let languages = match self.service.repository_languages(login, &repo.name).await {
            Ok(languages) if !languages.is_empty() => languages,
            Ok(_) => repo.primary_language.into_iter().collect(),
            Err(e) => {
                tracing::warn!(
                    login,
                    repo = %repo.name,
                    error = %e,
                    "language lookup failed; skipping repository"
                );
                return None;
            }
        };
        let has_readme = match self.service.get_document(login, &repo.name).await {
            Ok(_) => true,
            Err(ServiceError::NotFound(_)) => false,
            Err(e) => {
                tracing::warn!(
                    login,
                    repo = %repo.name,
                    error = %e,
                    "readme lookup failed; treating as absent"
                );
                false
            }
        };

        Some(RepositoryDigest {
            name: repo.name,
            description: repo
                .description
                .unwrap_or_else(|| NO_DESCRIPTION.to_owned()),
            languages,
            stars: repo.stars,
            has_readme,
            is_fork: repo.is_fork,
        })
    }
}

/// `true` once the digests' cumulative stars reach a non-zero threshold.
pub(crate) fn reached_min_stars(digests: &[RepositoryDigest], min_stars: u64) -> bool {
    min_stars > 0 && digests.iter().map(|d| d.stars).sum::<u64>() >= min_stars
}

fn histogram(digests: &[RepositoryDigest]) -> LanguageHistogram {
    let mut counts = LanguageHistogram::new();
    for language in digests.iter().flat_map(|d| &d.languages) {
        *counts.entry(language.clone()).or_insert(0) += 1;
    }
    counts
}
