//! Filtered multi-profile search.

use std::sync::Arc;

use chrono::Utc;
use devscout_core::{FilterCriteria, ProfileFacts, ProfileService, RepositoryDigest, ScoutError};
use futures::stream::{self, StreamExt};
use rand::Rng;

use crate::fetcher::ProfileFetcher;
use crate::filter::{build_query, matches, scan_satisfied};
use crate::settings::PipelineSettings;

/// Chooses which survivor a filtered search returns.
pub trait SurvivorPicker: Send + Sync {
    /// Returns an index in `0..survivors`; `survivors` is never zero.
    fn pick(&self, survivors: usize) -> usize;
}

/// Uniform random choice, so repeated searches with the same filters surface
/// different profiles.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPicker;

impl SurvivorPicker for RandomPicker {
    fn pick(&self, survivors: usize) -> usize {
        rand::rng().random_range(0..survivors)
    }
}

/// The profile returned by a filtered search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    /// Facts of the chosen survivor, including its scanned repositories.
    pub facts: ProfileFacts,
    /// How many candidates passed every filter.
    pub survivors: usize,
}

pub struct CandidateSearchOrchestrator {
    service: Arc<dyn ProfileService>,
    fetcher: ProfileFetcher,
    picker: Arc<dyn SurvivorPicker>,
    settings: PipelineSettings,
}

impl CandidateSearchOrchestrator {
    #[must_use]
    pub fn new(
        service: Arc<dyn ProfileService>,
        picker: Arc<dyn SurvivorPicker>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            fetcher: ProfileFetcher::new(Arc::clone(&service)),
            service,
            picker,
            settings,
        }
    }

    /// Searches for profiles matching `criteria`, evaluates each candidate
    /// concurrently, and returns one survivor.
    ///
    /// A candidate that fails to load, or exceeds the per-candidate deadline,
    /// is dropped without affecting the others.
    ///
    /// # Errors
    ///
    /// - [`ScoutError::InvalidFilter`] when `criteria` yield no search query;
    ///   no remote call is made.
    /// - [`ScoutError::Upstream`] when the search itself fails.
    /// - [`ScoutError::NoMatch`] when no candidate passes the filters.
    pub async fn search(&self, criteria: &FilterCriteria) -> Result<SearchMatch, ScoutError> {
        let query = build_query(criteria)?;
        let logins = self
            .service
            .search_profiles(&query, self.settings.search_limit)
            .await?;
        tracing::info!(%query, candidates = logins.len(), "profile search returned candidates");

        let workers = self.settings.max_concurrent_candidates.max(1);
        let mut survivors: Vec<(usize, ProfileFacts)> = stream::iter(logins.iter().enumerate())
            .map(|(index, login)| async move {
                self.evaluate_with_deadline(login, criteria)
                    .await
                    .map(|facts| (index, facts))
            })
            .buffer_unordered(workers)
            .filter_map(futures::future::ready)
            .collect()
            .await;

        if survivors.is_empty() {
            tracing::info!(%query, "no candidate passed the filters");
            return Err(ScoutError::NoMatch);
        }

        // Completion order is arbitrary; sort so the picker sees search order.
        survivors.sort_by_key(|(index, _)| *index);
        let count = survivors.len();
        let choice = self.picker.pick(count).min(count - 1);
        let (_, facts) = survivors.swap_remove(choice);
        tracing::info!(login = %facts.login, survivors = count, "filtered search matched");

        Ok(SearchMatch {
            facts,
            survivors: count,
        })
    }

    async fn evaluate_with_deadline(
        &self,
        login: &str,
        criteria: &FilterCriteria,
    ) -> Option<ProfileFacts> {
        match tokio::time::timeout(self.settings.candidate_timeout, self.evaluate(login, criteria))
            .await
        {
            Ok(Ok(Some(facts))) => Some(facts),
            Ok(Ok(None)) => {
                tracing::debug!(login, "candidate rejected by filters");
                None
            }
            Ok(Err(e)) => {
                tracing::warn!(login, error = %e, "candidate dropped");
                None
            }
            Err(_) => {
                tracing::warn!(
                    login,
                    timeout_secs = self.settings.candidate_timeout.as_secs(),
                    "candidate timed out; dropped"
                );
                None
            }
        }
    }

    async fn evaluate(
        &self,
        login: &str,
        criteria: &FilterCriteria,
    ) -> Result<Option<ProfileFacts>, ScoutError> {
        let stop = |digests: &[RepositoryDigest]| scan_satisfied(criteria, digests);
        let facts = self
            .fetcher
            .fetch_until(login, self.settings.budget.max_repos, &stop)
            .await?;

        let activity = if criteria.recent_activity {
            match self.service.recent_activity(&facts.login).await {
                Ok(events) => Some(events),
                Err(e) => {
                    tracing::warn!(
                        login = %facts.login,
                        error = %e,
                        "activity feed unreadable; recency not satisfied"
                    );
                    None
                }
            }
        } else {
            None
        };

        Ok(matches(&facts, activity.as_deref(), criteria, Utc::now()).then_some(facts))
    }
}

#[cfg(test)]
#[path = "search_test.rs"]
mod tests;
