//! Multi-candidate ranking against a job description.

use std::sync::Arc;

use devscout_core::{
    parse_identifier, AnalysisContext, CandidateResult, ProfileService, ScoutError, TextGenerator,
};
use futures::stream::{self, StreamExt};

use crate::analysis::write_report;
use crate::fetcher::ProfileFetcher;
use crate::report::ReportGenerator;
use crate::selector::RelevanceSelector;
use crate::settings::PipelineSettings;

pub const MIN_JOB_DESCRIPTION_CHARS: usize = 50;
pub const MAX_JOB_DESCRIPTION_CHARS: usize = 5000;
pub const MAX_CANDIDATES: usize = 5;

pub struct RankingOrchestrator {
    fetcher: ProfileFetcher,
    selector: RelevanceSelector,
    reports: Arc<dyn ReportGenerator>,
    settings: PipelineSettings,
}

impl RankingOrchestrator {
    #[must_use]
    pub fn new(
        service: Arc<dyn ProfileService>,
        generator: Arc<dyn TextGenerator>,
        reports: Arc<dyn ReportGenerator>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            fetcher: ProfileFetcher::new(service),
            selector: RelevanceSelector::new(generator, settings.selection_timeout),
            reports,
            settings,
        }
    }

    /// Reports on every candidate concurrently, then ranks the survivors.
    ///
    /// Candidates that fail (unknown login, upstream error, report failure,
    /// or the per-candidate deadline) are dropped. Survivors reach the
    /// ranking report in the order of `identifiers`, whatever order they
    /// completed in. The ranking report is returned as produced.
    ///
    /// # Errors
    ///
    /// - [`ScoutError::InvalidRequest`] when the job description is not
    ///   50–5000 characters or there are not 1–5 identifiers.
    /// - [`ScoutError::InvalidIdentifier`] when any identifier is malformed.
    /// - [`ScoutError::NoCandidates`] when every candidate failed.
    /// - [`ScoutError::Upstream`] when the ranking report itself fails.
    ///
    /// All validation happens before any remote call.
    pub async fn rank(
        &self,
        job_description: &str,
        identifiers: &[String],
    ) -> Result<String, ScoutError> {
        validate_job_description(job_description)?;
        if identifiers.is_empty() || identifiers.len() > MAX_CANDIDATES {
            return Err(ScoutError::InvalidRequest(format!(
                "between 1 and {MAX_CANDIDATES} candidates are required, got {}",
                identifiers.len()
            )));
        }
        let logins = identifiers
            .iter()
            .map(|id| parse_identifier(id))
            .collect::<Result<Vec<_>, _>>()?;

        let workers = self.settings.max_concurrent_candidates.max(1);
        let mut results: Vec<(usize, CandidateResult)> = stream::iter(logins.iter().enumerate())
            .map(|(index, login)| async move {
                self.candidate_with_deadline(login)
                    .await
                    .map(|result| (index, result))
            })
            .buffer_unordered(workers)
            .filter_map(futures::future::ready)
            .collect()
            .await;

        results.sort_by_key(|(index, _)| *index);
        let candidates: Vec<CandidateResult> =
            results.into_iter().map(|(_, result)| result).collect();
        if candidates.is_empty() {
            return Err(ScoutError::NoCandidates);
        }
        tracing::info!(
            requested = logins.len(),
            ranked = candidates.len(),
            "generating ranking report"
        );

        Ok(self
            .reports
            .ranking_report(&candidates, job_description)
            .await?)
    }

    async fn candidate_with_deadline(&self, login: &str) -> Option<CandidateResult> {
        match tokio::time::timeout(self.settings.candidate_timeout, self.candidate(login)).await {
            Ok(Ok(result)) => Some(result),
            Ok(Err(e)) => {
                tracing::warn!(login, error = %e, "candidate dropped from ranking");
                None
            }
            Err(_) => {
                tracing::warn!(
                    login,
                    timeout_secs = self.settings.candidate_timeout.as_secs(),
                    "candidate timed out; dropped from ranking"
                );
                None
            }
        }
    }

    async fn candidate(&self, login: &str) -> Result<CandidateResult, ScoutError> {
        let budget = self.settings.budget;
        let facts = self.fetcher.fetch(login, &budget).await?;
        let report_html = write_report(
            &self.selector,
            self.reports.as_ref(),
            &facts,
            &budget,
            AnalysisContext::Recruitment,
        )
        .await?;
        Ok(CandidateResult {
            login: facts.login,
            display_name: facts.display_name,
            profile_url: facts.profile_url,
            report_html,
        })
    }
}

fn validate_job_description(job_description: &str) -> Result<(), ScoutError> {
    let chars = job_description.trim().chars().count();
    if (MIN_JOB_DESCRIPTION_CHARS..=MAX_JOB_DESCRIPTION_CHARS).contains(&chars) {
        Ok(())
    } else {
        Err(ScoutError::InvalidRequest(format!(
            "job description must be {MIN_JOB_DESCRIPTION_CHARS}-{MAX_JOB_DESCRIPTION_CHARS} \
             characters, got {chars}"
        )))
    }
}

#[cfg(test)]
#[path = "ranking_test.rs"]
mod tests;
