//! Single-profile and filtered analysis entry points.

use std::sync::Arc;

use devscout_core::{
    AnalysisContext, FilterCriteria, ProfileFacts, ProfileService, ScoutError, SelectionBudget,
    TextGenerator,
};

use crate::fetcher::ProfileFetcher;
use crate::report::{filter_banner, ReportGenerator};
use crate::search::{CandidateSearchOrchestrator, SurvivorPicker};
use crate::selector::RelevanceSelector;
use crate::settings::PipelineSettings;

pub struct ProfileAnalyzer {
    fetcher: ProfileFetcher,
    selector: RelevanceSelector,
    reports: Arc<dyn ReportGenerator>,
    search: CandidateSearchOrchestrator,
    budget: SelectionBudget,
}

impl ProfileAnalyzer {
    #[must_use]
    pub fn new(
        service: Arc<dyn ProfileService>,
        generator: Arc<dyn TextGenerator>,
        reports: Arc<dyn ReportGenerator>,
        picker: Arc<dyn SurvivorPicker>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            fetcher: ProfileFetcher::new(Arc::clone(&service)),
            selector: RelevanceSelector::new(generator, settings.selection_timeout),
            reports,
            budget: settings.budget,
            search: CandidateSearchOrchestrator::new(service, picker, settings),
        }
    }

    /// Fetches one profile, selects its most relevant repositories, and
    /// returns the generated HTML report.
    ///
    /// # Errors
    ///
    /// [`ScoutError::InvalidIdentifier`], [`ScoutError::NotFound`], or
    /// [`ScoutError::Upstream`] from the fetch or the report generator.
    pub async fn analyze(
        &self,
        identifier: &str,
        context: AnalysisContext,
    ) -> Result<String, ScoutError> {
        let facts = self.fetcher.fetch(identifier, &self.budget).await?;
        tracing::info!(
            login = %facts.login,
            scanned = facts.repositories.len(),
            %context,
            "profile fetched"
        );
        write_report(&self.selector, self.reports.as_ref(), &facts, &self.budget, context).await
    }

    /// Runs a filtered search and reports on the chosen profile, prefixed
    /// with a banner naming it.
    ///
    /// # Errors
    ///
    /// Everything [`CandidateSearchOrchestrator::search`] returns, plus
    /// [`ScoutError::Upstream`] from the report generator.
    pub async fn analyze_with_filters(&self, criteria: &FilterCriteria) -> Result<String, ScoutError> {
        let found = self.search.search(criteria).await?;
        let report = write_report(
            &self.selector,
            self.reports.as_ref(),
            &found.facts,
            &self.budget,
            AnalysisContext::Recruitment,
        )
        .await?;
        Ok(format!("{}{report}", filter_banner(&found.facts)))
    }
}

/// Selects up to `budget.select_count` repositories and generates the
/// profile report from them.
pub(crate) async fn write_report(
    selector: &RelevanceSelector,
    reports: &dyn ReportGenerator,
    facts: &ProfileFacts,
    budget: &SelectionBudget,
    context: AnalysisContext,
) -> Result<String, ScoutError> {
    let names = selector
        .select(&facts.summary_lines(), budget.select_count)
        .await;
    let selected = facts.digests_named(&names);
    Ok(reports.profile_report(facts, &selected, context).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{repo, FakeProfileService, FakeReportGenerator, FakeTextGenerator, FixedPicker};

    struct Harness {
        service: Arc<FakeProfileService>,
        generator: Arc<FakeTextGenerator>,
        reports: Arc<FakeReportGenerator>,
    }

    impl Harness {
        fn new(service: FakeProfileService, generator: FakeTextGenerator) -> Self {
            Self {
                service: Arc::new(service),
                generator: Arc::new(generator),
                reports: Arc::new(FakeReportGenerator::default()),
            }
        }

        fn analyzer(&self) -> ProfileAnalyzer {
            let settings = PipelineSettings {
                budget: SelectionBudget {
                    select_count: 2,
                    ..SelectionBudget::default()
                },
                ..PipelineSettings::default()
            };
            ProfileAnalyzer::new(
                Arc::clone(&self.service) as Arc<dyn ProfileService>,
                Arc::clone(&self.generator) as Arc<dyn TextGenerator>,
                Arc::clone(&self.reports) as Arc<dyn ReportGenerator>,
                Arc::new(FixedPicker(0)),
                settings,
            )
        }
    }

    fn octocat() -> FakeProfileService {
        FakeProfileService::default()
            .with_profile("octocat", 40, 3)
            .with_repos(
                "octocat",
                vec![
                    repo("dotfiles", Some("Shell"), 0),
                    repo("engine", Some("Rust"), 50),
                    repo("compiler", Some("OCaml"), 9),
                ],
            )
            .with_search_results(&["octocat"])
    }

    #[tokio::test]
    async fn analyze_reports_on_model_selection() {
        let harness = Harness::new(octocat(), FakeTextGenerator::replying(r#"["compiler","engine"]"#));

        let html = harness
            .analyzer()
            .analyze("@octocat", AnalysisContext::SelfReview)
            .await
            .unwrap();

        assert_eq!(html, "self-review:octocat:compiler,engine");
    }

    #[tokio::test]
    async fn analyze_falls_back_when_selection_fails() {
        let harness = Harness::new(octocat(), FakeTextGenerator::failing());

        let html = harness
            .analyzer()
            .analyze("octocat", AnalysisContext::Recruitment)
            .await
            .unwrap();

        assert_eq!(html, "recruitment:octocat:dotfiles,engine");
    }

    #[tokio::test]
    async fn analyze_surfaces_not_found() {
        let harness = Harness::new(octocat(), FakeTextGenerator::failing());

        let err = harness
            .analyzer()
            .analyze("ghost", AnalysisContext::Recruitment)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "not_found");
        assert_eq!(harness.reports.profile_calls(), 0);
    }

    #[tokio::test]
    async fn filtered_analysis_prefixes_banner() {
        let harness = Harness::new(octocat(), FakeTextGenerator::replying(r#"["engine"]"#));
        let criteria = FilterCriteria {
            languages: vec!["Rust".to_owned()],
            ..FilterCriteria::default()
        };

        let html = harness
            .analyzer()
            .analyze_with_filters(&criteria)
            .await
            .unwrap();

        assert!(html.starts_with("<div"));
        assert!(html.contains("@octocat</a>"));
        assert!(html.ends_with("recruitment:octocat:engine"));
    }

    #[tokio::test]
    async fn filtered_analysis_rejects_empty_criteria() {
        let harness = Harness::new(octocat(), FakeTextGenerator::failing());

        let err = harness
            .analyzer()
            .analyze_with_filters(&FilterCriteria::default())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "invalid_filter");
        assert!(harness.service.calls().is_empty());
        assert!(harness.generator.requests().is_empty());
    }
}
