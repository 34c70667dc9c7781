//! Command handlers. Each one returns the HTML to emit; `main` decides where
//! it goes.

use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;
use devscout_core::{AnalysisContext, AppConfig, FilterCriteria, ProfileService, TextGenerator};
use devscout_github::GithubClient;
use devscout_llm::ChatClient;
use devscout_pipeline::{
    LlmReportGenerator, PipelineSettings, ProfileAnalyzer, RandomPicker, RankingOrchestrator,
    ReportGenerator,
};

/// Long-lived clients shared by every pipeline component for one run.
pub(crate) struct Services {
    analyzer: ProfileAnalyzer,
    ranking: RankingOrchestrator,
}

impl Services {
    pub(crate) fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let github: Arc<dyn ProfileService> = Arc::new(
            GithubClient::with_base_url(
                config.github_token.as_deref(),
                config.request_timeout_secs,
                config.max_retries,
                config.retry_backoff_base_ms,
                &config.github_api_url,
            )
            .context("failed to build GitHub client")?,
        );
        let llm: Arc<dyn TextGenerator> = Arc::new(
            ChatClient::new(
                &config.llm_api_key,
                &config.llm_base_url,
                &config.llm_model,
                config.llm_timeout_secs,
            )
            .context("failed to build completion client")?,
        );
        let reports: Arc<dyn ReportGenerator> =
            Arc::new(LlmReportGenerator::new(Arc::clone(&llm)));
        let settings = PipelineSettings::from_app_config(config);

        if config.github_token.is_none() {
            tracing::warn!("GITHUB_TOKEN not set; GitHub requests are unauthenticated");
        }

        Ok(Self {
            analyzer: ProfileAnalyzer::new(
                Arc::clone(&github),
                Arc::clone(&llm),
                Arc::clone(&reports),
                Arc::new(RandomPicker),
                settings.clone(),
            ),
            ranking: RankingOrchestrator::new(github, llm, reports, settings),
        })
    }
}

pub(crate) async fn analyze(
    services: &Services,
    identifier: &str,
    context: AnalysisContext,
) -> anyhow::Result<String> {
    Ok(services.analyzer.analyze(identifier, context).await?)
}

pub(crate) async fn search(
    services: &Services,
    criteria: &FilterCriteria,
) -> anyhow::Result<String> {
    Ok(services.analyzer.analyze_with_filters(criteria).await?)
}

pub(crate) async fn rank(
    services: &Services,
    job_file: &Path,
    candidates: &[String],
) -> anyhow::Result<String> {
    let job_description = std::fs::read_to_string(job_file)
        .with_context(|| format!("failed to read job description from {}", job_file.display()))?;
    Ok(services.ranking.rank(&job_description, candidates).await?)
}

pub(crate) fn write_output(path: Option<&Path>, html: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, html)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            if !html.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}
