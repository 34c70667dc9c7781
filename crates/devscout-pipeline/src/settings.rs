use std::time::Duration;

use devscout_core::{AppConfig, SelectionBudget};

/// Knobs shared by the search, ranking, and analysis entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub budget: SelectionBudget,
    /// Candidate identities requested from a filtered search.
    pub search_limit: u32,
    /// Worker-pool size for per-candidate fan-out.
    pub max_concurrent_candidates: usize,
    /// Deadline for one candidate's whole pipeline; a late candidate is dropped.
    pub candidate_timeout: Duration,
    /// Deadline for the repository-selection call before the fallback applies.
    pub selection_timeout: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            budget: SelectionBudget::default(),
            search_limit: 20,
            max_concurrent_candidates: 5,
            candidate_timeout: Duration::from_secs(180),
            selection_timeout: Duration::from_secs(45),
        }
    }
}

impl PipelineSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            budget: SelectionBudget {
                max_repos: config.scan_max_repos,
                select_count: config.select_count,
                min_stars: 0,
            },
            search_limit: config.search_limit,
            max_concurrent_candidates: config.max_concurrent_candidates,
            candidate_timeout: Duration::from_secs(config.candidate_timeout_secs),
            selection_timeout: Duration::from_secs(config.selection_timeout_secs),
        }
    }
}
