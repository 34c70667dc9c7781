//! Candidate aggregation and selection: profile fetching, budgeted
//! repository scans, filtering, model-assisted repository selection, and the
//! concurrent search and ranking orchestrators built on them.
//!
//! Every component receives its remote collaborators as `Arc<dyn …>` handles
//! built by the caller; nothing here holds global state.

pub mod analysis;
pub mod fetcher;
pub mod filter;
pub mod ranking;
pub mod report;
pub mod scanner;
pub mod search;
pub mod selector;
pub mod settings;

#[cfg(test)]
mod fakes;

pub use analysis::ProfileAnalyzer;
pub use fetcher::ProfileFetcher;
pub use ranking::RankingOrchestrator;
pub use report::{filter_banner, LlmReportGenerator, ReportGenerator};
pub use scanner::{RepositoryScanner, ScanOutcome};
pub use search::{CandidateSearchOrchestrator, RandomPicker, SearchMatch, SurvivorPicker};
pub use selector::RelevanceSelector;
pub use settings::PipelineSettings;
