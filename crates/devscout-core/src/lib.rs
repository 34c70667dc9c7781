//! Shared domain types, error kinds, collaborator traits, and configuration
//! for devscout.

pub mod app_config;
pub mod config;
pub mod error;
pub mod identifier;
pub mod services;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, ScoutError, ServiceError};
pub use identifier::parse_identifier;
pub use services::{
    CompletionRequest, ProfileService, RemoteProfile, RemoteRepository, RepoSort, TextGenerator,
};
pub use types::{
    summary_name, AnalysisContext, CandidateResult, FilterCriteria, LanguageHistogram,
    ProfileFacts, RepositoryDigest, SelectionBudget, NO_DESCRIPTION, NO_PROFILE_DOCUMENT,
};
