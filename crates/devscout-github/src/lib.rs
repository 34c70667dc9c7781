//! Client for the GitHub REST API (v3) as used by devscout's profile
//! analysis: profile lookup, repository listing, languages, READMEs, user
//! search, and the public activity feed.

pub mod client;
pub mod error;
pub mod types;

mod retry;
mod service;

pub use client::GithubClient;
pub use error::GithubError;
pub use types::{EventResponse, RepoResponse, SearchUsersResponse, UserResponse};
