//! In-memory collaborators for pipeline tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use devscout_core::{
    AnalysisContext, CandidateResult, CompletionRequest, ProfileFacts, ProfileService,
    RemoteProfile, RemoteRepository, RepoSort, RepositoryDigest, ServiceError, TextGenerator,
};

use crate::report::ReportGenerator;
use crate::search::SurvivorPicker;

pub(crate) fn repo(name: &str, language: Option<&str>, stars: u64) -> RemoteRepository {
    RemoteRepository {
        name: name.to_owned(),
        description: Some(format!("{name} description")),
        primary_language: language.map(str::to_owned),
        stars,
        is_fork: false,
    }
}

pub(crate) fn fork(name: &str) -> RemoteRepository {
    RemoteRepository {
        is_fork: true,
        ..repo(name, Some("Rust"), 0)
    }
}

#[derive(Default)]
pub(crate) struct FakeProfileService {
    profiles: HashMap<String, RemoteProfile>,
    repositories: HashMap<String, Vec<RemoteRepository>>,
    documents: HashMap<(String, String), String>,
    activity: HashMap<String, Vec<DateTime<Utc>>>,
    failing_languages: HashSet<String>,
    failing_documents: HashSet<String>,
    failing_listings: HashSet<String>,
    delays: HashMap<String, Duration>,
    search_results: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeProfileService {
    pub(crate) fn with_profile(mut self, login: &str, followers: u32, public_repos: u32) -> Self {
        self.profiles.insert(
            login.to_owned(),
            RemoteProfile {
                login: login.to_owned(),
                name: Some(format!("{login} name")),
                bio: Some(format!("{login} writes software")),
                location: None,
                followers,
                following: 1,
                public_repos,
                html_url: format!("https://github.com/{login}"),
            },
        );
        self
    }

    pub(crate) fn with_bio(mut self, login: &str, bio: &str) -> Self {
        if let Some(profile) = self.profiles.get_mut(login) {
            profile.bio = Some(bio.to_owned());
        }
        self
    }

    pub(crate) fn with_repos(mut self, login: &str, repos: Vec<RemoteRepository>) -> Self {
        self.repositories.insert(login.to_owned(), repos);
        self
    }

    pub(crate) fn with_document(mut self, owner: &str, repo: &str, text: &str) -> Self {
        self.documents
            .insert((owner.to_owned(), repo.to_owned()), text.to_owned());
        self
    }

    pub(crate) fn with_activity(mut self, login: &str, events: Vec<DateTime<Utc>>) -> Self {
        self.activity.insert(login.to_owned(), events);
        self
    }

    pub(crate) fn failing_languages(mut self, repo: &str) -> Self {
        self.failing_languages.insert(repo.to_owned());
        self
    }

    pub(crate) fn failing_document(mut self, repo: &str) -> Self {
        self.failing_documents.insert(repo.to_owned());
        self
    }

    pub(crate) fn failing_listing(mut self, login: &str) -> Self {
        self.failing_listings.insert(login.to_owned());
        self
    }

    /// Delays every `get_profile` call for `login`.
    pub(crate) fn with_delay(mut self, login: &str, delay: Duration) -> Self {
        self.delays.insert(login.to_owned(), delay);
        self
    }

    pub(crate) fn with_search_results(mut self, logins: &[&str]) -> Self {
        self.search_results = logins.iter().map(|l| (*l).to_owned()).collect();
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ProfileService for FakeProfileService {
    async fn get_profile(&self, login: &str) -> Result<RemoteProfile, ServiceError> {
        self.record(format!("get_profile:{login}"));
        if let Some(delay) = self.delays.get(login) {
            tokio::time::sleep(*delay).await;
        }
        self.profiles
            .get(login)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(login.to_owned()))
    }

    async fn list_repositories(
        &self,
        login: &str,
        _sort: RepoSort,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RemoteRepository>, ServiceError> {
        self.record(format!("list_repositories:{login}:{page}"));
        if self.failing_listings.contains(login) {
            return Err(ServiceError::Upstream("listing unavailable".to_owned()));
        }
        let all = self.repositories.get(login).cloned().unwrap_or_default();
        let per_page = per_page as usize;
        let start = (page as usize - 1) * per_page;
        Ok(all.into_iter().skip(start).take(per_page).collect())
    }

    async fn repository_languages(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<String>, ServiceError> {
        self.record(format!("repository_languages:{owner}/{repo}"));
        if self.failing_languages.contains(repo) {
            return Err(ServiceError::Upstream("languages unavailable".to_owned()));
        }
        Ok(self
            .repositories
            .get(owner)
            .and_then(|repos| repos.iter().find(|r| r.name == repo))
            .and_then(|r| r.primary_language.clone())
            .into_iter()
            .collect())
    }

    async fn get_document(&self, owner: &str, repo: &str) -> Result<String, ServiceError> {
        self.record(format!("get_document:{owner}/{repo}"));
        if self.failing_documents.contains(repo) {
            return Err(ServiceError::Upstream("readme unavailable".to_owned()));
        }
        self.documents
            .get(&(owner.to_owned(), repo.to_owned()))
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("{owner}/{repo}")))
    }

    async fn search_profiles(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<String>, ServiceError> {
        self.record(format!("search_profiles:{query}"));
        Ok(self
            .search_results
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn recent_activity(&self, login: &str) -> Result<Vec<DateTime<Utc>>, ServiceError> {
        self.record(format!("recent_activity:{login}"));
        self.activity
            .get(login)
            .cloned()
            .ok_or_else(|| ServiceError::Upstream("activity feed unavailable".to_owned()))
    }
}

pub(crate) enum Reply {
    Text(String),
    Fail,
    Hang,
}

/// Text generator returning the same scripted reply to every call.
pub(crate) struct FakeTextGenerator {
    reply: Reply,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeTextGenerator {
    pub(crate) fn replying(text: &str) -> Self {
        Self::new(Reply::Text(text.to_owned()))
    }

    pub(crate) fn failing() -> Self {
        Self::new(Reply::Fail)
    }

    pub(crate) fn hanging() -> Self {
        Self::new(Reply::Hang)
    }

    fn new(reply: Reply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeTextGenerator {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ServiceError> {
        self.requests.lock().unwrap().push(request);
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail => Err(ServiceError::Upstream("model unavailable".to_owned())),
            Reply::Hang => std::future::pending().await,
        }
    }
}

/// Report generator that echoes its inputs so tests can assert on them.
#[derive(Default)]
pub(crate) struct FakeReportGenerator {
    failing_logins: HashSet<String>,
    profile_calls: AtomicUsize,
    ranked: Mutex<Vec<Vec<String>>>,
}

impl FakeReportGenerator {
    pub(crate) fn failing_for(mut self, login: &str) -> Self {
        self.failing_logins.insert(login.to_owned());
        self
    }

    pub(crate) fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }

    /// Logins passed to each `ranking_report` call.
    pub(crate) fn ranked(&self) -> Vec<Vec<String>> {
        self.ranked.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportGenerator for FakeReportGenerator {
    async fn profile_report(
        &self,
        facts: &ProfileFacts,
        selected: &[RepositoryDigest],
        context: AnalysisContext,
    ) -> Result<String, ServiceError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_logins.contains(&facts.login) {
            return Err(ServiceError::Upstream("report failed".to_owned()));
        }
        let names: Vec<&str> = selected.iter().map(|d| d.name.as_str()).collect();
        Ok(format!("{context}:{}:{}", facts.login, names.join(",")))
    }

    async fn ranking_report(
        &self,
        candidates: &[CandidateResult],
        _job_description: &str,
    ) -> Result<String, ServiceError> {
        let logins: Vec<String> = candidates.iter().map(|c| c.login.clone()).collect();
        let report = format!("ranking:{}", logins.join(","));
        self.ranked.lock().unwrap().push(logins);
        Ok(report)
    }
}

/// Always picks the survivor at a fixed position.
pub(crate) struct FixedPicker(pub usize);

impl SurvivorPicker for FixedPicker {
    fn pick(&self, survivors: usize) -> usize {
        self.0.min(survivors - 1)
    }
}
