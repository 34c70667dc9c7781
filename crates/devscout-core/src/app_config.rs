#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub github_token: Option<String>,
    pub github_api_url: String,
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub request_timeout_secs: u64,
    pub llm_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub scan_max_repos: usize,
    pub select_count: usize,
    pub search_limit: u32,
    pub max_concurrent_candidates: usize,
    pub candidate_timeout_secs: u64,
    pub selection_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field(
                "github_token",
                &self.github_token.as_ref().map(|_| "[redacted]"),
            )
            .field("github_api_url", &self.github_api_url)
            .field("llm_api_key", &"[redacted]")
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_model", &self.llm_model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("scan_max_repos", &self.scan_max_repos)
            .field("select_count", &self.select_count)
            .field("search_limit", &self.search_limit)
            .field("max_concurrent_candidates", &self.max_concurrent_candidates)
            .field("candidate_timeout_secs", &self.candidate_timeout_secs)
            .field("selection_timeout_secs", &self.selection_timeout_secs)
            .finish()
    }
}
