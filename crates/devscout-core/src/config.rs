use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let value = or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value == 0 {
            return Err(invalid(var, "must be at least 1".to_string()));
        }
        Ok(value)
    };

    let llm_api_key = require("OPENAI_API_KEY")?;

    let env = parse_environment(&or_default("DEVSCOUT_ENV", "development"))?;
    let log_level = or_default("DEVSCOUT_LOG_LEVEL", "info");
    let github_token = lookup("GITHUB_TOKEN").ok().filter(|t| !t.trim().is_empty());
    let github_api_url = or_default("DEVSCOUT_GITHUB_API_URL", "https://api.github.com");
    let llm_base_url = or_default("DEVSCOUT_LLM_BASE_URL", "https://api.openai.com/v1");
    let llm_model = or_default("DEVSCOUT_LLM_MODEL", "gpt-4o-mini");

    let request_timeout_secs = parse_u64("DEVSCOUT_REQUEST_TIMEOUT_SECS", "30")?;
    let llm_timeout_secs = parse_u64("DEVSCOUT_LLM_TIMEOUT_SECS", "90")?;
    let max_retries = parse_u32("DEVSCOUT_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("DEVSCOUT_RETRY_BACKOFF_BASE_MS", "500")?;

    let scan_max_repos = parse_positive_usize("DEVSCOUT_SCAN_MAX_REPOS", "30")?;
    let select_count = parse_positive_usize("DEVSCOUT_SELECT_COUNT", "5")?;
    let search_limit = parse_u32("DEVSCOUT_SEARCH_LIMIT", "20")?;
    if !(1..=100).contains(&search_limit) {
        return Err(invalid(
            "DEVSCOUT_SEARCH_LIMIT",
            format!("{search_limit} is outside 1..=100"),
        ));
    }
    let max_concurrent_candidates =
        parse_positive_usize("DEVSCOUT_MAX_CONCURRENT_CANDIDATES", "5")?;
    let candidate_timeout_secs = parse_u64("DEVSCOUT_CANDIDATE_TIMEOUT_SECS", "180")?;
    let selection_timeout_secs = parse_u64("DEVSCOUT_SELECTION_TIMEOUT_SECS", "45")?;

    Ok(AppConfig {
        env,
        log_level,
        github_token,
        github_api_url,
        llm_api_key,
        llm_base_url,
        llm_model,
        request_timeout_secs,
        llm_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        scan_max_repos,
        select_count,
        search_limit,
        max_concurrent_candidates,
        candidate_timeout_secs,
        selection_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "DEVSCOUT_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
