//! Turns user input (a login, `@login`, or a profile URL) into a login.

use crate::error::ScoutError;

/// Longest login the profile service accepts.
const MAX_LOGIN_LEN: usize = 39;

/// Resolves `input` to a bare login.
///
/// Accepts `octocat`, `@octocat`, and `https://github.com/octocat` (any
/// further path segments such as a repository name are ignored).
///
/// # Errors
///
/// Returns [`ScoutError::InvalidIdentifier`] for empty input, URLs that do not
/// point at the profile host, or logins with characters outside
/// `[A-Za-z0-9-]`.
pub fn parse_identifier(input: &str) -> Result<String, ScoutError> {
    let trimmed = input.trim().trim_end_matches('/');

    let candidate = if let Some(rest) = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
    {
        let (authority, path) = rest.split_once('/').unwrap_or((rest, ""));
        let host = authority
            .split(':')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if host != "github.com" && host != "www.github.com" {
            return Err(ScoutError::InvalidIdentifier(format!(
                "'{input}' is not a GitHub profile URL"
            )));
        }
        path.split(['/', '?', '#']).next().unwrap_or_default()
    } else {
        trimmed.strip_prefix('@').unwrap_or(trimmed)
    };

    if candidate.is_empty() {
        return Err(ScoutError::InvalidIdentifier(format!(
            "no login found in '{input}'"
        )));
    }
    if candidate.len() > MAX_LOGIN_LEN
        || !candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(ScoutError::InvalidIdentifier(format!(
            "'{candidate}' is not a valid login"
        )));
    }

    Ok(candidate.to_owned())
}
