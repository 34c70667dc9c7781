//! Boolean filter rules for the filtered search and the remote query they
//! translate to.
//!
//! All rules are combined with logical AND; a rule whose criterion is at its
//! default value is vacuously satisfied. Location is only enforced remotely
//! through the search query. Popularity and recency have no remote qualifier
//! and are only evaluated here.

use chrono::{DateTime, Duration, Utc};
use devscout_core::{FilterCriteria, ProfileFacts, RepositoryDigest, ScoutError};

/// Trailing window for the recency rule.
pub const RECENT_ACTIVITY_DAYS: i64 = 90;

/// Evaluates every local rule against a scanned profile.
///
/// `activity` is the profile's activity feed, or `None` when it could not be
/// read; an unreadable feed fails the recency rule but nothing else.
#[must_use]
pub fn matches(
    facts: &ProfileFacts,
    activity: Option<&[DateTime<Utc>]>,
    criteria: &FilterCriteria,
    now: DateTime<Utc>,
) -> bool {
    language_rule(criteria, &facts.repositories)
        && popularity_rule(criteria, &facts.repositories)
        && facts.followers >= criteria.min_followers
        && facts.public_repos >= criteria.min_repos
        && recency_rule(criteria, activity, now)
        && keyword_rule(criteria, facts)
}

/// Early-exit rule for the repository scan of a search candidate.
///
/// Only fires when a popularity threshold is set: once the cumulative stars
/// reach it and every other repository-dependent rule already holds, further
/// repositories cannot change the outcome. The resulting star total is "at
/// least the threshold", not exhaustive.
#[must_use]
pub fn scan_satisfied(criteria: &FilterCriteria, digests: &[RepositoryDigest]) -> bool {
    if criteria.min_stars == 0
        || !popularity_rule(criteria, digests)
        || !language_rule(criteria, digests)
    {
        return false;
    }
    let terms = lowered_terms(criteria);
    terms.is_empty() || digests.iter().any(|d| repository_mentions(d, &terms))
}

/// Builds the remote search query from the non-default criteria.
///
/// Clause order: `language:` per language, `repos:>=`, `followers:>=`,
/// `location:`, then the free-text keyword, joined with single spaces.
///
/// # Errors
///
/// [`ScoutError::InvalidFilter`] when no criterion is set, or when the only
/// criteria are local-only (stars, recency) and the query would be empty.
pub fn build_query(criteria: &FilterCriteria) -> Result<String, ScoutError> {
    if criteria.is_unconstrained() {
        return Err(ScoutError::InvalidFilter(
            "at least one filter must be provided".to_owned(),
        ));
    }

    let mut clauses: Vec<String> = criteria
        .language_list()
        .iter()
        .map(|language| format!("language:{}", quote_if_spaced(language)))
        .collect();
    if criteria.min_repos > 0 {
        clauses.push(format!("repos:>={}", criteria.min_repos));
    }
    if criteria.min_followers > 0 {
        clauses.push(format!("followers:>={}", criteria.min_followers));
    }
    if let Some(location) = criteria.location_term() {
        clauses.push(format!("location:{}", quote_if_spaced(location)));
    }
    let keyword = criteria.keyword_terms().join(" ");
    if !keyword.is_empty() {
        clauses.push(keyword);
    }

    if clauses.is_empty() {
        return Err(ScoutError::InvalidFilter(
            "stars and recent activity cannot be searched on their own; add a language, \
             threshold, location, or keyword"
                .to_owned(),
        ));
    }
    Ok(clauses.join(" "))
}

/// Embedded quotes are dropped; the search syntax has no escape for them.
fn quote_if_spaced(value: &str) -> String {
    let value = value.replace('"', "");
    if value.chars().any(char::is_whitespace) {
        format!("\"{value}\"")
    } else {
        value
    }
}

fn language_rule(criteria: &FilterCriteria, digests: &[RepositoryDigest]) -> bool {
    let wanted = criteria.language_list();
    wanted.is_empty() || digests.iter().any(|d| d.uses_any_language(&wanted))
}

fn popularity_rule(criteria: &FilterCriteria, digests: &[RepositoryDigest]) -> bool {
    criteria.min_stars == 0 || digests.iter().map(|d| d.stars).sum::<u64>() >= criteria.min_stars
}

fn recency_rule(
    criteria: &FilterCriteria,
    activity: Option<&[DateTime<Utc>]>,
    now: DateTime<Utc>,
) -> bool {
    if !criteria.recent_activity {
        return true;
    }
    let cutoff = now - Duration::days(RECENT_ACTIVITY_DAYS);
    activity.is_some_and(|events| events.iter().any(|at| *at >= cutoff))
}

fn keyword_rule(criteria: &FilterCriteria, facts: &ProfileFacts) -> bool {
    let terms = lowered_terms(criteria);
    if terms.is_empty() {
        return true;
    }
    let profile_fields = [
        Some(facts.login.as_str()),
        Some(facts.display_name.as_str()),
        facts.bio.as_deref(),
        facts.profile_document.as_deref(),
    ];
    profile_fields
        .into_iter()
        .flatten()
        .any(|field| contains_any(field, &terms))
        || facts
            .repositories
            .iter()
            .any(|d| repository_mentions(d, &terms))
}

fn lowered_terms(criteria: &FilterCriteria) -> Vec<String> {
    criteria
        .keyword_terms()
        .into_iter()
        .map(str::to_lowercase)
        .collect()
}

fn repository_mentions(digest: &RepositoryDigest, terms: &[String]) -> bool {
    contains_any(&digest.name, terms) || contains_any(&digest.description, terms)
}

fn contains_any(text: &str, lowered_terms: &[String]) -> bool {
    let text = text.to_lowercase();
    lowered_terms.iter().any(|term| text.contains(term.as_str()))
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
