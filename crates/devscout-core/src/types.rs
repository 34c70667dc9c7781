use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Description used for repositories that have none upstream.
pub const NO_DESCRIPTION: &str = "No description";

/// Stand-in for a profile whose self-documentation repository is missing or
/// could not be read.
pub const NO_PROFILE_DOCUMENT: &str = "No profile README provided.";

/// Language name → number of scanned repositories using it.
pub type LanguageHistogram = BTreeMap<String, u32>;

/// Compact summary of one repository, enough for filtering and selection
/// without fetching its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDigest {
    pub name: String,
    pub description: String,
    /// Languages used, largest share first.
    pub languages: Vec<String>,
    pub stars: u64,
    pub has_readme: bool,
    pub is_fork: bool,
}

impl RepositoryDigest {
    /// One-line form sent to text-generation prompts.
    ///
    /// The repository name always comes first and is followed by `" - "`, so
    /// [`summary_name`] can recover it.
    #[must_use]
    pub fn summary_line(&self) -> String {
        let languages = if self.languages.is_empty() {
            "no language".to_owned()
        } else {
            self.languages.join(", ")
        };
        let readme = if self.has_readme {
            "README"
        } else {
            "no README"
        };
        format!(
            "{} - {} ({languages}) - stars: {} - {readme}",
            self.name, self.description, self.stars
        )
    }

    /// Case-insensitive membership test against this repository's languages.
    #[must_use]
    pub fn uses_any_language(&self, wanted: &[String]) -> bool {
        self.languages
            .iter()
            .any(|lang| wanted.iter().any(|w| w.eq_ignore_ascii_case(lang)))
    }
}

/// Extracts the repository name from a [`RepositoryDigest::summary_line`].
#[must_use]
pub fn summary_name(line: &str) -> &str {
    line.split_once(" - ").map_or(line, |(name, _)| name).trim()
}

/// Everything known about one profile after a fetch.
///
/// Produced fresh per request; never cached or shared across calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileFacts {
    pub login: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub profile_url: String,
    pub followers: u32,
    pub following: u32,
    pub public_repos: u32,
    /// README of the profile's self-documentation repository, when readable.
    pub profile_document: Option<String>,
    pub languages: LanguageHistogram,
    /// Scanned repositories, most recently updated first.
    pub repositories: Vec<RepositoryDigest>,
}

impl ProfileFacts {
    /// Profile document text, or [`NO_PROFILE_DOCUMENT`] when absent.
    #[must_use]
    pub fn document_or_placeholder(&self) -> &str {
        self.profile_document
            .as_deref()
            .unwrap_or(NO_PROFILE_DOCUMENT)
    }

    /// Sum of the popularity signal across scanned repositories.
    #[must_use]
    pub fn total_stars(&self) -> u64 {
        self.repositories.iter().map(|r| r.stars).sum()
    }

    /// The `n` most used languages, ties broken alphabetically.
    #[must_use]
    pub fn top_languages(&self, n: usize) -> Vec<&str> {
        let mut ranked: Vec<(&String, &u32)> = self.languages.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        ranked
            .into_iter()
            .take(n)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Summary lines of all scanned repositories, in scan order.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        self.repositories
            .iter()
            .map(RepositoryDigest::summary_line)
            .collect()
    }

    /// Digests whose names appear in `names`, in the order of `names`.
    #[must_use]
    pub fn digests_named(&self, names: &[String]) -> Vec<RepositoryDigest> {
        names
            .iter()
            .filter_map(|name| self.repositories.iter().find(|r| &r.name == name))
            .cloned()
            .collect()
    }
}

/// Caller-supplied criteria for a filtered multi-profile search.
///
/// Numeric thresholds of `0` mean "unconstrained".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Allow-list; matched case-insensitively, any one language suffices.
    pub languages: Vec<String>,
    pub min_repos: u32,
    pub min_stars: u64,
    pub min_followers: u32,
    pub recent_activity: bool,
    pub keyword: Option<String>,
    pub location: Option<String>,
}

impl FilterCriteria {
    /// Folds skill and methodology terms into the free-text keyword.
    #[must_use]
    pub fn with_terms(mut self, skills: &[String], methodologies: &[String]) -> Self {
        let terms: Vec<&str> = skills
            .iter()
            .chain(methodologies)
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if !terms.is_empty() {
            let mut keyword = self.keyword.take().unwrap_or_default();
            for term in terms {
                if !keyword.is_empty() {
                    keyword.push(' ');
                }
                keyword.push_str(term);
            }
            self.keyword = Some(keyword);
        }
        self
    }

    /// Non-blank language entries, trimmed.
    #[must_use]
    pub fn language_list(&self) -> Vec<String> {
        self.languages
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Keyword split on whitespace; empty when no keyword is set.
    #[must_use]
    pub fn keyword_terms(&self) -> Vec<&str> {
        self.keyword
            .as_deref()
            .map(|k| k.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Trimmed location, `None` when blank.
    #[must_use]
    pub fn location_term(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }

    /// `true` when every field is at its default, i.e. nothing to filter on.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.language_list().is_empty()
            && self.min_repos == 0
            && self.min_stars == 0
            && self.min_followers == 0
            && !self.recent_activity
            && self.keyword_terms().is_empty()
            && self.location_term().is_none()
    }
}

/// Outcome of one candidate's pipeline during ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub login: String,
    pub display_name: String,
    pub profile_url: String,
    pub report_html: String,
}

/// Limits applied while scanning and selecting repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionBudget {
    /// Repositories digested per profile before the scan stops.
    pub max_repos: usize,
    /// Size `K` of the "most relevant" subset.
    pub select_count: usize,
    /// Once cumulative stars reach this value the scan may stop early.
    /// `0` disables the early exit.
    pub min_stars: u64,
}

impl Default for SelectionBudget {
    fn default() -> Self {
        Self {
            max_repos: 30,
            select_count: 5,
            min_stars: 0,
        }
    }
}

impl SelectionBudget {
    #[must_use]
    pub fn with_min_stars(self, min_stars: u64) -> Self {
        Self { min_stars, ..self }
    }
}

/// Who the generated report is written for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisContext {
    /// Technical evaluation for a hiring reviewer.
    #[default]
    Recruitment,
    /// Mentoring plan addressed to the profile owner.
    SelfReview,
}

impl fmt::Display for AnalysisContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recruitment => write!(f, "recruitment"),
            Self::SelfReview => write!(f, "self-review"),
        }
    }
}

impl FromStr for AnalysisContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recruitment" => Ok(Self::Recruitment),
            "self-review" | "self_review" | "selfreview" => Ok(Self::SelfReview),
            other => Err(format!("unknown analysis context '{other}'")),
        }
    }
}
