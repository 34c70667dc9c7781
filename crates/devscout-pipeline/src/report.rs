//! Report-generation collaborator: turns profile facts into HTML via the
//! text-generation service.

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use devscout_core::{
    AnalysisContext, CandidateResult, CompletionRequest, ProfileFacts, RepositoryDigest,
    ServiceError, TextGenerator,
};

/// Characters of the profile document included in a report prompt.
pub const PROFILE_DOCUMENT_CHARS: usize = 2000;

/// Languages listed in a report prompt.
pub const TOP_LANGUAGES: usize = 3;

const REPORT_MAX_TOKENS: u32 = 2000;
const REPORT_TEMPERATURE: f32 = 0.4;
const RANKING_MAX_TOKENS: u32 = 3000;
const RANKING_TEMPERATURE: f32 = 0.3;

/// Produces the final HTML reports. Output is returned to callers unmodified.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn profile_report(
        &self,
        facts: &ProfileFacts,
        selected: &[RepositoryDigest],
        context: AnalysisContext,
    ) -> Result<String, ServiceError>;

    async fn ranking_report(
        &self,
        candidates: &[CandidateResult],
        job_description: &str,
    ) -> Result<String, ServiceError>;
}

/// [`ReportGenerator`] that prompts a [`TextGenerator`].
pub struct LlmReportGenerator {
    generator: Arc<dyn TextGenerator>,
}

impl LlmReportGenerator {
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl ReportGenerator for LlmReportGenerator {
    async fn profile_report(
        &self,
        facts: &ProfileFacts,
        selected: &[RepositoryDigest],
        context: AnalysisContext,
    ) -> Result<String, ServiceError> {
        self.generator
            .complete(CompletionRequest {
                prompt: profile_prompt(facts, selected, context),
                max_tokens: REPORT_MAX_TOKENS,
                temperature: REPORT_TEMPERATURE,
            })
            .await
    }

    async fn ranking_report(
        &self,
        candidates: &[CandidateResult],
        job_description: &str,
    ) -> Result<String, ServiceError> {
        self.generator
            .complete(CompletionRequest {
                prompt: ranking_prompt(candidates, job_description),
                max_tokens: RANKING_MAX_TOKENS,
                temperature: RANKING_TEMPERATURE,
            })
            .await
    }
}

const HTML_RULES: &str = "Write clean HTML without code fences, using <h2> for sections, \
<h3> for subsections, <p> for paragraphs, <ul>/<li> for lists and <strong> for emphasis. \
Ground every statement in the data below and avoid generic advice the data already \
contradicts.";

fn profile_prompt(
    facts: &ProfileFacts,
    selected: &[RepositoryDigest],
    context: AnalysisContext,
) -> String {
    let brief = match context {
        AnalysisContext::Recruitment => {
            "You are a senior technical reviewer writing a GitHub profile evaluation for a \
             demanding hiring team. Sections: <h2>Profile Summary</h2>, <h2>Technical \
             Analysis</h2> (purpose, quality and practices, technology coherence of the \
             highlighted repositories), <h2>Recommendations</h2>."
        }
        AnalysisContext::SelfReview => {
            "You are a senior engineer mentoring the owner of this GitHub profile. Address \
             them directly. Sections: <h2>Where You Stand</h2>, <h2>Strengths</h2>, \
             <h2>Gaps</h2>, <h2>Next Steps</h2> with a concrete learning plan."
        }
    };

    let mut prompt = format!("{brief}\n{HTML_RULES}\n\nProfile data:\n");
    let _ = writeln!(prompt, "Name: {} (@{})", facts.display_name, facts.login);
    let _ = writeln!(prompt, "Bio: {}", facts.bio.as_deref().unwrap_or("No bio."));
    let _ = writeln!(prompt, "Followers: {}", facts.followers);
    let _ = writeln!(prompt, "Following: {}", facts.following);
    let _ = writeln!(prompt, "Public repositories: {}", facts.public_repos);
    let _ = writeln!(
        prompt,
        "Most used languages: {}",
        facts.top_languages(TOP_LANGUAGES).join(", ")
    );
    let _ = writeln!(
        prompt,
        "Profile README:\n{}",
        truncate_chars(facts.document_or_placeholder(), PROFILE_DOCUMENT_CHARS)
    );
    prompt.push_str("Highlighted repositories:\n");
    if selected.is_empty() {
        prompt.push_str("- none\n");
    }
    for digest in selected {
        let _ = writeln!(prompt, "- {}", digest.summary_line());
    }
    prompt
}

fn ranking_prompt(candidates: &[CandidateResult], job_description: &str) -> String {
    let mut prompt = format!(
        "You are a technical recruiter comparing candidates for the job below. Rank every \
         candidate from best to worst fit, justify each position with evidence from their \
         evaluation, and finish with a short hiring recommendation.\n{HTML_RULES}\n\n\
         Job description:\n{job_description}\n\nCandidates:\n"
    );
    for (position, candidate) in candidates.iter().enumerate() {
        let _ = writeln!(
            prompt,
            "\n### Candidate {}: {} (@{}) - {}\n{}",
            position + 1,
            candidate.display_name,
            candidate.login,
            candidate.profile_url,
            candidate.report_html
        );
    }
    prompt
}

/// Banner prepended to a filtered-search report, naming the matched profile.
#[must_use]
pub fn filter_banner(facts: &ProfileFacts) -> String {
    format!(
        "<div style=\"border: 1px solid #30363d; border-radius: 8px; padding: 16px; \
         margin-bottom: 16px;\">\n  <p><strong>Profile found: <a href=\"{url}\" \
         target=\"_blank\" style=\"color: #58a6ff; text-decoration: none;\">@{login}</a>\
         </strong></p>\n  <p style=\"margin-top: 5px;\">(respecting the applied filters)</p>\n\
         </div>\n",
        url = escape_html(&facts.profile_url),
        login = escape_html(&facts.login),
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
