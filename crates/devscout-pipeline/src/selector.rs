//! Model-assisted narrowing of a repository list to the `K` most relevant
//! entries, with a deterministic first-`K` fallback.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use devscout_core::{summary_name, CompletionRequest, TextGenerator};

const SELECTION_MAX_TOKENS: u32 = 300;
const SELECTION_TEMPERATURE: f32 = 0.0;

pub struct RelevanceSelector {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl RelevanceSelector {
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Returns at most `k` repository names drawn from `summaries`.
    ///
    /// `summaries` are [`devscout_core::RepositoryDigest::summary_line`]
    /// strings, most recently updated first. The model's answer is trusted
    /// only for names present in the input; when the call fails, times out,
    /// or yields no known name, the first `k` summaries are returned instead.
    /// Never fails.
    pub async fn select(&self, summaries: &[String], k: usize) -> Vec<String> {
        let names: Vec<&str> = summaries.iter().map(|s| summary_name(s)).collect();
        if names.len() <= k {
            return names.into_iter().map(str::to_owned).collect();
        }

        let request = CompletionRequest {
            prompt: selection_prompt(summaries, k),
            max_tokens: SELECTION_MAX_TOKENS,
            temperature: SELECTION_TEMPERATURE,
        };

        let reply = match tokio::time::timeout(self.timeout, self.generator.complete(request)).await
        {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "repository selection failed; using first {k}");
                return first_k(&names, k);
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "repository selection timed out; using first {k}"
                );
                return first_k(&names, k);
            }
        };

        let selected = parse_selection(&reply, &names, k);
        if selected.is_empty() {
            tracing::warn!("repository selection named no known repository; using first {k}");
            return first_k(&names, k);
        }
        tracing::debug!(selected = selected.len(), offered = names.len(), "repositories selected");
        selected
    }
}

fn first_k(names: &[&str], k: usize) -> Vec<String> {
    names.iter().take(k).map(|n| (*n).to_owned()).collect()
}

fn selection_prompt(summaries: &[String], k: usize) -> String {
    let mut prompt = format!(
        "Below are a developer's public repositories, one per line, most recently updated \
         first. Pick the {k} that best show technical depth and complexity. Ignore forks, \
         templates, tutorials, dotfiles, and trivial experiments.\n\n"
    );
    for line in summaries {
        let _ = writeln!(prompt, "- {line}");
    }
    let _ = write!(
        prompt,
        "\nAnswer with only a JSON array of at most {k} repository names, copied exactly \
         as they appear before the first \" - \". Example: [\"name-one\", \"name-two\"]"
    );
    prompt
}

/// Extracts known names from a model reply.
///
/// Accepts a bare JSON array or one embedded in surrounding text (e.g. a
/// fenced code block). Unknown and duplicate names are dropped; the result
/// keeps the model's order and is truncated to `k`.
fn parse_selection(reply: &str, known: &[&str], k: usize) -> Vec<String> {
    let parsed = serde_json::from_str::<Vec<String>>(reply.trim()).ok().or_else(|| {
        let start = reply.find('[')?;
        let end = reply.rfind(']')?;
        (start < end)
            .then(|| serde_json::from_str::<Vec<String>>(&reply[start..=end]).ok())
            .flatten()
    });
    let Some(candidates) = parsed else {
        return Vec::new();
    };

    let known: HashSet<&str> = known.iter().copied().collect();
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .map(|name| name.trim().to_owned())
        .filter(|name| known.contains(name.as_str()) && seen.insert(name.clone()))
        .take(k)
        .collect()
}
