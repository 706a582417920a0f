//! Backend seam and prompted operations.
//!
//! [`LlmBackend`] is the only customization point: a concrete backend
//! supplies its identifying name, its parameter bag, and the single
//! `request` primitive wrapping the actual model or service call. Every
//! prompted operation is implemented once here as a provided method, so all
//! backends are evaluated with identical templating, invocation, and
//! response-slicing logic.
//!
//! # Failure boundary
//! `safe_request` is the one place backend failures are recovered: the error
//! goes to the log at WARN and the caller sees the empty string. No prompted
//! operation ever returns an error; parse failures surface as sentinel
//! values (`""`, `Indeterminate`, empty vec).

use crate::templates;
use hallueval_core::{parse, Comparison, Judgment, NewsItem, Params};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Markers wrapping the generated continuation in instruction templates.
const RESPONSE_OPEN: &str = "<response>";
const RESPONSE_CLOSE: &str = "</response>";

/// Markers wrapping the keyword list in the extraction template.
const KEYWORDS_OPEN: &str = "<keywords>";
const KEYWORDS_CLOSE: &str = "</keywords>";

/// Errors a concrete backend may raise from [`LlmBackend::request`].
///
/// All of them are fully recovered at the [`safe_request`] boundary; they
/// exist so providers can report what actually went wrong to the log.
///
/// [`safe_request`]: LlmBackend::safe_request
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Authentication failed")]
    Auth,

    #[error("Backend not configured: {0}")]
    NotConfigured(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A prompted text classifier over one interchangeable model backend.
///
/// Implementors provide the four required methods; everything else is
/// shared behavior. The synchronous `request` is the only seam between
/// this abstraction and an actual inference call: a backend may impose its
/// own timeout inside `request`, invisible to this contract.
pub trait LlmBackend {
    /// Identifying name of this backend, used as the default `model_name`
    /// and in log messages.
    fn name(&self) -> &str;

    /// Decoding parameters for this backend instance.
    fn params(&self) -> &Params;

    /// Mutable access to the decoding parameters.
    fn params_mut(&mut self) -> &mut Params;

    /// Issue one query against the model. May fail in any backend-specific
    /// way; callers inside this trait only ever go through `safe_request`.
    fn request(&self, query: &str) -> Result<String, BackendError>;

    /// Directory the prompt templates are read from.
    fn prompt_dir(&self) -> PathBuf {
        PathBuf::from(templates::DEFAULT_PROMPT_DIR)
    }

    /// Merge parameter overrides into this instance and return it.
    ///
    /// Counterpart of [`with_params`](LlmBackend::with_params) for callers
    /// that want in-place mutation.
    fn update_params(&mut self, overrides: impl IntoIterator<Item = (String, Value)>) -> &mut Self
    where
        Self: Sized,
    {
        self.params_mut().update(overrides);
        self
    }

    /// Independent copy of this backend with parameter overrides applied.
    ///
    /// The clone carries everything the backend holds, so the original is
    /// fully unaffected, including any backend-specific cached state.
    fn with_params(&self, overrides: impl IntoIterator<Item = (String, Value)>) -> Self
    where
        Self: Clone + Sized,
    {
        let merged = self.params().merged(overrides);
        let mut copy = self.clone();
        *copy.params_mut() = merged;
        copy
    }

    /// `request`, with the failure branch routed to the log.
    ///
    /// Never propagates: a failing backend yields the empty string, which
    /// flows through every downstream extraction as a sentinel.
    fn safe_request(&self, query: &str) -> String {
        match self.request(query) {
            Ok(response) => response,
            Err(err) => {
                warn!(backend = self.name(), error = %err, "backend request failed");
                String::new()
            }
        }
    }

    /// Generate a one-sentence continuation for a news item.
    ///
    /// The instruction template wraps the headline, date-only broadcast
    /// date, and news beginning; the reply payload is sliced out of
    /// `<response>...</response>` markers and cut to its first sentence.
    fn continue_writing(&self, item: &NewsItem) -> String {
        let template = templates::read_prompt_template(&self.prompt_dir(), templates::CONTINUE_WRITING);
        let query = templates::fill_positional(&template, &instruction_lede(item));
        let raw = self.safe_request(&query);
        let body = parse::between_markers(&raw, RESPONSE_OPEN, RESPONSE_CLOSE);
        parse::first_sentence(body).to_string()
    }

    /// Extract keywords from a continuation sentence.
    ///
    /// Keeps only candidates that are non-empty after trimming and are
    /// substrings of `sentence` (guards against invented keywords), in
    /// their original order, without deduplication.
    fn extract_kws(&self, sentence: &str) -> Vec<String> {
        let template = templates::read_prompt_template(&self.prompt_dir(), templates::EXTRACT_KWS);
        let query = templates::fill_positional(&template, sentence);
        let raw = self.safe_request(&query);
        parse::between_markers(&raw, KEYWORDS_OPEN, KEYWORDS_CLOSE)
            .split('\n')
            .map(str::trim)
            .filter(|kw| !kw.is_empty() && sentence.contains(kw))
            .map(str::to_string)
            .collect()
    }

    /// Judge whether a single keyword of a continuation is hallucinated.
    fn is_kw_hallucinated(&self, keyword: &str, item: &NewsItem) -> Judgment
    where
        Self: Sized,
    {
        parse::classify_keyword(&keyword_verdict(self, keyword, item))
    }

    /// Like [`is_kw_hallucinated`](LlmBackend::is_kw_hallucinated), also
    /// returning the model's stated reason.
    fn is_kw_hallucinated_with_reason(&self, keyword: &str, item: &NewsItem) -> (Judgment, String)
    where
        Self: Sized,
    {
        parse::classify_keyword_with_reason(&keyword_verdict(self, keyword, item))
    }

    /// Decide which of two candidate continuations fits reality better.
    fn compare_two_continuation(&self, contn1: &str, contn2: &str, item: &NewsItem) -> Comparison
    where
        Self: Sized,
    {
        let response = prompted_verdict(
            self,
            templates::COMPARE_TWO_CONTINUATION,
            &[
                ("headLine", item.head_line.as_str()),
                ("broadcastDate", item.broadcast_date.as_str()),
                ("newsBeginning", item.news_beginning.as_str()),
                ("contn1", contn1),
                ("contn2", contn2),
            ],
        );
        parse::classify_comparison(&response)
    }

    /// Judge whether a whole continuation is hallucinated.
    fn is_continuation_hallucinated(&self, continuation: &str, item: &NewsItem) -> Judgment
    where
        Self: Sized,
    {
        parse::classify_continuation(&continuation_verdict(self, continuation, item))
    }

    /// Like [`is_continuation_hallucinated`](LlmBackend::is_continuation_hallucinated),
    /// also returning the model's stated reason.
    fn is_continuation_hallucinated_with_reason(
        &self,
        continuation: &str,
        item: &NewsItem,
    ) -> (Judgment, String)
    where
        Self: Sized,
    {
        parse::classify_continuation_with_reason(&continuation_verdict(self, continuation, item))
    }
}

/// Continuation generation without any wrapping instruction.
///
/// Some models follow instructions poorly; for those the composite text
/// (headline, full broadcast date, news beginning) is sent verbatim as the
/// query. Shared routine rather than a per-instance method so a backend's
/// own `continue_writing` override can delegate here.
pub fn continue_writing_without_instruction(
    backend: &(impl LlmBackend + ?Sized),
    item: &NewsItem,
) -> String {
    let query = format!(
        "《{}》\n{}\n{}",
        item.head_line, item.broadcast_date, item.news_beginning
    );
    let raw = backend.safe_request(&query);
    let completion = if raw.contains(&query) {
        parse::strip_echoed_query(&raw, &query)
    } else {
        raw.as_str()
    };
    let cleaned = parse::strip_sequence_markers(completion);
    parse::first_sentence(&cleaned).to_string()
}

/// Composite lede for the instruction template: headline in title marks,
/// date-only broadcast date, news beginning.
fn instruction_lede(item: &NewsItem) -> String {
    format!(
        "《{}》\n{}\n{}",
        item.head_line,
        item.broadcast_day(),
        item.news_beginning
    )
}

/// Load a judgment template, fill it, ask the backend, strip the echoed
/// query. Every verdict operation funnels through here.
fn prompted_verdict(
    backend: &(impl LlmBackend + ?Sized),
    template_name: &str,
    fields: &[(&str, &str)],
) -> String {
    let template = templates::read_prompt_template(&backend.prompt_dir(), template_name);
    let query = templates::fill_named(&template, fields);
    let raw = backend.safe_request(&query);
    parse::strip_echoed_query(&raw, &query).to_string()
}

fn keyword_verdict(
    backend: &(impl LlmBackend + ?Sized),
    keyword: &str,
    item: &NewsItem,
) -> String {
    prompted_verdict(
        backend,
        templates::IS_KW_HALLUCINATED,
        &[
            ("headLine", item.head_line.as_str()),
            ("broadcastDate", item.broadcast_date.as_str()),
            ("newsBeginning", item.news_beginning.as_str()),
            ("continuation", item.hallucinated_continuation.as_str()),
            ("keyword", keyword),
        ],
    )
}

fn continuation_verdict(
    backend: &(impl LlmBackend + ?Sized),
    continuation: &str,
    item: &NewsItem,
) -> String {
    prompted_verdict(
        backend,
        templates::IS_CONTINUATION_HALLUCINATED,
        &[
            ("headLine", item.head_line.as_str()),
            ("broadcastDate", item.broadcast_date.as_str()),
            ("newsBeginning", item.news_beginning.as_str()),
            ("continuation", continuation),
        ],
    )
}
