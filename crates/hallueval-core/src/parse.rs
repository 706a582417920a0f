//! String-marker extraction rules for raw model output.
//!
//! Everything here preserves the exact boundary semantics the judgment
//! logic was tuned against: the slice between markers takes everything
//! after the LAST opening marker and before the FIRST closing marker that
//! follows it, and a missing marker degrades to the whole remaining slice
//! rather than an error. Do not "clean up" these rules.

use crate::types::{Comparison, Judgment};

/// Keyword-level verdict prefix for a hallucinated keyword.
pub const KEYWORD_HALLUCINATED: &str = "不符合现实";
/// Keyword-level verdict prefix for a factual keyword.
pub const KEYWORD_FACTUAL: &str = "符合现实";
/// Continuation-level verdict prefix for a hallucinated continuation.
pub const CONTINUATION_HALLUCINATED: &str = "续写不符合现实";
/// Continuation-level verdict prefix for a factual continuation.
pub const CONTINUATION_FACTUAL: &str = "续写符合现实";
/// Phrase that terminates the answer letter in a pairwise comparison.
pub const COMPARISON_ANSWER_MARKER: &str = "更符合现实，更准确";

/// Sentence-ending punctuation the dataset language uses.
const SENTENCE_ENDINGS: [char; 4] = ['。', '；', '？', '！'];

/// Slice the payload out of `raw` between `open` and `close` markers.
///
/// Takes everything after the last occurrence of `open` (the whole string
/// when absent), then everything before the first following occurrence of
/// `close` (the whole remainder when absent).
pub fn between_markers<'a>(raw: &'a str, open: &str, close: &str) -> &'a str {
    let after = match raw.rfind(open) {
        Some(idx) => &raw[idx + open.len()..],
        None => raw,
    };
    match after.find(close) {
        Some(idx) => &after[..idx],
        None => after,
    }
}

/// Drop an echoed prompt from the front of a response.
///
/// Some backends return the original query verbatim before the completion.
/// When `raw` contains `query`, everything after its last occurrence is
/// kept; otherwise `raw` is returned unchanged.
pub fn strip_echoed_query<'a>(raw: &'a str, query: &str) -> &'a str {
    match raw.rfind(query) {
        Some(idx) => &raw[idx + query.len()..],
        None => raw,
    }
}

/// Remove begin/end sequence markers some local models leak into output.
pub fn strip_sequence_markers(text: &str) -> String {
    text.replace("<s>", "").replace("</s>", "").trim().to_string()
}

/// First sentence of `text`, ending mark retained.
///
/// The cut happens after the first sentence-ending mark (。；？！); text
/// without any such mark is returned whole.
pub fn first_sentence(text: &str) -> &str {
    for (idx, ch) in text.char_indices() {
        if SENTENCE_ENDINGS.contains(&ch) {
            return &text[..idx + ch.len_utf8()];
        }
    }
    text
}

/// Text before the first ideographic full stop, whole text if none.
pub fn leading_clause(text: &str) -> &str {
    match text.find('。') {
        Some(idx) => &text[..idx],
        None => text,
    }
}

/// Classify a keyword-level verdict by its leading phrase.
pub fn classify_keyword(response: &str) -> Judgment {
    classify(response, KEYWORD_HALLUCINATED, KEYWORD_FACTUAL)
}

/// Classify a keyword-level verdict and extract the stated reason.
pub fn classify_keyword_with_reason(response: &str) -> (Judgment, String) {
    classify_with_reason(response, KEYWORD_HALLUCINATED, KEYWORD_FACTUAL)
}

/// Classify a continuation-level verdict by its leading phrase.
pub fn classify_continuation(response: &str) -> Judgment {
    classify(response, CONTINUATION_HALLUCINATED, CONTINUATION_FACTUAL)
}

/// Classify a continuation-level verdict and extract the stated reason.
pub fn classify_continuation_with_reason(response: &str) -> (Judgment, String) {
    classify_with_reason(response, CONTINUATION_HALLUCINATED, CONTINUATION_FACTUAL)
}

/// Answer letter of a pairwise comparison.
///
/// The response is truncated at the first occurrence of
/// [`COMPARISON_ANSWER_MARKER`] and trimmed; exactly "A" prefers the first
/// candidate, exactly "B" the second, anything else is indeterminate.
pub fn classify_comparison(response: &str) -> Comparison {
    let answer = match response.find(COMPARISON_ANSWER_MARKER) {
        Some(idx) => &response[..idx],
        None => response,
    };
    match answer.trim() {
        "A" => Comparison::First,
        "B" => Comparison::Second,
        _ => Comparison::Indeterminate,
    }
}

/// Prefix match, negative phrase first: the factual phrase is a suffix of
/// the hallucinated one at the keyword level, so order matters.
fn classify(response: &str, hallucinated: &str, factual: &str) -> Judgment {
    if response.starts_with(hallucinated) {
        Judgment::Hallucinated
    } else if response.starts_with(factual) {
        Judgment::Factual
    } else {
        Judgment::Indeterminate
    }
}

fn classify_with_reason(response: &str, hallucinated: &str, factual: &str) -> (Judgment, String) {
    let judgment = classify(response, hallucinated, factual);
    let clause = leading_clause(response);
    let reason = match judgment {
        Judgment::Hallucinated => clause.strip_prefix(hallucinated).unwrap_or(clause),
        Judgment::Factual => clause.strip_prefix(factual).unwrap_or(clause),
        Judgment::Indeterminate => clause,
    };
    let reason = reason
        .trim_start_matches(['，', ',', '、', '：', ':'])
        .trim()
        .to_string();
    (judgment, reason)
}
