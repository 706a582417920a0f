//! # hallueval-core
//!
//! Deterministic data model and response-extraction rules for
//! hallucination evaluation of news continuations.
//!
//! This crate holds everything that does NOT talk to a model:
//! - the decoding-parameter bag shared by all backends ([`Params`]),
//! - the evaluation record types ([`NewsItem`], [`Judgment`], [`Comparison`]),
//! - the string-marker slicing rules that turn raw model output into
//!   structured results ([`parse`]).
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: same input always produces same output
//! 2. **No LLM calls**: the backend seam lives in `hallueval-llm`
//! 3. **Exact slicing**: marker extraction keeps strict boundary rules
//!    (last opening marker, first following closing marker) because the
//!    downstream judgment logic depends on them
//!
//! ## Example
//!
//! ```rust
//! use hallueval_core::{parse, Judgment};
//!
//! let raw = "noise<response>大风预警。\n请注意。</response>trailer";
//! let body = parse::between_markers(raw, "<response>", "</response>");
//! assert_eq!(parse::first_sentence(body), "大风预警。");
//!
//! let judged = parse::classify_keyword("不符合现实，新闻中未提及。");
//! assert_eq!(judged, Judgment::Hallucinated);
//! ```

pub mod params;
pub mod parse;
pub mod types;

// Re-export main types at crate root
pub use params::Params;
pub use types::{Comparison, Judgment, NewsItem};
