//! # hallueval-llm
//!
//! LLM backend seam and prompted operations for hallucination evaluation.
//!
//! A backend implements [`LlmBackend::request`] — string query in, string
//! response out, any backend-specific failure — and gets the whole
//! evaluation surface for free: continuation generation, keyword
//! extraction, keyword- and continuation-level hallucination judgment, and
//! pairwise comparison. All backends share one templating, invocation, and
//! response-slicing path so their results are directly comparable.
//!
//! ## Important
//!
//! No operation of this crate returns an error. Backend failures are logged
//! and collapsed to the empty string at the `safe_request` boundary, and
//! unparseable responses come back as sentinel values
//! ([`Judgment::Indeterminate`], [`Comparison::Indeterminate`], `""`, an
//! empty keyword list). An evaluation run over thousands of items must not
//! die on one flaky request.
//!
//! ## Example
//!
//! ```rust,ignore
//! use hallueval_llm::{LlmBackend, BackendError};
//! use hallueval_core::{NewsItem, Params};
//!
//! #[derive(Clone)]
//! struct MyBackend { params: Params }
//!
//! impl LlmBackend for MyBackend {
//!     fn name(&self) -> &str { "MyBackend" }
//!     fn params(&self) -> &Params { &self.params }
//!     fn params_mut(&mut self) -> &mut Params { &mut self.params }
//!     fn request(&self, query: &str) -> Result<String, BackendError> {
//!         // the actual network or local-model call
//!         Ok(call_my_model(query)?)
//!     }
//! }
//!
//! let backend = MyBackend { params: Params::new("MyBackend") };
//! let sentence = backend.continue_writing(&item);
//! let keywords = backend.extract_kws(&sentence);
//! ```

pub mod backend;
pub mod templates;

pub use backend::{continue_writing_without_instruction, BackendError, LlmBackend};

// Re-export the core types a backend implementor needs.
pub use hallueval_core::{Comparison, Judgment, NewsItem, Params};
