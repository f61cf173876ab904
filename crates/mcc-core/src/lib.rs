//! # mcc-core
//!
//! Core types for Mini Code Copilot.
//!
//! - [`Language`]: the fixed set of target languages
//! - [`GenerationRequest`] / [`GenerationResult`]: what goes in, what comes out
//! - [`PromptClassifier`]: decides whether a prompt is worth generating for
//! - [`SnippetTable`]: the static corpus used when no provider answers
//!
//! Nothing here performs I/O except [`SnippetTable::from_json_file`].
//!
//! ```rust
//! use mcc_core::{is_coding_prompt, SnippetTable};
//!
//! assert!(is_coding_prompt("write a function that reverses a string"));
//! assert!(!is_coding_prompt("hi"));
//!
//! let table = SnippetTable::builtin();
//! assert!(table.lookup("PYTHON").contains("fibonacci"));
//! ```

pub mod classifier;
pub mod language;
pub mod request;
pub mod snippets;

pub use classifier::{is_coding_prompt, ClassifierPolicy, PromptClassifier, REJECTION_WARNING};
pub use language::{Language, UnknownLanguage, DEFAULT_LANGUAGE};
pub use request::{GenerationRequest, GenerationResult, RequestError};
pub use snippets::{SnippetError, SnippetTable};
