//! Static snippet corpus.
//!
//! One canonical example per language, used when no remote provider
//! answers. A table is built once at start-up and never mutated; the
//! orchestrator receives it by injection so tests can swap it out.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::language::{Language, DEFAULT_LANGUAGE};

/// Built-in snippet sources, keyed by language.
fn builtin_source(language: Language) -> &'static str {
    match language {
        Language::JavaScript => include_str!("../snippets/javascript.js"),
        Language::Python => include_str!("../snippets/python.py"),
        Language::Java => include_str!("../snippets/java.java"),
        Language::Cpp => include_str!("../snippets/cpp.cpp"),
        Language::CSharp => include_str!("../snippets/csharp.cs"),
        Language::Go => include_str!("../snippets/go.go"),
        Language::Rust => include_str!("../snippets/rust.rs"),
        Language::TypeScript => include_str!("../snippets/typescript.ts"),
        Language::Php => include_str!("../snippets/php.php"),
        Language::Ruby => include_str!("../snippets/ruby.rb"),
    }
}

/// Immutable language → snippet mapping with a guaranteed default entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SnippetTableFile", into = "SnippetTableFile")]
pub struct SnippetTable {
    entries: BTreeMap<String, String>,
    default_key: String,
}

/// On-disk representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnippetTableFile {
    /// Key of the entry used for unknown languages
    #[serde(default = "default_key")]
    default: String,
    /// Language identifier → snippet
    snippets: BTreeMap<String, String>,
}

fn default_key() -> String {
    DEFAULT_LANGUAGE.id().to_string()
}

impl SnippetTable {
    /// Build a table, normalising keys to lowercase.
    ///
    /// Fails if `default_key` has no entry.
    pub fn new(
        entries: impl IntoIterator<Item = (String, String)>,
        default_key: &str,
    ) -> Result<Self, SnippetError> {
        let entries: BTreeMap<String, String> = entries
            .into_iter()
            .map(|(key, code)| (key.trim().to_lowercase(), code))
            .collect();

        if entries.is_empty() {
            return Err(SnippetError::Empty);
        }

        let default_key = default_key.trim().to_lowercase();
        if !entries.contains_key(&default_key) {
            return Err(SnippetError::MissingDefault(default_key));
        }

        Ok(Self {
            entries,
            default_key,
        })
    }

    /// The built-in corpus: one snippet per [`Language`], JavaScript default.
    pub fn builtin() -> Self {
        let entries = Language::ALL
            .into_iter()
            .map(|lang| {
                (
                    lang.id().to_string(),
                    builtin_source(lang).trim_end().to_string(),
                )
            })
            .collect();

        Self {
            entries,
            default_key: default_key(),
        }
    }

    /// Load a table from a JSON file of the form
    /// `{"default": "javascript", "snippets": {"python": "..."}}`.
    pub fn from_json_file(path: &Path) -> Result<Self, SnippetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parse a table from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self, SnippetError> {
        let file: SnippetTableFile = serde_json::from_str(content)?;
        Self::try_from(file)
    }

    /// Snippet for `language` (case-insensitive), or the default entry.
    pub fn lookup(&self, language: &str) -> &str {
        self.get(language).unwrap_or_else(|| self.default_snippet())
    }

    /// Snippet for `language` (case-insensitive), if present.
    pub fn get(&self, language: &str) -> Option<&str> {
        self.entries
            .get(&language.trim().to_lowercase())
            .map(String::as_str)
    }

    /// The default entry.
    pub fn default_snippet(&self) -> &str {
        // The constructors guarantee the default key is present.
        self.entries
            .get(&self.default_key)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Key of the default entry.
    pub fn default_key(&self) -> &str {
        &self.default_key
    }

    /// Language keys, sorted.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries (never true for a constructed table).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SnippetTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<SnippetTableFile> for SnippetTable {
    type Error = SnippetError;

    fn try_from(file: SnippetTableFile) -> Result<Self, Self::Error> {
        SnippetTable::new(file.snippets, &file.default)
    }
}

impl From<SnippetTable> for SnippetTableFile {
    fn from(table: SnippetTable) -> Self {
        Self {
            default: table.default_key,
            snippets: table.entries,
        }
    }
}

/// Snippet table errors.
#[derive(Debug, thiserror::Error)]
pub enum SnippetError {
    #[error("snippet table has no entries")]
    Empty,

    #[error("default snippet '{0}' is not in the table")]
    MissingDefault(String),

    #[error("failed to read snippet table: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid snippet table JSON: {0}")]
    Json(#[from] serde_json::Error),
}
