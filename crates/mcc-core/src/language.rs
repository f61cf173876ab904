//! Supported target languages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Target languages offered to users.
///
/// Identifiers are lowercase and stable; they key the snippet table and
/// appear verbatim in provider instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    Python,
    Java,
    Cpp,
    CSharp,
    Go,
    Rust,
    TypeScript,
    Php,
    Ruby,
}

/// Language used when none is given or the given one is unknown.
pub const DEFAULT_LANGUAGE: Language = Language::JavaScript;

impl Language {
    /// All languages, in the order they are presented to users.
    pub const ALL: [Language; 10] = [
        Language::JavaScript,
        Language::Python,
        Language::Java,
        Language::Cpp,
        Language::CSharp,
        Language::Go,
        Language::Rust,
        Language::TypeScript,
        Language::Php,
        Language::Ruby,
    ];

    /// Canonical lowercase identifier.
    pub fn id(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::CSharp => "csharp",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::TypeScript => "typescript",
            Language::Php => "php",
            Language::Ruby => "ruby",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Language::JavaScript => "JavaScript",
            Language::Python => "Python",
            Language::Java => "Java",
            Language::Cpp => "C++",
            Language::CSharp => "C#",
            Language::Go => "Go",
            Language::Rust => "Rust",
            Language::TypeScript => "TypeScript",
            Language::Php => "PHP",
            Language::Ruby => "Ruby",
        }
    }

    /// Parse an identifier, ignoring case and surrounding whitespace.
    pub fn parse(id: &str) -> Option<Language> {
        let id = id.trim().to_lowercase();
        Language::ALL.into_iter().find(|lang| lang.id() == id)
    }

    /// Parse an identifier, falling back to [`DEFAULT_LANGUAGE`].
    #[must_use]
    pub fn parse_or_default(id: &str) -> Language {
        Language::parse(id).unwrap_or(DEFAULT_LANGUAGE)
    }
}

impl Default for Language {
    fn default() -> Self {
        DEFAULT_LANGUAGE
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned by [`Language::from_str`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::parse(s).ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}
