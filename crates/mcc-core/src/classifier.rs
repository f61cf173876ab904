//! Prompt classifier.
//!
//! Decides whether free text plausibly asks for code. The policy favours
//! false positives: it exists to turn away small talk, not to gatekeep.
//!
//! Two branches:
//!
//! | Normalised length | Test |
//! |-------------------|------|
//! | `< SHORT_TEXT_LEN_MAX` | word-bounded technical tokens (`js`, `api`, ...) |
//! | otherwise | substring containment against [`CODING_KEYWORDS`] |
//!
//! Short text gets word boundaries because a bare `js` or `py` would
//! otherwise match inside unrelated words. Long text accepts incidental
//! matches ("my cat class act" matches via "class").

use std::sync::OnceLock;

use regex::RegexSet;

/// Prompts with fewer characters than this (after trimming) take the
/// short-text branch.
pub const SHORT_TEXT_LEN_MAX: usize = 15;

/// Warning shown to users when a prompt is rejected.
pub const REJECTION_WARNING: &str = "This app is designed for code generation only. \
Please ask coding-related questions or describe the code you want to generate. \
Examples: 'Create a function to sort an array', 'Write a React component', \
'Generate a Python class', etc.";

/// Word-bounded patterns for short prompts.
///
/// `func` is only bounded on the left so that `function` and `funcs` match.
const SHORT_TOKEN_PATTERNS: &[&str] = &[
    r"\bcode\b",
    r"\bfunc",
    r"\bclass\b",
    r"\barray\b",
    r"\bloop\b",
    r"\bsort\b",
    r"\bapi\b",
    r"\bjs\b",
    r"\bpy\b",
    r"\bhtml\b",
    r"\bcss\b",
    r"\bsql\b",
];

/// Lowercase keywords matched by substring containment.
pub const CODING_KEYWORDS: &[&str] = &[
    // Core programming concepts
    "function", "class", "array", "object", "variable", "loop", "sort", "component",
    "method", "property", "parameter", "argument", "return", "import", "export", "module",
    "interface", "type", "enum", "struct", "const", "let", "var", "async", "await", "promise",
    // Actions
    "write", "generate", "create", "build", "implement", "develop", "code", "program",
    "make", "design", "add", "update", "modify", "fix", "debug", "refactor", "optimize",
    // Programming concepts
    "algorithm", "script", "logic", "condition", "iteration", "recursion", "callback",
    "closure", "scope", "inheritance", "polymorphism", "encapsulation", "abstraction",
    // Languages
    "react", "python", "javascript", "typescript", "java", "c++", "c#", "go", "rust",
    "php", "ruby", "swift", "kotlin", "dart", "scala", "perl", "bash", "shell",
    // Technologies and frameworks
    "regex", "sql", "database", "query", "endpoint", "ui", "frontend", "backend",
    "server", "client", "api", "rest", "graphql", "json", "xml", "http", "https",
    "test", "unit test", "mock", "hook", "state", "props", "render", "fetch",
    "axios", "express", "node", "npm", "yarn", "webpack", "vite", "babel",
    "tailwind", "css", "html", "jsx", "tsx", "vue", "angular", "svelte", "next",
    // File extensions
    "ts", "js", "py", "cpp", "csharp", "rb", "rs",
    // Common code patterns
    "for loop", "while loop", "if else", "switch case", "try catch", "map", "filter",
    "reduce", "foreach", "event", "listener", "handler",
    // Data structures
    "list", "dict", "set", "tree", "graph", "stack", "queue", "hash",
    // Short task phrases
    "sort array", "reverse string", "find element", "count", "sum", "average",
    "validate", "parse", "convert", "transform", "format", "calculate",
];

/// How short prompts are treated when no technical token matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierPolicy {
    /// Short prompts pass only on a word-bounded token match.
    #[default]
    Strict,
    /// Short prompts that miss every token still get the keyword scan.
    Lenient,
}

/// Coding-prompt classifier.
///
/// Pure and cheap to share; patterns are compiled once at construction.
#[derive(Debug, Clone)]
pub struct PromptClassifier {
    short_tokens: RegexSet,
    policy: ClassifierPolicy,
}

impl PromptClassifier {
    /// Create a classifier with the given policy.
    pub fn new(policy: ClassifierPolicy) -> Self {
        let short_tokens =
            RegexSet::new(SHORT_TOKEN_PATTERNS).expect("short-token patterns are valid regexes");
        Self {
            short_tokens,
            policy,
        }
    }

    /// Strict classifier.
    pub fn strict() -> Self {
        Self::new(ClassifierPolicy::Strict)
    }

    /// Lenient classifier.
    pub fn lenient() -> Self {
        Self::new(ClassifierPolicy::Lenient)
    }

    /// The active policy.
    pub fn policy(&self) -> ClassifierPolicy {
        self.policy
    }

    /// Returns true if `prompt` looks like a request for code.
    pub fn is_coding_prompt(&self, prompt: &str) -> bool {
        let normalized = prompt.trim().to_lowercase();
        if normalized.is_empty() {
            return false;
        }

        if normalized.chars().count() < SHORT_TEXT_LEN_MAX {
            if self.short_tokens.is_match(&normalized) {
                return true;
            }
            if self.policy == ClassifierPolicy::Strict {
                return false;
            }
        }

        CODING_KEYWORDS
            .iter()
            .any(|keyword| normalized.contains(keyword))
    }
}

impl Default for PromptClassifier {
    fn default() -> Self {
        Self::strict()
    }
}

/// Classify with a shared strict classifier.
pub fn is_coding_prompt(prompt: &str) -> bool {
    static CLASSIFIER: OnceLock<PromptClassifier> = OnceLock::new();
    CLASSIFIER
        .get_or_init(PromptClassifier::strict)
        .is_coding_prompt(prompt)
}
