//! # mcc-generator
//!
//! Code generation through a provider fallback chain.
//!
//! ## The Chain
//!
//! Stages run one at a time, in order, and the first success wins:
//!
//! | Stage | Source | Configured by |
//! |-------|--------|---------------|
//! | 1 | Groq chat completions | `GROQ_API_KEY` |
//! | 2 | OpenRouter chat completions | `OPENROUTER_API_KEY` |
//! | 3 | Static snippet table | always available |
//!
//! A stage with no key is skipped. Any failure (network, non-2xx status,
//! malformed body) is logged and the next stage runs. Nothing is retried.
//! The static stage cannot fail, so [`CodeGenerator::generate_code`] always
//! returns a result; `is_mock` tells the caller which kind it got.
//!
//! # Usage
//!
//! ```bash
//! # Generate a snippet (falls back to the static table without keys)
//! cargo run -p mcc-generator --bin mcc-generate -- --language python "fibonacci generator"
//!
//! # With a provider key
//! GROQ_API_KEY=gsk-... cargo run -p mcc-generator --bin mcc-generate -- "debounce function"
//! ```
//!
//! ```rust,no_run
//! use mcc_generator::CodeGenerator;
//!
//! # async fn demo() {
//! let generator = CodeGenerator::from_env();
//! let result = generator.generate_code("write a binary search", "rust").await;
//! println!("{} (mock: {})", result.code, result.is_mock);
//! # }
//! ```

pub mod client;
pub mod generator;
pub mod prompt;
pub mod provider;

pub use client::{ChatClient, ClientError, Message, ProviderConfig, Role};
pub use generator::{
    CodeGenerator, GenerationReport, GeneratorConfig, StageAttempt, StageOutcome,
    FALLBACK_DELAY_DEFAULT, STATIC_STAGE,
};
pub use prompt::{strip_code_fence, PromptBuilder};
pub use provider::{CodeProvider, ProviderStage};
