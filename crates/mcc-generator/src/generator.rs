//! Code generation orchestrator.
//!
//! Runs the provider stages in order, stopping at the first success, and
//! falls back to the static snippet table when every stage fails. The
//! fallback cannot fail, so neither can the orchestrator.

use std::sync::Arc;
use std::time::{Duration, Instant};

use mcc_core::{GenerationRequest, GenerationResult, SnippetTable, DEFAULT_LANGUAGE};
use tracing::{debug, info, warn};

use crate::client::{env_non_empty, ProviderConfig};
use crate::prompt::strip_code_fence;
use crate::provider::ProviderStage;

/// Environment variable overriding the fallback delay (milliseconds).
pub const ENV_FALLBACK_DELAY_MS: &str = "MCC_FALLBACK_DELAY_MS";
/// Environment variable setting a per-request timeout (seconds).
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "MCC_REQUEST_TIMEOUT_SECS";

/// Delay applied before returning a static snippet.
pub const FALLBACK_DELAY_DEFAULT: Duration = Duration::from_millis(800);

/// Name of the static fallback stage in reports.
pub const STATIC_STAGE: &str = "static";

/// Generator configuration.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Remote providers, in priority order
    pub providers: Vec<ProviderConfig>,
    /// Simulated latency before a static snippet is returned
    pub fallback_delay: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl GeneratorConfig {
    /// Primary Groq, secondary OpenRouter, delay and timeout from the
    /// environment.
    pub fn from_env() -> Self {
        let timeout = env_non_empty(ENV_REQUEST_TIMEOUT_SECS)
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let providers = [ProviderConfig::groq(), ProviderConfig::openrouter()]
            .into_iter()
            .map(|config| match timeout {
                Some(timeout) => config.with_timeout(timeout),
                None => config,
            })
            .collect();

        let fallback_delay = env_non_empty(ENV_FALLBACK_DELAY_MS)
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(FALLBACK_DELAY_DEFAULT);

        Self {
            providers,
            fallback_delay,
        }
    }

    /// No remote providers; every request is served from the snippet table.
    pub fn offline() -> Self {
        Self {
            providers: Vec::new(),
            fallback_delay: FALLBACK_DELAY_DEFAULT,
        }
    }

    /// Set the fallback delay.
    pub fn with_fallback_delay(mut self, delay: Duration) -> Self {
        self.fallback_delay = delay;
        self
    }

    /// Append a provider to the chain.
    pub fn with_provider(mut self, provider: ProviderConfig) -> Self {
        self.providers.push(provider);
        self
    }
}

/// What happened at one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage produced the result
    Succeeded,
    /// The stage was called and failed
    Failed(String),
    /// The stage was not called (not configured)
    Skipped(String),
}

/// Record of a single stage.
#[derive(Debug, Clone)]
pub struct StageAttempt {
    /// Stage name
    pub stage: String,
    /// Outcome
    pub outcome: StageOutcome,
    /// Time spent in this stage
    pub duration: Duration,
}

/// Result plus diagnostics for one request.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// What the caller gets
    pub result: GenerationResult,
    /// One record per stage visited, in order
    pub attempts: Vec<StageAttempt>,
    /// Total duration
    pub duration: Duration,
}

impl GenerationReport {
    /// Name of the stage that produced the result.
    pub fn stage_used(&self) -> &str {
        self.attempts
            .iter()
            .find(|a| a.outcome == StageOutcome::Succeeded)
            .map(|a| a.stage.as_str())
            .unwrap_or(STATIC_STAGE)
    }

    /// Format as a summary string.
    pub fn format_summary(&self) -> String {
        let source = if self.result.is_mock { "MOCK" } else { "LIVE" };
        let mut summary = format!(
            "[{}] {} snippet from '{}' in {:.2}s\n",
            source,
            self.result.language,
            self.stage_used(),
            self.duration.as_secs_f64(),
        );

        for attempt in &self.attempts {
            let line = match &attempt.outcome {
                StageOutcome::Succeeded => format!(
                    "  {}: ok ({}ms)\n",
                    attempt.stage,
                    attempt.duration.as_millis()
                ),
                StageOutcome::Failed(error) => format!(
                    "  {}: failed ({}ms) - {}\n",
                    attempt.stage,
                    attempt.duration.as_millis(),
                    error
                ),
                StageOutcome::Skipped(reason) => {
                    format!("  {}: skipped - {}\n", attempt.stage, reason)
                }
            };
            summary.push_str(&line);
        }

        summary
    }
}

/// Fallback-chain code generator.
///
/// Holds no mutable state; share it behind an `Arc` to serve concurrent
/// requests. Concurrent requests are independent of each other.
pub struct CodeGenerator {
    stages: Vec<ProviderStage>,
    snippets: Arc<SnippetTable>,
    fallback_delay: Duration,
}

impl CodeGenerator {
    /// Create a generator from a config and a snippet table.
    pub fn new(config: GeneratorConfig, snippets: Arc<SnippetTable>) -> Self {
        let stages = config
            .providers
            .into_iter()
            .map(ProviderStage::from_config)
            .collect();
        Self::with_stages(stages, snippets, config.fallback_delay)
    }

    /// Create a generator from explicit stages.
    pub fn with_stages(
        stages: Vec<ProviderStage>,
        snippets: Arc<SnippetTable>,
        fallback_delay: Duration,
    ) -> Self {
        Self {
            stages,
            snippets,
            fallback_delay,
        }
    }

    /// Create from environment variables with the built-in snippet table.
    pub fn from_env() -> Self {
        Self::new(GeneratorConfig::from_env(), Arc::new(SnippetTable::builtin()))
    }

    /// The configured stages, in order.
    pub fn stages(&self) -> &[ProviderStage] {
        &self.stages
    }

    /// The snippet table used for fallback.
    pub fn snippets(&self) -> &SnippetTable {
        &self.snippets
    }

    /// Generate code for `prompt` in `language`. Never fails.
    ///
    /// A blank `language` means JavaScript.
    pub async fn generate_code(&self, prompt: &str, language: &str) -> GenerationResult {
        let language = match language.trim() {
            "" => DEFAULT_LANGUAGE.id(),
            _ => language,
        };
        let request = GenerationRequest {
            prompt: prompt.to_string(),
            language: language.to_string(),
        };
        self.generate(&request).await.result
    }

    /// Generate code and report on every stage visited.
    pub async fn generate(&self, request: &GenerationRequest) -> GenerationReport {
        let start = Instant::now();
        let mut attempts = Vec::with_capacity(self.stages.len() + 1);

        for stage in &self.stages {
            let provider = match stage {
                ProviderStage::Ready(provider) => provider,
                ProviderStage::Unavailable { name, reason } => {
                    debug!(stage = %name, %reason, "Skipping unavailable provider");
                    attempts.push(StageAttempt {
                        stage: name.clone(),
                        outcome: StageOutcome::Skipped(reason.clone()),
                        duration: Duration::ZERO,
                    });
                    continue;
                }
            };

            let stage_start = Instant::now();
            info!(stage = provider.name(), language = %request.language, "Attempting code generation");

            match provider.generate(&request.prompt, &request.language).await {
                Ok(raw) => {
                    attempts.push(StageAttempt {
                        stage: provider.name().to_string(),
                        outcome: StageOutcome::Succeeded,
                        duration: stage_start.elapsed(),
                    });
                    info!(stage = provider.name(), "Provider succeeded");

                    return GenerationReport {
                        result: GenerationResult::remote(strip_code_fence(&raw), request),
                        attempts,
                        duration: start.elapsed(),
                    };
                }
                Err(e) => {
                    warn!(stage = provider.name(), error = %e, "Provider failed, falling through");
                    attempts.push(StageAttempt {
                        stage: provider.name().to_string(),
                        outcome: StageOutcome::Failed(e.to_string()),
                        duration: stage_start.elapsed(),
                    });
                }
            }
        }

        let stage_start = Instant::now();
        info!(language = %request.language, "Using static snippet fallback");

        if !self.fallback_delay.is_zero() {
            tokio::time::sleep(self.fallback_delay).await;
        }
        let code = self.snippets.lookup(&request.language).to_string();

        attempts.push(StageAttempt {
            stage: STATIC_STAGE.to_string(),
            outcome: StageOutcome::Succeeded,
            duration: stage_start.elapsed(),
        });

        GenerationReport {
            result: GenerationResult::mock(code, request),
            attempts,
            duration: start.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::client::ClientError;
    use crate::provider::CodeProvider;

    /// Provider returning a fixed outcome and counting calls.
    struct CannedProvider {
        name: &'static str,
        reply: Option<&'static str>,
        calls: Arc<AtomicU32>,
    }

    impl CannedProvider {
        fn ok(name: &'static str, reply: &'static str) -> (Self, Arc<AtomicU32>) {
            let calls = Arc::new(AtomicU32::new(0));
            let provider = Self {
                name,
                reply: Some(reply),
                calls: Arc::clone(&calls),
            };
            (provider, calls)
        }

        fn failing(name: &'static str) -> (Self, Arc<AtomicU32>) {
            let calls = Arc::new(AtomicU32::new(0));
            let provider = Self {
                name,
                reply: None,
                calls: Arc::clone(&calls),
            };
            (provider, calls)
        }
    }

    #[async_trait]
    impl CodeProvider for CannedProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn generate(&self, _prompt: &str, _language: &str) -> Result<String, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Some(reply) => Ok(reply.to_string()),
                None => Err(ClientError::ApiError {
                    status: 503,
                    body: "unavailable".to_string(),
                }),
            }
        }
    }

    fn generator(stages: Vec<ProviderStage>) -> CodeGenerator {
        CodeGenerator::with_stages(stages, Arc::new(SnippetTable::builtin()), Duration::ZERO)
    }

    #[tokio::test]
    async fn test_primary_success_short_circuits() {
        let (primary, primary_calls) =
            CannedProvider::ok("primary", "```javascript\nconsole.log(1)\n```");
        let (secondary, secondary_calls) = CannedProvider::ok("secondary", "unused");
        let gen = generator(vec![
            ProviderStage::ready(primary),
            ProviderStage::ready(secondary),
        ]);

        let report = gen
            .generate(&GenerationRequest::new("log one", Some("javascript")).unwrap())
            .await;

        assert_eq!(report.result.code, "console.log(1)");
        assert!(!report.result.is_mock);
        assert_eq!(report.stage_used(), "primary");
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_secondary_used_after_primary_failure() {
        let (primary, primary_calls) = CannedProvider::failing("primary");
        let (secondary, _) = CannedProvider::ok("secondary", "print('hi')");
        let gen = generator(vec![
            ProviderStage::ready(primary),
            ProviderStage::ready(secondary),
        ]);

        let result = gen.generate_code("print hi", "python").await;

        assert_eq!(result.code, "print('hi')");
        assert!(!result.is_mock);
        assert_eq!(result.language, "python");
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_failures_fall_back_to_table() {
        let (primary, _) = CannedProvider::failing("primary");
        let gen = generator(vec![
            ProviderStage::ready(primary),
            ProviderStage::Unavailable {
                name: "secondary".to_string(),
                reason: "no key".to_string(),
            },
        ]);

        let report = gen
            .generate(&GenerationRequest::new("fibonacci", Some("python")).unwrap())
            .await;

        assert!(report.result.is_mock);
        assert_eq!(report.result.code, SnippetTable::builtin().lookup("python"));
        assert_eq!(report.stage_used(), STATIC_STAGE);
        assert_eq!(report.attempts.len(), 3);
        assert!(matches!(report.attempts[0].outcome, StageOutcome::Failed(_)));
        assert_eq!(
            report.attempts[1].outcome,
            StageOutcome::Skipped("no key".to_string())
        );
    }

    #[tokio::test]
    async fn test_unknown_language_gets_default_snippet() {
        let gen = generator(Vec::new());
        let result = gen.generate_code("hello world", "COBOL").await;

        assert!(result.is_mock);
        assert_eq!(result.language, "COBOL");
        assert_eq!(result.code, SnippetTable::builtin().lookup("javascript"));
    }

    #[tokio::test]
    async fn test_blank_language_defaults_to_javascript() {
        let gen = generator(Vec::new());
        let result = gen.generate_code("hello world", " ").await;
        assert_eq!(result.language, "javascript");
    }

    #[tokio::test]
    async fn test_injected_snippet_table() {
        let table = SnippetTable::new(
            vec![("javascript".to_string(), "canned".to_string())],
            "javascript",
        )
        .unwrap();
        let gen = CodeGenerator::with_stages(Vec::new(), Arc::new(table), Duration::ZERO);

        let result = gen.generate_code("anything at all", "rust").await;
        assert_eq!(result.code, "canned");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_delay_only_on_static_path() {
        let delay = Duration::from_millis(800);

        let (primary, _) = CannedProvider::ok("primary", "x");
        let live = CodeGenerator::with_stages(
            vec![ProviderStage::ready(primary)],
            Arc::new(SnippetTable::builtin()),
            delay,
        );
        let start = tokio::time::Instant::now();
        live.generate_code("make x", "go").await;
        assert!(start.elapsed() < delay);

        let mock = CodeGenerator::with_stages(Vec::new(), Arc::new(SnippetTable::builtin()), delay);
        let start = tokio::time::Instant::now();
        let result = mock.generate_code("make x", "go").await;
        assert!(result.is_mock);
        assert!(start.elapsed() >= delay);
    }

    #[tokio::test]
    async fn test_repeated_calls_agree_on_source() {
        let (primary, _) = CannedProvider::failing("primary");
        let gen = generator(vec![ProviderStage::ready(primary)]);

        let first = gen.generate_code("sort a list", "ruby").await;
        let second = gen.generate_code("sort a list", "ruby").await;
        assert_eq!(first.is_mock, second.is_mock);
        assert_eq!(first, second);
    }

    #[test]
    fn test_offline_config_has_no_providers() {
        let config = GeneratorConfig::offline().with_fallback_delay(Duration::ZERO);
        assert!(config.providers.is_empty());
        assert_eq!(config.fallback_delay, Duration::ZERO);
    }

    #[test]
    fn test_format_summary() {
        let request = GenerationRequest::new("sum numbers", Some("go")).unwrap();
        let report = GenerationReport {
            result: GenerationResult::mock("package main".to_string(), &request),
            attempts: vec![
                StageAttempt {
                    stage: "groq".to_string(),
                    outcome: StageOutcome::Failed("API error (status 401): nope".to_string()),
                    duration: Duration::from_millis(12),
                },
                StageAttempt {
                    stage: "openrouter".to_string(),
                    outcome: StageOutcome::Skipped("no key".to_string()),
                    duration: Duration::ZERO,
                },
                StageAttempt {
                    stage: STATIC_STAGE.to_string(),
                    outcome: StageOutcome::Succeeded,
                    duration: Duration::from_millis(800),
                },
            ],
            duration: Duration::from_millis(812),
        };

        let summary = report.format_summary();
        assert!(summary.starts_with("[MOCK] go snippet from 'static'"));
        assert!(summary.contains("groq: failed (12ms) - API error (status 401)"));
        assert!(summary.contains("openrouter: skipped - no key"));
        assert!(summary.contains("static: ok (800ms)"));
    }
}
