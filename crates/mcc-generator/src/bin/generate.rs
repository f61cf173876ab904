//! CLI for generating code snippets through the provider chain.
//!
//! # Usage
//!
//! ```bash
//! # Generate a JavaScript snippet
//! cargo run -p mcc-generator --bin mcc-generate -- "debounce a function"
//!
//! # Pick a language and save to a file
//! cargo run -p mcc-generator --bin mcc-generate -- -l python -o fib.py "fibonacci generator"
//!
//! # Skip remote providers entirely
//! cargo run -p mcc-generator --bin mcc-generate -- --offline --fallback-delay-ms 0 "sort an array"
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use mcc_core::{
    GenerationRequest, GenerationResult, Language, PromptClassifier, SnippetTable,
    REJECTION_WARNING,
};
use mcc_generator::{CodeGenerator, GeneratorConfig};

/// Exit code when the prompt is empty or not about code.
const EXIT_REJECTED: u8 = 2;

/// Generate a code snippet from a natural-language prompt.
#[derive(Parser, Debug)]
#[command(name = "mcc-generate", version)]
#[command(about = "Generate a code snippet from a prompt (remote providers, then a static corpus)")]
struct Cli {
    /// What the code should do.
    #[arg(required_unless_present = "list_languages")]
    prompt: Vec<String>,

    /// Target language (javascript, python, java, cpp, csharp, go, rust, typescript, php, ruby).
    #[arg(short, long, default_value = "javascript")]
    language: String,

    /// Write the result here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON snippet table to use instead of the built-in corpus.
    #[arg(long)]
    snippets: Option<PathBuf>,

    /// Delay before returning a static snippet, in milliseconds.
    #[arg(long)]
    fallback_delay_ms: Option<u64>,

    /// Do not call remote providers.
    #[arg(long)]
    offline: bool,

    /// Let short prompts through on any keyword, not only technical tokens.
    #[arg(long)]
    lenient: bool,

    /// Print the full result as JSON.
    #[arg(long)]
    json: bool,

    /// Only print the result.
    #[arg(short, long)]
    quiet: bool,

    /// List supported languages and exit.
    #[arg(long)]
    list_languages: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    if cli.list_languages {
        for lang in Language::ALL {
            println!("{:<12} {}", lang.id(), lang.label());
        }
        return ExitCode::SUCCESS;
    }

    let prompt = cli.prompt.join(" ");
    let request = match GenerationRequest::new(prompt, Some(cli.language.as_str())) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_REJECTED);
        }
    };

    let classifier = if cli.lenient {
        PromptClassifier::lenient()
    } else {
        PromptClassifier::strict()
    };
    if !classifier.is_coding_prompt(&request.prompt) {
        eprintln!("Warning: {}", REJECTION_WARNING);
        return ExitCode::from(EXIT_REJECTED);
    }

    if Language::parse(&request.language).is_none() {
        warn!(
            language = %request.language,
            "Unsupported language; static fallback will use the default snippet"
        );
    }

    let snippets = match load_snippets(cli.snippets.as_deref()) {
        Ok(table) => Arc::new(table),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut config = if cli.offline {
        GeneratorConfig::offline()
    } else {
        GeneratorConfig::from_env()
    };
    if let Some(ms) = cli.fallback_delay_ms {
        config = config.with_fallback_delay(Duration::from_millis(ms));
    }

    let generator = CodeGenerator::new(config, snippets);
    let report = generator.generate(&request).await;

    if !cli.quiet {
        eprintln!("{}", report.format_summary());
    }

    let rendered = match render_result(&report.result, cli.json) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: failed to serialize result: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.output {
        Some(path) => match std::fs::write(&path, rendered) {
            Ok(()) => {
                if !cli.quiet {
                    eprintln!("Code written to: {}", path.display());
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to write output: {}", e);
                ExitCode::FAILURE
            }
        },
        None => {
            println!("{}", rendered);
            ExitCode::SUCCESS
        }
    }
}

/// Log to stderr, `RUST_LOG` overriding the default level.
fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_snippets(path: Option<&Path>) -> Result<SnippetTable, mcc_core::SnippetError> {
    match path {
        Some(path) => SnippetTable::from_json_file(path),
        None => Ok(SnippetTable::builtin()),
    }
}

/// Code alone, or the whole result as pretty JSON.
fn render_result(result: &GenerationResult, json: bool) -> Result<String, serde_json::Error> {
    if json {
        serde_json::to_string_pretty(result)
    } else {
        Ok(result.code.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "mcc-generate",
            "-l",
            "python",
            "--offline",
            "--fallback-delay-ms",
            "0",
            "fibonacci",
            "generator",
        ])
        .unwrap();

        assert_eq!(cli.prompt.join(" "), "fibonacci generator");
        assert_eq!(cli.language, "python");
        assert!(cli.offline);
        assert_eq!(cli.fallback_delay_ms, Some(0));
    }

    #[test]
    fn test_cli_requires_prompt() {
        assert!(Cli::try_parse_from(["mcc-generate"]).is_err());
        assert!(Cli::try_parse_from(["mcc-generate", "--list-languages"]).is_ok());
    }

    #[test]
    fn test_render_result() {
        let request = GenerationRequest::new("hello in ruby", Some("ruby")).unwrap();
        let result = GenerationResult::mock("puts 'hello'".to_string(), &request);

        assert_eq!(render_result(&result, false).unwrap(), "puts 'hello'");

        let json: serde_json::Value =
            serde_json::from_str(&render_result(&result, true).unwrap()).unwrap();
        assert_eq!(json["isMock"], true);
        assert_eq!(json["language"], "ruby");
    }

    #[test]
    fn test_load_snippets_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.json");
        std::fs::write(&path, r#"{"snippets": {"javascript": "alert(1)"}}"#).unwrap();

        let table = load_snippets(Some(&path)).unwrap();
        assert_eq!(table.lookup("go"), "alert(1)");

        assert_eq!(load_snippets(None).unwrap(), SnippetTable::builtin());
    }
}
