//! Generation request and result types.

use serde::{Deserialize, Serialize};

use crate::language::DEFAULT_LANGUAGE;

/// A validated request for a code snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The user's prompt, as typed
    pub prompt: String,
    /// Requested language identifier (not necessarily a supported one)
    pub language: String,
}

impl GenerationRequest {
    /// Create a request. `language` defaults to JavaScript when absent.
    ///
    /// Whitespace-only prompts are rejected; the prompt itself is stored
    /// untouched.
    pub fn new(
        prompt: impl Into<String>,
        language: Option<&str>,
    ) -> Result<Self, RequestError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(RequestError::EmptyPrompt);
        }

        let language = match language.map(str::trim) {
            Some(lang) if !lang.is_empty() => lang.to_string(),
            _ => DEFAULT_LANGUAGE.id().to_string(),
        };

        Ok(Self { prompt, language })
    }
}

/// A produced snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// Generated or canned code
    pub code: String,
    /// Language identifier echoed from the request
    pub language: String,
    /// The original prompt
    pub prompt: String,
    /// True when the code came from the static snippet table
    pub is_mock: bool,
}

impl GenerationResult {
    /// Result produced by a remote provider.
    pub fn remote(code: String, request: &GenerationRequest) -> Self {
        Self {
            code,
            language: request.language.clone(),
            prompt: request.prompt.clone(),
            is_mock: false,
        }
    }

    /// Result produced by the static snippet table.
    pub fn mock(code: String, request: &GenerationRequest) -> Self {
        Self {
            code,
            language: request.language.clone(),
            prompt: request.prompt.clone(),
            is_mock: true,
        }
    }
}

/// Request construction errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("prompt must not be empty")]
    EmptyPrompt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_language() {
        let request = GenerationRequest::new("sort an array", None).unwrap();
        assert_eq!(request.language, "javascript");

        let request = GenerationRequest::new("sort an array", Some("  ")).unwrap();
        assert_eq!(request.language, "javascript");
    }

    #[test]
    fn test_request_keeps_unknown_language() {
        let request = GenerationRequest::new("sort an array", Some("Haskell")).unwrap();
        assert_eq!(request.language, "Haskell");
    }

    #[test]
    fn test_request_rejects_blank_prompt() {
        assert_eq!(
            GenerationRequest::new("   \n", Some("python")),
            Err(RequestError::EmptyPrompt)
        );
    }

    #[test]
    fn test_result_json_shape() {
        let request = GenerationRequest::new("hello world in go", Some("go")).unwrap();
        let result = GenerationResult::mock("package main".to_string(), &request);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["code"], "package main");
        assert_eq!(json["language"], "go");
        assert_eq!(json["prompt"], "hello world in go");
        assert_eq!(json["isMock"], true);
    }
}
