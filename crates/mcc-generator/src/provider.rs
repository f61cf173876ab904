//! Provider seam.
//!
//! The orchestrator only sees [`CodeProvider`]; [`ChatClient`] is the
//! production implementation and tests plug in canned ones.

use async_trait::async_trait;

use crate::client::{ChatClient, ClientError, Message, ProviderConfig};
use crate::prompt::PromptBuilder;

/// A remote source of generated code.
#[async_trait]
pub trait CodeProvider: Send + Sync {
    /// Stage name used in logs and reports.
    fn name(&self) -> &str;

    /// Ask for code in `language` answering `prompt`.
    ///
    /// Returns the provider's raw text; fence stripping happens in the
    /// orchestrator.
    async fn generate(&self, prompt: &str, language: &str) -> Result<String, ClientError>;
}

#[async_trait]
impl CodeProvider for ChatClient {
    fn name(&self) -> &str {
        ChatClient::name(self)
    }

    async fn generate(&self, prompt: &str, language: &str) -> Result<String, ClientError> {
        let system = PromptBuilder::system_prompt(language);
        self.complete_with_system(vec![Message::user(prompt)], Some(system))
            .await
    }
}

/// One remote step of the fallback chain.
pub enum ProviderStage {
    /// A provider that will be called.
    Ready(Box<dyn CodeProvider>),
    /// A provider that could not be set up; it is skipped at request time.
    Unavailable { name: String, reason: String },
}

impl ProviderStage {
    /// Wrap a ready provider.
    pub fn ready(provider: impl CodeProvider + 'static) -> Self {
        ProviderStage::Ready(Box::new(provider))
    }

    /// Build a chat-completions stage, or an unavailable one if the config
    /// is unusable (most commonly: no API key).
    pub fn from_config(config: ProviderConfig) -> Self {
        let name = config.name.clone();
        match ChatClient::new(config) {
            Ok(client) => ProviderStage::ready(client),
            Err(e) => ProviderStage::Unavailable {
                name,
                reason: e.to_string(),
            },
        }
    }

    /// Stage name.
    pub fn name(&self) -> &str {
        match self {
            ProviderStage::Ready(provider) => provider.name(),
            ProviderStage::Unavailable { name, .. } => name,
        }
    }

    /// Whether this stage will be called.
    pub fn is_ready(&self) -> bool {
        matches!(self, ProviderStage::Ready(_))
    }
}

impl std::fmt::Debug for ProviderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderStage::Ready(provider) => {
                f.debug_tuple("Ready").field(&provider.name()).finish()
            }
            ProviderStage::Unavailable { name, reason } => f
                .debug_struct("Unavailable")
                .field("name", name)
                .field("reason", reason)
                .finish(),
        }
    }
}
