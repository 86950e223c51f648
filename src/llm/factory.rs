//! Completion client factory.
//!
//! Centralizes provider-specific logic for creating completion clients.

use crate::config::LlmConfig;
use crate::error::{AskError, Result};
use crate::llm::{
    CompletionClient, MockCompletionClient, OllamaClient, OllamaConfig, OpenAiClient,
    OpenAiConfig, Provider,
};

/// Creates a completion client for the given provider.
///
/// For the hosted provider the API key is resolved in order: config file,
/// then the `OPENAI_API_KEY` environment variable. Model selection follows
/// the same order, falling back to the provider's default
/// (`OPENAI_MODEL` / `OLLAMA_MODEL` environment variables also apply).
pub fn create_client(provider: Provider, config: &LlmConfig) -> Result<Box<dyn CompletionClient>> {
    match provider {
        Provider::OpenAi => {
            let key = config
                .api_key
                .clone()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok())
                .ok_or_else(|| {
                    AskError::config(
                        "No API key configured. Set api_key in the config file or OPENAI_API_KEY.",
                    )
                })?;
            let model = config
                .model
                .clone()
                .or_else(|| std::env::var("OPENAI_MODEL").ok())
                .unwrap_or_else(|| "gpt-4o".to_string());
            Ok(Box::new(OpenAiClient::new(OpenAiConfig::new(key, model))?))
        }
        Provider::Ollama => match &config.model {
            Some(model) => Ok(Box::new(OllamaClient::new(OllamaConfig::new(model))?)),
            None => Ok(Box::new(OllamaClient::from_env()?)),
        },
        Provider::Mock => Ok(Box::new(MockCompletionClient::new())),
    }
}
