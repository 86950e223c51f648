//! LLM integration for askdb.
//!
//! Provides the completion trait and implementations for the supported
//! providers. The pipeline treats a provider as a single capability: turn a
//! prompt into text.

#![allow(dead_code)] // Parts of the provider surface are only used by tests

pub mod factory;
pub mod mock;
pub mod ollama;
pub mod openai;
pub mod prompt;
pub mod sanitize;

pub use factory::create_client;
pub use mock::MockCompletionClient;
pub use ollama::{OllamaClient, OllamaConfig};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use prompt::{build_prompt, SYSTEM_INSTRUCTION};
pub use sanitize::sanitize;

use async_trait::async_trait;
use std::str::FromStr;

use crate::error::Result;

/// Sampling temperature for SQL generation. Kept low to bias toward
/// deterministic, syntactically conservative output.
pub const SQL_TEMPERATURE: f32 = 0.3;

/// Trait for completion clients that turn a prompt into generated text.
///
/// Implementations must be thread-safe (Send + Sync). A request either
/// produces the raw completion text, fails with `ProviderUnavailable` when
/// the backend cannot be reached, or fails with `Provider` when the backend
/// responds with a non-success status or malformed payload.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generates a completion for the given prompt.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Completion provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    /// Hosted OpenAI chat-completion API.
    #[default]
    OpenAi,
    /// Local Ollama instance.
    Ollama,
    /// Mock client for testing (no backend required).
    Mock,
}

impl Provider {
    /// Returns the provider as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
            Self::Mock => "mock",
        }
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
