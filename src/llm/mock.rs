//! Mock completion client for testing.
//!
//! Provides deterministic responses based on input patterns, without making
//! real API calls.

use async_trait::async_trait;

use crate::error::{AskError, Result};
use crate::llm::CompletionClient;

/// Mock completion client that returns canned responses.
#[derive(Debug, Clone, Default)]
pub struct MockCompletionClient {
    /// Fixed response returned for every prompt, if set.
    fixed_response: Option<String>,
    /// Custom response mappings (pattern -> response), checked in order.
    custom_responses: Vec<(String, String)>,
    /// Error injected instead of a response, if set.
    error: Option<MockError>,
}

#[derive(Debug, Clone)]
enum MockError {
    Unavailable(String),
    Provider(String),
}

impl MockCompletionClient {
    /// Creates a new mock client with default responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `response` for every prompt, regardless of content.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        self.fixed_response = Some(response.into());
        self
    }

    /// Adds a custom response mapping.
    ///
    /// When the prompt contains `pattern` (case-insensitive), the mock
    /// returns `response`.
    pub fn with_response(
        mut self,
        pattern: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        self.custom_responses
            .push((pattern.into(), response.into()));
        self
    }

    /// Makes every completion fail as if the backend were unreachable.
    pub fn with_unavailable_error(mut self, msg: impl Into<String>) -> Self {
        self.error = Some(MockError::Unavailable(msg.into()));
        self
    }

    /// Makes every completion fail as if the backend returned an error.
    pub fn with_provider_error(mut self, msg: impl Into<String>) -> Self {
        self.error = Some(MockError::Provider(msg.into()));
        self
    }

    /// Generates a mock response based on the prompt.
    fn mock_response(&self, prompt: &str) -> String {
        if let Some(response) = &self.fixed_response {
            return response.clone();
        }

        let prompt_lower = prompt.to_lowercase();

        for (pattern, response) in &self.custom_responses {
            if prompt_lower.contains(&pattern.to_lowercase()) {
                return response.clone();
            }
        }

        // Default pattern matching
        if prompt_lower.contains("count") {
            return "SELECT COUNT(*) FROM employees;".to_string();
        }

        if prompt_lower.contains("salary") {
            return "SELECT * FROM employees WHERE salary > 50000;".to_string();
        }

        "SELECT * FROM employees;".to_string()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        match &self.error {
            Some(MockError::Unavailable(msg)) => Err(AskError::provider_unavailable(msg.clone())),
            Some(MockError::Provider(msg)) => Err(AskError::provider(msg.clone())),
            None => Ok(self.mock_response(prompt)),
        }
    }
}
