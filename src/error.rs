//! Error types for askdb.
//!
//! Defines the main error enum used throughout the application. Each variant
//! corresponds to one pipeline stage so callers can tell which component
//! rejected a question.

use thiserror::Error;

/// Main error type for askdb operations.
#[derive(Error, Debug)]
#[allow(dead_code)] // Some variants are only constructed by the library surface
pub enum AskError {
    /// Database connection errors (host unreachable, auth failed, session
    /// closed, etc.). Fatal to the session.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Schema introspection errors (catalog query failed). Aborts the
    /// current question only.
    #[error("Schema error: {0}")]
    SchemaRead(String),

    /// The completion backend could not be reached at all (connection
    /// refused, network failure, timeout).
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The completion backend responded but signalled failure (non-success
    /// status, malformed payload, empty result).
    #[error("Provider error: {0}")]
    Provider(String),

    /// The generated SQL failed to execute. Carries the database diagnostic
    /// verbatim so the caller can see why the statement was rejected.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Configuration errors (invalid config file, missing required fields,
    /// bad connection string, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

#[allow(dead_code)]
impl AskError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a schema introspection error with the given message.
    pub fn schema_read(msg: impl Into<String>) -> Self {
        Self::SchemaRead(msg.into())
    }

    /// Creates a provider-unavailable error with the given message.
    pub fn provider_unavailable(msg: impl Into<String>) -> Self {
        Self::ProviderUnavailable(msg.into())
    }

    /// Creates a provider error with the given message.
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Creates an execution error with the given message.
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::SchemaRead(_) => "Schema Error",
            Self::ProviderUnavailable(_) => "Provider Unavailable",
            Self::Provider(_) => "Provider Error",
            Self::Execution(_) => "Execution Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Returns true if this error ends the session (the connection itself is
    /// unusable). All other kinds leave the session open for further asks.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

/// Result type alias using AskError.
pub type Result<T> = std::result::Result<T, AskError>;
