//! Query session orchestration.
//!
//! A `Session` owns the database connection for its whole lifetime and runs
//! the ask pipeline: introspect schema, build prompt, request a completion,
//! sanitize it, execute it. Each stage's failure aborts the current ask and
//! surfaces that stage's error kind; the connection stays usable afterwards.

use tracing::{debug, info};

use crate::config::ConnectionConfig;
use crate::db::{self, DatabaseClient, ResultSet};
use crate::error::{AskError, Result};
use crate::llm::{build_prompt, sanitize, CompletionClient};

/// A connected query session.
///
/// The database connection is a single shared resource held until `close`.
/// There is no reconnection: once closed (or once a connection-level failure
/// occurs), a new session must be created.
pub struct Session {
    db: Option<Box<dyn DatabaseClient>>,
    llm: Box<dyn CompletionClient>,
    last_sql: Option<String>,
}

impl Session {
    /// Connects to the database and returns a ready session.
    ///
    /// A failed connection attempt surfaces immediately as a `Connection`
    /// error; nothing is retried and no partial session is returned.
    pub async fn connect(
        config: &ConnectionConfig,
        llm: Box<dyn CompletionClient>,
    ) -> Result<Self> {
        let db = db::connect(config).await?;
        info!("Connected to {}", config.display_string());
        Ok(Self::with_clients(db, llm))
    }

    /// Builds a session from already-constructed clients.
    ///
    /// Used by tests to drive the pipeline against mocks.
    pub fn with_clients(db: Box<dyn DatabaseClient>, llm: Box<dyn CompletionClient>) -> Self {
        Self {
            db: Some(db),
            llm,
            last_sql: None,
        }
    }

    /// Returns true while the session holds an open connection.
    pub fn is_connected(&self) -> bool {
        self.db.is_some()
    }

    /// Returns the most recent sanitized statement, if any ask got that far.
    pub fn last_sql(&self) -> Option<&str> {
        self.last_sql.as_deref()
    }

    /// Answers a natural-language question with rows from the database.
    ///
    /// The schema is re-read on every call so the prompt always reflects the
    /// catalog at that moment. The sanitized statement is executed as-is:
    /// if the model produced a mutating statement, it mutates. Any stage
    /// failure aborts this call only; the session remains usable.
    pub async fn ask(&mut self, question: &str) -> Result<ResultSet> {
        let db = self.db.as_ref().ok_or_else(|| {
            AskError::connection("Session is closed. Connect again to run further queries.")
        })?;

        let schema = db.describe_schema().await?;
        debug!(columns = schema.columns.len(), "Read catalog");

        let prompt = build_prompt(&schema.format_for_prompt(), question);

        let raw = self.llm.complete(&prompt).await?;
        let sql = sanitize(&raw);
        info!(%sql, "Generated SQL query");
        self.last_sql = Some(sql.clone());

        let result = db.execute_query(&sql).await?;
        debug!(rows = result.len(), "Query executed");

        Ok(result)
    }

    /// Closes the database connection.
    ///
    /// Idempotent: closing an already-closed session is a no-op.
    pub async fn close(&mut self) -> Result<()> {
        if let Some(db) = self.db.take() {
            db.close().await?;
            info!("Database connection closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MockDatabaseClient, SchemaColumn, SchemaDescription, Value};
    use crate::llm::MockCompletionClient;

    fn employees_schema() -> SchemaDescription {
        SchemaDescription::from_columns(vec![
            SchemaColumn::new("EMPLOYEES", "NAME", "VARCHAR2"),
            SchemaColumn::new("EMPLOYEES", "SALARY", "NUMBER"),
        ])
    }

    fn employees_db() -> MockDatabaseClient {
        MockDatabaseClient::new()
            .with_schema(employees_schema())
            .with_result(
                vec!["NAME", "SALARY"],
                vec![
                    vec![Value::from("Alice"), Value::Int(60000)],
                    vec![Value::from("Bob"), Value::Int(75000)],
                ],
            )
    }

    #[tokio::test]
    async fn test_ask_runs_full_pipeline() {
        let db = employees_db();
        let log = db.statement_log();
        let llm = MockCompletionClient::new()
            .with_fixed_response("SELECT * FROM EMPLOYEES WHERE SALARY > 50000;");

        let mut session = Session::with_clients(Box::new(db), Box::new(llm));
        let result = session.ask("Show employees with salary greater than 50000")
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        for record in result.iter() {
            assert_eq!(record.columns(), vec!["NAME", "SALARY"]);
        }

        // The terminator must be gone by the time the statement executes.
        assert_eq!(
            log.last().unwrap(),
            "SELECT * FROM EMPLOYEES WHERE SALARY > 50000"
        );
        assert_eq!(
            session.last_sql(),
            Some("SELECT * FROM EMPLOYEES WHERE SALARY > 50000")
        );
    }

    #[tokio::test]
    async fn test_ask_after_close_is_connection_error() {
        let db = employees_db();
        let llm = MockCompletionClient::new();

        let mut session = Session::with_clients(Box::new(db), Box::new(llm));
        session.close().await.unwrap();
        assert!(!session.is_connected());

        let result = session.ask("anything").await;
        assert!(matches!(result, Err(AskError::Connection(_))));
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let db = employees_db();
        let llm = MockCompletionClient::new();

        let mut session = Session::with_clients(Box::new(db), Box::new(llm));
        session.close().await.unwrap();
        session.close().await.unwrap();
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_provider_failure_leaves_session_usable() {
        let db = employees_db();
        let llm = MockCompletionClient::new().with_unavailable_error("backend down");

        let mut session = Session::with_clients(Box::new(db), Box::new(llm));
        let result = session.ask("question").await;
        assert!(matches!(result, Err(AskError::ProviderUnavailable(_))));
        assert!(session.is_connected());
    }

    #[tokio::test]
    async fn test_schema_failure_aborts_before_completion() {
        let db = MockDatabaseClient::new().with_schema_error("catalog unavailable");
        let llm = MockCompletionClient::new();

        let mut session = Session::with_clients(Box::new(db), Box::new(llm));
        let result = session.ask("question").await;
        assert!(matches!(result, Err(AskError::SchemaRead(_))));
        assert!(session.is_connected());
        assert_eq!(session.last_sql(), None);
    }

    #[tokio::test]
    async fn test_execution_failure_propagates_diagnostic() {
        let db = employees_db().with_execution_error("ERROR: relation \"emplyees\" does not exist");
        let llm = MockCompletionClient::new().with_fixed_response("SELECT * FROM emplyees;");

        let mut session = Session::with_clients(Box::new(db), Box::new(llm));
        let result = session.ask("show employees").await;

        let err = result.unwrap_err();
        assert!(matches!(err, AskError::Execution(_)));
        assert!(err.to_string().contains("emplyees"));
        assert!(session.is_connected());
    }
}
