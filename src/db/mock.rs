//! Mock database clients for testing.
//!
//! Provides an in-memory implementation with canned schema and rows, plus a
//! cursor probe so tests can verify that every execution path releases its
//! cursor, success or failure.

#![allow(dead_code)] // Exercised by tests and the library surface

use super::{DatabaseClient, ResultRecord, ResultSet, SchemaDescription, Value};
use crate::error::{AskError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Shared counter tracking cursor acquisition and release.
///
/// `open()` must return to zero after every operation; `acquired()` counts
/// lifetime acquisitions so tests can assert the probe was exercised.
#[derive(Debug, Clone, Default)]
pub struct CursorProbe {
    open: Arc<AtomicUsize>,
    acquired: Arc<AtomicUsize>,
}

impl CursorProbe {
    /// Number of cursors currently open.
    pub fn open(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    /// Number of cursors opened over the probe's lifetime.
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    fn acquire(&self) -> CursorGuard {
        self.open.fetch_add(1, Ordering::SeqCst);
        self.acquired.fetch_add(1, Ordering::SeqCst);
        CursorGuard {
            open: Arc::clone(&self.open),
        }
    }
}

/// Guard released when the cursor goes out of scope, on any exit path.
struct CursorGuard {
    open: Arc<AtomicUsize>,
}

impl Drop for CursorGuard {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Shared log of executed statements, cloneable into tests.
#[derive(Debug, Clone, Default)]
pub struct StatementLog {
    statements: Arc<Mutex<Vec<String>>>,
}

impl StatementLog {
    fn record(&self, sql: &str) {
        self.statements.lock().unwrap().push(sql.to_string());
    }

    /// Returns the most recently executed statement.
    pub fn last(&self) -> Option<String> {
        self.statements.lock().unwrap().last().cloned()
    }

    /// Returns all executed statements in order.
    pub fn all(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }
}

/// A mock database client that returns predefined results.
#[derive(Debug, Default)]
pub struct MockDatabaseClient {
    schema: SchemaDescription,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    execution_error: Option<String>,
    schema_error: Option<String>,
    probe: CursorProbe,
    log: StatementLog,
}

impl MockDatabaseClient {
    /// Creates a new mock client with an empty schema and no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the schema returned by introspection.
    pub fn with_schema(mut self, schema: SchemaDescription) -> Self {
        self.schema = schema;
        self
    }

    /// Sets the columns and rows returned by every execution.
    pub fn with_result(mut self, columns: Vec<&str>, rows: Vec<Vec<Value>>) -> Self {
        self.columns = columns.into_iter().map(String::from).collect();
        self.rows = rows;
        self
    }

    /// Makes every execution fail with the given message.
    pub fn with_execution_error(mut self, msg: impl Into<String>) -> Self {
        self.execution_error = Some(msg.into());
        self
    }

    /// Makes every schema read fail with the given message.
    pub fn with_schema_error(mut self, msg: impl Into<String>) -> Self {
        self.schema_error = Some(msg.into());
        self
    }

    /// Returns a handle to the cursor probe.
    pub fn cursor_probe(&self) -> CursorProbe {
        self.probe.clone()
    }

    /// Returns a handle to the statement log.
    pub fn statement_log(&self) -> StatementLog {
        self.log.clone()
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn describe_schema(&self) -> Result<SchemaDescription> {
        let _cursor = self.probe.acquire();

        if let Some(msg) = &self.schema_error {
            return Err(AskError::schema_read(msg.clone()));
        }

        Ok(self.schema.clone())
    }

    async fn execute_query(&self, sql: &str) -> Result<ResultSet> {
        let _cursor = self.probe.acquire();
        self.log.record(sql);

        if let Some(msg) = &self.execution_error {
            return Err(AskError::execution(msg.clone()));
        }

        let records = self
            .rows
            .iter()
            .map(|row| ResultRecord::from_row(&self.columns, row.clone()))
            .collect();

        Ok(ResultSet::from_records(records).with_execution_time(Duration::from_millis(1)))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A database client whose every operation fails.
///
/// Used to test error propagation when the connection is lost mid-session.
#[derive(Debug, Default)]
pub struct FailingDatabaseClient {
    probe: CursorProbe,
}

impl FailingDatabaseClient {
    /// Creates a new failing client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle to the cursor probe.
    pub fn cursor_probe(&self) -> CursorProbe {
        self.probe.clone()
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn describe_schema(&self) -> Result<SchemaDescription> {
        let _cursor = self.probe.acquire();
        Err(AskError::schema_read("catalog read failed"))
    }

    async fn execute_query(&self, _sql: &str) -> Result<ResultSet> {
        let _cursor = self.probe.acquire();
        Err(AskError::execution("statement execution failed"))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
