//! Database abstraction layer for askdb.
//!
//! Provides a trait-based interface for the two operations the pipeline
//! needs from a database: catalog introspection and statement execution.

mod mock;
mod postgres;
mod types;

pub use mock::{CursorProbe, FailingDatabaseClient, MockDatabaseClient, StatementLog};
pub use postgres::PostgresClient;
pub use types::{ResultRecord, ResultSet, SchemaColumn, SchemaDescription, Value};

use crate::config::ConnectionConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Creates a database client for the given configuration.
///
/// This is the central factory function for database connections.
pub async fn connect(config: &ConnectionConfig) -> Result<Box<dyn DatabaseClient>> {
    let client = PostgresClient::connect(config).await?;
    Ok(Box::new(client))
}

/// Trait defining the interface for database clients.
///
/// All operations are async and return Results with AskError.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Reads the catalog and returns a flat description of tables, columns,
    /// and types, ordered by table name then column position.
    async fn describe_schema(&self) -> Result<SchemaDescription>;

    /// Executes a SQL statement and returns its rows as column-keyed
    /// records, in cursor order.
    async fn execute_query(&self, sql: &str) -> Result<ResultSet>;

    /// Closes the database connection.
    async fn close(&self) -> Result<()>;
}
