//! Schema and result types for askdb.
//!
//! Defines the structures used to represent the introspected catalog and the
//! rows returned by executing a generated statement.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// One (table, column, type) tuple from the database catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaColumn {
    /// Table name as reported by the catalog.
    pub table: String,

    /// Column name.
    pub column: String,

    /// Declared data type (e.g., "integer", "character varying").
    pub data_type: String,
}

impl SchemaColumn {
    /// Creates a new schema column tuple.
    pub fn new(
        table: impl Into<String>,
        column: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            data_type: data_type.into(),
        }
    }
}

/// Flat description of the database schema.
///
/// Column order is the catalog query order (table name, then column
/// position) and is never re-sorted. The description is recomputed fresh for
/// every question, so it always reflects the catalog at that moment.
#[derive(Debug, Clone, Default)]
pub struct SchemaDescription {
    /// All columns, grouped implicitly by table-then-column order.
    pub columns: Vec<SchemaColumn>,
}

#[allow(dead_code)]
impl SchemaDescription {
    /// Creates a new empty schema description.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a description from an ordered list of catalog tuples.
    pub fn from_columns(columns: Vec<SchemaColumn>) -> Self {
        Self { columns }
    }

    /// Returns true if the catalog reported no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Renders the schema as a text block for the prompt, one line per
    /// column in catalog order.
    pub fn format_for_prompt(&self) -> String {
        self.columns
            .iter()
            .map(|c| format!("Table: {}, Column: {}, Type: {}", c.table, c.column, c.data_type))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Represents a single scalar value from a database query.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    /// NULL value.
    #[default]
    Null,

    /// Boolean value.
    Bool(bool),

    /// Signed integer (up to i64).
    Int(i64),

    /// Floating point number.
    Float(f64),

    /// Text/string value.
    String(String),

    /// Binary data.
    Bytes(Vec<u8>),
}

#[allow(dead_code)]
impl Value {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Converts the value to a display string.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => s.clone(),
            Value::Bytes(b) => format!("<{} bytes>", b.len()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

/// One result row: column name → value pairs in result-descriptor order.
///
/// Serializes as a JSON object whose key order matches the statement's
/// column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultRecord {
    entries: Vec<(String, Value)>,
}

#[allow(dead_code)]
impl ResultRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record by zipping column names against positional values.
    ///
    /// Extra values beyond the column list (or vice versa) are dropped,
    /// matching a positional zip.
    pub fn from_row(columns: &[String], values: Vec<Value>) -> Self {
        Self {
            entries: columns.iter().cloned().zip(values).collect(),
        }
    }

    /// Appends a column/value pair, preserving insertion order.
    pub fn push(&mut self, column: impl Into<String>, value: Value) {
        self.entries.push((column.into(), value));
    }

    /// Looks up a value by column name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Returns the column names in insertion order.
    pub fn columns(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Returns the number of columns in the record.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the record has no columns.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over (column, value) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl Serialize for ResultRecord {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Ordered result of executing a statement, one record per returned row.
///
/// Row order is the database cursor iteration order; no re-sorting.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// Rows in cursor order.
    pub records: Vec<ResultRecord>,

    /// Time taken to execute the statement.
    pub execution_time: Duration,
}

#[allow(dead_code)]
impl ResultSet {
    /// Creates a new empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a result set from rows, with zero execution time.
    pub fn from_records(records: Vec<ResultRecord>) -> Self {
        Self {
            records,
            execution_time: Duration::ZERO,
        }
    }

    /// Sets the execution time.
    pub fn with_execution_time(mut self, duration: Duration) -> Self {
        self.execution_time = duration;
        self
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the result set has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the records in row order.
    pub fn iter(&self) -> std::slice::Iter<'_, ResultRecord> {
        self.records.iter()
    }

    /// Renders the records as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.records).unwrap_or_else(|_| "[]".to_string())
    }
}
