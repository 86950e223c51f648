//! Prompt construction for SQL generation.
//!
//! Builds the instruction prompt from the schema description and the user's
//! question. Pure string work, no I/O.

/// System instruction sent by the hosted provider alongside the prompt.
pub const SYSTEM_INSTRUCTION: &str =
    "You are a SQL expert. Convert natural language queries to SQL.";

/// Prompt template for SQL generation.
///
/// The schema text and question are embedded verbatim. The instruction block
/// is part of the pipeline contract: the model must return only the SQL
/// statement, with no explanation and no trailing semicolon.
const PROMPT_TEMPLATE: &str = r#"Given the following database schema:
{schema}

Convert this natural language query to SQL:
{question}

Return only the SQL query without any explanation or additional text.
Make sure the SQL query is valid PostgreSQL syntax.
Do not include a semicolon at the end of the query."#;

/// Builds the generation prompt from the schema text and user question.
///
/// Deterministic: identical inputs produce identical output.
pub fn build_prompt(schema_text: &str, question: &str) -> String {
    PROMPT_TEMPLATE
        .replace("{schema}", schema_text)
        .replace("{question}", question)
}
