//! Cleanup of model-generated SQL.
//!
//! Models are instructed to return a bare statement, but in practice the
//! completion may arrive wrapped in a markdown code fence, padded with
//! whitespace, or terminated with a semicolon. `sanitize` strips all of
//! that. It performs no syntactic validation; the database is the only
//! gate for whether the statement is actually runnable.

/// Cleans a raw completion into an executable statement.
///
/// Steps, in order: extract the contents of the first fenced code block if
/// one is present, trim surrounding whitespace, then strip trailing `;`
/// terminators along with any whitespace before them.
///
/// Pure and total: never fails, and `sanitize(sanitize(x)) == sanitize(x)`.
/// The result has no leading or trailing whitespace and never ends with `;`.
pub fn sanitize(raw: &str) -> String {
    let text = extract_fenced(raw).unwrap_or(raw);

    let mut text = text.trim();
    while let Some(stripped) = text.strip_suffix(';') {
        text = stripped.trim_end();
    }

    text.to_string()
}

/// Extracts the contents of the first markdown code fence, if any.
///
/// Matches ```sql and bare ``` fences alike; the opening fence line (which
/// may carry a language specifier) is dropped. Returns None when the text
/// has no complete fence.
fn extract_fenced(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];

    // Skip the rest of the opening fence line (e.g. a "sql" specifier).
    let content_start = after_fence.find('\n')? + 1;
    let content = &after_fence[content_start..];

    let end = content.find("```")?;
    Some(&content[..end])
}
