//! Integration tests for the ask pipeline.
//!
//! These drive the public library surface against the mock database and
//! mock completion clients, plus a throwaway local HTTP listener for the
//! Ollama wire contract. No external services required.

use askdb::db::{
    FailingDatabaseClient, MockDatabaseClient, SchemaColumn, SchemaDescription, Value,
};
use askdb::error::AskError;
use askdb::llm::{
    build_prompt, sanitize, CompletionClient, MockCompletionClient, OllamaClient, OllamaConfig,
};
use askdb::session::Session;

use pretty_assertions::assert_eq;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

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
                vec![Value::from("Carol"), Value::Int(52000)],
            ],
        )
}

#[tokio::test]
async fn end_to_end_employees_scenario() {
    let db = employees_db();
    let log = db.statement_log();
    let llm = MockCompletionClient::new()
        .with_fixed_response("SELECT * FROM EMPLOYEES WHERE SALARY > 50000;");

    let mut session = Session::with_clients(Box::new(db), Box::new(llm));
    let results = session
        .ask("Show employees with salary greater than 50000")
        .await
        .unwrap();

    // The trailing terminator is dropped before execution.
    assert_eq!(
        log.last().unwrap(),
        "SELECT * FROM EMPLOYEES WHERE SALARY > 50000"
    );

    // Every record carries the statement's columns, in descriptor order.
    assert_eq!(results.len(), 3);
    for record in results.iter() {
        assert_eq!(record.columns(), vec!["NAME", "SALARY"]);
    }
    assert_eq!(results.records[0].get("NAME"), Some(&Value::from("Alice")));
    assert_eq!(results.records[0].get("SALARY"), Some(&Value::Int(60000)));
}

#[tokio::test]
async fn prompt_contains_schema_and_question_from_pipeline_inputs() {
    let schema = employees_schema();
    let schema_text = schema.format_for_prompt();
    let question = "Show employees with salary greater than 50000";

    let prompt = build_prompt(&schema_text, question);

    assert!(prompt.contains("Table: EMPLOYEES, Column: NAME, Type: VARCHAR2"));
    assert!(prompt.contains("Table: EMPLOYEES, Column: SALARY, Type: NUMBER"));
    assert!(prompt.contains(question));
}

#[tokio::test]
async fn session_reuse_without_reconnecting() {
    let db = employees_db();
    let llm = MockCompletionClient::new().with_fixed_response("SELECT * FROM EMPLOYEES;");

    let mut session = Session::with_clients(Box::new(db), Box::new(llm));

    let first = session.ask("show all employees").await.unwrap();
    assert_eq!(first.len(), 3);
    assert!(session.is_connected());

    let second = session.ask("show them again").await.unwrap();
    assert_eq!(second.len(), 3);
    assert!(session.is_connected());
}

#[tokio::test]
async fn ask_after_close_fails_cleanly() {
    let db = employees_db();
    let llm = MockCompletionClient::new();

    let mut session = Session::with_clients(Box::new(db), Box::new(llm));
    session.close().await.unwrap();
    session.close().await.unwrap(); // idempotent

    let result = session.ask("anything").await;
    match result {
        Err(AskError::Connection(msg)) => assert!(msg.contains("closed")),
        other => panic!("expected Connection error, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_execution_releases_cursor_and_keeps_session() {
    let db = employees_db().with_execution_error("ERROR: syntax error at or near \"SELEC\"");
    let probe = db.cursor_probe();
    let llm = MockCompletionClient::new().with_fixed_response("SELEC * FROM EMPLOYEES;");

    let mut session = Session::with_clients(Box::new(db), Box::new(llm));
    let result = session.ask("broken question").await;

    let err = result.unwrap_err();
    assert!(matches!(err, AskError::Execution(_)));
    assert!(err.to_string().contains("syntax error"));

    // Two cursors were opened (catalog read + execution); none leaked.
    assert_eq!(probe.acquired(), 2);
    assert_eq!(probe.open(), 0);
    assert!(session.is_connected());
}

#[tokio::test]
async fn failing_database_releases_cursor_on_schema_read() {
    let db = FailingDatabaseClient::new();
    let probe = db.cursor_probe();
    let llm = MockCompletionClient::new();

    let mut session = Session::with_clients(Box::new(db), Box::new(llm));
    let result = session.ask("question").await;

    assert!(matches!(result, Err(AskError::SchemaRead(_))));
    assert_eq!(probe.acquired(), 1);
    assert_eq!(probe.open(), 0);
}

#[tokio::test]
async fn empty_catalog_yields_empty_schema_not_error() {
    let db = MockDatabaseClient::new(); // empty schema, no rows
    let llm = MockCompletionClient::new().with_fixed_response("SELECT 1;");

    let mut session = Session::with_clients(Box::new(db), Box::new(llm));
    let results = session.ask("anything").await.unwrap();

    // Zero rows is an empty sequence, not an error.
    assert!(results.is_empty());
}

#[tokio::test]
async fn sanitizer_properties_hold_through_pipeline_shapes() {
    let completions = [
        "SELECT * FROM EMPLOYEES WHERE SALARY > 50000;",
        "  SELECT 1  ",
        "```sql\nSELECT name FROM employees;\n```",
        "SELECT 1",
    ];

    for raw in completions {
        let clean = sanitize(raw);
        assert!(!clean.ends_with(';'));
        assert_eq!(clean, clean.trim());
        assert_eq!(sanitize(&clean), clean);
    }
}

/// Serves exactly one HTTP response on a local port, then exits.
async fn serve_one(listener: TcpListener, status_line: &'static str, body: &'static str) {
    let (mut stream, _) = listener.accept().await.unwrap();

    // Drain the request headers; content is irrelevant to the canned reply.
    let mut buf = [0u8; 4096];
    let _ = stream.read(&mut buf).await;

    let response = format!(
        "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).await.unwrap();
    stream.shutdown().await.unwrap();
}

#[tokio::test]
async fn ollama_client_reads_response_field() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(serve_one(
        listener,
        "HTTP/1.1 200 OK",
        r#"{"model":"llama3.2:latest","response":"SELECT * FROM EMPLOYEES;","done":true}"#,
    ));

    let client = OllamaClient::new(
        OllamaConfig::new("llama3.2:latest")
            .with_url(format!("http://{addr}"))
            .with_timeout(5),
    )
    .unwrap();

    let text = client.complete("show employees").await.unwrap();
    assert_eq!(text, "SELECT * FROM EMPLOYEES;");

    server.await.unwrap();
}

#[tokio::test]
async fn ollama_non_success_status_is_provider_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(serve_one(
        listener,
        "HTTP/1.1 500 Internal Server Error",
        r#"{"error":"model not loaded"}"#,
    ));

    let client = OllamaClient::new(
        OllamaConfig::new("llama3.2:latest")
            .with_url(format!("http://{addr}"))
            .with_timeout(5),
    )
    .unwrap();

    let result = client.complete("show employees").await;
    match result {
        Err(AskError::Provider(msg)) => {
            assert!(msg.contains("500"));
            assert!(msg.contains("model not loaded"));
        }
        other => panic!("expected Provider error, got {other:?}"),
    }

    server.await.unwrap();
}

#[tokio::test]
async fn ollama_connection_refused_is_provider_unavailable() {
    // Bind then drop to find a port nothing is listening on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = OllamaClient::new(
        OllamaConfig::new("llama3.2:latest")
            .with_url(format!("http://{addr}"))
            .with_timeout(5),
    )
    .unwrap();

    let result = client.complete("show employees").await;
    assert!(matches!(result, Err(AskError::ProviderUnavailable(_))));
}

#[tokio::test]
async fn ollama_malformed_payload_is_provider_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(serve_one(listener, "HTTP/1.1 200 OK", r#"{"done":true}"#));

    let client = OllamaClient::new(
        OllamaConfig::new("llama3.2:latest")
            .with_url(format!("http://{addr}"))
            .with_timeout(5),
    )
    .unwrap();

    let result = client.complete("show employees").await;
    assert!(matches!(result, Err(AskError::Provider(_))));

    server.await.unwrap();
}

#[tokio::test]
async fn both_provider_variants_share_the_completion_contract() {
    // Any CompletionClient must fit in the same box the session consumes.
    let clients: Vec<Box<dyn CompletionClient>> = vec![
        Box::new(MockCompletionClient::new().with_fixed_response("SELECT 1;")),
        Box::new(
            OllamaClient::new(OllamaConfig::new("llama3.2:latest").with_timeout(1)).unwrap(),
        ),
    ];

    // Only the mock is actually invoked; the point is the shared trait object.
    let response = clients[0].complete("question").await.unwrap();
    assert_eq!(response, "SELECT 1;");
}

#[tokio::test]
async fn mutating_statement_executes_as_is() {
    let db = employees_db();
    let log = db.statement_log();
    let llm = MockCompletionClient::new()
        .with_fixed_response("DELETE FROM EMPLOYEES WHERE SALARY < 10000;");

    let mut session = Session::with_clients(Box::new(db), Box::new(llm));
    session.ask("clean up underpaid rows").await.unwrap();

    // No guard rail: the statement reaches the database verbatim
    // (minus the terminator).
    assert_eq!(
        log.last().unwrap(),
        "DELETE FROM EMPLOYEES WHERE SALARY < 10000"
    );
}
