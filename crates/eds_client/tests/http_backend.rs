//! Drives `HttpBackend` against a one-shot loopback server to pin the wire contract.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::JoinHandle;

use eds_client::query::QueryState;
use eds_client::{Backend, DesignSession, HttpBackend};
use eds_core::config::ClientConfig;
use eds_core::domain::{QueryRequest, UploadAckStatus};
use pretty_assertions::assert_eq;

/// Accepts one connection, answers it with `status`/`body` and returns the raw request.
fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let base = format!("http://{}", listener.local_addr().expect("addr"));
    let handle = std::thread::spawn(move || respond(&listener, status, body));
    (base, handle)
}

/// Like `serve_once`, but answers one connection per entry, in order.
fn serve_sequence(replies: Vec<(&'static str, &'static str)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let base = format!("http://{}", listener.local_addr().expect("addr"));
    let handle = std::thread::spawn(move || {
        replies
            .into_iter()
            .map(|(status, body)| respond(&listener, status, body))
            .collect()
    });
    (base, handle)
}

fn respond(listener: &TcpListener, status: &str, body: &str) -> String {
    let (mut stream, _) = listener.accept().expect("accept");
    let request = read_request(&mut stream);
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).expect("write");
    request
}

fn read_request(stream: &mut impl Read) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).expect("read");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf).to_string();
        let Some(head_end) = text.find("\r\n\r\n") else {
            continue;
        };
        let head = text[..head_end].to_ascii_lowercase();
        let body_len = buf.len() - (head_end + 4);
        if head.contains("transfer-encoding: chunked") {
            if text.ends_with("0\r\n\r\n") {
                break;
            }
            continue;
        }
        let expected = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if body_len >= expected {
            break;
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

#[tokio::test]
async fn query_posts_json_and_decodes_result() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{"query":"q","summary":"done","processing_time":1.25,"agent_responses":[],"experiment_plans":[]}"#,
    );
    let backend = HttpBackend::new(&base).expect("backend");

    let result = backend
        .submit_query(&QueryRequest::new("q", Some("LiTFSI".to_string())))
        .await
        .expect("result");

    let request = server.join().expect("server");
    assert!(request.starts_with("POST /api/query HTTP/1.1"));
    assert!(request.contains(r#""user_materials":"LiTFSI""#));
    assert_eq!(result.summary, "done");
    assert_eq!(result.processing_time_seconds, 1.25);
}

#[tokio::test]
async fn upload_sends_single_file_field() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{"status":"uploaded","filename":"cell.pdf","file_type":".pdf","file_size":3}"#,
    );
    let backend = HttpBackend::new(&base).expect("backend");

    let ack = backend.upload("cell.pdf", b"pdf").await.expect("ack");

    let request = server.join().expect("server");
    assert!(request.starts_with("POST /api/upload HTTP/1.1"));
    assert!(request.contains(r#"name="file"; filename="cell.pdf""#));
    assert_eq!(ack.status, UploadAckStatus::Uploaded);
    assert_eq!(ack.file_size, 3);
}

#[tokio::test]
async fn remove_encodes_filename_and_reports_not_found() {
    let (base, server) = serve_once("404 Not Found", r#"{"detail":"File not found in pending queue"}"#);
    let backend = HttpBackend::new(&base).expect("backend");

    let err = backend
        .remove_pending("my notes.pdf")
        .await
        .expect_err("not found");

    let request = server.join().expect("server");
    assert!(request.starts_with("DELETE /api/documents/pending/my%20notes.pdf HTTP/1.1"));
    assert_eq!(err.code, "DOCUMENTS_REMOVE_FAILED");
    assert!(err.is_not_found());
    assert_eq!(err.details.as_deref(), Some("File not found in pending queue"));
    assert!(!err.retryable);
}

#[tokio::test]
async fn server_error_is_retryable_and_carries_detail() {
    let (base, server) = serve_once("500 Internal Server Error", r#"{"detail":"vector store offline"}"#);
    let backend = HttpBackend::new(&base).expect("backend");

    let err = backend.index_pending().await.expect_err("failed");

    server.join().expect("server");
    assert_eq!(err.code, "INDEX_FAILED");
    assert_eq!(err.message, "Indexing failed with HTTP status 500");
    assert_eq!(err.http_status, Some(500));
    assert!(err.retryable);
    assert_eq!(err.details.as_deref(), Some("vector store offline"));
}

#[tokio::test]
async fn unreachable_backend_is_a_retryable_error() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let base = format!("http://{}", listener.local_addr().expect("addr"));
    drop(listener);
    let backend = HttpBackend::new(&base).expect("backend");

    let err = backend.document_count().await.expect_err("unreachable");

    assert_eq!(err.code, "DOCUMENTS_COUNT_FAILED");
    assert!(err.retryable);
    assert_eq!(err.http_status, None);
}

#[tokio::test]
async fn malformed_query_body_is_a_query_failure() {
    let (base, server) = serve_once("200 OK", "not json");
    let backend = HttpBackend::new(&base).expect("backend");

    let err = backend
        .submit_query(&QueryRequest::new("q", None))
        .await
        .expect_err("undecodable");

    server.join().expect("server");
    assert_eq!(err.code, "QUERY_FAILED");
    assert_eq!(err.message, "Failed to decode query response");
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn undecodable_answer_fails_the_session_and_clears_the_last_result() {
    let (base, server) = serve_sequence(vec![
        (
            "200 OK",
            r#"{"query":"first","summary":"done","processing_time":0.5,"agent_responses":[],"experiment_plans":[]}"#,
        ),
        ("200 OK", r#"{"summary": 42"#),
    ]);
    let backend = HttpBackend::new(&base).expect("backend");
    let mut session = DesignSession::new(backend, &ClientConfig::default());

    session.submit_query("first", None).await;
    assert_eq!(session.result_view(false).map(|v| v.summary), Some("done".to_string()));

    session.submit_query("second", None).await;

    let requests = server.join().expect("server");
    assert_eq!(requests.len(), 2);
    assert!(requests[1].contains(r#""query":"second""#));
    let QueryState::Failed(err) = session.query_state() else {
        panic!("expected failure, got {:?}", session.query_state());
    };
    assert_eq!(err.code, "QUERY_FAILED");
    assert!(session.result_view(false).is_none());
}

#[tokio::test]
async fn clear_deletes_the_document_collection() {
    let (base, server) = serve_once("200 OK", r#"{"status":"cleared"}"#);
    let backend = HttpBackend::new(&base).expect("backend");

    backend.clear_documents().await.expect("cleared");

    let request = server.join().expect("server");
    assert!(request.starts_with("DELETE /api/documents HTTP/1.1"));
}

#[tokio::test]
async fn clear_failure_is_reported_with_its_own_code() {
    let (base, server) = serve_once("500 Internal Server Error", r#"{"detail":"store locked"}"#);
    let backend = HttpBackend::new(&base).expect("backend");

    let err = backend.clear_documents().await.expect_err("failed");

    server.join().expect("server");
    assert_eq!(err.code, "DOCUMENTS_CLEAR_FAILED");
    assert_eq!(err.http_status, Some(500));
    assert_eq!(err.details.as_deref(), Some("store locked"));
}

#[tokio::test]
async fn search_posts_query_and_decodes_hits() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{"query":"LiFSI","results":[{"content":"LiFSI in DME","source":"cell.pdf","score":0.91},{"content":null,"source":"kb"}],"count":2}"#,
    );
    let backend = HttpBackend::new(&base).expect("backend");

    let found = backend
        .search(&QueryRequest::new("LiFSI", None))
        .await
        .expect("hits");

    let request = server.join().expect("server");
    assert!(request.starts_with("POST /api/search HTTP/1.1"));
    assert!(request.contains(r#""query":"LiFSI""#));
    assert_eq!(found.count, 2);
    assert_eq!(found.results[0].source, "cell.pdf");
    assert_eq!(found.results[0].score, Some(0.91));
    assert_eq!(found.results[1].content, "");
    assert_eq!(found.results[1].score, None);
}
