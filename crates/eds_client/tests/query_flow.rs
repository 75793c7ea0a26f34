mod common;

use common::{sample_result, FakeBackend};
use eds_client::query::{QueryState, QuerySubmissionController};
use eds_client::DesignSession;
use eds_core::aggregate::PriorityTier;
use eds_core::config::ClientConfig;
use eds_core::error::AppError;
use pretty_assertions::assert_eq;

fn session() -> DesignSession<FakeBackend> {
    DesignSession::new(FakeBackend::new(), &ClientConfig::default())
}

#[tokio::test]
async fn blank_query_is_not_sent() {
    let mut s = session();

    assert!(s.submit_query("   ", None).await.is_none());
    assert!(s.backend().calls().is_empty());
    assert_eq!(s.query_state(), &QueryState::Idle);
}

#[tokio::test]
async fn success_produces_a_result_view() {
    let mut s = session();
    s.backend().set_query(Ok(sample_result("Use LiFSI in DME")));

    let state = s
        .submit_query("  high-voltage electrolyte ", Some("LiPF6, EC".to_string()))
        .await
        .cloned();
    assert!(matches!(state, Some(QueryState::Succeeded(_))));

    let sent = s.backend().queries();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].query, "high-voltage electrolyte");
    assert_eq!(sent[0].user_materials.as_deref(), Some("LiPF6, EC"));

    let view = s.result_view(false).expect("view");
    assert_eq!(view.summary, "Use LiFSI in DME");
    assert_eq!(view.references.total, 2);
    assert_eq!(view.references.uploaded_documents.len(), 1);
    assert_eq!(view.references.knowledge_base.len(), 1);
    let ranks: Vec<_> = view.plans.iter().map(|p| (p.rank, p.tier)).collect();
    assert_eq!(ranks, vec![(1, PriorityTier::High), (2, PriorityTier::Medium)]);
}

#[tokio::test]
async fn server_error_replaces_previous_result() {
    let mut s = session();
    s.backend().set_query(Ok(sample_result("first")));
    s.submit_query("first query", None).await;
    assert!(s.result_view(false).is_some());

    s.backend().set_query(Err(AppError::new(
        "QUERY_FAILED",
        "Query failed with HTTP status 500",
    )
    .with_http_status(500)
    .with_retryable(true)));
    s.submit_query("second query", None).await;

    let QueryState::Failed(err) = s.query_state() else {
        panic!("expected failure, got {:?}", s.query_state());
    };
    assert_eq!(err.code, "QUERY_FAILED");
    assert!(!err.message.is_empty());
    assert_eq!(err.http_status, Some(500));
    assert!(s.result_view(false).is_none());
}

#[tokio::test]
async fn in_flight_submission_blocks_another() {
    let backend = FakeBackend::new();
    backend.set_query(Ok(sample_result("only one")));
    let mut controller = QuerySubmissionController::new();

    let ticket = controller.begin("first", None).expect("accepted");
    assert!(controller.begin("second", None).is_none());

    let outcome = {
        use eds_client::Backend;
        backend.submit_query(ticket.request()).await
    };
    assert!(controller.finish(ticket, outcome));
    assert_eq!(backend.call_count("query"), 1);
    assert_eq!(
        controller.result().map(|r| r.summary.as_str()),
        Some("only one")
    );
    assert!(controller.begin("third", None).is_some());
}
