use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wikisearch::session::{SearchPhase, SearchSession};

mod common;
use common::*;

#[tokio::test]
async fn test_new_session_is_idle() -> Result<()> {
    let server = MockServer::start().await;
    let session = SearchSession::new(orchestrator_for(&server));

    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, SearchPhase::Idle);
    assert_eq!(snapshot.query, None);
    assert!(snapshot.results.is_empty());
    assert!(!snapshot.is_loading);
    Ok(())
}

#[tokio::test]
async fn test_blank_submission_makes_no_request() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let session = SearchSession::new(orchestrator_for(&server));
    assert!(session.submit("").await.is_none());
    assert!(session.submit("  \t ").await.is_none());
    assert_eq!(session.phase(), SearchPhase::Idle);
    Ok(())
}

#[tokio::test]
async fn test_submission_populates_results() -> Result<()> {
    let server = MockServer::start().await;
    mount_cat_scenario(&server).await;
    let session = SearchSession::new(orchestrator_for(&server));

    let snapshot = session.submit("Cat").await.expect("submission should publish");
    assert_eq!(snapshot.phase, SearchPhase::Populated);
    assert_eq!(snapshot.query.as_deref(), Some("Cat"));
    assert!(!snapshot.is_loading);
    assert_eq!(
        snapshot.results.iter().map(|r| r.title.as_str()).collect::<Vec<_>>(),
        vec!["Cat", "Caterpillar"]
    );
    assert_eq!(session.snapshot(), snapshot);
    Ok(())
}

#[tokio::test]
async fn test_blank_submission_keeps_previous_results() -> Result<()> {
    let server = MockServer::start().await;
    mount_cat_scenario(&server).await;
    let session = SearchSession::new(orchestrator_for(&server));

    let before = session.submit("Cat").await.expect("submission should publish");
    assert!(session.submit("   ").await.is_none());
    assert_eq!(session.snapshot(), before);
    Ok(())
}

#[tokio::test]
async fn test_new_query_replaces_results() -> Result<()> {
    let server = MockServer::start().await;
    mount_cat_scenario(&server).await;
    mount_opensearch(&server, "qwxzzy", &[]).await;
    let session = SearchSession::new(orchestrator_for(&server));

    session.submit("Cat").await.expect("submission should publish");
    let snapshot = session.submit("qwxzzy").await.expect("submission should publish");

    assert_eq!(snapshot.phase, SearchPhase::Empty);
    assert_eq!(snapshot.query.as_deref(), Some("qwxzzy"));
    assert!(snapshot.results.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_lookup_failure_ends_empty() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(query_param("action", "opensearch"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let session = SearchSession::new(orchestrator_for(&server));

    let snapshot = session.submit("Cat").await.expect("submission should publish");
    assert_eq!(snapshot.phase, SearchPhase::Empty);
    assert!(snapshot.results.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_loading_while_in_flight() -> Result<()> {
    let server = MockServer::start().await;
    mount_opensearch_delayed(&server, "Slow", &["Slow"], Duration::from_millis(300)).await;
    mount_pageimages(&server, &[("Slow", None)]).await;
    let session = Arc::new(SearchSession::new(orchestrator_for(&server)));

    let pending = {
        let session = session.clone();
        tokio::spawn(async move { session.submit("Slow").await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(session.is_loading());
    assert!(session.snapshot().is_loading);

    let snapshot = pending.await?.expect("submission should publish");
    assert_eq!(snapshot.phase, SearchPhase::Populated);
    assert!(!session.is_loading());
    Ok(())
}

#[tokio::test]
async fn test_latest_submission_wins() -> Result<()> {
    let server = MockServer::start().await;
    mount_opensearch_delayed(&server, "Slow", &["Slow"], Duration::from_millis(500)).await;
    mount_opensearch(&server, "Fast", &["Fast", "Faster"]).await;
    mount_pageimages(&server, &[]).await;
    let session = Arc::new(SearchSession::new(orchestrator_for(&server)));

    let first = {
        let session = session.clone();
        tokio::spawn(async move { session.submit("Slow").await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let second = session.submit("Fast").await.expect("latest submission should publish");
    assert_eq!(second.query.as_deref(), Some("Fast"));
    assert_eq!(second.results.len(), 2);

    assert!(first.await?.is_none(), "superseded submission must not publish");
    let snapshot = session.snapshot();
    assert_eq!(snapshot.query.as_deref(), Some("Fast"));
    assert_eq!(snapshot.results[0].title, "Fast");
    Ok(())
}

#[tokio::test]
async fn test_abandoned_submission_leaves_loading() -> Result<()> {
    let server = MockServer::start().await;
    mount_opensearch_delayed(&server, "Slow", &["Slow"], Duration::from_millis(500)).await;
    let session = SearchSession::new(orchestrator_for(&server));

    let timed_out = tokio::time::timeout(Duration::from_millis(50), session.submit("Slow")).await;
    assert!(timed_out.is_err());

    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, SearchPhase::Empty);
    assert!(!snapshot.is_loading);
    assert!(snapshot.results.is_empty());
    Ok(())
}
