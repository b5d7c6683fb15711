// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    detail_url, enumerator, filter_settings, listing_html, FakeSurface, RecordingGateway,
};
use listwatch::application::use_cases::watch_use_case::{PipelineError, WatchUseCase};
use listwatch::config::settings::RunMode;
use listwatch::domain::repositories::storage_repository::{SeenRepository, SnapshotRepository};
use listwatch::domain::services::blocklist::BlockedDomainFilter;
use listwatch::domain::services::identity::IdentityHasher;
use listwatch::domain::services::notification_service::NotificationDispatcher;
use listwatch::infrastructure::storage::{FileSeenStore, FileSnapshotStore, InMemoryStore};
use std::sync::Arc;
use tempfile::TempDir;

fn board(items: &[(&str, &str)]) -> FakeSurface {
    FakeSurface::new()
        .with_axes(&["2025"], &["art", "music"])
        .with_page("2025", "art", listing_html(items))
        .with_page("2025", "music", listing_html(&items[..1]))
}

fn use_case(
    surface: FakeSurface,
    store: Arc<InMemoryStore>,
    gateway: Arc<RecordingGateway>,
    budget: usize,
) -> WatchUseCase {
    WatchUseCase::new(
        Box::new(enumerator(surface, filter_settings())),
        BlockedDomainFilter::new(["whalebe.com"]),
        store.clone(),
        store,
        NotificationDispatcher::new(gateway, budget),
    )
}

#[tokio::test]
async fn test_unchanged_view_yields_nothing_new() {
    let store = Arc::new(InMemoryStore::new());
    let gateway = Arc::new(RecordingGateway::new());
    let items = [("1", "First"), ("2", "Second")];

    let report = use_case(board(&items), store.clone(), gateway.clone(), 4000)
        .run(RunMode::Sweep)
        .await
        .unwrap();
    // item 1 appears under both categories
    assert_eq!(report.extracted, 3);
    assert_eq!(report.new, 2);
    assert_eq!(report.delivered, 2);

    let report = use_case(board(&items), store.clone(), gateway.clone(), 4000)
        .run(RunMode::Sweep)
        .await
        .unwrap();
    assert_eq!(report.new, 0);
    assert_eq!(gateway.messages().len(), 1);
}

#[tokio::test]
async fn test_seen_set_only_grows() {
    let store = Arc::new(InMemoryStore::new());
    let gateway = Arc::new(RecordingGateway::new());

    use_case(board(&[("1", "First")]), store.clone(), gateway.clone(), 4000)
        .run(RunMode::Sweep)
        .await
        .unwrap();
    let before = store.load().await;

    // item 1 disappeared from the listing
    use_case(board(&[("2", "Second")]), store.clone(), gateway.clone(), 4000)
        .run(RunMode::Sweep)
        .await
        .unwrap();
    let after = store.load().await;

    assert!(before.is_subset(&after));
    assert!(after.contains(&IdentityHasher::id(&detail_url("1"))));
    assert!(after.contains(&IdentityHasher::id(&detail_url("2"))));
}

#[tokio::test]
async fn test_failed_delivery_is_retried_next_run() {
    let store = Arc::new(InMemoryStore::new());
    let gateway = Arc::new(RecordingGateway::failing_on(&[1]));
    let items = [("1", "First"), ("2", "Second")];

    let report = use_case(board(&items), store.clone(), gateway.clone(), 4000)
        .run(RunMode::Sweep)
        .await
        .unwrap();
    assert_eq!(report.new, 2);
    assert_eq!(report.delivered, 0);
    assert_eq!(report.undelivered, 2);
    assert!(store.load().await.is_empty());
    assert_eq!(store.save_count(), 0);

    gateway.heal();
    let report = use_case(board(&items), store.clone(), gateway.clone(), 4000)
        .run(RunMode::Sweep)
        .await
        .unwrap();
    assert_eq!(report.new, 2);
    assert_eq!(report.delivered, 2);
    assert_eq!(store.load().await.len(), 2);
}

#[tokio::test]
async fn test_partial_delivery_marks_only_sent_batch() {
    let store = Arc::new(InMemoryStore::new());
    // a budget this small forces one entry per message
    let gateway = Arc::new(RecordingGateway::failing_on(&[2]));
    let items = [("1", "First"), ("2", "Second"), ("3", "Third")];

    let report = use_case(board(&items), store.clone(), gateway.clone(), 150)
        .run(RunMode::Sweep)
        .await
        .unwrap();
    assert_eq!(report.new, 3);
    assert_eq!(report.delivered, 2);
    assert_eq!(report.undelivered, 1);
    assert_eq!(gateway.messages().len(), 2);

    let seen = store.load().await;
    assert_eq!(seen.len(), 2);
    // oldest-first: the third record goes out first, the second one failed
    assert!(seen.contains(&IdentityHasher::id(&detail_url("3"))));
    assert!(!seen.contains(&IdentityHasher::id(&detail_url("2"))));
}

#[tokio::test]
async fn test_fatal_source_error_persists_nothing() {
    let store = Arc::new(InMemoryStore::new());
    let gateway = Arc::new(RecordingGateway::new());
    let surface = board(&[("1", "First")]).rejecting("music");

    let result = use_case(surface, store.clone(), gateway.clone(), 4000)
        .run(RunMode::Sweep)
        .await;
    assert!(matches!(result, Err(PipelineError::Source(_))));
    assert!(gateway.messages().is_empty());
    assert_eq!(store.save_count(), 0);
    assert!(store.load_snapshot().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_blocked_domain_records_are_dropped() {
    let store = Arc::new(InMemoryStore::new());
    let gateway = Arc::new(RecordingGateway::new());
    let surface = FakeSurface::new().with_default_page(listing_html(&[("1", "First")]));

    let mut use_case = WatchUseCase::new(
        Box::new(enumerator(surface, filter_settings())),
        BlockedDomainFilter::new(["example.com"]),
        store.clone(),
        store.clone(),
        NotificationDispatcher::new(gateway.clone(), 4000),
    );
    let report = use_case.run(RunMode::Current).await.unwrap();
    assert_eq!(report.extracted, 1);
    assert_eq!(report.blocked, 1);
    assert_eq!(report.new, 0);
    assert!(gateway.messages().is_empty());
    assert!(store.load_snapshot().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_file_backed_run_survives_restart() {
    let dir = TempDir::new().unwrap();
    let seen_path = dir.path().join("seen.json");
    let gateway = Arc::new(RecordingGateway::new());
    let items = [("1", "First")];

    for expected_new in [1, 0] {
        let mut use_case = WatchUseCase::new(
            Box::new(enumerator(board(&items), filter_settings())),
            BlockedDomainFilter::default(),
            Arc::new(FileSeenStore::new(&seen_path)),
            Arc::new(FileSnapshotStore::new(dir.path().join("snapshot.json"))),
            NotificationDispatcher::new(gateway.clone(), 4000),
        );
        let report = use_case.run(RunMode::Sweep).await.unwrap();
        assert_eq!(report.new, expected_new);
    }

    let snapshot = FileSnapshotStore::new(dir.path().join("snapshot.json"))
        .load_snapshot()
        .await
        .unwrap();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot[0].category.as_deref(), Some("art"));
}
