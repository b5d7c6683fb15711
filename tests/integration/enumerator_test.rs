// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    detail_url, enumerator, enumerator_with_settle, filter_settings, listing_html, FakeSurface,
    INNER, OUTER, TOGGLES,
};
use listwatch::config::settings::FilterSettings;
use listwatch::engines::filter_enumerator::SweepState;
use listwatch::engines::traits::{EngineError, EnumerateError, RecordSource, SourceError};
use std::time::Duration;
use tokio::time::Instant;

fn two_by_three() -> FakeSurface {
    let mut surface = FakeSurface::new().with_axes(&["A", "B"], &["X", "Y", "Z"]);
    for outer in ["A", "B"] {
        for inner in ["X", "Y", "Z"] {
            let id = format!("{}{}", outer, inner);
            surface = surface.with_page(outer, inner, listing_html(&[(&id, &id)]));
        }
    }
    surface
}

#[tokio::test]
async fn test_cross_product_runs_outer_major() {
    let surface = two_by_three();
    let calls = surface.calls();
    let mut enumerator = enumerator(surface, filter_settings());

    let batch = enumerator.iter_all_terms().await.unwrap();

    assert_eq!(batch.passes, 6);
    assert_eq!(batch.failed_passes, 0);
    let tags: Vec<_> = batch
        .records
        .iter()
        .map(|r| {
            format!(
                "{}/{}",
                r.term.as_deref().unwrap(),
                r.category.as_deref().unwrap()
            )
        })
        .collect();
    assert_eq!(tags, vec!["A/X", "A/Y", "A/Z", "B/X", "B/Y", "B/Z"]);
    assert_eq!(batch.records[4].url, detail_url("BY"));

    let calls = calls.lock().unwrap().clone();
    assert_eq!(calls[0], "open https://example.com/list");
    assert_eq!(calls[1], format!("clear {}", TOGGLES));
    assert_eq!(calls[2], format!("select {}=A", OUTER));
    assert_eq!(calls[3], format!("select {}=X", INNER));
    assert_eq!(calls[4], "extract A/X");
    assert_eq!(calls.iter().filter(|c| c.starts_with("extract")).count(), 6);
}

#[tokio::test]
async fn test_cursor_reports_each_pass() {
    let mut enumerator = enumerator(two_by_three(), filter_settings());
    let mut sweep = enumerator.enumerate().await.unwrap();
    assert_eq!(sweep.total_passes(), 6);
    assert_eq!(sweep.state(), SweepState::SelectOuter { outer: 0, inner: 0 });

    let first = sweep.next_pass().await.unwrap().unwrap();
    assert_eq!(first.context.to_string(), "A/X");
    assert_eq!(first.outcome.unwrap().len(), 1);
    assert_eq!(sweep.state(), SweepState::SelectOuter { outer: 0, inner: 1 });

    let mut remaining = 0;
    while sweep.next_pass().await.unwrap().is_some() {
        remaining += 1;
    }
    assert_eq!(remaining, 5);
    assert_eq!(sweep.state(), SweepState::Done);
    assert!(sweep.next_pass().await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_pass_does_not_stop_sweep() {
    // A/Y has no listing container
    let surface = two_by_three().with_page("A", "Y", "<html><body></body></html>".to_string());
    let mut enumerator = enumerator(surface, filter_settings());

    let batch = enumerator.iter_all_terms().await.unwrap();
    assert_eq!(batch.passes, 6);
    assert_eq!(batch.failed_passes, 1);
    assert_eq!(batch.records.len(), 5);
}

#[tokio::test]
async fn test_selection_failure_aborts_sweep() {
    let surface = two_by_three().rejecting("B");
    let calls = surface.calls();
    let mut enumerator = enumerator(surface, filter_settings());

    let result = enumerator.iter_all_terms().await;
    match result {
        Err(SourceError::Enumerate(EnumerateError::AxisSelection { axis, value, .. })) => {
            assert_eq!(axis, "outer");
            assert_eq!(value, "B");
        }
        other => panic!("expected selection failure, got {:?}", other.map(|b| b.passes)),
    }
    let extracts = calls
        .lock()
        .unwrap()
        .iter()
        .filter(|c| c.starts_with("extract"))
        .count();
    assert_eq!(extracts, 3);
}

#[tokio::test]
async fn test_placeholder_options_are_not_visited() {
    let surface = two_by_three().with_placeholders();
    let mut enumerator = enumerator(surface, filter_settings());
    let sweep = enumerator.enumerate().await.unwrap();
    assert_eq!(sweep.outer_axis().values().to_vec(), vec!["A", "B"]);
    assert_eq!(sweep.inner_axis().values().to_vec(), vec!["X", "Y", "Z"]);
    assert_eq!(sweep.total_passes(), 6);
}

#[tokio::test]
async fn test_surface_unavailable_is_fatal() {
    let surface = two_by_three().unavailable();
    let mut enumerator = enumerator(surface, filter_settings());
    let result = enumerator.iter_all_terms().await;
    assert!(matches!(
        result,
        Err(SourceError::Enumerate(EnumerateError::Surface(
            EngineError::Browser(_)
        )))
    ));
}

#[tokio::test]
async fn test_current_view_is_single_untagged_pass() {
    let surface = two_by_three().with_default_page(listing_html(&[("1", "One"), ("2", "Two")]));
    let calls = surface.calls();
    let mut enumerator = enumerator(surface, filter_settings());

    let batch = enumerator.iter_current().await.unwrap();
    assert_eq!(batch.passes, 1);
    assert_eq!(batch.records.len(), 2);
    assert!(batch.records.iter().all(|r| r.term.is_none() && r.category.is_none()));

    // a second current-view pass reuses the open page
    enumerator.iter_current().await.unwrap();
    let calls = calls.lock().unwrap().clone();
    assert_eq!(calls.iter().filter(|c| c.starts_with("open")).count(), 1);
    assert!(!calls.iter().any(|c| c.starts_with("select")));
}

#[tokio::test]
async fn test_missing_container_fatal_in_current_view() {
    let surface = FakeSurface::new().with_default_page("<p>maintenance</p>".to_string());
    let mut enumerator = enumerator(surface, filter_settings());
    let result = enumerator.iter_current().await;
    assert!(matches!(result, Err(SourceError::Extract(_))));
}

#[tokio::test]
async fn test_no_axes_degrades_to_current_view() {
    let surface = FakeSurface::new().with_default_page(listing_html(&[("1", "One")]));
    let mut enumerator = enumerator(surface, FilterSettings::default());
    let batch = enumerator.iter_all_terms().await.unwrap();
    assert_eq!(batch.passes, 1);
    assert_eq!(batch.records.len(), 1);
}

#[tokio::test]
async fn test_single_axis_is_rejected() {
    let filters = FilterSettings {
        inner: None,
        ..filter_settings()
    };
    let mut enumerator = enumerator(two_by_three(), filters);
    let result = enumerator.iter_all_terms().await;
    assert!(matches!(
        result,
        Err(SourceError::Enumerate(EnumerateError::AxisNotConfigured(
            "inner"
        )))
    ));
}

#[tokio::test]
async fn test_padded_option_values_are_selected_verbatim() {
    let surface = FakeSurface::new()
        .with_axes(&[" A "], &["X"])
        .with_page(" A ", "X", listing_html(&[("1", "One")]));
    let calls = surface.calls();
    let mut enumerator = enumerator(surface, filter_settings());

    let batch = enumerator.iter_all_terms().await.unwrap();
    assert_eq!(batch.records.len(), 1);
    assert_eq!(batch.records[0].term.as_deref(), Some(" A "));
    assert!(calls
        .lock()
        .unwrap()
        .contains(&format!("select {}= A ", OUTER)));
}

#[tokio::test(start_paused = true)]
async fn test_each_extraction_waits_for_settle() {
    let settle = Duration::from_millis(1500);
    let surface = two_by_three();
    let times = surface.extraction_times();
    let mut enumerator = enumerator_with_settle(surface, filter_settings(), settle);

    let start = Instant::now();
    let batch = enumerator.iter_all_terms().await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(batch.passes, 6);
    let times = times.lock().unwrap().clone();
    assert_eq!(times.len(), 6);
    for (index, at) in times.iter().enumerate() {
        assert_eq!(at.duration_since(start), settle * (index as u32 + 1));
    }
    assert_eq!(elapsed, settle * 6);
}
