//! Tests for metrics emitted by the service and generator.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

mod common;

use std::sync::Arc;

use common::{ScriptedCompletion, StaticModeration};
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use mythweaver::telemetry;
use mythweaver::{MythService, ScenarioRequest};

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Counter value for `name` with label `label=value`.
fn counter_with_label(snapshot: &SnapshotVec, name: &str, label: &str, value: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| {
            key.kind() == MetricKind::Counter
                && key.key().name() == name
                && key
                    .key()
                    .labels()
                    .any(|l| l.key() == label && l.value() == value)
        })
        .map(|(_, _, _, v)| match v {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

const SCENARIO: &str = "The bus drove past my stop without slowing down";

/// Runs async code within a local recorder scope on the multi-thread runtime.
fn record<F, T>(recorder: &DebuggingRecorder, fut: F) -> T
where
    F: std::future::Future<Output = T>,
{
    metrics::with_local_recorder(recorder, || {
        tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(fut))
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn success_then_cache_hit() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let service = MythService::builder()
        .completion(Arc::new(ScriptedCompletion::always_valid()))
        .build()
        .unwrap();

    record(&recorder, async {
        service.generate(ScenarioRequest::new(SCENARIO)).await.unwrap();
        service.generate(ScenarioRequest::new(SCENARIO)).await.unwrap();
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL), 2);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, "outcome", "success"),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, "outcome", "cached"),
        1
    );
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL), 1);
    assert!(has_histogram(&snapshot, telemetry::GENERATION_DURATION_SECONDS));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn fallback_records_retry_and_fallback() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let service = MythService::builder()
        .completion(Arc::new(ScriptedCompletion::new(vec![
            Ok("junk".into()),
            Ok("more junk".into()),
        ])))
        .build()
        .unwrap();

    record(&recorder, async {
        let myth = service.generate(ScenarioRequest::new(SCENARIO)).await.unwrap();
        assert!(myth.is_fallback());
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::RETRIES_TOTAL), 1);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::FALLBACKS_TOTAL, "stage", "parse"),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, "outcome", "degraded"),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn moderation_metrics() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let rejecting = MythService::builder()
        .completion(Arc::new(ScriptedCompletion::always_valid()))
        .moderation(Arc::new(StaticModeration::flagging()))
        .build()
        .unwrap();
    let failing_open = MythService::builder()
        .completion(Arc::new(ScriptedCompletion::always_valid()))
        .moderation(Arc::new(StaticModeration::failing()))
        .build()
        .unwrap();

    record(&recorder, async {
        assert!(rejecting.generate(ScenarioRequest::new(SCENARIO)).await.is_err());
        assert!(failing_open.generate(ScenarioRequest::new(SCENARIO)).await.is_ok());
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::MODERATION_REJECTIONS_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::MODERATION_ERRORS_TOTAL), 1);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, "outcome", "failed"),
        1
    );
}
