// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;

use bdo_prewarm::domain::models::proxy::{ProbeOutcome, ProxyRunStatus, RejectReason};
use bdo_prewarm::domain::repositories::list_sink::ListSink;
use bdo_prewarm::domain::services::proxy_filter_service::{ProxyFilterConfig, ProxyFilterService};
use bdo_prewarm::infrastructure::storage::InMemoryStorage;
use tokio::time::Instant;

use super::helpers::{strings, CountingProbe, StaticSource};

const SOURCE_URL: &str = "http://lists.test/https.txt";
const OUTPUT: &str = "working_proxies.txt";

fn service(probe: &Arc<CountingProbe>, sink: &InMemoryStorage, limit: usize) -> ProxyFilterService {
    let config = ProxyFilterConfig {
        limit,
        throttle: Duration::from_millis(200),
        output_name: OUTPUT.to_string(),
    };
    ProxyFilterService::new(probe.clone(), Arc::new(sink.clone()), config)
}

#[tokio::test(start_paused = true)]
async fn test_limit_bounds_probes_regardless_of_verdicts() {
    let probe = Arc::new(CountingProbe::new(&[
        ("1.1.1.1:80", ProbeOutcome::Usable),
        ("2.2.2.2:80", ProbeOutcome::Rejected(RejectReason::Status(403))),
    ]));
    let sink = InMemoryStorage::new();
    let candidates = strings(&["1.1.1.1:80", "2.2.2.2:80", "3.3.3.3:80", "4.4.4.4:80", "5.5.5.5:80"]);

    let report = service(&probe, &sink, 3).filter(&candidates).await.unwrap();

    assert_eq!(probe.calls(), strings(&["1.1.1.1:80", "2.2.2.2:80", "3.3.3.3:80"]));
    assert_eq!(report.tested, 3);
    assert_eq!(report.candidates, 5);
    assert_eq!(report.survivors, strings(&["1.1.1.1:80"]));
    assert_eq!(report.status, ProxyRunStatus::Survivors(1));
    assert_eq!(report.status.exit_code(), 0);
    assert_eq!(sink.load(OUTPUT).await.unwrap(), Some(strings(&["1.1.1.1:80"])));
}

#[tokio::test(start_paused = true)]
async fn test_limit_reached_even_when_all_fail() {
    let probe = Arc::new(CountingProbe::new(&[]));
    let sink = InMemoryStorage::new();
    let candidates = strings(&["a:1", "b:2", "c:3", "d:4", "e:5"]);

    let report = service(&probe, &sink, 3).filter(&candidates).await.unwrap();

    assert_eq!(probe.calls().len(), 3);
    assert_eq!(report.status, ProxyRunStatus::NoSurvivors);
    assert_eq!(report.status.exit_code(), 2);
    assert!(sink.names().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_survivors_keep_source_order() {
    let probe = Arc::new(CountingProbe::new(&[
        ("c:3", ProbeOutcome::Usable),
        ("a:1", ProbeOutcome::Usable),
        ("b:2", ProbeOutcome::Rejected(RejectReason::BlockPage("<iframe"))),
    ]));
    let sink = InMemoryStorage::new();

    let report = service(&probe, &sink, 50)
        .filter(&strings(&["c:3", "b:2", "a:1"]))
        .await
        .unwrap();

    assert_eq!(report.survivors, strings(&["c:3", "a:1"]));
    assert_eq!(sink.load(OUTPUT).await.unwrap(), Some(strings(&["c:3", "a:1"])));
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_candidates_are_probed_independently() {
    let probe = Arc::new(CountingProbe::new(&[("a:1", ProbeOutcome::Usable)]));
    let sink = InMemoryStorage::new();

    let report = service(&probe, &sink, 50)
        .filter(&strings(&["a:1", "a:1"]))
        .await
        .unwrap();

    assert_eq!(probe.calls().len(), 2);
    assert_eq!(report.survivors, strings(&["a:1", "a:1"]));
}

#[tokio::test(start_paused = true)]
async fn test_empty_source_aborts_before_probing() {
    let probe = Arc::new(CountingProbe::new(&[]));
    let sink = InMemoryStorage::new();

    let report = service(&probe, &sink, 3)
        .run(&StaticSource(Ok(Vec::new())), SOURCE_URL)
        .await
        .unwrap();

    assert_eq!(report.status, ProxyRunStatus::NoCandidates);
    assert_eq!(report.status.exit_code(), 1);
    assert!(probe.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_unavailable_source_aborts_before_probing() {
    let probe = Arc::new(CountingProbe::new(&[]));
    let sink = InMemoryStorage::new();

    let report = service(&probe, &sink, 3)
        .run(&StaticSource(Err(404)), SOURCE_URL)
        .await
        .unwrap();

    assert_eq!(report.status, ProxyRunStatus::SourceUnavailable);
    assert_eq!(report.status.exit_code(), 3);
    assert!(probe.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_run_fetches_then_filters() {
    let probe = Arc::new(CountingProbe::new(&[("b:2", ProbeOutcome::Usable)]));
    let sink = InMemoryStorage::new();

    let report = service(&probe, &sink, 2)
        .run(&StaticSource(Ok(strings(&["a:1", "b:2", "c:3"]))), SOURCE_URL)
        .await
        .unwrap();

    assert_eq!(probe.calls(), strings(&["a:1", "b:2"]));
    assert_eq!(report.status, ProxyRunStatus::Survivors(1));
}

#[tokio::test(start_paused = true)]
async fn test_throttle_between_probes() {
    let probe = Arc::new(CountingProbe::new(&[]));
    let sink = InMemoryStorage::new();

    let start = Instant::now();
    service(&probe, &sink, 3)
        .filter(&strings(&["a:1", "b:2", "c:3"]))
        .await
        .unwrap();
    let elapsed = start.elapsed();

    assert!(elapsed >= Duration::from_millis(600), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(700), "elapsed {:?}", elapsed);
}
