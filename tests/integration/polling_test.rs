// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;

use bdo_prewarm::domain::models::fetch::FetchOutcome;
use bdo_prewarm::domain::services::polling_service::PollingService;
use bdo_prewarm::utils::retry_policy::BackoffPolicy;
use serde_json::{json, Value};
use tokio::time::Instant;

use super::helpers::{ready, status, ScriptedFetcher};

const URL: &str = "http://cache.test/v1/adventurer?profileTarget=PT&region=EU";

fn poller(fetcher: &Arc<ScriptedFetcher>, base_delay_secs: u64, max_attempts: u32) -> PollingService {
    PollingService::new(
        fetcher.clone(),
        BackoffPolicy::with_base_delay(Duration::from_secs(base_delay_secs)),
        max_attempts,
    )
}

fn gaps(fetcher: &ScriptedFetcher) -> Vec<Duration> {
    fetcher
        .call_times()
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .collect()
}

/// 暂停时钟下计时器按毫秒取整，允许少量误差
fn assert_close(actual: Duration, expected: Duration) {
    let tolerance = Duration::from_millis(10);
    assert!(
        actual >= expected && actual <= expected + tolerance,
        "expected ~{:?}, got {:?}",
        expected,
        actual
    );
}

fn assert_gaps(fetcher: &ScriptedFetcher, expected: &[Duration]) {
    let actual = gaps(fetcher);
    assert_eq!(actual.len(), expected.len());
    for (gap, want) in actual.iter().zip(expected) {
        assert_close(*gap, *want);
    }
}

#[tokio::test(start_paused = true)]
async fn test_poll_returns_immediately_on_200() {
    let fetcher = Arc::new(
        ScriptedFetcher::new(status(202)).script(URL, vec![ready(json!({"familyName": "Alpha"}))]),
    );

    let start = Instant::now();
    let result = poller(&fetcher, 2, 20).poll(URL, "adventurer:1/1").await;

    assert_eq!(result, Some(json!({"familyName": "Alpha"})));
    assert_eq!(fetcher.calls().len(), 1);
    assert_close(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_poll_waits_base_delay_while_computing() {
    let fetcher = Arc::new(ScriptedFetcher::new(status(500)).script(
        URL,
        vec![status(202), status(202), status(202), ready(json!({"ok": true}))],
    ));

    let result = poller(&fetcher, 2, 10).poll(URL, "adventurer:1/1").await;

    assert_eq!(result, Some(json!({"ok": true})));
    assert_eq!(fetcher.calls().len(), 4);
    for gap in gaps(&fetcher) {
        assert!(gap >= Duration::from_secs(2), "gap {:?} shorter than base delay", gap);
    }
}

#[tokio::test(start_paused = true)]
async fn test_poll_gives_up_after_max_attempts_when_rate_limited() {
    let fetcher = Arc::new(ScriptedFetcher::new(status(429)));

    let start = Instant::now();
    let result = poller(&fetcher, 1, 4).poll(URL, "adventurer:1/1").await;

    assert_eq!(result, None);
    assert_eq!(fetcher.calls().len(), 4);
    for gap in gaps(&fetcher) {
        assert!(gap >= Duration::from_secs(5), "gap {:?} below rate limit floor", gap);
    }
    // the final attempt backs off too
    assert_close(start.elapsed(), Duration::from_secs(20));
}

#[tokio::test(start_paused = true)]
async fn test_poll_rate_limit_scales_with_large_base_delay() {
    let fetcher = Arc::new(
        ScriptedFetcher::new(status(202)).script(URL, vec![status(429), ready(Value::Null)]),
    );

    poller(&fetcher, 4, 5).poll(URL, "adventurer:1/1").await;

    assert_gaps(&fetcher, &[Duration::from_secs(8)]);
}

#[tokio::test(start_paused = true)]
async fn test_poll_backs_off_on_server_faults_and_transport_failures() {
    let fetcher = Arc::new(ScriptedFetcher::new(status(202)).script(
        URL,
        vec![
            FetchOutcome::transport_failure(),
            status(500),
            status(503),
            ready(json!([])),
        ],
    ));

    let result = poller(&fetcher, 1, 10).poll(URL, "guild:Mythic").await;

    assert_eq!(result, Some(json!([])));
    assert_gaps(&fetcher, &[Duration::from_secs(10); 3]);
}

#[tokio::test(start_paused = true)]
async fn test_poll_server_fault_scales_with_large_base_delay() {
    let fetcher = Arc::new(
        ScriptedFetcher::new(status(202)).script(URL, vec![status(503), ready(Value::Null)]),
    );

    poller(&fetcher, 3, 5).poll(URL, "adventurer:1/1").await;

    assert_gaps(&fetcher, &[Duration::from_secs(15)]);
}

#[tokio::test(start_paused = true)]
async fn test_poll_retries_unexpected_status_with_base_delay() {
    let fetcher = Arc::new(ScriptedFetcher::new(FetchOutcome::from_payload(
        404,
        "profile not found".to_string(),
    )));

    let result = poller(&fetcher, 2, 3).poll(URL, "adventurer:1/1").await;

    assert_eq!(result, None);
    assert_eq!(fetcher.calls().len(), 3);
    assert_gaps(&fetcher, &[Duration::from_secs(2); 2]);
}

#[tokio::test(start_paused = true)]
async fn test_poll_succeeds_on_final_attempt() {
    let fetcher = Arc::new(ScriptedFetcher::new(status(202)).script(
        URL,
        vec![status(202), status(429), ready(json!({"done": 1}))],
    ));

    let result = poller(&fetcher, 1, 3).poll(URL, "adventurer:1/1").await;

    assert_eq!(result, Some(json!({"done": 1})));
    assert_eq!(fetcher.calls().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_poll_ready_without_body_is_absent() {
    let fetcher = Arc::new(ScriptedFetcher::new(status(200)));

    let start = Instant::now();
    let result = poller(&fetcher, 1, 3).poll(URL, "adventurer:1/1").await;

    assert_eq!(result, None);
    assert_eq!(fetcher.calls().len(), 1);
    assert_close(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_poll_ready_with_unparseable_body_stops_polling() {
    let fetcher = Arc::new(ScriptedFetcher::new(status(202)).script(
        URL,
        vec![FetchOutcome::from_payload(200, "<html>oops</html>".to_string())],
    ));

    let result = poller(&fetcher, 1, 3).poll(URL, "adventurer:1/1").await;

    assert_eq!(result, None);
    assert_eq!(fetcher.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_poll_sleeps_after_final_failed_attempt() {
    let fetcher = Arc::new(ScriptedFetcher::new(status(503)));

    let start = Instant::now();
    let result = poller(&fetcher, 1, 2).poll(URL, "guild:Mythic").await;

    assert_eq!(result, None);
    assert_gaps(&fetcher, &[Duration::from_secs(10)]);
    assert_close(start.elapsed(), Duration::from_secs(20));
}

#[tokio::test(start_paused = true)]
async fn test_poll_with_zero_attempts_never_fetches() {
    let fetcher = Arc::new(ScriptedFetcher::new(status(200)));

    let result = poller(&fetcher, 1, 0).poll(URL, "adventurer:1/1").await;

    assert_eq!(result, None);
    assert!(fetcher.calls().is_empty());
}
