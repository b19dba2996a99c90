//! Full runs through the scheduler against a fake API.

mod support;

use std::sync::Arc;
use std::time::Duration;

use cube_client::ApiClient;
use cube_model::{CubeOutcome, RunResult};
use cube_validate::{EngineError, RunConfig, RunSettings, Scheduler, run_with_transport};

use support::{FakeApi, Reply, catalog};

fn settings(concurrency_limit: usize, filter: Option<&[&str]>, fail_fast: bool) -> RunSettings {
    RunSettings {
        concurrency_limit,
        cube_filter: filter.map(|names| names.iter().map(|n| n.to_string()).collect()),
        fail_fast,
    }
}

fn abc_catalog() -> serde_json::Value {
    catalog(&[
        ("A", &["A.count"], &["A.x"]),
        ("B", &["B.count"], &["B.x", "B.y"]),
        ("C", &["C.count"], &["C.x"]),
    ])
}

async fn run(api: &Arc<FakeApi>, settings: RunSettings) -> Result<RunResult, EngineError> {
    let client = ApiClient::with_transport(Arc::clone(api), "http://api", "token")?;
    Scheduler::new(client, settings)?.run().await
}

fn assert_invariants(result: &RunResult) {
    for message in &result.diagnostics {
        assert_eq!(
            result.statuses.get(&message.cube_name),
            Some(&CubeOutcome::Failed),
            "diagnostic for a cube that did not fail: {message}"
        );
    }
}

#[tokio::test]
async fn test_every_selected_cube_gets_one_outcome() {
    let api = Arc::new(FakeApi::new(abc_catalog(), |query| {
        if query.measures.iter().any(|m| m.starts_with("B.")) {
            Reply::reject("broken")
        } else {
            Reply::Ok
        }
    }));

    let result = run(&api, settings(2, None, false)).await.unwrap();

    let names: Vec<&str> = result.statuses.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert_eq!(result.statuses["A"], CubeOutcome::Passed);
    assert_eq!(result.statuses["B"], CubeOutcome::Failed);
    assert_eq!(result.statuses["C"], CubeOutcome::Passed);
    assert_eq!(result.diagnostics_for("B").count(), 2);
    assert_eq!(result.diagnostics_for("A").count(), 0);
    assert!(result.elapsed_seconds >= 0.0);
    assert_invariants(&result);
}

#[tokio::test]
async fn test_filter_selects_only_named_cubes() {
    let api = Arc::new(FakeApi::new(abc_catalog(), |_| Reply::Ok));

    let result = run(&api, settings(4, Some(&["B"]), false)).await.unwrap();

    assert_eq!(result.statuses.len(), 1);
    assert!(result.statuses.contains_key("B"));
    assert!(
        api.loads()
            .iter()
            .all(|q| q.measures.iter().all(|m| m.starts_with("B.")))
    );
}

#[tokio::test]
async fn test_unknown_filter_names_are_ignored() {
    let api = Arc::new(FakeApi::new(abc_catalog(), |_| Reply::Ok));

    let result = run(&api, settings(4, Some(&["C", "Nope"]), false))
        .await
        .unwrap();

    let names: Vec<&str> = result.statuses.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["C"]);
}

#[tokio::test]
async fn test_orders_scenario_without_fail_fast() {
    let api = Arc::new(FakeApi::new(
        catalog(&[("Orders", &["total"], &["status", "region"])]),
        |query| match query.dimensions.as_slice() {
            [d] if d == "status" => Reply::reject("unknown field status"),
            [d] if d == "region" => Reply::Ok,
            _ => Reply::reject("field not found"),
        },
    ));

    let result = run(&api, settings(10, None, false)).await.unwrap();

    assert_eq!(result.statuses["Orders"], CubeOutcome::Failed);
    let lines: Vec<String> = result.diagnostics.iter().map(ToString::to_string).collect();
    assert_eq!(
        lines,
        vec!["Cube Orders: Dimension status failed: unknown field status"]
    );
}

#[tokio::test]
async fn test_orders_scenario_with_fail_fast() {
    let api = Arc::new(FakeApi::new(
        catalog(&[("Orders", &["total"], &["status", "region"])]),
        |_| Reply::reject("nope"),
    ));

    let result = run(&api, settings(10, None, true)).await.unwrap();

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].text, "Dimension status failed: nope");
}

#[tokio::test]
async fn test_fail_fast_limits_each_failed_cube_to_one_diagnostic() {
    let api = Arc::new(FakeApi::new(abc_catalog(), |_| Reply::reject("nope")));

    let result = run(&api, settings(3, None, true)).await.unwrap();

    for name in ["A", "B", "C"] {
        assert_eq!(result.statuses[name], CubeOutcome::Failed);
        assert!(result.diagnostics_for(name).count() <= 1);
    }
    assert_invariants(&result);
}

#[tokio::test]
async fn test_diagnostics_of_a_cube_stay_contiguous() {
    let cubes: Vec<(String, Vec<String>)> = (0..6)
        .map(|i| {
            let name = format!("Cube{i}");
            let dims = (0..4).map(|d| format!("{name}.d{d}")).collect();
            (name, dims)
        })
        .collect();
    let catalog_json = serde_json::json!({
        "cubes": cubes.iter().map(|(name, dims)| serde_json::json!({
            "name": name,
            "measures": [{"name": format!("{name}.count")}],
            "dimensions": dims.iter().map(|d| serde_json::json!({"name": d})).collect::<Vec<_>>(),
        })).collect::<Vec<_>>()
    });
    let api = Arc::new(
        FakeApi::new(catalog_json, |_| Reply::reject("nope")).with_delay(Duration::from_millis(1)),
    );

    let result = run(&api, settings(6, None, false)).await.unwrap();

    assert_eq!(result.diagnostics.len(), 24);
    for chunk in result.diagnostics.chunks(4) {
        assert!(chunk.iter().all(|m| m.cube_name == chunk[0].cube_name));
        let dims: Vec<String> = chunk
            .iter()
            .map(|m| m.text.split_whitespace().nth(1).unwrap().to_string())
            .collect();
        let expected: Vec<String> = (0..4).map(|d| format!("{}.d{d}", chunk[0].cube_name)).collect();
        assert_eq!(dims, expected);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_limit_bounds_requests_in_flight() {
    let cubes: Vec<String> = (0..12).map(|i| format!("Cube{i}")).collect();
    let catalog_json = serde_json::json!({
        "cubes": cubes.iter().map(|name| serde_json::json!({
            "name": name,
            "measures": [{"name": format!("{name}.count")}],
            "dimensions": [{"name": format!("{name}.a")}, {"name": format!("{name}.b")}],
        })).collect::<Vec<_>>()
    });
    let api = Arc::new(
        FakeApi::new(catalog_json, |_| Reply::reject("nope")).with_delay(Duration::from_millis(5)),
    );

    let result = run(&api, settings(3, None, false)).await.unwrap();

    assert_eq!(result.statuses.len(), 12);
    assert_eq!(api.max_in_flight(), 3, "gate should admit exactly three cubes at once");
}

#[tokio::test]
async fn test_concurrency_limit_of_one_serializes_cubes() {
    let api = Arc::new(
        FakeApi::new(abc_catalog(), |_| Reply::reject("nope")).with_delay(Duration::from_millis(2)),
    );

    let result = run(&api, settings(1, None, false)).await.unwrap();

    assert_eq!(result.statuses.len(), 3);
    assert_eq!(api.max_in_flight(), 1);
}

#[tokio::test]
async fn test_concurrency_limit_above_permit_capacity_runs_every_cube() {
    let api = Arc::new(
        FakeApi::new(abc_catalog(), |_| Reply::Ok).with_delay(Duration::from_millis(2)),
    );

    let result = run(&api, settings(usize::MAX, None, false)).await.unwrap();

    assert_eq!(result.statuses.len(), 3);
    assert!(!result.has_failures());
    assert_eq!(api.max_in_flight(), 3);
}

#[tokio::test]
async fn test_dropped_request_does_not_affect_sibling_cubes() {
    let api = Arc::new(FakeApi::new(abc_catalog(), |query| {
        if query.measures.iter().any(|m| m.starts_with("A.")) {
            Reply::Drop
        } else {
            Reply::Ok
        }
    }));

    let result = run(&api, settings(3, None, false)).await.unwrap();

    assert_eq!(result.statuses.len(), 3);
    assert_eq!(result.statuses["A"], CubeOutcome::Failed);
    assert_eq!(result.statuses["B"], CubeOutcome::Passed);
    assert_eq!(result.statuses["C"], CubeOutcome::Passed);
    assert_eq!(result.diagnostics_for("A").count(), 1);
}

#[tokio::test]
async fn test_catalog_transport_failure_is_fatal() {
    let api = Arc::new(
        FakeApi::new(abc_catalog(), |_| Reply::Ok).with_catalog_reply(Reply::Drop),
    );

    let err = run(&api, settings(3, None, false)).await.unwrap_err();

    match err {
        EngineError::Catalog(source) => assert!(source.is_transport()),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(api.loads().is_empty());
}

#[tokio::test]
async fn test_catalog_rejection_is_fatal() {
    let api = Arc::new(
        FakeApi::new(abc_catalog(), |_| Reply::Ok).with_catalog_reply(Reply::reject("forbidden")),
    );

    let err = run(&api, settings(3, None, false)).await.unwrap_err();

    assert!(matches!(err, EngineError::Catalog(ref source) if source.is_remote()));
    assert!(api.loads().is_empty());
}

#[tokio::test]
async fn test_empty_catalog_yields_empty_result() {
    let api = Arc::new(FakeApi::new(catalog(&[]), |_| Reply::Ok));

    let result = run(&api, settings(3, None, false)).await.unwrap();

    assert!(result.statuses.is_empty());
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_zero_concurrency_is_rejected() {
    let api = Arc::new(FakeApi::new(catalog(&[]), |_| Reply::Ok));
    let client = ApiClient::with_transport(api, "http://api", "token").unwrap();

    let err = Scheduler::new(client, settings(0, None, false)).unwrap_err();

    assert!(matches!(err, EngineError::InvalidConcurrency));
}

#[tokio::test]
async fn test_entry_point_refuses_empty_credential() {
    let api = Arc::new(FakeApi::new(abc_catalog(), |_| Reply::Ok));

    let err = run_with_transport(Arc::clone(&api), &RunConfig::new("http://api", ""))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::MissingCredential));
    assert!(api.loads().is_empty());
}

#[tokio::test]
async fn test_entry_point_runs_with_defaults() {
    let api = Arc::new(FakeApi::new(abc_catalog(), |_| Reply::Ok));

    let result = run_with_transport(Arc::clone(&api), &RunConfig::new("http://api/", "token"))
        .await
        .unwrap();

    assert_eq!(result.passed_count(), 3);
    assert!(!result.has_failures());
}
