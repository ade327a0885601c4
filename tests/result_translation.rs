// tests/result_translation.rs

mod common;
use crate::common::{ScriptJobBuilder, init_tracing, script_path};

use scriptjob::job::{InternalErrorCode, JobResult};
use scriptjob::types::Stage;

fn run(source: &str) -> JobResult {
    init_tracing();
    let builder = ScriptJobBuilder::new().with_script(source);
    let mut job = builder.build();
    job.exec().unwrap()
}

fn assert_error(result: &JobResult, summary: &str) {
    match result {
        JobResult::Error { summary: got, .. } => assert_eq!(got, summary),
        other => panic!("expected Error({summary}), got {other:?}"),
    }
}

#[test]
fn missing_run_is_reported_even_with_description() {
    init_tracing();
    let builder = ScriptJobBuilder::new().with_script(
        r#"
        __doc__ = "Documented but useless."
        function pretty_name() return "Pretty" end
        "#,
    );
    let mut job = builder.build();

    let result = job.exec().unwrap();

    match &result {
        JobResult::Error { summary, details } => {
            assert_eq!(summary, "missing entry point");
            assert!(details.contains(&script_path()));
            assert!(details.contains("run()"));
        }
        other => panic!("expected Error, got {other:?}"),
    }
    // The description is still derived before run() is looked up.
    assert_eq!(job.pretty_status_message(), "Pretty");
    assert_eq!(builder.observer.progress_values(), vec![0.0]);
    assert!(builder.observer.reached(Stage::ScriptLoaded));
    assert!(!builder.observer.reached(Stage::EntryInvoked));
}

#[test]
fn returning_nothing_or_nil_is_success() {
    assert_eq!(run("function run() end"), JobResult::Success);
    assert_eq!(run("function run() return end"), JobResult::Success);
    assert_eq!(run("function run() return nil end"), JobResult::Success);
}

#[test]
fn returned_pair_table_is_passed_through_verbatim() {
    let result = run(r#"function run() return { "Disk full", "No space left on /target." } end"#);

    assert_eq!(
        result,
        JobResult::Error {
            summary: "Disk full".to_string(),
            details: "No space left on /target.".to_string(),
        }
    );
}

#[test]
fn returned_pair_values_are_passed_through_verbatim() {
    let result = run(r#"function run() return "Oops", "Something broke." end"#);

    assert_eq!(
        result,
        JobResult::Error {
            summary: "Oops".to_string(),
            details: "Something broke.".to_string(),
        }
    );
}

#[test]
fn other_return_shapes_are_invalid_results() {
    for source in [
        r#"function run() return "only one" end"#,
        r#"function run() return 42 end"#,
        r#"function run() return true end"#,
        r#"function run() return { "a", "b", "c" } end"#,
        r#"function run() return { "a" } end"#,
        r#"function run() return { 1, 2 } end"#,
        r#"function run() return { "a", {} } end"#,
        r#"function run() return "a", "b", "c" end"#,
        r#"function run() return 1, "b" end"#,
        r#"function run() return { summary = "a", details = "b" } end"#,
    ] {
        let result = run(source);
        assert_error(&result, "invalid results");
        assert!(
            result.details().unwrap_or_default().contains("testmodule"),
            "details should name the job for {source}"
        );
    }
}

#[test]
fn raising_run_is_an_internal_error() {
    let result = run(r#"function run() error("kaboom") end"#);

    match result {
        JobResult::InternalError {
            summary,
            details,
            code,
        } => {
            assert_eq!(summary, "bad main script file");
            assert_eq!(code, InternalErrorCode::UncaughtGuestException);
            assert_eq!(code.as_str(), "uncaught-guest-exception");
            assert!(details.contains("testmodule"));
            assert!(details.contains("raised an exception"));
            assert!(details.contains("kaboom"));
        }
        other => panic!("expected InternalError, got {other:?}"),
    }
}

#[test]
fn raising_while_loading_is_an_internal_error() {
    init_tracing();
    let builder = ScriptJobBuilder::new().with_script(
        r#"
        error("broken at load time")
        function run() end
        "#,
    );
    let mut job = builder.build();

    let result = job.exec().unwrap();

    match result {
        JobResult::InternalError { summary, details, .. } => {
            assert_eq!(summary, "bad main script file");
            assert!(details.contains("could not be loaded"));
            assert!(details.contains("broken at load time"));
        }
        other => panic!("expected InternalError, got {other:?}"),
    }
    assert!(!builder.observer.reached(Stage::ScriptLoaded));
    assert!(builder.observer.progress_values().is_empty());
}

#[test]
fn syntax_error_is_a_load_failure() {
    let result = run("function run(");

    assert_eq!(result.summary(), Some("bad main script file"));
    assert!(matches!(result, JobResult::InternalError { .. }));
}

#[test]
fn non_callable_run_raises() {
    let result = run("run = 5");

    assert!(matches!(result, JobResult::InternalError { .. }));
    assert_eq!(result.summary(), Some("bad main script file"));
}

#[test]
fn callable_table_is_a_valid_entry_point() {
    let result = run(
        r#"
        run = setmetatable({}, {
            __call = function() return { "From table", "Called through __call." } end,
        })
        "#,
    );

    assert_eq!(
        result,
        JobResult::Error {
            summary: "From table".to_string(),
            details: "Called through __call.".to_string(),
        }
    );
}
