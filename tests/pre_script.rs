// tests/pre_script.rs

mod common;
use crate::common::{ScriptJobBuilder, init_tracing};

use scriptjob::job::{InternalErrorCode, JobResult};
use scriptjob::storage::GlobalStorage;
use scriptjob::types::Stage;
use serde_json::json;

const PRE_SCRIPT: &str = r#"
pre_runs = (pre_runs or 0) + 1
function helper() return "from pre-script" end
"#;

const MAIN_SCRIPT: &str = r#"
local seen = helper()
function run()
    local n = installer.globalstorage:value("jobs") or 0
    installer.globalstorage:insert("jobs", n + 1)
    installer.globalstorage:insert("seen_" .. installer.job.module_name, seen)
    installer.globalstorage:insert("pre_runs", pre_runs)
end
"#;

#[test]
fn pre_script_runs_before_every_job() {
    init_tracing();
    let storage = GlobalStorage::new();

    let first = ScriptJobBuilder::new()
        .with_storage(storage.clone())
        .with_pre_script(PRE_SCRIPT)
        .with_script(MAIN_SCRIPT);
    let second = ScriptJobBuilder::new()
        .with_working_path("/modules/other")
        .with_storage(storage.clone())
        .with_pre_script(PRE_SCRIPT)
        .with_script(MAIN_SCRIPT);

    assert_eq!(first.build().exec().unwrap(), JobResult::Success);
    assert_eq!(second.build().exec().unwrap(), JobResult::Success);

    assert_eq!(storage.value("jobs"), Some(json!(2)));
    assert_eq!(storage.value("seen_testmodule"), Some(json!("from pre-script")));
    assert_eq!(storage.value("seen_other"), Some(json!("from pre-script")));
    // Fresh globals each time: the pre-script never sees its own earlier run.
    assert_eq!(storage.value("pre_runs"), Some(json!(1)));
}

#[test]
fn raising_pre_script_is_a_bad_internal_script() {
    init_tracing();
    let builder = ScriptJobBuilder::new()
        .with_pre_script(r#"error("pre-script exploded")"#)
        .with_script(r#"installer.globalstorage:insert("loaded", true) function run() end"#);
    let mut job = builder.build();

    let result = job.exec().unwrap();

    match result {
        JobResult::InternalError {
            summary,
            details,
            code,
        } => {
            assert_eq!(summary, "bad internal script");
            assert_eq!(code, InternalErrorCode::UncaughtGuestException);
            assert!(details.contains("testmodule"));
            assert!(details.contains("pre-script exploded"));
        }
        other => panic!("expected InternalError, got {other:?}"),
    }
    assert!(builder.observer.reached(Stage::ApiInstalled));
    assert!(!builder.observer.reached(Stage::PreScriptRun));
    assert!(!builder.storage.contains("loaded"));
}

#[test]
fn pre_script_sees_host_api() {
    init_tracing();
    let builder = ScriptJobBuilder::new()
        .with_pre_script(r#"installer.globalstorage:insert("pre", installer.job.pretty_name)"#)
        .with_script("function run() end");

    assert_eq!(builder.build().exec().unwrap(), JobResult::Success);
    assert_eq!(builder.storage.value("pre"), Some(json!("testmodule")));
}

#[test]
fn jobs_leave_no_residue_besides_their_writes() {
    init_tracing();
    let builder = ScriptJobBuilder::new()
        .with_pre_script(PRE_SCRIPT)
        .with_script("function run() end");

    builder.build().exec().unwrap();

    assert_eq!(builder.storage.count(), 0);
}
