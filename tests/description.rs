// tests/description.rs

mod common;
use crate::common::{ScriptJobBuilder, init_tracing};

use scriptjob::job::first_doc_line;

fn status_for(source: &str) -> String {
    init_tracing();
    let builder = ScriptJobBuilder::new().with_script(source);
    let mut job = builder.build();
    job.exec().unwrap();
    job.pretty_status_message()
}

#[test]
fn pretty_name_function_wins() {
    let status = status_for(
        r#"
        __doc__ = "Doc title."
        function pretty_name() return "Configuring bootloader" end
        function run() end
        "#,
    );
    assert_eq!(status, "Configuring bootloader");
}

#[test]
fn first_line_of_doc_is_used_without_pretty_name() {
    let status = status_for(
        r#"
        __doc__ = "  First line.\nSecond line."
        function run() end
        "#,
    );
    assert_eq!(status, "First line.");
}

#[test]
fn generic_message_without_either() {
    let status = status_for("function run() end");
    assert_eq!(status, "Running testmodule operation.");
}

#[test]
fn raising_pretty_name_falls_through_to_doc() {
    let status = status_for(
        r#"
        __doc__ = "Fallback doc."
        function pretty_name() error("no name today") end
        function run() end
        "#,
    );
    assert_eq!(status, "Fallback doc.");
}

#[test]
fn non_string_pretty_name_falls_through_to_doc() {
    let status = status_for(
        r#"
        __doc__ = "Fallback doc."
        function pretty_name() return 42 end
        function run() end
        "#,
    );
    assert_eq!(status, "Fallback doc.");
}

#[test]
fn pretty_name_that_is_not_a_function_is_ignored() {
    let status = status_for(
        r#"
        pretty_name = "just a string"
        function run() end
        "#,
    );
    assert_eq!(status, "Running testmodule operation.");
}

#[test]
fn blank_doc_gives_generic_message() {
    let status = status_for(
        r#"
        __doc__ = "   \n  "
        function run() end
        "#,
    );
    assert_eq!(status, "Running testmodule operation.");
}

#[test]
fn description_is_reset_between_runs() {
    init_tracing();
    let builder = ScriptJobBuilder::new().with_script(r#"__doc__ = "Has a title.""#);
    let mut job = builder.build();

    job.exec().unwrap();
    assert_eq!(job.description(), "Has a title.");

    builder.fs.add_file(common::script_path(), "function run() end");
    job.exec().unwrap();
    assert_eq!(job.description(), "");
}

#[test]
fn first_doc_line_cases() {
    assert_eq!(first_doc_line("Title"), Some("Title".to_string()));
    assert_eq!(first_doc_line("\n\n  Title  \nrest"), Some("Title".to_string()));
    assert_eq!(first_doc_line("Title\r\nrest"), Some("Title".to_string()));
    assert_eq!(first_doc_line(""), None);
    assert_eq!(first_doc_line(" \t\n "), None);
}
