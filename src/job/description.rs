// src/job/description.rs

//! Human-readable job description taken from the guest script.

use mlua::{Lua, Value};
use tracing::{debug, warn};

use super::translate::text_of;

/// Global function that may produce a title.
pub const PRETTY_NAME_KEY: &str = "pretty_name";
/// Global documentation string used as fallback title.
pub const DOC_KEY: &str = "__doc__";

/// Derive the description from the globals of a loaded script.
///
/// Order: result of `pretty_name()` if it is a string, then the first line
/// of `__doc__`, then empty.
pub fn derive_description(lua: &Lua) -> String {
    let globals = lua.globals();

    if let Ok(Value::Function(pretty_name)) = globals.get::<Value>(PRETTY_NAME_KEY) {
        match pretty_name.call::<Value>(()) {
            Ok(value) => match text_of(&value) {
                Some(title) => return title,
                None => debug!(
                    returned = value.type_name(),
                    "pretty_name() did not return a string; trying __doc__"
                ),
            },
            Err(e) => warn!(error = %e, "pretty_name() raised; trying __doc__"),
        }
    }

    if let Ok(doc) = globals.get::<Value>(DOC_KEY) {
        if let Some(line) = text_of(&doc).as_deref().and_then(first_doc_line) {
            return line;
        }
    }

    String::new()
}

/// First line of a documentation string, after trimming surrounding
/// whitespace. `None` when nothing is left.
pub fn first_doc_line(doc: &str) -> Option<String> {
    let line = doc.trim().lines().next()?.trim_end();
    (!line.is_empty()).then(|| line.to_string())
}
