// src/api/convert.rs

//! Conversions between Lua values and host data.

use mlua::{Lua, LuaSerdeExt, SerializeOptions, Value};

/// Structured host data as a Lua value. JSON `null` becomes `nil`.
pub fn json_to_lua(lua: &Lua, value: &serde_json::Value) -> mlua::Result<Value> {
    let options = SerializeOptions::new()
        .serialize_none_to_null(false)
        .serialize_unit_to_null(false);
    lua.to_value_with(value, options)
}

/// A Lua value as structured host data.
///
/// Functions, threads and userdata cannot be stored and raise.
pub fn lua_to_json(lua: &Lua, value: Value) -> mlua::Result<serde_json::Value> {
    lua.from_value(value)
}

/// Command for the process helpers: a single string or a list of strings.
pub fn command_argv(lua: &Lua, command: Value) -> mlua::Result<Vec<String>> {
    match command {
        Value::String(s) => Ok(vec![String::from(&*s.to_str()?)]),
        Value::Table(_) => lua.unpack::<Vec<String>>(command),
        other => Err(mlua::Error::RuntimeError(format!(
            "command must be a string or a list of strings, got {}",
            other.type_name()
        ))),
    }
}

pub(crate) fn runtime_error(message: impl Into<String>) -> mlua::Error {
    mlua::Error::RuntimeError(message.into())
}
