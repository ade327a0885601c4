// src/api/utils.rs

//! `installer.utils`: logging, process, YAML and gettext helpers.

use std::path::Path;
use std::sync::Arc;

use mlua::{Function, Lua, Table, Value};
use tracing::{debug, error, warn};

use crate::exec::{self, CommandRequest, ProcessResult, ProcessRunner};
use crate::fs::FileSystem;
use crate::job::HostContext;
use crate::locale::LocaleResolver;
use crate::types::RunLocation;

use super::convert::{command_argv, json_to_lua, runtime_error};

/// Target for log lines written by guest scripts.
pub const GUEST_LOG_TARGET: &str = "scriptjob::guest";

/// Reversible, non-cryptographic text transform.
///
/// Characters up to U+007F are XORed with `0x1F`; everything else is kept.
/// Applying it twice gives back the original text.
pub fn obscure(text: &str) -> String {
    text.chars()
        .map(|c| {
            let code = u32::from(c);
            if code <= 0x7F {
                char::from_u32(code ^ 0x1F).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

/// Build the `utils` table for one job.
pub fn create(lua: &Lua, module_name: &str, context: &HostContext) -> mlua::Result<Table> {
    let utils = lua.create_table()?;

    add_logging(lua, &utils, module_name)?;

    utils.set(
        "obscure",
        lua.create_function(|_, text: String| Ok(obscure(&text)))?,
    )?;

    let fs = context.fs.clone();
    utils.set(
        "load_yaml",
        lua.create_function(move |lua, path: String| load_yaml(lua, fs.as_ref(), &path))?,
    )?;

    add_process_helpers(lua, &utils, context.runner.clone())?;

    let locale = LocaleResolver::new(
        context.locale.clone(),
        context.storage.clone(),
        context.fs.clone(),
    );
    let resolver = locale.clone();
    utils.set(
        "gettext_languages",
        lua.create_function(move |_, ()| Ok(resolver.languages()))?,
    )?;
    utils.set(
        "gettext_path",
        lua.create_function(move |_, ()| {
            Ok(locale.gettext_path().to_string_lossy().into_owned())
        })?,
    )?;

    let runner = context.runner.clone();
    let fs = context.fs.clone();
    utils.set(
        "mount",
        lua.create_function(
            move |_,
                  (device, mount_point, filesystem, options): (
                Option<String>,
                Option<String>,
                Option<String>,
                Option<String>,
            )| {
                Ok(exec::mount(
                    runner.as_ref(),
                    fs.as_ref(),
                    device.as_deref().unwrap_or_default(),
                    mount_point.as_deref().unwrap_or_default(),
                    filesystem.as_deref(),
                    options.as_deref(),
                ))
            },
        )?,
    )?;

    Ok(utils)
}

fn add_logging(lua: &Lua, utils: &Table, module_name: &str) -> mlua::Result<()> {
    let module = module_name.to_string();
    utils.set(
        "debug",
        lua.create_function(move |_, message: String| {
            debug!(target: GUEST_LOG_TARGET, module = %module, "{}", message);
            Ok(())
        })?,
    )?;

    let module = module_name.to_string();
    let warning = lua.create_function(move |_, message: String| {
        warn!(target: GUEST_LOG_TARGET, module = %module, "{}", message);
        Ok(())
    })?;
    utils.set("warn", warning.clone())?;
    utils.set("warning", warning)?;

    let module = module_name.to_string();
    utils.set(
        "error",
        lua.create_function(move |_, message: String| {
            error!(target: GUEST_LOG_TARGET, module = %module, "{}", message);
            Ok(())
        })?,
    )?;
    Ok(())
}

fn load_yaml(lua: &Lua, fs: &dyn FileSystem, path: &str) -> mlua::Result<Value> {
    let text = fs
        .read_to_string(Path::new(path))
        .map_err(|e| runtime_error(format!("load_yaml: {e:#}")))?;
    let doc: serde_json::Value = serde_yaml::from_str(&text)
        .map_err(|e| runtime_error(format!("load_yaml: {path}: {e}")))?;
    json_to_lua(lua, &doc)
}

type CommandArgs = (Value, Option<String>, Option<u64>);
type StreamingArgs = (Value, Option<Function>, Option<String>, Option<u64>);

fn add_process_helpers(
    lua: &Lua,
    utils: &Table,
    runner: Arc<dyn ProcessRunner>,
) -> mlua::Result<()> {
    let r = runner.clone();
    utils.set(
        "target_env_call",
        lua.create_function(move |lua, (command, input, timeout): (Value, Value, Value)| {
            // Never raises: bad arguments are reported like any other failure.
            let request = match lenient_request(lua, command, input, timeout) {
                Ok(request) => request,
                Err(e) => {
                    warn!(error = %e, "target_env_call with invalid arguments");
                    return Ok(ProcessResult::INVALID_ARGUMENTS);
                }
            };
            Ok(r.run(&request, None).code)
        })?,
    )?;

    let r = runner.clone();
    utils.set(
        "check_target_env_call",
        lua.create_function(move |lua, (command, input, timeout): CommandArgs| {
            let request = build_request(
                RunLocation::Target,
                command_argv(lua, command)?,
                input,
                timeout,
            );
            let result = r.run(&request, None);
            ensure_success(&request, &result)?;
            Ok(result.code)
        })?,
    )?;

    let r = runner.clone();
    utils.set(
        "check_target_env_output",
        lua.create_function(move |lua, (command, input, timeout): CommandArgs| {
            let request = build_request(
                RunLocation::Target,
                command_argv(lua, command)?,
                input,
                timeout,
            );
            let result = r.run(&request, None);
            ensure_success(&request, &result)?;
            Ok(result.output)
        })?,
    )?;

    for (name, location) in [
        ("target_env_process_output", RunLocation::Target),
        ("host_env_process_output", RunLocation::Host),
    ] {
        let r = runner.clone();
        utils.set(
            name,
            lua.create_function(
                move |lua, (command, callback, input, timeout): StreamingArgs| {
                    let request =
                        build_request(location, command_argv(lua, command)?, input, timeout);
                    let result = run_streaming(r.as_ref(), &request, callback)?;
                    ensure_success(&request, &result)?;
                    Ok(result.output)
                },
            )?,
        )?;
    }

    Ok(())
}

/// Convert untyped guest arguments for a target command.
fn lenient_request(
    lua: &Lua,
    command: Value,
    input: Value,
    timeout: Value,
) -> mlua::Result<CommandRequest> {
    let argv = command_argv(lua, command)?;
    let input = lua.unpack::<Option<String>>(input)?;
    let timeout = lua.unpack::<Option<u64>>(timeout)?;
    Ok(build_request(RunLocation::Target, argv, input, timeout))
}

fn build_request(
    location: RunLocation,
    argv: Vec<String>,
    input: Option<String>,
    timeout: Option<u64>,
) -> CommandRequest {
    CommandRequest::new(location, argv)
        .with_input(input.unwrap_or_default())
        .with_timeout_secs(timeout.unwrap_or(0))
}

/// Run `request`, handing every output line to the Lua `callback`.
///
/// The first error raised by the callback stops further callbacks and is
/// re-raised once the process is done.
fn run_streaming(
    runner: &dyn ProcessRunner,
    request: &CommandRequest,
    callback: Option<Function>,
) -> mlua::Result<ProcessResult> {
    let Some(callback) = callback else {
        return Ok(runner.run(request, None));
    };

    let mut callback_error: Option<mlua::Error> = None;
    let result = {
        let mut on_line = |line: &str| {
            if callback_error.is_none() {
                if let Err(e) = callback.call::<()>(line) {
                    callback_error = Some(e);
                }
            }
        };
        runner.run(request, Some(&mut on_line))
    };

    match callback_error {
        Some(e) => Err(e),
        None => Ok(result),
    }
}

fn ensure_success(request: &CommandRequest, result: &ProcessResult) -> mlua::Result<()> {
    if result.success() {
        return Ok(());
    }
    let mut message = format!(
        "Command '{}' returned non-zero exit status {}.",
        request.display(),
        result.code
    );
    let output = result.output.trim();
    if !output.is_empty() {
        message.push_str("\nOutput:\n");
        message.push_str(output);
    }
    Err(runtime_error(message))
}
