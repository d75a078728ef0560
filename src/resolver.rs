//! Loading scripting modules and finding functions inside them.

use crate::error::BridgeError;
use mlua::{Function, Lua, Table, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Path of the source file backing `module` inside `dir`.
pub fn module_path(dir: &Path, module: &str) -> PathBuf {
    dir.join(format!("{module}.lua"))
}

/// Loads `<dir>/<module>.lua` and returns its namespace.
///
/// The chunk runs in its own environment that falls back to the Lua globals for
/// reads. A module that returns a table exposes that table; a module that returns
/// nothing exposes every global it defined.
pub fn resolve(lua: &Lua, dir: &Path, module: &str) -> Result<Table, BridgeError> {
    let path = module_path(dir, module);
    let load_error = |reason: String| {
        warn!(module, path = %path.display(), "{reason}");
        BridgeError::ModuleLoad {
            module: module.to_string(),
            reason,
        }
    };

    let source = fs::read_to_string(&path)
        .map_err(|err| load_error(format!("cannot read {}: {err}", path.display())))?;

    let env: Table = lua
        .load("return setmetatable({}, { __index = _G })")
        .eval()
        .map_err(|err| load_error(err.to_string()))?;

    let returned: Value = lua
        .load(source.as_str())
        .set_name(format!("@{}", path.display()))
        .set_environment(env.clone())
        .call(())
        .map_err(|err| load_error(err.to_string()))?;

    debug!(module, path = %path.display(), "module loaded");
    match returned {
        Value::Table(namespace) => Ok(namespace),
        Value::Nil => Ok(env),
        other => Err(load_error(format!(
            "module returned a {} instead of a table",
            other.type_name()
        ))),
    }
}

/// Finds `function` in a module namespace by exact name.
///
/// Only the namespace itself is searched; Lua globals such as `print` are not
/// considered part of a module.
pub fn lookup(namespace: &Table, module: &str, function: &str) -> Result<Function, BridgeError> {
    let entry: Value = namespace
        .raw_get(function)
        .map_err(|err| BridgeError::ModuleLoad {
            module: module.to_string(),
            reason: err.to_string(),
        })?;

    match entry {
        Value::Function(f) => Ok(f),
        Value::Nil => Err(BridgeError::FunctionNotFound {
            module: module.to_string(),
            function: function.to_string(),
        }),
        other => Err(BridgeError::NotCallable {
            module: module.to_string(),
            function: function.to_string(),
            kind: other.type_name().to_string(),
        }),
    }
}
