use super::ScriptRuntime;
use crate::error::BridgeError;
use crate::value::{Arg, ResultKind, ResultValue};
use crate::{marshal, resolver};
use mlua::{Function, Lua, LuaOptions, MultiValue, StdLib, Table, Value};
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Set while a [`LuaRuntime`] exists anywhere in the process.
static LIVE: AtomicBool = AtomicBool::new(false);

/// Process-wide Lua context.
///
/// Only one may exist at a time. The interpreter state is created on the first call
/// and kept until the runtime is dropped, so a failed start only fails that call and
/// the next call tries again. Calls borrow the state through [`LuaScope`] guards.
///
/// The type is neither `Send` nor `Sync`: all calls happen on the thread that
/// created it.
pub struct LuaRuntime {
    module_dir: PathBuf,
    state: RefCell<Option<Rc<Lua>>>,
    busy: Rc<Cell<bool>>,
}

impl LuaRuntime {
    /// Creates the runtime context. Modules are looked up in `module_dir`.
    pub fn new(module_dir: impl Into<PathBuf>) -> Result<Self, BridgeError> {
        if LIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(BridgeError::RuntimeInit(
                "another scripting runtime is already live".to_string(),
            ));
        }

        let module_dir = module_dir.into();
        info!(module_dir = %module_dir.display(), "scripting runtime ready");
        Ok(Self {
            module_dir,
            state: RefCell::new(None),
            busy: Rc::new(Cell::new(false)),
        })
    }

    pub fn module_dir(&self) -> &Path {
        &self.module_dir
    }

    /// Whether the interpreter itself has been started yet.
    pub fn is_started(&self) -> bool {
        self.state.borrow().is_some()
    }

    fn state(&self) -> Result<Rc<Lua>, BridgeError> {
        let mut state = self.state.borrow_mut();
        if let Some(lua) = state.as_ref() {
            return Ok(Rc::clone(lua));
        }

        let lua = Lua::new_with(StdLib::ALL_SAFE, LuaOptions::default())
            .map_err(|err| BridgeError::RuntimeInit(err.to_string()))?;
        debug!("lua interpreter started");
        let lua = Rc::new(lua);
        *state = Some(Rc::clone(&lua));
        Ok(lua)
    }
}

impl Drop for LuaRuntime {
    fn drop(&mut self) {
        self.state.get_mut().take();
        LIVE.store(false, Ordering::Release);
        info!("scripting runtime shut down");
    }
}

/// Guard for one call. Dropping it collects garbage, which reclaims every Lua
/// object whose handle was released during the call, and frees the runtime for
/// the next call.
pub struct LuaScope {
    lua: Rc<Lua>,
    busy: Rc<Cell<bool>>,
}

impl Drop for LuaScope {
    fn drop(&mut self) {
        if let Err(err) = self.lua.gc_collect() {
            warn!(%err, "garbage collection after call failed");
        }
        self.busy.set(false);
    }
}

pub struct LuaModule {
    name: String,
    namespace: Table,
}

/// A resolved function together with the name it was found under.
pub struct LuaCallable {
    name: String,
    function: Function,
}

impl ScriptRuntime for LuaRuntime {
    type Scope = LuaScope;
    type Module = LuaModule;
    type Callable = LuaCallable;
    type Value = Value;

    fn open_scope(&self) -> Result<LuaScope, BridgeError> {
        if self.busy.replace(true) {
            return Err(BridgeError::ScopeBusy);
        }
        match self.state() {
            Ok(lua) => Ok(LuaScope {
                lua,
                busy: Rc::clone(&self.busy),
            }),
            Err(err) => {
                self.busy.set(false);
                Err(err)
            }
        }
    }

    fn resolve(&self, module: &str) -> Result<LuaModule, BridgeError> {
        let lua = self.state()?;
        let namespace = resolver::resolve(&lua, &self.module_dir, module)?;
        Ok(LuaModule {
            name: module.to_string(),
            namespace,
        })
    }

    fn lookup(&self, module: &LuaModule, function: &str) -> Result<LuaCallable, BridgeError> {
        let resolved = resolver::lookup(&module.namespace, &module.name, function)?;
        Ok(LuaCallable {
            name: function.to_string(),
            function: resolved,
        })
    }

    fn encode(&self, position: usize, arg: Arg<'_>) -> Result<Value, BridgeError> {
        let lua = self.state()?;
        marshal::encode(&lua, position, arg)
    }

    fn call(&self, callable: &LuaCallable, args: Vec<Value>) -> Result<Option<Value>, BridgeError> {
        let returned: MultiValue = callable
            .function
            .call(MultiValue::from_vec(args))
            .map_err(|err| {
                debug!(function = %callable.name, %err, "script raised an error");
                BridgeError::Invocation {
                    function: callable.name.clone(),
                    reason: first_line(&err),
                }
            })?;
        Ok(returned.into_iter().next().filter(|value| !value.is_nil()))
    }

    fn decode(&self, value: Value, kind: ResultKind) -> Result<ResultValue, BridgeError> {
        marshal::decode(value, kind)
    }
}

/// Lua errors carry a stack traceback after the message.
fn first_line(err: &mlua::Error) -> String {
    let text = err.to_string();
    text.lines().next().unwrap_or_default().to_string()
}
