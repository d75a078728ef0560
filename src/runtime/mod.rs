//! The embedded scripting runtime as seen by the call bridge.

mod lua;

pub use lua::{LuaCallable, LuaModule, LuaRuntime, LuaScope};

use crate::error::BridgeError;
use crate::value::{Arg, ResultKind, ResultValue};

/// A long-lived scripting runtime context.
///
/// Every handle type is an owned guard: dropping it releases the underlying runtime
/// object. The bridge acquires them in the order scope, module, callable, values and
/// relies on drop order to release them in reverse.
pub trait ScriptRuntime {
    /// Exclusive guard held for the duration of one call.
    type Scope;
    type Module;
    type Callable;
    type Value;

    /// Starts a call. Fails if the runtime cannot be brought up or another call is
    /// still in progress.
    fn open_scope(&self) -> Result<Self::Scope, BridgeError>;

    fn resolve(&self, module: &str) -> Result<Self::Module, BridgeError>;

    fn lookup(&self, module: &Self::Module, function: &str)
    -> Result<Self::Callable, BridgeError>;

    /// Converts one argument. `position` is 1-based.
    fn encode(&self, position: usize, arg: Arg<'_>) -> Result<Self::Value, BridgeError>;

    /// Calls the function. `Ok(None)` means it returned nothing (or `nil`).
    fn call(
        &self,
        callable: &Self::Callable,
        args: Vec<Self::Value>,
    ) -> Result<Option<Self::Value>, BridgeError>;

    fn decode(&self, value: Self::Value, kind: ResultKind) -> Result<ResultValue, BridgeError>;
}
