//! Corner Grocer purchase tracking, with the analysis written in Lua.
//!
//! The crate has two halves. The first is a small bridge for calling named functions
//! of a Lua module: [`CallBridge`] marshals native arguments, resolves the module and
//! function, performs the call and decodes the result into a [`ResultValue`]. It is
//! generic over [`ScriptRuntime`], and [`LuaRuntime`] is the process-wide context
//! the binary uses.
//!
//! The second half is the console application: a numbered [`Menu`] and the
//! [`GrocerMenu`] selection loop that maps each choice to one bridge call.

pub mod bridge;
pub mod config;
pub mod console;
pub mod error;
pub mod grocer;
mod marshal;
pub mod menu;
mod resolver;
pub mod runtime;
#[cfg(test)]
pub(crate) mod testing;
pub mod value;

pub use bridge::CallBridge;
pub use config::{Args, Config, FunctionNames};
pub use console::{EditorInput, LineSource, ScriptedInput};
pub use error::BridgeError;
pub use grocer::{Choice, Flow, GROCER_MENU, GrocerMenu};
pub use menu::{Menu, MenuError};
pub use runtime::{LuaRuntime, ScriptRuntime};
pub use value::{Arg, Arguments, ResultKind, ResultValue};
