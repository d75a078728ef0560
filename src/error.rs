use thiserror::Error;

/// Everything that can go wrong while the bridge performs one scripted call.
///
/// None of these are fatal to the program: the selection loop reports the error for
/// the action in progress and shows the menu again.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BridgeError {
    /// The embedded runtime could not be started.
    #[error("scripting runtime failed to start: {0}")]
    RuntimeInit(String),

    /// A call scope was requested while another one is still open.
    #[error("scripting runtime is busy with another call")]
    ScopeBusy,

    #[error("cannot load module `{module}`: {reason}")]
    ModuleLoad { module: String, reason: String },

    #[error("module `{module}` has no function named `{function}`")]
    FunctionNotFound { module: String, function: String },

    #[error("`{function}` in module `{module}` is a {kind}, not a function")]
    NotCallable {
        module: String,
        function: String,
        kind: String,
    },

    /// A native argument could not be turned into a runtime value.
    #[error("cannot pass argument {position} to the script: {reason}")]
    Encoding { position: usize, reason: String },

    /// The returned value does not have the expected shape.
    #[error("unexpected result: {0}")]
    Decoding(String),

    /// The function raised an error or returned nothing usable.
    #[error("`{function}` failed: {reason}")]
    Invocation { function: String, reason: String },
}
