use crate::error::BridgeError;
use crate::runtime::ScriptRuntime;
use crate::value::{Arguments, ResultKind, ResultValue};
use tracing::{debug, warn};

/// Calls named functions of one scripting module.
///
/// The bridge borrows a long-lived runtime context and performs every call inside a
/// fresh scope: resolve the module, look up the function, encode the arguments, call,
/// decode, and release everything that was acquired. Calls are strictly sequential.
///
/// Example
/// ```no_run
/// use corner_grocer::{Arguments, CallBridge, LuaRuntime, ResultKind};
/// let runtime = LuaRuntime::new(".").unwrap();
/// let bridge = CallBridge::new(&runtime, "grocer");
/// let count = bridge
///     .invoke(
///         "CountOneItem",
///         &Arguments::StrPair("purchases.txt".into(), "Kale".into()),
///         ResultKind::Int,
///     )
///     .unwrap();
/// println!("{count:?}");
/// ```
pub struct CallBridge<'rt, R: ScriptRuntime> {
    runtime: &'rt R,
    module: String,
}

impl<'rt, R: ScriptRuntime> CallBridge<'rt, R> {
    pub fn new(runtime: &'rt R, module: impl Into<String>) -> Self {
        Self {
            runtime,
            module: module.into(),
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    /// Calls `function` with `arguments` and decodes its result as `kind`.
    ///
    /// Returns the first error encountered. Every handle acquired during the call is
    /// released before this returns, on success and on failure alike.
    pub fn invoke(
        &self,
        function: &str,
        arguments: &Arguments,
        kind: ResultKind,
    ) -> Result<ResultValue, BridgeError> {
        debug!(
            module = %self.module,
            function,
            arity = arguments.arity(),
            expected = %kind,
            "invoking script function"
        );
        let result = self.invoke_scoped(function, arguments, kind);
        match &result {
            Ok(value) => debug!(function, ?value, "script function returned"),
            Err(err) => warn!(function, %err, "script call failed"),
        }
        result
    }

    fn invoke_scoped(
        &self,
        function: &str,
        arguments: &Arguments,
        kind: ResultKind,
    ) -> Result<ResultValue, BridgeError> {
        // Locals are dropped in reverse declaration order on every exit path, so the
        // callable goes first, then the module, and the scope last.
        let _scope = self.runtime.open_scope()?;
        let module = self.runtime.resolve(&self.module)?;
        let callable = self.runtime.lookup(&module, function)?;

        let args = arguments
            .args()
            .into_iter()
            .enumerate()
            .map(|(index, arg)| self.runtime.encode(index + 1, arg))
            .collect::<Result<Vec<_>, _>>()?;

        match self.runtime.call(&callable, args)? {
            Some(value) => self.runtime.decode(value, kind),
            None if kind.expects_value() => Err(BridgeError::Invocation {
                function: function.to_string(),
                reason: format!("returned no value, expected {kind}"),
            }),
            None => Ok(ResultValue::Absent),
        }
    }
}
