//! In-memory stand-in for the scripting runtime that keeps count of every handle it
//! hands out, so tests can check that calls release exactly what they acquire.

use crate::error::BridgeError;
use crate::runtime::ScriptRuntime;
use crate::value::{Arg, ResultKind, ResultValue};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FakeValue {
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<FakeValue>),
}

type FakeFn = Box<dyn Fn(&[FakeValue]) -> Result<Option<FakeValue>, String>>;

enum Entry {
    Function(FakeFn),
    Constant(FakeValue),
}

type Namespace = Rc<HashMap<String, Entry>>;

/// Records acquisitions and releases of runtime handles.
#[derive(Default)]
pub(crate) struct Ledger {
    next_id: Cell<u64>,
    live: RefCell<Vec<u64>>,
    acquired: RefCell<Vec<&'static str>>,
    released: RefCell<Vec<&'static str>>,
    double_released: Cell<usize>,
}

impl Ledger {
    fn acquire(self: &Rc<Self>, kind: &'static str) -> Handle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.live.borrow_mut().push(id);
        self.acquired.borrow_mut().push(kind);
        Handle {
            id,
            kind,
            ledger: Rc::clone(self),
        }
    }

    fn release(&self, id: u64, kind: &'static str) {
        let mut live = self.live.borrow_mut();
        match live.iter().position(|&held| held == id) {
            Some(index) => {
                live.remove(index);
                self.released.borrow_mut().push(kind);
            }
            None => self.double_released.set(self.double_released.get() + 1),
        }
    }

    /// Handles acquired and not yet released.
    pub(crate) fn live(&self) -> usize {
        self.live.borrow().len()
    }

    pub(crate) fn acquired(&self) -> usize {
        self.acquired.borrow().len()
    }

    pub(crate) fn acquired_of(&self, kind: &str) -> usize {
        self.acquired.borrow().iter().filter(|k| **k == kind).count()
    }

    pub(crate) fn released_kinds(&self) -> Vec<&'static str> {
        self.released.borrow().clone()
    }

    pub(crate) fn double_releases(&self) -> usize {
        self.double_released.get()
    }
}

struct Handle {
    id: u64,
    kind: &'static str,
    ledger: Rc<Ledger>,
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.ledger.release(self.id, self.kind);
    }
}

pub(crate) struct FakeScope {
    _handle: Handle,
    busy: Rc<Cell<bool>>,
}

impl Drop for FakeScope {
    fn drop(&mut self) {
        self.busy.set(false);
    }
}

pub(crate) struct FakeModule {
    _handle: Handle,
    name: String,
    entries: Namespace,
}

pub(crate) struct FakeCallable {
    _handle: Handle,
    name: String,
    entries: Namespace,
}

pub(crate) struct FakeHandleValue {
    _handle: Handle,
    value: FakeValue,
}

#[derive(Default)]
pub(crate) struct FakeRuntime {
    ledger: Rc<Ledger>,
    modules: HashMap<String, Namespace>,
    busy: Rc<Cell<bool>>,
    fail_start: Cell<bool>,
    reject_position: Option<usize>,
    calls: RefCell<Vec<(String, Vec<FakeValue>)>>,
}

impl FakeRuntime {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_function(
        self,
        module: &str,
        name: &str,
        function: impl Fn(&[FakeValue]) -> Result<Option<FakeValue>, String> + 'static,
    ) -> Self {
        self.with_entry(module, name, Entry::Function(Box::new(function)))
    }

    pub(crate) fn with_constant(self, module: &str, name: &str, value: FakeValue) -> Self {
        self.with_entry(module, name, Entry::Constant(value))
    }

    fn with_entry(mut self, module: &str, name: &str, entry: Entry) -> Self {
        let namespace = self.modules.entry(module.to_string()).or_default();
        Rc::get_mut(namespace)
            .expect("modules are only extended before any call")
            .insert(name.to_string(), entry);
        self
    }

    /// The next scope fails to open as if the interpreter could not start.
    pub(crate) fn fail_next_start(self) -> Self {
        self.fail_start.set(true);
        self
    }

    /// Encoding the argument at `position` (1-based) fails.
    pub(crate) fn reject_argument(mut self, position: usize) -> Self {
        self.reject_position = Some(position);
        self
    }

    pub(crate) fn ledger(&self) -> Rc<Ledger> {
        Rc::clone(&self.ledger)
    }

    /// Every function call that reached the runtime, with its arguments.
    pub(crate) fn calls(&self) -> Vec<(String, Vec<FakeValue>)> {
        self.calls.borrow().clone()
    }

    pub(crate) fn called(&self, function: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|(name, _)| name == function)
            .count()
    }
}

impl ScriptRuntime for FakeRuntime {
    type Scope = FakeScope;
    type Module = FakeModule;
    type Callable = FakeCallable;
    type Value = FakeHandleValue;

    fn open_scope(&self) -> Result<FakeScope, BridgeError> {
        if self.busy.replace(true) {
            return Err(BridgeError::ScopeBusy);
        }
        if self.fail_start.replace(false) {
            self.busy.set(false);
            return Err(BridgeError::RuntimeInit("interpreter refused to start".to_string()));
        }
        Ok(FakeScope {
            _handle: self.ledger.acquire("scope"),
            busy: Rc::clone(&self.busy),
        })
    }

    fn resolve(&self, module: &str) -> Result<FakeModule, BridgeError> {
        let entries = self
            .modules
            .get(module)
            .cloned()
            .ok_or_else(|| BridgeError::ModuleLoad {
                module: module.to_string(),
                reason: format!("no module named `{module}`"),
            })?;
        Ok(FakeModule {
            _handle: self.ledger.acquire("module"),
            name: module.to_string(),
            entries,
        })
    }

    fn lookup(&self, module: &FakeModule, function: &str) -> Result<FakeCallable, BridgeError> {
        match module.entries.get(function) {
            Some(Entry::Function(_)) => Ok(FakeCallable {
                _handle: self.ledger.acquire("callable"),
                name: function.to_string(),
                entries: Rc::clone(&module.entries),
            }),
            Some(Entry::Constant(value)) => Err(BridgeError::NotCallable {
                module: module.name.clone(),
                function: function.to_string(),
                kind: format!("{value:?}"),
            }),
            None => Err(BridgeError::FunctionNotFound {
                module: module.name.clone(),
                function: function.to_string(),
            }),
        }
    }

    fn encode(&self, position: usize, arg: Arg<'_>) -> Result<FakeHandleValue, BridgeError> {
        if self.reject_position == Some(position) {
            return Err(BridgeError::Encoding {
                position,
                reason: "rejected by test".to_string(),
            });
        }
        let value = match arg {
            Arg::Str(s) => FakeValue::Str(s.to_string()),
            Arg::Int(n) => FakeValue::Int(n),
            Arg::Float(x) => FakeValue::Float(x),
        };
        Ok(FakeHandleValue {
            _handle: self.ledger.acquire("value"),
            value,
        })
    }

    fn call(
        &self,
        callable: &FakeCallable,
        args: Vec<FakeHandleValue>,
    ) -> Result<Option<FakeHandleValue>, BridgeError> {
        let Some(Entry::Function(function)) = callable.entries.get(&callable.name) else {
            unreachable!("callables are only created for functions");
        };
        let values: Vec<FakeValue> = args.iter().map(|arg| arg.value.clone()).collect();
        self.calls
            .borrow_mut()
            .push((callable.name.clone(), values.clone()));

        let returned = function(&values).map_err(|reason| BridgeError::Invocation {
            function: callable.name.clone(),
            reason,
        })?;
        Ok(returned.map(|value| FakeHandleValue {
            _handle: self.ledger.acquire("value"),
            value,
        }))
    }

    fn decode(&self, value: FakeHandleValue, kind: ResultKind) -> Result<ResultValue, BridgeError> {
        let mismatch =
            |value: &FakeValue| BridgeError::Decoding(format!("expected {kind}, got {value:?}"));
        match (kind, &value.value) {
            (ResultKind::Unit, _) => Ok(ResultValue::Absent),
            (ResultKind::Int, FakeValue::Int(n)) => Ok(ResultValue::Int(*n)),
            (ResultKind::Float, FakeValue::Float(x)) => Ok(ResultValue::Float(*x)),
            (ResultKind::Float, FakeValue::Int(n)) => Ok(ResultValue::Float(*n as f64)),
            (ResultKind::StringList, FakeValue::List(items)) => items
                .iter()
                .map(|item| match item {
                    FakeValue::Str(s) => Ok(s.clone()),
                    other => Err(mismatch(other)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(ResultValue::StringList),
            (_, other) => Err(mismatch(other)),
        }
    }
}
