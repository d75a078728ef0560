use std::fmt;

/// A single native argument, borrowed from an [`Arguments`] list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg<'a> {
    Str(&'a str),
    Int(i64),
    Float(f64),
}

/// The argument shapes a scripted function can be called with.
///
/// The bridge never needs variadic or mixed-arity calls, so every call site picks one
/// of these shapes up front instead of going through a family of overloads.
#[derive(Debug, Clone, PartialEq)]
pub enum Arguments {
    None,
    Str(String),
    Int(i64),
    Float(f64),
    StrPair(String, String),
}

impl Arguments {
    /// Positional view of the arguments, in call order.
    pub fn args(&self) -> Vec<Arg<'_>> {
        match self {
            Arguments::None => Vec::new(),
            Arguments::Str(s) => vec![Arg::Str(s)],
            Arguments::Int(n) => vec![Arg::Int(*n)],
            Arguments::Float(x) => vec![Arg::Float(*x)],
            Arguments::StrPair(first, second) => vec![Arg::Str(first), Arg::Str(second)],
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Arguments::None => 0,
            Arguments::Str(_) | Arguments::Int(_) | Arguments::Float(_) => 1,
            Arguments::StrPair(..) => 2,
        }
    }
}

/// What the caller expects a scripted function to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    /// Called for its side effects; whatever comes back is discarded.
    Unit,
    Int,
    Float,
    StringList,
}

impl ResultKind {
    /// Whether a missing return value is an error for this kind.
    pub fn expects_value(self) -> bool {
        !matches!(self, ResultKind::Unit)
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResultKind::Unit => "nothing",
            ResultKind::Int => "an integer",
            ResultKind::Float => "a number",
            ResultKind::StringList => "a list of strings",
        };
        f.write_str(name)
    }
}

/// A decoded result. `Absent` is only produced for [`ResultKind::Unit`] calls, so a
/// legitimate `Int(0)` or an empty list can never be confused with "no result".
#[derive(Debug, Clone, PartialEq)]
pub enum ResultValue {
    Absent,
    Int(i64),
    Float(f64),
    StringList(Vec<String>),
}

impl ResultValue {
    pub fn kind(&self) -> ResultKind {
        match self {
            ResultValue::Absent => ResultKind::Unit,
            ResultValue::Int(_) => ResultKind::Int,
            ResultValue::Float(_) => ResultKind::Float,
            ResultValue::StringList(_) => ResultKind::StringList,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ResultValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ResultValue::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn into_strings(self) -> Option<Vec<String>> {
        match self {
            ResultValue::StringList(items) => Some(items),
            _ => None,
        }
    }
}
