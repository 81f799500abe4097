// vim: tw=80
//! Method signatures and invocation records.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::value::{ReturnValue, Throwable, Value};

/// Identity of one mock instance.  The proxy layer allocates one id per mock
/// it creates; comparing ids stands in for reference equality on the mock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MockId(u64);

impl MockId {
    /// Allocate a fresh, process-unique id.
    pub fn new() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        MockId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for MockId {
    fn default() -> Self {
        Self::new()
    }
}

/// Return-type descriptor of a mockable method.
///
/// Owns the mapping from a primitive kind to its zero value; reference and
/// void kinds default to no value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReturnKind {
    Void,
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    /// Any non-primitive type; defaults to the null reference.
    Reference,
}

impl ReturnKind {
    pub fn is_void(&self) -> bool {
        matches!(self, ReturnKind::Void)
    }

    pub fn is_primitive(&self) -> bool {
        !matches!(self, ReturnKind::Void | ReturnKind::Reference)
    }

    /// The zero value for primitives, no value otherwise.
    pub fn default_value(&self) -> ReturnValue {
        match self {
            ReturnKind::Void | ReturnKind::Reference => None,
            ReturnKind::Bool => Some(Box::new(false)),
            ReturnKind::Char => Some(Box::new('\0')),
            ReturnKind::I8 => Some(Box::new(0i8)),
            ReturnKind::I16 => Some(Box::new(0i16)),
            ReturnKind::I32 => Some(Box::new(0i32)),
            ReturnKind::I64 => Some(Box::new(0i64)),
            ReturnKind::F32 => Some(Box::new(0.0f32)),
            ReturnKind::F64 => Some(Box::new(0.0f64)),
        }
    }
}

/// Declared type of one method argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArgType {
    name: String,
    callback: bool,
}

impl ArgType {
    pub fn new(name: impl Into<String>) -> Self {
        ArgType { name: name.into(), callback: false }
    }

    /// An argument type satisfying the callback capability.
    pub fn callback(name: impl Into<String>) -> Self {
        ArgType { name: name.into(), callback: true }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_callback(&self) -> bool {
        self.callback
    }
}

/// A method that can be called on a mock object.
///
/// Immutable and shared (via `Rc`) by every [`Call`] to the same member.
#[derive(Debug)]
pub struct Method {
    name: String,
    return_kind: ReturnKind,
    argument_types: Vec<ArgType>,
    declared_throwables: Vec<String>,
}

impl Method {
    pub fn new(
        name: impl Into<String>,
        return_kind: ReturnKind,
        argument_types: Vec<ArgType>,
        declared_throwables: Vec<String>,
    ) -> Rc<Self> {
        Rc::new(Method {
            name: name.into(),
            return_kind,
            argument_types,
            declared_throwables,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn return_kind(&self) -> ReturnKind {
        self.return_kind
    }

    pub fn argument_types(&self) -> &[ArgType] {
        &self.argument_types
    }

    pub fn is_void(&self) -> bool {
        self.return_kind.is_void()
    }

    /// Whether the last declared argument satisfies the callback capability.
    pub fn takes_callback(&self) -> bool {
        self.argument_types.last().map(ArgType::is_callback).unwrap_or(false)
    }

    /// Unchecked throwables are always permitted; checked ones must be in the
    /// declared set.
    pub fn can_throw(&self, throwable: &Throwable) -> bool {
        throwable.is_unchecked()
            || self
                .declared_throwables
                .iter()
                .any(|t| t == throwable.type_name())
    }

    pub fn default_return_value(&self) -> ReturnValue {
        self.return_kind.default_value()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, argument) in self.argument_types.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", argument.name())?;
        }
        write!(f, ")")
    }
}

/// An immutable record of one invocation: which mock, which method, which
/// arguments.
///
/// Variadic trailing arguments are flattened into the ordered argument list at
/// construction time via [`Call::with_var_args`]; after that the record never
/// changes.
pub struct Call {
    mock: MockId,
    method: Rc<Method>,
    arguments: Vec<Value>,
}

impl Call {
    pub fn new(mock: MockId, method: Rc<Method>, arguments: Vec<Value>) -> Self {
        Call { mock, method, arguments }
    }

    /// Flatten a variadic tail into the argument list.
    pub fn with_var_args(
        mut self,
        args: impl IntoIterator<Item = Value>,
    ) -> Self {
        self.arguments.extend(args);
        self
    }

    pub fn mock(&self) -> MockId {
        self.mock
    }

    pub fn method(&self) -> &Rc<Method> {
        &self.method
    }

    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    pub fn default_return_value(&self) -> ReturnValue {
        self.method.default_return_value()
    }
}

impl Clone for Call {
    fn clone(&self) -> Self {
        Call {
            mock: self.mock,
            method: Rc::clone(&self.method),
            arguments: self.arguments.iter().map(|a| a.clone_arg()).collect(),
        }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.method.name())?;
        for (i, argument) in self.arguments.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", argument)?;
        }
        write!(f, ")")
    }
}

impl fmt::Debug for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
