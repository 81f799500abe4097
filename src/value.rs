// vim: tw=80
//! Dynamically typed argument and return values.
//!
//! The proxy layer hands the engine plain values; the engine compares, clones,
//! and renders them without knowing their concrete types.  [`ArgValue`] is the
//! capability bundle that makes this possible.  Implementations for the
//! standard scalar types, `String`, `&'static str`, `Option` and `Vec` ship
//! with the crate; proxy-level types (most importantly callback arguments)
//! implement the trait themselves.

use std::fmt;

use downcast::{downcast, Any};

/// A single dynamically typed value passed to or returned from a mocked call.
///
/// Equality is by value and never crosses concrete types.  `clone_arg` exists
/// because constant answers and captures must be able to re-produce a value on
/// every invocation.
pub trait ArgValue: Any + fmt::Debug {
    /// Value equality against another dynamically typed value.
    fn eq_value(&self, other: &dyn ArgValue) -> bool;

    /// Clone into a fresh boxed value.
    fn clone_arg(&self) -> Box<dyn ArgValue>;

    /// The callback capability, if this value is a callback argument.
    fn as_callback(&self) -> Option<&dyn MockCallback> {
        None
    }
}

downcast!(dyn ArgValue);

/// A boxed dynamically typed value.
pub type Value = Box<dyn ArgValue>;

/// A possibly absent return value.  `None` stands in for void and for the
/// null reference.
pub type ReturnValue = Option<Value>;

/// Box a concrete value for use as a call argument or return value.
pub fn arg<T: ArgValue>(value: T) -> Value {
    Box::new(value)
}

macro_rules! impl_arg_value {
    ($($t:ty),* $(,)?) => {$(
        impl ArgValue for $t {
            fn eq_value(&self, other: &dyn ArgValue) -> bool {
                other.downcast_ref::<$t>().map(|o| self == o).unwrap_or(false)
            }

            fn clone_arg(&self) -> Box<dyn ArgValue> {
                Box::new(self.clone())
            }
        }
    )*};
}

impl_arg_value! {
    bool, char,
    i8, i16, i32, i64, i128, isize,
    u8, u16, u32, u64, u128, usize,
    f32, f64,
    String, &'static str,
}

impl<T> ArgValue for Option<T>
where
    T: PartialEq + Clone + fmt::Debug + 'static,
{
    fn eq_value(&self, other: &dyn ArgValue) -> bool {
        other.downcast_ref::<Self>().map(|o| self == o).unwrap_or(false)
    }

    fn clone_arg(&self) -> Box<dyn ArgValue> {
        Box::new(self.clone())
    }
}

impl<T> ArgValue for Vec<T>
where
    T: PartialEq + Clone + fmt::Debug + 'static,
{
    fn eq_value(&self, other: &dyn ArgValue) -> bool {
        other.downcast_ref::<Self>().map(|o| self == o).unwrap_or(false)
    }

    fn clone_arg(&self) -> Box<dyn ArgValue> {
        Box::new(self.clone())
    }
}

/// The callback capability required by the callback-invoking answers.
///
/// A proxy argument type implements this (in addition to [`ArgValue`],
/// overriding [`ArgValue::as_callback`]) when the mocked method's last
/// parameter is an asynchronous callback.
pub trait MockCallback {
    /// Deliver a successful result to the callback.
    fn on_success(&self, value: Option<&dyn ArgValue>);

    /// Deliver a failure to the callback.
    fn on_failure(&self, error: &Throwable);
}

/// A value thrown by a mocked call.
///
/// Mirrors the source platform's division into unchecked throwables, which any
/// method may raise, and checked ones, which must appear in the method
/// signature's declared set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Throwable {
    type_name: String,
    message: Option<String>,
    unchecked: bool,
}

impl Throwable {
    /// A checked throwable; methods must declare it to throw it.
    pub fn checked(type_name: impl Into<String>) -> Self {
        Throwable { type_name: type_name.into(), message: None, unchecked: false }
    }

    /// An unchecked throwable; always permitted.
    pub fn unchecked(type_name: impl Into<String>) -> Self {
        Throwable { type_name: type_name.into(), message: None, unchecked: true }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_unchecked(&self) -> bool {
        self.unchecked
    }
}

impl fmt::Display for Throwable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(m) => write!(f, "{}: {}", self.type_name, m),
            None => write!(f, "{}", self.type_name),
        }
    }
}
