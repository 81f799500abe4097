// vim: tw=80
//! Argument matchers and value captures.
//!
//! A matcher is a predicate over one dynamically typed argument.  Matchers are
//! collected while recording and evaluated positionally while replaying.  The
//! capturing matcher is special: matching only *proposes* a value, and the
//! owning expectation commits every proposed value when (and only when) it is
//! actually selected for an invocation.

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use predicates::prelude::Predicate;

use crate::value::ArgValue;

/// Decides whether an actual argument is accepted.
///
/// `matches` must never fail; it only reports.  The engine takes care of
/// raising the unexpected-call failure when no expectation accepts a call.
pub trait Matcher {
    /// Does this matcher accept the given argument?
    fn matches(&self, actual: &dyn ArgValue) -> bool;

    /// One-line rendering used in failure diagnostics.
    fn describe(&self) -> String;
}

/// Matches any argument that is equal (by value) to the expected one.
///
/// This is the default matcher when a call is recorded with raw values.
pub struct Equals {
    expected: Box<dyn ArgValue>,
}

impl Equals {
    pub fn new(expected: Box<dyn ArgValue>) -> Self {
        Equals { expected }
    }
}

impl Matcher for Equals {
    fn matches(&self, actual: &dyn ArgValue) -> bool {
        self.expected.eq_value(actual)
    }

    fn describe(&self) -> String {
        format!("{:?}", self.expected)
    }
}

/// Matches any argument that is equal to the given value.
pub fn eq<T: ArgValue>(expected: T) -> Equals {
    Equals::new(Box::new(expected))
}

/// Matches any argument whatsoever.
pub struct AnyValue;

impl Matcher for AnyValue {
    fn matches(&self, _actual: &dyn ArgValue) -> bool {
        true
    }

    fn describe(&self) -> String {
        "<any>".to_string()
    }
}

/// Matches any argument whatsoever.
pub fn any() -> AnyValue {
    AnyValue
}

/// Matches any argument of the concrete type `T`.
pub struct TypedAny<T> {
    _type: PhantomData<fn(T)>,
}

impl<T: ArgValue> Matcher for TypedAny<T> {
    fn matches(&self, actual: &dyn ArgValue) -> bool {
        actual.downcast_ref::<T>().is_ok()
    }

    fn describe(&self) -> String {
        "<any>".to_string()
    }
}

/// Matches any argument of the concrete type `T`.
pub fn any_of<T: ArgValue>() -> TypedAny<T> {
    TypedAny { _type: PhantomData }
}

/// Matches any argument exposing the callback capability.
pub struct CallbackMatcher;

impl Matcher for CallbackMatcher {
    fn matches(&self, actual: &dyn ArgValue) -> bool {
        actual.as_callback().is_some()
    }

    fn describe(&self) -> String {
        "<callback>".to_string()
    }
}

/// Matches any argument exposing the callback capability.
pub fn callback() -> CallbackMatcher {
    CallbackMatcher
}

/// Adapts a typed [`Predicate`] into a dynamically typed matcher.
///
/// Arguments of a different concrete type are rejected without evaluating the
/// predicate.
pub struct Pred<T, P> {
    pred: P,
    _type: PhantomData<fn(T)>,
}

impl<T, P> Matcher for Pred<T, P>
where
    T: ArgValue,
    P: Predicate<T>,
{
    fn matches(&self, actual: &dyn ArgValue) -> bool {
        actual
            .downcast_ref::<T>()
            .map(|v| self.pred.eval(v))
            .unwrap_or(false)
    }

    fn describe(&self) -> String {
        self.pred.to_string()
    }
}

/// Matches any argument of type `T` satisfying the given predicate.
pub fn pred<T, P>(pred: P) -> Pred<T, P>
where
    T: ArgValue,
    P: Predicate<T>,
{
    Pred { pred, _type: PhantomData }
}

/// An ordered, append-only log of values captured from matching replay
/// invocations.
///
/// A `Capture` is a cheap handle; clones share the same log.  User code keeps
/// one handle and hands a clone to the engine via
/// [`MockControl::report_capture`](crate::MockControl::report_capture), then
/// inspects the log after replaying.
pub struct Capture<T> {
    values: Rc<RefCell<Vec<T>>>,
}

impl<T> Capture<T> {
    pub fn new() -> Self {
        Capture { values: Rc::new(RefCell::new(Vec::new())) }
    }

    /// Reset to a "nothing captured yet" state.
    pub fn reset(&self) {
        self.values.borrow_mut().clear();
    }

    /// True if something was captured.
    pub fn has_captured(&self) -> bool {
        !self.values.borrow().is_empty()
    }

    /// Identity of the underlying log, used to reject reusing one capture
    /// twice within a single recorded call.
    pub(crate) fn id(&self) -> usize {
        Rc::as_ptr(&self.values) as *const () as usize
    }

    pub(crate) fn capture_value(&self, value: T) {
        self.values.borrow_mut().push(value);
    }
}

impl<T: Clone> Capture<T> {
    /// All captured values, in invocation order.
    pub fn values(&self) -> Vec<T> {
        self.values.borrow().clone()
    }

    /// The first captured value.
    pub fn first_value(&self) -> Option<T> {
        self.values.borrow().first().cloned()
    }

    /// The last captured value.
    pub fn last_value(&self) -> Option<T> {
        self.values.borrow().last().cloned()
    }
}

impl<T> Clone for Capture<T> {
    fn clone(&self) -> Self {
        Capture { values: Rc::clone(&self.values) }
    }
}

impl<T> Default for Capture<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Display for Capture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self.values.borrow();
        if values.is_empty() {
            return write!(f, "<nothing>");
        }
        for (i, value) in values.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", value)?;
        }
        Ok(())
    }
}

/// Commit half of the two-phase capture side effect.
pub(crate) trait CaptureCommit {
    /// Identity of the backing [`Capture`] log.
    fn capture_id(&self) -> usize;

    /// Append the proposed value to the backing log.
    fn commit(&self);
}

/// Matches any argument and remembers it as the *potential* capture.  The
/// value only reaches the backing [`Capture`] log when the owning expectation
/// is selected and invoked, so repeated invocations capture once each, in
/// call order.
pub(crate) struct ArgumentCapture<T> {
    capture: Capture<T>,
    potential: RefCell<Option<T>>,
}

impl<T> ArgumentCapture<T> {
    pub(crate) fn new(capture: Capture<T>) -> Self {
        ArgumentCapture { capture, potential: RefCell::new(None) }
    }
}

impl<T> Matcher for ArgumentCapture<T>
where
    T: ArgValue + Clone,
{
    fn matches(&self, actual: &dyn ArgValue) -> bool {
        *self.potential.borrow_mut() =
            actual.downcast_ref::<T>().ok().cloned();
        true
    }

    fn describe(&self) -> String {
        format!("captured({})", self.capture)
    }
}

impl<T> CaptureCommit for ArgumentCapture<T>
where
    T: ArgValue + Clone,
{
    fn capture_id(&self) -> usize {
        self.capture.id()
    }

    fn commit(&self) {
        if let Some(value) = self.potential.borrow().clone() {
            self.capture.capture_value(value);
        }
    }
}
