// vim: tw=80
//! Answer strategies for matched replay invocations.
//!
//! An answer either produces a return value, throws, or drives the call's
//! trailing callback argument.  The factories here cover the built-in
//! strategies; anything else goes through [`from_fn`] or a hand-written
//! [`Answer`] implementation.

use std::cell::RefCell;
use std::rc::Rc;

use crate::value::{ArgValue, MockCallback, ReturnValue, Throwable, Value};

/// Computes the outcome of one matched invocation from its argument list.
pub trait Answer {
    /// Produce the return value, or the throwable to be re-raised by the
    /// proxy.
    fn resolve(&mut self, args: &[Value]) -> Result<ReturnValue, Throwable>;
}

/// A shared handle to an [`Answer`].
///
/// The engine hands this to the proxy, which applies it by calling
/// [`resolve`](AnswerRef::resolve) with the invocation's arguments.  One
/// expectation's answer is shared across all of its invocations.
#[derive(Clone)]
pub struct AnswerRef(Rc<RefCell<dyn Answer>>);

impl AnswerRef {
    pub fn new(answer: impl Answer + 'static) -> Self {
        AnswerRef(Rc::new(RefCell::new(answer)))
    }

    pub fn resolve(&self, args: &[Value]) -> Result<ReturnValue, Throwable> {
        self.0.borrow_mut().resolve(args)
    }
}

struct ValueAnswer(ReturnValue);

impl Answer for ValueAnswer {
    fn resolve(&mut self, _args: &[Value]) -> Result<ReturnValue, Throwable> {
        Ok(self.0.as_ref().map(|v| v.clone_arg()))
    }
}

/// Answer with a constant value (or no value, for void and null returns).
pub fn value(value: ReturnValue) -> AnswerRef {
    AnswerRef::new(ValueAnswer(value))
}

struct ThrowAnswer(Throwable);

impl Answer for ThrowAnswer {
    fn resolve(&mut self, _args: &[Value]) -> Result<ReturnValue, Throwable> {
        Err(self.0.clone())
    }
}

/// Answer by throwing the given throwable on every invocation.
pub fn throwable(throwable: Throwable) -> AnswerRef {
    AnswerRef::new(ThrowAnswer(throwable))
}

struct FnAnswer<F>(F);

impl<F> Answer for FnAnswer<F>
where
    F: FnMut(&[Value]) -> Result<ReturnValue, Throwable>,
{
    fn resolve(&mut self, args: &[Value]) -> Result<ReturnValue, Throwable> {
        (self.0)(args)
    }
}

/// Answer computed by a user function over the invocation's arguments.
pub fn from_fn<F>(f: F) -> AnswerRef
where
    F: FnMut(&[Value]) -> Result<ReturnValue, Throwable> + 'static,
{
    AnswerRef::new(FnAnswer(f))
}

fn last_callback(args: &[Value]) -> Result<&dyn MockCallback, Throwable> {
    args.last().and_then(|arg| arg.as_callback()).ok_or_else(|| {
        Throwable::unchecked("IllegalArgumentException")
            .with_message("no callback provided as last argument")
    })
}

struct OnSuccessAnswer(ReturnValue);

impl Answer for OnSuccessAnswer {
    fn resolve(&mut self, args: &[Value]) -> Result<ReturnValue, Throwable> {
        last_callback(args)?.on_success(self.0.as_deref());
        Ok(None)
    }
}

/// Answer by invoking the trailing callback argument's success entry point
/// with the given result.
pub fn on_success(result: ReturnValue) -> AnswerRef {
    AnswerRef::new(OnSuccessAnswer(result))
}

struct OnFailureAnswer(Throwable);

impl Answer for OnFailureAnswer {
    fn resolve(&mut self, args: &[Value]) -> Result<ReturnValue, Throwable> {
        last_callback(args)?.on_failure(&self.0);
        Ok(None)
    }
}

/// Answer by invoking the trailing callback argument's failure entry point
/// with the given error.
pub fn on_failure(error: Throwable) -> AnswerRef {
    AnswerRef::new(OnFailureAnswer(error))
}
