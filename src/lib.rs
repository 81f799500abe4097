// vim: tw=80
//! A record/replay mock object engine for Rust.
//!
//! Remock is the expectation engine behind a mocking proxy: a proxy layer
//! (hand-written or generated) intercepts calls to a mocked interface and
//! routes each one through a [`MockControl`].  The control is first used to
//! *record* expected invocations together with their answers and permitted
//! call counts, then switched to *replay* mode where real invocations are
//! matched against the recorded expectations, and finally asked to *verify*
//! that every expectation was satisfied.
//!
//! # Getting started
//!
//! The engine's contract with the proxy layer is small: the proxy builds a
//! [`Call`] for every invocation and asks the engine to resolve it to an
//! [`AnswerRef`], which it applies.  A minimal hand-written proxy looks like
//! the helpers in this crate's integration tests; the flow underneath is:
//!
//! ```
//! use std::rc::Rc;
//! use remock::{Call, Method, MockControl, MockId, ReturnKind};
//!
//! # fn main() -> Result<(), remock::MockError> {
//! let mut ctrl = MockControl::new();
//! let mock = MockId::new();
//! let return_string =
//!     Method::new("returnString", ReturnKind::Reference, vec![], vec![]);
//!
//! // Record: the invocation opens a pending expectation...
//! ctrl.invoke(Call::new(mock, Rc::clone(&return_string), vec![]))?;
//! // ...and the fluent setters configure it.
//! ctrl.expect_last_call()?.and_return("Hallo".to_string())?;
//!
//! ctrl.replay()?;
//!
//! // Replay: the same call now resolves to the recorded answer.
//! let answer =
//!     ctrl.invoke(Call::new(mock, Rc::clone(&return_string), vec![]))?;
//! let result = answer.resolve(&[]).unwrap().unwrap();
//! assert_eq!(result.downcast_ref::<String>().unwrap().as_str(), "Hallo");
//!
//! ctrl.verify()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Matching arguments
//!
//! By default a recorded call matches replayed calls whose arguments are
//! equal by value.  Explicit matchers are reported positionally before the
//! recorded call, either from the [`matcher`] constructors or adapted from
//! the [`predicates`] crate:
//!
//! ```
//! use std::rc::Rc;
//! use predicates::prelude::*;
//! use remock::{matcher, ArgType, Call, Method, MockControl, MockId,
//!              ReturnKind};
//!
//! # fn main() -> Result<(), remock::MockError> {
//! let mut ctrl = MockControl::new();
//! let mock = MockId::new();
//! let add = Method::new(
//!     "add",
//!     ReturnKind::Void,
//!     vec![ArgType::new("int"), ArgType::new("int")],
//!     vec![],
//! );
//!
//! ctrl.report_matcher(matcher::any())?;
//! ctrl.report_matcher(matcher::pred(predicate::gt(4i32)))?;
//! ctrl.invoke(Call::new(
//!     mock,
//!     Rc::clone(&add),
//!     vec![remock::arg(0i32), remock::arg(0i32)],
//! ))?;
//! ctrl.expect_last_call()?.any_times()?;
//! # ctrl.replay()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Call counts
//!
//! Every committed expectation carries a [`Range`] of permitted invocation
//! counts; the default is exactly once.  [`times`](ExpectationSetters::times),
//! [`times_range`](ExpectationSetters::times_range),
//! [`once`](ExpectationSetters::once),
//! [`at_least_once`](ExpectationSetters::at_least_once) and
//! [`any_times`](ExpectationSetters::any_times) commit the pending answer
//! with a range.  Matching is order-preserving: the earliest-declared
//! expectation that can still be invoked wins, so recording the same call
//! twice with different answers models "first calls behave one way, later
//! calls another".
//!
//! # Captures
//!
//! A [`Capture`] logs the argument values of matching replay invocations, in
//! call order, for later inspection.  Capturing is two-phase: matching only
//! proposes a value, and the value is committed to the log when the owning
//! expectation is actually selected.
//!
//! # Nice mocks
//!
//! [`set_to_nice`](MockControl::set_to_nice) makes unmatched replay calls on
//! one mock answer the method's default value (zero, false, null) instead of
//! failing; [`set_to_not_nice`](MockControl::set_to_not_nice) restores strict
//! behavior.
//!
//! # Failures
//!
//! Misusing the recording API raises a [`UsageError`]; violated expectations
//! at replay or verify time raise an [`ExpectationError`] carrying a full
//! diagnostic listing.  Both arrive as [`MockError`], which the proxy layer
//! propagates to its caller unmodified.

pub mod answer;
mod behavior;
mod call;
mod control;
mod error;
pub mod matcher;
mod range;
mod value;

mod expectation;

pub use answer::{Answer, AnswerRef};
pub use call::{ArgType, Call, Method, MockId, ReturnKind};
pub use control::{
    mock_display_name, ExpectationSetters, MockControl, RESERVED_METHODS,
};
pub use error::{ExpectationError, MockError, UsageError};
pub use matcher::{Capture, Matcher};
pub use range::Range;
pub use value::{
    arg, ArgValue, MockCallback, ReturnValue, Throwable, Value,
};

pub use predicates::prelude::{predicate, Predicate};
