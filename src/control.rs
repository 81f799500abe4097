// vim: tw=80
//! The control facade and its record/replay state machine.

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::answer::{self, AnswerRef};
use crate::behavior::MocksBehavior;
use crate::call::{Call, MockId};
use crate::error::{MockError, UsageError};
use crate::expectation::Builder;
use crate::matcher::{ArgumentCapture, Capture, CaptureCommit, Matcher};
use crate::range::Range;
use crate::value::{ArgValue, Throwable};

/// Member names that can never carry expectations.  Invoking one of these on
/// a mock while recording does not open a pending builder, and configuring an
/// expectation immediately afterwards fails.  During replay the proxy keeps
/// them out of the engine entirely and answers with identity semantics.
pub const RESERVED_METHODS: &[&str] = &[
    "replay",
    "verify",
    "reset",
    "eq",
    "ne",
    "hash",
    "fmt",
    "to_string",
    "clone",
    "drop",
];

/// The fixed rendering reserved `to_string`/`fmt` calls use during replay.
pub fn mock_display_name(type_name: &str) -> String {
    format!("Mock for {}", type_name)
}

/// Recording-side scratch state: the matchers and captures reported since the
/// last mocked call, the uncommitted builder for that call, and the name of a
/// reserved method if one was invoked last.
#[derive(Default)]
struct RecordState {
    pending_matchers: Option<Vec<Rc<dyn Matcher>>>,
    pending_captures: Vec<Rc<dyn CaptureCommit>>,
    current: Option<Builder>,
    unmockable_last_call: Option<String>,
}

impl RecordState {
    fn retire_current(
        &mut self,
        behavior: &mut MocksBehavior,
    ) -> Result<(), UsageError> {
        if let Some(builder) = self.current.as_mut() {
            builder.retire(behavior)?;
        }
        self.current = None;
        Ok(())
    }
}

enum ControlState {
    Recording(RecordState),
    Replaying,
}

/// Drives one record/replay/verify cycle for a family of mocks.
///
/// A single actor uses a `MockControl` synchronously; it is deliberately not
/// thread-safe.  The proxy layer routes every mocked invocation through
/// [`invoke`](MockControl::invoke) and applies the returned answer.
pub struct MockControl {
    state: ControlState,
    behavior: MocksBehavior,
}

impl MockControl {
    /// A fresh control in recording state with an empty registry.
    pub fn new() -> Self {
        MockControl {
            state: ControlState::Recording(RecordState::default()),
            behavior: MocksBehavior::new(),
        }
    }

    /// Is this member name reserved (unmockable)?
    pub fn is_reserved(name: &str) -> bool {
        RESERVED_METHODS.contains(&name)
    }

    /// Route one invocation from the proxy.
    ///
    /// While recording this opens a pending expectation for the call and
    /// answers the method's default value, so fluent recording code can
    /// evaluate the mocked expression without side effects.  While replaying
    /// it matches the call against the registry.
    pub fn invoke(&mut self, call: Call) -> Result<AnswerRef, MockError> {
        match &mut self.state {
            ControlState::Recording(record) => {
                if Self::is_reserved(call.method().name()) {
                    record.retire_current(&mut self.behavior)?;
                    record.pending_matchers = None;
                    record.pending_captures.clear();
                    record.unmockable_last_call =
                        Some(call.method().name().to_string());
                    return Ok(answer::value(call.default_return_value()));
                }
                Builder::check_matcher_count(
                    &call,
                    record.pending_matchers.as_deref(),
                )?;
                record.retire_current(&mut self.behavior)?;
                let provisional = answer::value(call.default_return_value());
                let matchers = record.pending_matchers.take();
                let captures = std::mem::take(&mut record.pending_captures);
                record.current = Some(Builder::new(call, matchers, captures));
                record.unmockable_last_call = None;
                Ok(provisional)
            }
            ControlState::Replaying => {
                Ok(self.behavior.add_actual(&call)?)
            }
        }
    }

    /// Freeze recording and switch to replay.  Retires the pending builder,
    /// which may commit a final expectation or reject the switch.
    pub fn replay(&mut self) -> Result<(), MockError> {
        match &mut self.state {
            ControlState::Recording(record) => {
                record.retire_current(&mut self.behavior)?;
            }
            ControlState::Replaying => {
                return Err(UsageError::AlreadyReplaying.into());
            }
        }
        debug!("switching to replay state");
        self.state = ControlState::Replaying;
        Ok(())
    }

    /// Check that every expectation's call count lies within its range.
    pub fn verify(&self) -> Result<(), MockError> {
        match &self.state {
            ControlState::Recording(_) => {
                Err(UsageError::VerifyDuringRecording.into())
            }
            ControlState::Replaying => Ok(self.behavior.verify()?),
        }
    }

    /// Discard all expectations and nice-mock flags and return to an empty
    /// recording state.  Valid in either state.
    pub fn reset(&mut self) {
        debug!("resetting control");
        self.behavior = MocksBehavior::new();
        self.state = ControlState::Recording(RecordState::default());
    }

    /// The fluent setters for the most recently recorded call.
    pub fn expect_last_call(
        &mut self,
    ) -> Result<ExpectationSetters<'_>, MockError> {
        match &mut self.state {
            ControlState::Recording(record) => {
                if let Some(name) = &record.unmockable_last_call {
                    return Err(UsageError::CannotMockReservedMethod {
                        name: name.clone(),
                    }
                    .into());
                }
                match record.current.as_mut() {
                    Some(builder) => Ok(ExpectationSetters {
                        builder,
                        behavior: &mut self.behavior,
                    }),
                    None => Err(UsageError::NoPendingCall.into()),
                }
            }
            ControlState::Replaying => {
                Err(UsageError::ExpectDuringReplay.into())
            }
        }
    }

    /// Report an explicit matcher for the next recorded call's next argument
    /// position.
    pub fn report_matcher(
        &mut self,
        matcher: impl Matcher + 'static,
    ) -> Result<(), MockError> {
        match &mut self.state {
            ControlState::Recording(record) => {
                record
                    .pending_matchers
                    .get_or_insert_with(Vec::new)
                    .push(Rc::new(matcher));
                Ok(())
            }
            ControlState::Replaying => {
                Err(UsageError::MatchersNotAllowedDuringReplay.into())
            }
        }
    }

    /// Report a capturing matcher for the next recorded call's next argument
    /// position.  The same capture may appear at most once per recorded call.
    pub fn report_capture<T>(
        &mut self,
        capture: &Capture<T>,
    ) -> Result<(), MockError>
    where
        T: ArgValue + Clone,
    {
        match &mut self.state {
            ControlState::Recording(record) => {
                if record
                    .pending_captures
                    .iter()
                    .any(|c| c.capture_id() == capture.id())
                {
                    return Err(UsageError::DuplicateCapture.into());
                }
                let argument_capture =
                    Rc::new(ArgumentCapture::new(capture.clone()));
                record
                    .pending_matchers
                    .get_or_insert_with(Vec::new)
                    .push(argument_capture.clone() as Rc<dyn Matcher>);
                record.pending_captures.push(argument_capture);
                Ok(())
            }
            ControlState::Replaying => {
                Err(UsageError::CapturesNotAllowedDuringReplay.into())
            }
        }
    }

    /// Flag a mock as nice: unmatched replay calls answer the method's
    /// default value instead of failing.  Idempotent; valid in either state.
    pub fn set_to_nice(&mut self, mock: MockId) {
        self.behavior.add_nice_mock(mock);
    }

    /// Remove the nice flag.  Idempotent; valid in either state.
    pub fn set_to_not_nice(&mut self, mock: MockId) {
        self.behavior.remove_nice_mock(mock);
    }
}

impl Default for MockControl {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MockControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.state {
            ControlState::Recording(_) => "Recording",
            ControlState::Replaying => "Replaying",
        };
        f.debug_struct("MockControl").field("state", &state).finish()
    }
}

/// Fluent, fallible configuration of the most recently recorded call.
///
/// Borrowed from the control via
/// [`expect_last_call`](MockControl::expect_last_call); every method consumes
/// and returns the setters so configuration chains with `?`.
pub struct ExpectationSetters<'a> {
    builder: &'a mut Builder,
    behavior: &'a mut MocksBehavior,
}

impl ExpectationSetters<'_> {
    /// Answer the recorded call with a constant value.
    pub fn and_return<T: ArgValue>(
        mut self,
        value: T,
    ) -> Result<Self, MockError> {
        self.builder
            .and_return(&mut *self.behavior, Some(Box::new(value)))?;
        Ok(self)
    }

    /// Answer the recorded call with the null reference.
    pub fn and_return_null(mut self) -> Result<Self, MockError> {
        self.builder.and_return(&mut *self.behavior, None)?;
        Ok(self)
    }

    /// Answer the recorded call by throwing.
    pub fn and_throw(
        mut self,
        throwable: Throwable,
    ) -> Result<Self, MockError> {
        self.builder.and_throw(&mut *self.behavior, throwable)?;
        Ok(self)
    }

    /// Answer the recorded call with a user-supplied strategy, built with
    /// [`AnswerRef::new`] or one of the [`answer`](crate::answer) factories.
    pub fn and_answer(
        mut self,
        answer: AnswerRef,
    ) -> Result<Self, MockError> {
        self.builder.and_answer(&mut *self.behavior, answer)?;
        Ok(self)
    }

    /// Answer the recorded void call by invoking its trailing callback's
    /// success entry point.
    pub fn and_call_on_success<T: ArgValue>(
        mut self,
        result: T,
    ) -> Result<Self, MockError> {
        self.builder
            .and_call_on_success(&mut *self.behavior, Some(Box::new(result)))?;
        Ok(self)
    }

    /// Answer the recorded void call by invoking its trailing callback's
    /// failure entry point.
    pub fn and_call_on_failure(
        mut self,
        error: Throwable,
    ) -> Result<Self, MockError> {
        self.builder.and_call_on_failure(&mut *self.behavior, error)?;
        Ok(self)
    }

    /// Expect exactly `count` invocations.
    pub fn times(mut self, count: usize) -> Result<Self, MockError> {
        let range = Range::exactly(count)?;
        self.builder.times(&mut *self.behavior, range)?;
        Ok(self)
    }

    /// Expect between `min` and `max` invocations, inclusive.  `max` may be
    /// [`Range::UNLIMITED_MAX`].
    pub fn times_range(
        mut self,
        min: usize,
        max: usize,
    ) -> Result<Self, MockError> {
        let range = Range::new(min, max)?;
        self.builder.times(&mut *self.behavior, range)?;
        Ok(self)
    }

    /// Expect exactly one invocation.  This is the default when no count
    /// method is called.
    pub fn once(mut self) -> Result<Self, MockError> {
        self.builder.times(&mut *self.behavior, Range::DEFAULT)?;
        Ok(self)
    }

    /// Expect one or more invocations.
    pub fn at_least_once(mut self) -> Result<Self, MockError> {
        let range = Range::new(1, Range::UNLIMITED_MAX)?;
        self.builder.times(&mut *self.behavior, range)?;
        Ok(self)
    }

    /// Expect any number of invocations, including none.
    pub fn any_times(mut self) -> Result<Self, MockError> {
        let range = Range::new(0, Range::UNLIMITED_MAX)?;
        self.builder.times(&mut *self.behavior, range)?;
        Ok(self)
    }
}
