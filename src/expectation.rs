// vim: tw=80
//! Recorded expectations and the builder that accumulates them.

use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::answer::{self, AnswerRef};
use crate::behavior::MocksBehavior;
use crate::call::Call;
use crate::error::UsageError;
use crate::matcher::{CaptureCommit, Equals, Matcher};
use crate::range::Range;
use crate::value::{ArgValue, ReturnValue, Throwable};

/// One recorded expectation: the template call, its positional matchers, its
/// captures, its answer, its permitted invocation-count range, and the live
/// invocation counter.
pub(crate) struct ExpectedCall {
    call: Call,
    matchers: Vec<Rc<dyn Matcher>>,
    captures: Vec<Rc<dyn CaptureCommit>>,
    answer: AnswerRef,
    range: Range,
    invocation_count: usize,
}

impl ExpectedCall {
    fn new(
        call: Call,
        matchers: Vec<Rc<dyn Matcher>>,
        captures: Vec<Rc<dyn CaptureCommit>>,
        answer: AnswerRef,
        range: Range,
    ) -> Self {
        ExpectedCall { call, matchers, captures, answer, range, invocation_count: 0 }
    }

    /// Does the actual call match this expectation?  Same mock, same method,
    /// and every positional matcher accepts.
    pub(crate) fn matches(&self, actual: &Call) -> bool {
        self.call.mock() == actual.mock()
            && self.call.method().name() == actual.method().name()
            && self.matches_arguments(actual)
    }

    fn matches_arguments(&self, actual: &Call) -> bool {
        let arguments = actual.arguments();
        if arguments.len() != self.matchers.len() {
            return false;
        }
        self.matchers
            .iter()
            .zip(arguments)
            .all(|(matcher, argument)| matcher.matches(argument.as_ref()))
    }

    /// Is the invocation counter within the permitted range?
    pub(crate) fn expectation_met(&self) -> bool {
        self.range.includes(self.invocation_count)
    }

    /// Can this expectation absorb one more invocation?
    pub(crate) fn can_be_invoked(&self) -> bool {
        self.invocation_count < self.range.max()
    }

    /// Count one invocation, commit all pending captures, and hand out the
    /// answer.
    pub(crate) fn invoke(&mut self) -> AnswerRef {
        self.invocation_count += 1;
        for capture in &self.captures {
            capture.commit();
        }
        self.answer.clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.invocation_count
    }

    pub(crate) fn range(&self) -> Range {
        self.range
    }
}

impl fmt::Display for ExpectedCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.call.method().name())?;
        for (i, matcher) in self.matchers.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", matcher.describe())?;
        }
        write!(f, ")")
    }
}

/// Accumulates answer and range configuration for the most recently recorded
/// call, committing one [`ExpectedCall`] into the registry per count method.
///
/// The public fluent surface is
/// [`ExpectationSetters`](crate::ExpectationSetters); this is the state behind
/// it, owned by the recording half of the control.
pub(crate) struct Builder {
    call: Call,
    matchers: Vec<Rc<dyn Matcher>>,
    captures: Vec<Rc<dyn CaptureCommit>>,
    answer: Option<AnswerRef>,
    unused_answer: bool,
    used_at_least_once: bool,
    retired: bool,
}

impl Builder {
    /// Validate an explicit matcher list against the call's argument count.
    /// Called before [`Builder::new`] so a rejected recording leaves the
    /// pending buffers untouched.
    pub(crate) fn check_matcher_count(
        call: &Call,
        matchers: Option<&[Rc<dyn Matcher>]>,
    ) -> Result<(), UsageError> {
        if let Some(matchers) = matchers {
            if matchers.len() != call.arguments().len() {
                return Err(UsageError::MatcherCountMismatch {
                    expected: call.arguments().len(),
                    recorded: matchers.len(),
                });
            }
        }
        Ok(())
    }

    /// Build from the just-recorded call and the matchers/captures collected
    /// since the previous mocked call.  With no explicit matchers, every
    /// argument gets an equality matcher.
    pub(crate) fn new(
        call: Call,
        matchers: Option<Vec<Rc<dyn Matcher>>>,
        captures: Vec<Rc<dyn CaptureCommit>>,
    ) -> Self {
        debug_assert!(Self::check_matcher_count(&call, matchers.as_deref()).is_ok());
        let matchers = matchers.unwrap_or_else(|| {
            call.arguments()
                .iter()
                .map(|argument| {
                    Rc::new(Equals::new(argument.clone_arg())) as Rc<dyn Matcher>
                })
                .collect()
        });
        Builder {
            call,
            matchers,
            captures,
            answer: None,
            unused_answer: false,
            used_at_least_once: false,
            retired: false,
        }
    }

    fn check_not_retired(&self) -> Result<(), UsageError> {
        if self.retired {
            return Err(UsageError::BuilderRetired);
        }
        Ok(())
    }

    /// Install an answer.  A previously installed but uncommitted answer is
    /// auto-committed with the default range first, so one recorded call can
    /// chain distinct answers for successive invocations.
    pub(crate) fn and_answer(
        &mut self,
        behavior: &mut MocksBehavior,
        answer: AnswerRef,
    ) -> Result<(), UsageError> {
        self.check_not_retired()?;
        if self.unused_answer {
            self.save_expectation(behavior, Range::DEFAULT)?;
        }
        self.answer = Some(answer);
        self.unused_answer = true;
        Ok(())
    }

    pub(crate) fn and_return(
        &mut self,
        behavior: &mut MocksBehavior,
        value: ReturnValue,
    ) -> Result<(), UsageError> {
        let method = self.call.method();
        if method.is_void() {
            return Err(UsageError::VoidReturnNotAllowed);
        }
        if method.return_kind().is_primitive() && value.is_none() {
            return Err(UsageError::NullPrimitiveReturn);
        }
        self.and_answer(behavior, answer::value(value))
    }

    pub(crate) fn and_throw(
        &mut self,
        behavior: &mut MocksBehavior,
        throwable: Throwable,
    ) -> Result<(), UsageError> {
        if !self.call.method().can_throw(&throwable) {
            return Err(UsageError::UndeclaredThrowable {
                throwable: throwable.type_name().to_string(),
                method: self.call.method().to_string(),
            });
        }
        self.and_answer(behavior, answer::throwable(throwable))
    }

    fn check_callback_answer(&self) -> Result<(), UsageError> {
        if !self.call.method().is_void() {
            return Err(UsageError::NotVoidMethod);
        }
        if !self.call.method().takes_callback() {
            return Err(UsageError::NoCallbackArgument);
        }
        Ok(())
    }

    pub(crate) fn and_call_on_success(
        &mut self,
        behavior: &mut MocksBehavior,
        result: ReturnValue,
    ) -> Result<(), UsageError> {
        self.check_callback_answer()?;
        self.and_answer(behavior, answer::on_success(result))
    }

    pub(crate) fn and_call_on_failure(
        &mut self,
        behavior: &mut MocksBehavior,
        error: Throwable,
    ) -> Result<(), UsageError> {
        self.check_callback_answer()?;
        self.and_answer(behavior, answer::on_failure(error))
    }

    /// Commit the configured answer and the given range as one new
    /// expectation.
    pub(crate) fn times(
        &mut self,
        behavior: &mut MocksBehavior,
        range: Range,
    ) -> Result<(), UsageError> {
        self.save_expectation(behavior, range)
    }

    fn save_expectation(
        &mut self,
        behavior: &mut MocksBehavior,
        range: Range,
    ) -> Result<(), UsageError> {
        self.check_not_retired()?;
        if !self.call.method().is_void() && !self.unused_answer {
            return Err(UsageError::MissingBehaviorDefinition {
                call: self.call.to_string(),
            });
        }
        // Void methods do not need an answer; substitute a dummy one.
        let answer = match &self.answer {
            Some(answer) => answer.clone(),
            None => answer::value(None),
        };
        trace!(call = %self.call, %range, "committing expectation");
        behavior.add_expected(ExpectedCall::new(
            self.call.clone(),
            self.matchers.clone(),
            self.captures.clone(),
            answer,
            range,
        ));
        self.unused_answer = false;
        self.used_at_least_once = true;
        Ok(())
    }

    /// Flush at a state-transition boundary: recording moved to another call
    /// or to replay.  An unused builder force-commits once with the default
    /// range; afterwards every operation fails with `BuilderRetired`.
    pub(crate) fn retire(
        &mut self,
        behavior: &mut MocksBehavior,
    ) -> Result<(), UsageError> {
        if self.unused_answer || !self.used_at_least_once {
            self.save_expectation(behavior, Range::DEFAULT)?;
        }
        self.retired = true;
        Ok(())
    }
}
