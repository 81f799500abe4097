// vim: tw=80
//! The expectation registry: every recorded expectation of one control, in
//! declaration order, plus the set of mocks flagged "nice".

use std::collections::HashSet;
use std::fmt::Write;

use tracing::debug;

use crate::answer::{self, AnswerRef};
use crate::call::{Call, MockId};
use crate::error::ExpectationError;
use crate::expectation::ExpectedCall;

pub(crate) struct MocksBehavior {
    expected_calls: Vec<ExpectedCall>,
    nice_mocks: HashSet<MockId>,
}

impl MocksBehavior {
    pub(crate) fn new() -> Self {
        MocksBehavior { expected_calls: Vec::new(), nice_mocks: HashSet::new() }
    }

    pub(crate) fn add_expected(&mut self, expected: ExpectedCall) {
        self.expected_calls.push(expected);
    }

    /// Match an actual call against the registry, earliest declaration first.
    ///
    /// Expectations whose counter already reached their range's max are
    /// skipped; of the rest, the first whose identity and matchers accept the
    /// call wins, gets its counter bumped and its captures committed, and
    /// yields its answer.  Unmatched calls on nice mocks fall back to the
    /// method's default value; anything else is an unexpected-call failure.
    pub(crate) fn add_actual(
        &mut self,
        actual: &Call,
    ) -> Result<AnswerRef, ExpectationError> {
        for expected in &mut self.expected_calls {
            if !expected.can_be_invoked() {
                continue;
            }
            if !expected.matches(actual) {
                continue;
            }
            return Ok(expected.invoke());
        }

        if self.nice_mocks.contains(&actual.mock()) {
            return Ok(answer::value(actual.default_return_value()));
        }

        debug!(call = %actual, "unexpected method call");
        let mut error = format!("\n  Unexpected method call {}. ", actual);
        self.append_expectation_list(&mut error, Some(actual));
        Err(ExpectationError::UnexpectedCall(error))
    }

    /// Check that every expectation's counter lies within its range.
    pub(crate) fn verify(&self) -> Result<(), ExpectationError> {
        if self.expected_calls.iter().all(ExpectedCall::expectation_met) {
            return Ok(());
        }
        debug!("expectation failure on verify");
        let mut error = String::from("\n  Expectation failure on verify. ");
        self.append_expectation_list(&mut error, None);
        Err(ExpectationError::ExpectationsUnmet(error))
    }

    pub(crate) fn add_nice_mock(&mut self, mock: MockId) {
        self.nice_mocks.insert(mock);
    }

    pub(crate) fn remove_nice_mock(&mut self, mock: MockId) {
        self.nice_mocks.remove(&mock);
    }

    /// Render the full expectation listing.  Entries whose count is outside
    /// their range are marked with `--> `; when a rejected call is given,
    /// entries that structurally match it are marked with ` (+1)`.
    fn append_expectation_list(&self, out: &mut String, rejected: Option<&Call>) {
        out.push_str("List of all expectations:");

        if self.expected_calls.is_empty() {
            out.push_str("\n    <empty>\n");
            return;
        }

        if rejected.is_some() {
            out.push_str("\n  Potential matches are marked with (+1).");
        }

        for expected in &self.expected_calls {
            out.push_str("\n    ");
            out.push_str(if expected.expectation_met() { "    " } else { "--> " });
            let _ = write!(
                out,
                "{}: expected {}, actual {}",
                expected,
                expected.range(),
                expected.call_count()
            );
            if rejected.is_some_and(|call| expected.matches(call)) {
                out.push_str(" (+1)");
            }
        }

        out.push('\n');
    }
}
