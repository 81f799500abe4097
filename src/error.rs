// vim: tw=80
//! Error types raised by the engine.
//!
//! There are two broad kinds, and the proxy layer must be able to tell them
//! apart: [`UsageError`] reports programmer misuse of the recording API, while
//! [`ExpectationError`] is an assertion-style failure raised at replay or
//! verify time.  Both are unified under [`MockError`] at the public boundary.

use thiserror::Error;

/// Configuration errors: illegal use of the recording/building API.
///
/// These are reported immediately and never retried.  A rejected operation
/// leaves the expectation registry and any pending recording state unmodified.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum UsageError {
    /// An invocation-count range failed validation.
    #[error("invalid range: {0}")]
    InvalidRange(&'static str),

    /// An explicit matcher list disagrees with the call's argument count.
    #[error("{expected} matchers expected, {recorded} recorded. \
             Matchers must not be mixed with raw values when recording a call")]
    MatcherCountMismatch { expected: usize, recorded: usize },

    /// `and_return` on a void method.
    #[error("Cannot add return value to void method")]
    VoidReturnNotAllowed,

    /// `and_return_null` on a method with a primitive return type.
    #[error("Cannot add 'null' as return value to primitive method")]
    NullPrimitiveReturn,

    /// A checked throwable that the method signature does not declare.
    #[error("{throwable} is not declared by {method}")]
    UndeclaredThrowable { throwable: String, method: String },

    /// A callback answer was configured for a non-void method.
    #[error("callback answers are only supported for void methods")]
    NotVoidMethod,

    /// A callback answer was configured but the method's last declared
    /// argument is not a callback.
    #[error("callback answers require a callback as last declared argument")]
    NoCallbackArgument,

    /// The same capture was used twice within one recorded call.
    #[error("Cannot use same capture twice for same method call")]
    DuplicateCapture,

    /// The expectation setter was used after it was retired.
    #[error("Cannot use this expectation setter anymore")]
    BuilderRetired,

    /// A non-void recorded call was committed without any answer.
    #[error("Missing behavior definition for preceding method call {call}")]
    MissingBehaviorDefinition { call: String },

    /// An expectation was configured for a reserved, unmockable method.
    #[error("Method {name} cannot be mocked")]
    CannotMockReservedMethod { name: String },

    /// `expect_last_call` without a preceding mocked call.
    #[error("Method call on mock needed before setting expectations")]
    NoPendingCall,

    /// `verify` while still recording.
    #[error("Calling verify is not allowed in record state")]
    VerifyDuringRecording,

    /// `replay` while already replaying.
    #[error("Cannot switch to replay mode while in replay state")]
    AlreadyReplaying,

    /// `expect_last_call` while replaying.
    #[error("Cannot set expectations while in replay state")]
    ExpectDuringReplay,

    /// A matcher was reported while replaying.
    #[error("Argument matchers must not be used in replay state")]
    MatchersNotAllowedDuringReplay,

    /// A capture was reported while replaying.
    #[error("Captures must not be used in replay state")]
    CapturesNotAllowedDuringReplay,
}

/// Expectation-violation failures raised at replay or verify time.
///
/// The payload is the full diagnostic listing of every recorded expectation;
/// its format is part of the public contract and is asserted on verbatim by
/// tests.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ExpectationError {
    /// A replayed call matched no live expectation.
    #[error("{0}")]
    UnexpectedCall(String),

    /// `verify` found an expectation whose call count is outside its range.
    #[error("{0}")]
    ExpectationsUnmet(String),
}

/// Any failure the engine can hand to the proxy layer.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MockError {
    #[error(transparent)]
    Usage(#[from] UsageError),
    #[error(transparent)]
    Expectation(#[from] ExpectationError),
}

impl MockError {
    /// The configuration error, if this is illegal API usage.
    pub fn as_usage(&self) -> Option<&UsageError> {
        match self {
            MockError::Usage(e) => Some(e),
            MockError::Expectation(_) => None,
        }
    }

    /// The violation failure, if this is an assertion-style failure.
    pub fn as_expectation(&self) -> Option<&ExpectationError> {
        match self {
            MockError::Usage(_) => None,
            MockError::Expectation(e) => Some(e),
        }
    }
}
