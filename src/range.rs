// vim: tw=80
//! Inclusive invocation-count intervals.

use std::fmt;

use crate::error::UsageError;

/// How often an expectation may legally be invoked.
///
/// The interval is inclusive on both ends; `max` may be
/// [`Range::UNLIMITED_MAX`] to leave the upper bound open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Range {
    min: usize,
    max: usize,
}

impl Range {
    /// Sentinel for an open ended max value.
    pub const UNLIMITED_MAX: usize = usize::MAX;

    /// The default range is exactly one invocation.
    pub const DEFAULT: Range = Range { min: 1, max: 1 };

    /// Construct a validated range.
    pub fn new(min: usize, max: usize) -> Result<Self, UsageError> {
        if max < 1 {
            return Err(UsageError::InvalidRange("max has to be positive"));
        }
        if min > max {
            return Err(UsageError::InvalidRange(
                "min cannot be greater than max",
            ));
        }
        Ok(Range { min, max })
    }

    /// Construct the degenerate range covering exactly `count` invocations.
    pub fn exactly(count: usize) -> Result<Self, UsageError> {
        if count < 1 {
            return Err(UsageError::InvalidRange("count has to be at least 1"));
        }
        if count == Self::UNLIMITED_MAX {
            return Err(UsageError::InvalidRange("count cannot be unlimited"));
        }
        Ok(Range { min: count, max: count })
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Checks if the given invocation count lies within the range.
    pub fn includes(&self, count: usize) -> bool {
        count >= self.min && count <= self.max
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else if self.max == Self::UNLIMITED_MAX {
            write!(f, "at least {}", self.min)
        } else {
            write!(f, "between {} and {}", self.min, self.max)
        }
    }
}
