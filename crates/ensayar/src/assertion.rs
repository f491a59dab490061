//! Soft assertion aggregation.
//!
//! A [`Verifier`] collects assertion failures without stopping the scenario,
//! so a single run reports every independent defect instead of only the
//! first. Hard preconditions go through [`Verifier::require`], which aborts
//! immediately. At scenario end, [`Verifier::flush`] raises one
//! [`AggregateFailure`] listing every failed message in recording order.
//!
//! `flush` consumes the verifier, so flushing twice does not compile. A
//! verifier dropped with unflushed failures logs them at error level, the
//! scope-exit check that keeps recorded failures from vanishing silently.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::result::{EnsayarError, EnsayarResult};

/// A single recorded check failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckFailure {
    /// Message describing the failure
    pub message: String,
    /// Position of this failure in the recorded sequence
    pub index: usize,
}

/// Soft assertion collector scoped to one scenario.
#[derive(Debug, Default)]
pub struct Verifier {
    failures: Vec<CheckFailure>,
    checked: usize,
    flushed: bool,
}

impl Verifier {
    /// Create a new verifier
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pass/fail check without raising
    pub fn check(&mut self, passed: bool, message: &str) {
        self.checked += 1;
        if !passed {
            self.record(message.to_string());
        }
    }

    /// Record an equality check without raising
    pub fn check_eq<T: PartialEq + Debug>(&mut self, actual: &T, expected: &T, message: &str) {
        self.checked += 1;
        if actual != expected {
            self.record(format!("{message}: expected {expected:?}, got {actual:?}"));
        }
    }

    /// Record a substring check without raising
    pub fn check_contains(&mut self, haystack: &str, needle: &str, message: &str) {
        self.checked += 1;
        if !haystack.contains(needle) {
            self.record(format!(
                "{message}: expected '{haystack}' to contain '{needle}'"
            ));
        }
    }

    /// Record a failure unconditionally
    pub fn fail(&mut self, message: impl Into<String>) {
        self.checked += 1;
        self.record(message.into());
    }

    /// Hard precondition: raise immediately on failure.
    ///
    /// Used where continuing the scenario would be meaningless, e.g.
    /// verifying the login form exists before attempting login.
    ///
    /// # Errors
    ///
    /// Returns [`EnsayarError::Precondition`] when the check fails.
    pub fn require(&mut self, passed: bool, message: &str) -> EnsayarResult<()> {
        self.checked += 1;
        if passed {
            Ok(())
        } else {
            Err(EnsayarError::Precondition {
                message: message.to_string(),
            })
        }
    }

    /// Hard equality precondition.
    ///
    /// # Errors
    ///
    /// Returns [`EnsayarError::Precondition`] when the values differ.
    pub fn require_eq<T: PartialEq + Debug>(
        &mut self,
        actual: &T,
        expected: &T,
        message: &str,
    ) -> EnsayarResult<()> {
        self.checked += 1;
        if actual == expected {
            Ok(())
        } else {
            Err(EnsayarError::Precondition {
                message: format!("{message}: expected {expected:?}, got {actual:?}"),
            })
        }
    }

    fn record(&mut self, message: String) {
        let failure = CheckFailure {
            message,
            index: self.failures.len(),
        };
        self.failures.push(failure);
    }

    /// All recorded failures, in recording order
    #[must_use]
    pub fn failures(&self) -> &[CheckFailure] {
        &self.failures
    }

    /// Number of recorded failures
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Total checks recorded (passed and failed)
    #[must_use]
    pub const fn checked(&self) -> usize {
        self.checked
    }

    /// Whether every check so far passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Summary of the checks so far
    #[must_use]
    pub fn summary(&self) -> CheckSummary {
        CheckSummary {
            total: self.checked,
            passed: self.checked - self.failures.len(),
            failed: self.failures.len(),
        }
    }

    /// Raise an aggregate failure if any soft check failed; no-op otherwise.
    ///
    /// Consumes the verifier: a scenario flushes exactly once, at its end.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateFailure`] listing every failed message in
    /// recording order, if at least one failure was recorded.
    pub fn flush(mut self) -> Result<(), AggregateFailure> {
        self.flushed = true;
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(AggregateFailure::new(&self.failures))
        }
    }
}

impl Drop for Verifier {
    fn drop(&mut self) {
        if !self.flushed && !self.failures.is_empty() && !std::thread::panicking() {
            tracing::error!(
                failures = self.failures.len(),
                "verifier dropped without flush; recorded failures: {}",
                self.failures
                    .iter()
                    .map(|f| f.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ")
            );
        }
    }
}

/// Summary of check results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSummary {
    /// Total checks recorded
    pub total: usize,
    /// Checks that passed
    pub passed: usize,
    /// Checks that failed
    pub failed: usize,
}

/// Error raised by [`Verifier::flush`] when soft checks failed
#[derive(Debug, Clone)]
pub struct AggregateFailure {
    /// All failure messages, in recording order
    pub failures: Vec<String>,
    /// Number of failed checks
    pub count: usize,
}

impl AggregateFailure {
    /// Create a new aggregate failure from recorded failures
    #[must_use]
    pub fn new(failures: &[CheckFailure]) -> Self {
        Self {
            failures: failures.iter().map(|f| f.message.clone()).collect(),
            count: failures.len(),
        }
    }
}

impl std::fmt::Display for AggregateFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} check(s) failed:", self.count)?;
        for (i, failure) in self.failures.iter().enumerate() {
            writeln!(f, "  {}. {failure}", i + 1)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateFailure {}
