//! Scoped browser sessions and scenario execution.
//!
//! Every scenario gets a fresh driver, and the driver is closed on every
//! exit path (normal completion, hard error, or panic) via [`Session`]'s
//! drop guard. No session is shared or reused across scenarios, so state
//! cannot leak between them.

use serde::Serialize;
use std::time::Instant;
use uuid::Uuid;

use crate::driver::Driver;
use crate::result::EnsayarResult;

/// A driver scoped to one scenario.
///
/// Closing is guaranteed: either explicitly through [`Session::close`], or
/// on drop if the scenario unwinds or errors out first.
#[derive(Debug)]
pub struct Session<D: Driver> {
    driver: D,
    closed: bool,
}

impl<D: Driver> Session<D> {
    /// Take ownership of a freshly created driver
    #[must_use]
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            closed: false,
        }
    }

    /// The driver handle
    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Close the session explicitly.
    ///
    /// # Errors
    ///
    /// Propagates the driver's close failure; the session is considered
    /// closed either way.
    pub fn close(mut self) -> EnsayarResult<()> {
        self.closed = true;
        self.driver.close()
    }
}

impl<D: Driver> Drop for Session<D> {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(err) = self.driver.close() {
                tracing::warn!(%err, "failed to close browser session on drop");
            }
        }
    }
}

/// Pass/fail status of one scenario run
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Status {
    /// Scenario completed with every check passing
    Passed,
    /// Scenario failed; the message carries either the aggregate soft-check
    /// report or the hard error that aborted the script
    Failed {
        /// Failure message
        message: String,
    },
}

/// Result record of one scenario run.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    /// Unique run identifier
    pub id: Uuid,
    /// Scenario name
    pub scenario: String,
    /// Pass/fail status
    #[serde(flatten)]
    pub status: Status,
    /// Wall-clock duration in milliseconds
    pub elapsed_ms: u64,
}

impl Outcome {
    /// Whether the scenario passed
    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self.status, Status::Passed)
    }

    /// The failure message, if any
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        match &self.status {
            Status::Passed => None,
            Status::Failed { message } => Some(message),
        }
    }

    /// Serialize the outcome as JSON
    ///
    /// # Errors
    ///
    /// Propagates serialization failures.
    pub fn to_json(&self) -> EnsayarResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Run a scenario script against a fresh driver.
///
/// The driver is created by the caller immediately before this call and is
/// torn down before the outcome is returned, whatever the script does. A
/// script error (hard fault or flushed aggregate failure) becomes a failed
/// outcome; a teardown failure after a passing script is logged but does not
/// flip the result.
pub fn run<D, F>(scenario: &str, driver: D, script: F) -> Outcome
where
    D: Driver,
    F: FnOnce(&D) -> EnsayarResult<()>,
{
    let session = Session::new(driver);
    tracing::info!(scenario, "scenario starting");
    let start = Instant::now();

    let result = script(session.driver());
    let elapsed = start.elapsed();

    if let Err(err) = session.close() {
        tracing::warn!(scenario, %err, "session teardown failed");
    }

    let status = match result {
        Ok(()) => Status::Passed,
        Err(err) => Status::Failed {
            message: err.to_string(),
        },
    };

    let outcome = Outcome {
        id: Uuid::new_v4(),
        scenario: scenario.to_string(),
        status,
        elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
    };
    tracing::info!(
        scenario,
        passed = outcome.passed(),
        elapsed_ms = outcome.elapsed_ms,
        "scenario finished"
    );
    outcome
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::assertion::Verifier;
    use crate::mock::MockDriver;
    use crate::result::EnsayarError;

    #[test]
    fn test_passing_scenario() {
        let driver = MockDriver::new("about:blank");
        let outcome = run("smoke", driver, |_| Ok(()));
        assert!(outcome.passed());
        assert!(outcome.failure().is_none());
        assert_eq!(outcome.scenario, "smoke");
    }

    #[test]
    fn test_failing_scenario_reports_aggregate() {
        let driver = MockDriver::new("about:blank");
        let outcome = run("failing", driver, |_| {
            let mut checks = Verifier::new();
            checks.check(false, "first defect");
            checks.check(false, "second defect");
            checks.flush()?;
            Ok(())
        });
        assert!(!outcome.passed());
        let message = outcome.failure().unwrap();
        assert!(message.contains("first defect"));
        assert!(message.contains("second defect"));
    }

    #[test]
    fn test_session_closes_after_success() {
        let driver = MockDriver::new("about:blank");
        let watcher = driver.clone();
        let _ = run("closes", driver, |_| Ok(()));
        assert!(matches!(
            watcher.current_url().unwrap_err(),
            EnsayarError::SessionClosed
        ));
    }

    #[test]
    fn test_session_closes_after_hard_error() {
        let driver = MockDriver::new("about:blank");
        let watcher = driver.clone();
        let _ = run("closes on error", driver, |_| {
            Err(EnsayarError::Precondition {
                message: "form missing".to_string(),
            })
        });
        assert!(matches!(
            watcher.current_url().unwrap_err(),
            EnsayarError::SessionClosed
        ));
    }

    #[test]
    fn test_outcome_serializes() {
        let driver = MockDriver::new("about:blank");
        let outcome = run("json", driver, |_| Ok(()));
        let json = outcome.to_json().unwrap();
        assert!(json.contains("\"scenario\":\"json\""));
        assert!(json.contains("\"status\":\"passed\""));
    }
}
