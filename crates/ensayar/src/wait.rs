//! Wait-until polling for asynchronous UI transitions.
//!
//! A [`Wait`] repeatedly evaluates a condition against the driver at a fixed
//! polling interval until it yields a value or the timeout elapses. The
//! calling thread sleeps between polls; a timeout is the only cancellation
//! mechanism. On expiry the error carries the last-observed state so a
//! human can see what the page actually looked like.
//!
//! A transient "not found yet" from the condition counts as "not yet
//! satisfied" and polling continues; any other error (e.g. the session
//! closed underneath the wait) aborts immediately.

use std::time::{Duration, Instant};

use crate::driver::{Driver, Element};
use crate::locator::Locator;
use crate::result::{EnsayarError, EnsayarResult};

/// Default timeout for wait operations (10 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (500ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Options for wait operations
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// One polling step: either done with a value, or not yet with an
/// observation of the current state.
enum Step<T> {
    Ready(T),
    NotYet(String),
}

/// Poller bound to a driver.
#[derive(Debug)]
pub struct Wait<'d, D: Driver> {
    driver: &'d D,
    options: WaitOptions,
}

impl<'d, D: Driver> Wait<'d, D> {
    /// Create a poller with default options
    #[must_use]
    pub fn new(driver: &'d D) -> Self {
        Self {
            driver,
            options: WaitOptions::default(),
        }
    }

    /// Create a poller with custom options
    #[must_use]
    pub fn with_options(driver: &'d D, options: WaitOptions) -> Self {
        Self { driver, options }
    }

    /// Wait until a locator resolves to a visible element; returns it.
    ///
    /// # Errors
    ///
    /// [`EnsayarError::WaitTimeout`] if the element never becomes visible.
    pub fn until_visible(&self, locator: &Locator) -> EnsayarResult<D::Element> {
        self.poll(&format!("{locator} to be visible"), |driver| {
            match driver.try_find(locator)? {
                Some(element) => {
                    if element.is_displayed()? {
                        Ok(Step::Ready(element))
                    } else {
                        Ok(Step::NotYet("present but hidden".to_string()))
                    }
                }
                None => Ok(Step::NotYet("absent from DOM".to_string())),
            }
        })
    }

    /// Wait until a locator resolves at all (visible or not); returns it.
    ///
    /// # Errors
    ///
    /// [`EnsayarError::WaitTimeout`] if the element never appears.
    pub fn until_present(&self, locator: &Locator) -> EnsayarResult<D::Element> {
        self.poll(&format!("{locator} to be present"), |driver| {
            match driver.try_find(locator)? {
                Some(element) => Ok(Step::Ready(element)),
                None => Ok(Step::NotYet("absent from DOM".to_string())),
            }
        })
    }

    /// Wait until a locator is invisible. An element absent from the DOM
    /// counts as invisible.
    ///
    /// # Errors
    ///
    /// [`EnsayarError::WaitTimeout`] if the element stays visible.
    pub fn until_invisible(&self, locator: &Locator) -> EnsayarResult<()> {
        self.poll(&format!("{locator} to be invisible"), |driver| {
            match driver.try_find(locator)? {
                Some(element) => {
                    if element.is_displayed()? {
                        Ok(Step::NotYet("still visible".to_string()))
                    } else {
                        Ok(Step::Ready(()))
                    }
                }
                None => Ok(Step::Ready(())),
            }
        })
    }

    /// Wait until an already-resolved element stops being displayed.
    ///
    /// An element that leaves the DOM entirely also counts as gone.
    ///
    /// # Errors
    ///
    /// [`EnsayarError::WaitTimeout`] if the element stays visible.
    pub fn until_gone(&self, element: &D::Element) -> EnsayarResult<()> {
        self.poll("element to be gone", |_| match element.is_displayed() {
            Ok(false) => Ok(Step::Ready(())),
            Ok(true) => Ok(Step::NotYet("still visible".to_string())),
            Err(err) if err.is_transient_absence() => Ok(Step::Ready(())),
            Err(err) => Err(err),
        })
    }

    /// Wait until the session URL contains a substring; returns the URL.
    ///
    /// # Errors
    ///
    /// [`EnsayarError::WaitTimeout`] if the URL never matches.
    pub fn until_url_contains(&self, fragment: &str) -> EnsayarResult<String> {
        self.poll(&format!("url to contain '{fragment}'"), |driver| {
            let url = driver.current_url()?;
            if url.contains(fragment) {
                Ok(Step::Ready(url))
            } else {
                Ok(Step::NotYet(url))
            }
        })
    }

    /// Wait until a custom predicate over the driver returns true.
    ///
    /// # Errors
    ///
    /// [`EnsayarError::WaitTimeout`] if the predicate never holds.
    pub fn until<F>(&self, condition: &str, mut predicate: F) -> EnsayarResult<()>
    where
        F: FnMut(&D) -> EnsayarResult<bool>,
    {
        self.poll(condition, |driver| {
            if predicate(driver)? {
                Ok(Step::Ready(()))
            } else {
                Ok(Step::NotYet("condition not satisfied".to_string()))
            }
        })
    }

    /// Core polling loop.
    ///
    /// Evaluates the probe immediately (an already-true condition returns
    /// without sleeping), then sleeps one interval between attempts until
    /// the timeout elapses.
    fn poll<T, F>(&self, condition: &str, mut probe: F) -> EnsayarResult<T>
    where
        F: FnMut(&D) -> EnsayarResult<Step<T>>,
    {
        let start = Instant::now();
        let timeout = self.options.timeout();
        let mut last_seen = String::from("not observed");

        loop {
            match probe(self.driver) {
                Ok(Step::Ready(value)) => return Ok(value),
                Ok(Step::NotYet(seen)) => last_seen = seen,
                Err(err) if err.is_transient_absence() => last_seen = err.to_string(),
                Err(err) => return Err(err),
            }

            if start.elapsed() >= timeout {
                tracing::debug!(condition, %last_seen, "wait expired");
                return Err(EnsayarError::WaitTimeout {
                    ms: self.options.timeout_ms,
                    condition: condition.to_string(),
                    last_seen,
                });
            }

            std::thread::sleep(self.options.poll_interval());
        }
    }
}
