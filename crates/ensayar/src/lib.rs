//! Ensayar: a page-object test harness for browser login flows.
//!
//! The core is the page-interaction pattern with resilient element access:
//! locating elements through an immutable registry, waiting for
//! asynchronous UI transitions with a bounded poller, and accumulating soft
//! assertion failures for one aggregate report per scenario.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     ENSAYAR Architecture                         │
//! ├──────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌─────────────────┐    ┌─────────────────┐   │
//! │   │ Scenario   │    │ Page Objects    │    │ Driver boundary │   │
//! │   │ scripts    │───►│ + Wait poller   │───►│ (CDP or mock    │   │
//! │   │ (personas) │    │ + Verifier      │    │  browser)       │   │
//! │   └────────────┘    └─────────────────┘    └─────────────────┘   │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! One scenario drives one fresh browser session sequentially; the session
//! is torn down on every exit path. Scenario scripts never carry raw
//! selectors; the locator registry is the single source of truth for
//! UI structure.

#![warn(missing_docs)]

/// Soft assertion aggregation
pub mod assertion;
/// Harness configuration
pub mod config;
/// Abstract driver boundary
pub mod driver;
/// Locators and the locator registry
pub mod locator;
/// Scriptable in-memory browser double
pub mod mock;
/// Page objects for the demo site
pub mod page;
/// Result and error types
pub mod result;
/// Persona scenario scripts
pub mod scenarios;
/// Scoped sessions and scenario execution
pub mod session;
/// Tracing initialization
pub mod trace;
/// Wait-until polling
pub mod wait;

/// Real browser control over CDP (requires the `browser` feature)
#[cfg(feature = "browser")]
pub mod cdp;

/// Convenience re-exports
pub mod prelude {
    pub use super::assertion::{AggregateFailure, CheckSummary, Verifier};
    pub use super::config::HarnessConfig;
    pub use super::driver::{probe, replace_text, Driver, Element, Presence};
    pub use super::locator::{Locator, LocatorRegistry, Strategy};
    pub use super::mock::{ElementState, MockDriver, PageModel};
    pub use super::page::{InventoryPage, LoginPage};
    pub use super::result::{EnsayarError, EnsayarResult};
    pub use super::session::{run, Outcome, Session, Status};
    pub use super::wait::{Wait, WaitOptions};

    #[cfg(feature = "browser")]
    pub use super::cdp::{BrowserOptions, CdpDriver};
}
