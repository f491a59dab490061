//! Abstract driver boundary over a live browser session.
//!
//! The harness never talks to a concrete automation backend directly; it
//! consumes the [`Driver`] and [`Element`] traits. Swapping the backend
//! (CDP, a remote WebDriver, the in-memory mock) never touches page objects,
//! waits, or scenario scripts.
//!
//! Expected absence is modelled explicitly: [`Driver::try_find`] returns
//! `Ok(None)` when an element is legitimately missing, and
//! [`Presence`] answers "is it there, and is it showing" as a tri-state.
//! Callers never branch on caught errors to express an expected outcome.

use crate::locator::Locator;
use crate::result::EnsayarResult;

/// Handle to a live browser session.
///
/// One driver drives one sequential scenario; there is no internal
/// parallelism. An element handle returned by [`Driver::find_element`] is a
/// snapshot of the DOM at resolution time. After navigation or DOM-altering
/// actions, callers re-resolve rather than reuse old handles.
pub trait Driver {
    /// Element handle type produced by this driver
    type Element: Element;

    /// Navigate to a URL
    ///
    /// # Errors
    ///
    /// Returns [`crate::result::EnsayarError::Navigation`] if the browser rejects the
    /// navigation, or [`crate::result::EnsayarError::SessionClosed`] on a closed session.
    fn navigate(&self, url: &str) -> EnsayarResult<()>;

    /// Resolve a locator against the current DOM.
    ///
    /// # Errors
    ///
    /// Returns [`crate::result::EnsayarError::ElementNotFound`] when the locator matches
    /// nothing. "Exists but hidden" is NOT an error: the handle is returned
    /// and reports `is_displayed() == false`.
    fn find_element(&self, locator: &Locator) -> EnsayarResult<Self::Element>;

    /// Resolve a locator, with absence as a value rather than an error.
    ///
    /// `Ok(None)` means the element is legitimately missing from the DOM;
    /// real faults (closed session, protocol failure) still propagate.
    fn try_find(&self, locator: &Locator) -> EnsayarResult<Option<Self::Element>> {
        match self.find_element(locator) {
            Ok(element) => Ok(Some(element)),
            Err(err) if err.is_transient_absence() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// The URL currently loaded in the session
    fn current_url(&self) -> EnsayarResult<String>;

    /// The title of the current page
    fn title(&self) -> EnsayarResult<String>;

    /// Close the session. Idempotent: closing twice is not an error.
    fn close(&self) -> EnsayarResult<()>;
}

/// Handle to a resolved DOM element.
pub trait Element {
    /// Whether the element is rendered visibly
    fn is_displayed(&self) -> EnsayarResult<bool>;

    /// Whether the element accepts interaction
    fn is_enabled(&self) -> EnsayarResult<bool>;

    /// Visible text content
    fn text(&self) -> EnsayarResult<String>;

    /// Attribute value, `None` when the attribute is absent
    fn attribute(&self, name: &str) -> EnsayarResult<Option<String>>;

    /// Clear any existing input value
    fn clear(&self) -> EnsayarResult<()>;

    /// Type text into the element
    fn send_keys(&self, text: &str) -> EnsayarResult<()>;

    /// Click the element
    fn click(&self) -> EnsayarResult<()>;
}

/// Tri-state element presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// In the DOM and rendered visibly
    Visible,
    /// In the DOM but not rendered (e.g. `display: none`)
    Hidden,
    /// Not in the DOM at all
    Absent,
}

impl Presence {
    /// Whether the element is present in the DOM (visible or hidden)
    #[must_use]
    pub const fn in_dom(&self) -> bool {
        matches!(self, Self::Visible | Self::Hidden)
    }

    /// Whether the element is rendered visibly
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        matches!(self, Self::Visible)
    }
}

/// Probe the tri-state presence of a locator against a driver.
///
/// # Errors
///
/// Propagates driver faults; plain absence is `Ok(Presence::Absent)`.
pub fn probe<D: Driver>(driver: &D, locator: &Locator) -> EnsayarResult<Presence> {
    match driver.try_find(locator)? {
        Some(element) => {
            if element.is_displayed()? {
                Ok(Presence::Visible)
            } else {
                Ok(Presence::Hidden)
            }
        }
        None => Ok(Presence::Absent),
    }
}

/// Clear an input and type a replacement value.
///
/// # Errors
///
/// Propagates element interaction failures.
pub fn replace_text<E: Element>(element: &E, text: &str) -> EnsayarResult<()> {
    element.clear()?;
    element.send_keys(text)
}
