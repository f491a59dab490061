//! Page objects for the demo e-commerce site.
//!
//! A page object binds a driver reference to the immutable locator registry
//! of one logical page and exposes high-level actions and queries, so
//! scenario scripts never carry raw selectors. The page object itself is
//! stateless beyond those two references; every operation resolves its
//! elements against the live DOM at call time.

use crate::driver::{probe, replace_text, Driver, Element, Presence};
use crate::locator::{Locator, LocatorRegistry};
use crate::result::EnsayarResult;

/// Symbolic name of the username input
pub const USERNAME_FIELD: &str = "username-field";
/// Symbolic name of the password input
pub const PASSWORD_FIELD: &str = "password-field";
/// Symbolic name of the login button
pub const LOGIN_BUTTON: &str = "login-button";
/// Symbolic name of the error message container
pub const ERROR_MESSAGE: &str = "error-message";
/// Symbolic name of the error close control
pub const ERROR_CLOSE: &str = "error-close";
/// Symbolic name of the input clear ("X") control
pub const INPUT_CLEAR: &str = "input-clear";
/// Symbolic name of the inventory list container
pub const INVENTORY_CONTAINER: &str = "inventory-container";

/// URL fragment present after a successful login
pub const INVENTORY_URL_FRAGMENT: &str = "inventory.html";
/// Page title shown after a successful login
pub const INVENTORY_TITLE: &str = "Swag Labs";

/// The login page of the demo site.
#[derive(Debug)]
pub struct LoginPage<'d, D: Driver> {
    driver: &'d D,
    registry: LocatorRegistry,
}

impl<'d, D: Driver> LoginPage<'d, D> {
    /// Bind a login page object to a driver
    #[must_use]
    pub fn new(driver: &'d D) -> Self {
        Self {
            driver,
            registry: Self::registry(),
        }
    }

    /// The fixed locator registry of the login page
    #[must_use]
    pub fn registry() -> LocatorRegistry {
        LocatorRegistry::builder()
            .element(USERNAME_FIELD, Locator::id("user-name"))
            .element(PASSWORD_FIELD, Locator::id("password"))
            .element(LOGIN_BUTTON, Locator::id("login-button"))
            .element(ERROR_MESSAGE, Locator::css(".error-message-container"))
            .element(ERROR_CLOSE, Locator::css("svg.fa-times"))
            .element(INPUT_CLEAR, Locator::css("svg.fa-times-circle"))
            .build()
    }

    /// The driver this page object is bound to
    #[must_use]
    pub const fn driver(&self) -> &D {
        self.driver
    }

    /// Navigate the session to the login page
    ///
    /// # Errors
    ///
    /// Propagates navigation failures.
    pub fn open(&self, base_url: &str) -> EnsayarResult<()> {
        self.driver.navigate(base_url)
    }

    /// Resolve a named element against the current DOM.
    ///
    /// # Errors
    ///
    /// [`crate::result::EnsayarError::UnknownElement`] for an unregistered
    /// name, [`crate::result::EnsayarError::ElementNotFound`] when the
    /// locator matches nothing.
    pub fn element(&self, name: &str) -> EnsayarResult<D::Element> {
        let locator = self.registry.lookup(name)?;
        self.driver.find_element(locator)
    }

    /// Resolve a named element, with absence as a value.
    ///
    /// # Errors
    ///
    /// Propagates registry and driver faults; plain absence is `Ok(None)`.
    pub fn try_element(&self, name: &str) -> EnsayarResult<Option<D::Element>> {
        let locator = self.registry.lookup(name)?;
        self.driver.try_find(locator)
    }

    /// Tri-state presence of a named element.
    ///
    /// # Errors
    ///
    /// Propagates registry and driver faults.
    pub fn presence(&self, name: &str) -> EnsayarResult<Presence> {
        let locator = self.registry.lookup(name)?;
        probe(self.driver, locator)
    }

    /// The locator for a named element.
    ///
    /// # Errors
    ///
    /// [`crate::result::EnsayarError::UnknownElement`] for an unregistered
    /// name.
    pub fn locator(&self, name: &str) -> EnsayarResult<&Locator> {
        self.registry.lookup(name)
    }

    /// Perform a login: clear and fill both credential fields, then click
    /// the login button.
    ///
    /// The side effect is a state transition in the live session: either a
    /// navigation or an in-page error display; the caller probes which.
    ///
    /// # Errors
    ///
    /// [`crate::result::EnsayarError::ElementNotFound`] if any form element
    /// fails to resolve against the current page.
    pub fn login(&self, username: &str, password: &str) -> EnsayarResult<()> {
        let user_field = self.element(USERNAME_FIELD)?;
        replace_text(&user_field, username)?;

        let password_field = self.element(PASSWORD_FIELD)?;
        replace_text(&password_field, password)?;

        self.element(LOGIN_BUTTON)?.click()
    }

    /// Whether the error message element is currently displayed.
    ///
    /// # Errors
    ///
    /// [`crate::result::EnsayarError::ElementNotFound`] when the element is
    /// not in the DOM at all, distinct from "exists but hidden", which
    /// returns `Ok(false)`.
    pub fn is_error_message_displayed(&self) -> EnsayarResult<bool> {
        self.element(ERROR_MESSAGE)?.is_displayed()
    }

    /// Text of the error message element.
    ///
    /// # Errors
    ///
    /// [`crate::result::EnsayarError::ElementNotFound`] when absent.
    pub fn error_message_text(&self) -> EnsayarResult<String> {
        self.element(ERROR_MESSAGE)?.text()
    }

    /// Click the error close control.
    ///
    /// # Errors
    ///
    /// [`crate::result::EnsayarError::ElementNotFound`] when absent.
    pub fn dismiss_error(&self) -> EnsayarResult<()> {
        self.element(ERROR_CLOSE)?.click()
    }
}

/// The inventory page shown after a successful login.
#[derive(Debug)]
pub struct InventoryPage<'d, D: Driver> {
    driver: &'d D,
    registry: LocatorRegistry,
}

impl<'d, D: Driver> InventoryPage<'d, D> {
    /// Bind an inventory page object to a driver
    #[must_use]
    pub fn new(driver: &'d D) -> Self {
        Self {
            driver,
            registry: Self::registry(),
        }
    }

    /// The fixed locator registry of the inventory page
    #[must_use]
    pub fn registry() -> LocatorRegistry {
        LocatorRegistry::builder()
            .element(INVENTORY_CONTAINER, Locator::class_name("inventory_container"))
            .build()
    }

    /// The inventory container element.
    ///
    /// # Errors
    ///
    /// [`crate::result::EnsayarError::ElementNotFound`] when absent.
    pub fn container(&self) -> EnsayarResult<D::Element> {
        let locator = self.registry.lookup(INVENTORY_CONTAINER)?;
        self.driver.find_element(locator)
    }

    /// Whether the inventory container is displayed.
    ///
    /// # Errors
    ///
    /// [`crate::result::EnsayarError::ElementNotFound`] when absent.
    pub fn is_loaded(&self) -> EnsayarResult<bool> {
        self.container()?.is_displayed()
    }

    /// The current page title.
    ///
    /// # Errors
    ///
    /// Propagates driver faults.
    pub fn title(&self) -> EnsayarResult<String> {
        self.driver.title()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::{ElementState, MockDriver};
    use crate::result::EnsayarError;

    fn login_form(driver: &MockDriver) {
        driver.page().insert(
            Locator::id("user-name"),
            ElementState::input().with_attribute("placeholder", "Username"),
        );
        driver.page().insert(
            Locator::id("password"),
            ElementState::input()
                .with_attribute("placeholder", "Password")
                .with_attribute("type", "password"),
        );
        driver.page().insert_visible(Locator::id("login-button"));
    }

    #[test]
    fn test_registry_has_all_form_elements() {
        let registry = LoginPage::<MockDriver>::registry();
        for name in [
            USERNAME_FIELD,
            PASSWORD_FIELD,
            LOGIN_BUTTON,
            ERROR_MESSAGE,
            ERROR_CLOSE,
            INPUT_CLEAR,
        ] {
            assert!(registry.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_login_fills_fields_and_clicks() {
        let driver = MockDriver::new("https://demo.test/");
        login_form(&driver);

        let clicked = Locator::css(".clicked-marker");
        {
            let clicked = clicked.clone();
            driver
                .page()
                .on_click(Locator::id("login-button"), move |_, fx| {
                    fx.insert(&clicked, ElementState::visible());
                });
        }

        let page = LoginPage::new(&driver);
        page.login("standard_user", "secret_sauce").unwrap();

        let user = page.element(USERNAME_FIELD).unwrap();
        assert_eq!(
            user.attribute("value").unwrap().as_deref(),
            Some("standard_user")
        );
        assert!(driver.try_find(&clicked).unwrap().is_some());
    }

    #[test]
    fn test_login_clears_existing_text() {
        let driver = MockDriver::new("https://demo.test/");
        login_form(&driver);

        let page = LoginPage::new(&driver);
        let user = page.element(USERNAME_FIELD).unwrap();
        user.send_keys("stale input").unwrap();

        page.login("standard_user", "secret_sauce").unwrap();
        assert_eq!(
            user.attribute("value").unwrap().as_deref(),
            Some("standard_user")
        );
    }

    #[test]
    fn test_login_without_form_is_element_not_found() {
        let driver = MockDriver::new("https://demo.test/");
        let page = LoginPage::new(&driver);
        let err = page.login("standard_user", "secret_sauce").unwrap_err();
        assert!(matches!(err, EnsayarError::ElementNotFound { .. }));
    }

    #[test]
    fn test_error_display_absent_element_is_an_error() {
        let driver = MockDriver::new("https://demo.test/");
        login_form(&driver);
        let page = LoginPage::new(&driver);

        // Before any login attempt the error container is not in the DOM:
        // that is a hard ElementNotFound, never a false.
        let err = page.is_error_message_displayed().unwrap_err();
        assert!(matches!(err, EnsayarError::ElementNotFound { .. }));
    }

    #[test]
    fn test_error_display_hidden_is_false() {
        let driver = MockDriver::new("https://demo.test/");
        driver
            .page()
            .insert(Locator::css(".error-message-container"), ElementState::hidden());
        let page = LoginPage::new(&driver);
        assert!(!page.is_error_message_displayed().unwrap());
    }

    #[test]
    fn test_presence_tristate() {
        let driver = MockDriver::new("https://demo.test/");
        driver
            .page()
            .insert(Locator::css("svg.fa-times-circle"), ElementState::hidden());
        let page = LoginPage::new(&driver);

        assert_eq!(page.presence(INPUT_CLEAR).unwrap(), Presence::Hidden);
        assert_eq!(page.presence(ERROR_MESSAGE).unwrap(), Presence::Absent);
    }

    #[test]
    fn test_unknown_name_fails_lookup() {
        let driver = MockDriver::new("https://demo.test/");
        let page = LoginPage::new(&driver);
        let err = page.element("shopping-cart").unwrap_err();
        assert!(matches!(err, EnsayarError::UnknownElement { .. }));
    }

    #[test]
    fn test_inventory_page_loaded() {
        let driver = MockDriver::new("https://demo.test/inventory.html");
        driver
            .page()
            .insert_visible(Locator::class_name("inventory_container"));
        let inventory = InventoryPage::new(&driver);
        assert!(inventory.is_loaded().unwrap());
    }
}
