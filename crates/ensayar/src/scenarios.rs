//! Login-flow scenarios for the demo site personas.
//!
//! Each scenario is a plain function over an injected driver: it navigates
//! to the login page, drives the flow for one persona, records soft checks
//! into a [`Verifier`] and flushes exactly once at the end. Hard faults
//! (missing form elements, closed session) abort immediately; soft failures
//! accumulate so one run reports every independent defect.
//!
//! Run a scenario through [`crate::session::run`] to get a closed session
//! and an [`crate::session::Outcome`] either way.

use std::time::Instant;

use crate::assertion::Verifier;
use crate::config::HarnessConfig;
use crate::driver::{Driver, Element, Presence};
use crate::page::{
    InventoryPage, LoginPage, ERROR_CLOSE, ERROR_MESSAGE, INPUT_CLEAR, INVENTORY_CONTAINER,
    INVENTORY_TITLE, INVENTORY_URL_FRAGMENT, LOGIN_BUTTON, PASSWORD_FIELD, USERNAME_FIELD,
};
use crate::result::{EnsayarError, EnsayarResult};
use crate::wait::Wait;

/// Username of the persona that logs in normally
pub const STANDARD_USER: &str = "standard_user";
/// Username of the persona whose account is locked out
pub const LOCKED_OUT_USER: &str = "locked_out_user";
/// Username of the persona with client-side rendering problems
pub const PROBLEM_USER: &str = "problem_user";
/// Username of the persona whose login is artificially slow
pub const PERFORMANCE_GLITCH_USER: &str = "performance_glitch_user";
/// Username of the persona that triggers server-side errors
pub const ERROR_USER: &str = "error_user";
/// Username of the persona with visual differences
pub const VISUAL_USER: &str = "visual_user";

/// Login form presence, state, placeholder and masking checks, then a
/// standard login.
///
/// # Errors
///
/// Hard faults abort; soft failures surface as one aggregate at the end.
pub fn login_form_ui<D: Driver>(driver: &D, config: &HarnessConfig) -> EnsayarResult<()> {
    let page = LoginPage::new(driver);
    page.open(&config.base_url)?;
    let mut checks = Verifier::new();

    let username = page.element(USERNAME_FIELD)?;
    let password = page.element(PASSWORD_FIELD)?;
    let login = page.element(LOGIN_BUTTON)?;

    checks.check(
        username.is_displayed()?,
        "username field is missing on the login page",
    );
    checks.check(
        password.is_displayed()?,
        "password field is missing on the login page",
    );
    checks.check(
        login.is_displayed()?,
        "login button is missing on the login page",
    );

    checks.check(username.is_enabled()?, "username field is not enabled");
    checks.check(password.is_enabled()?, "password field is not enabled");
    checks.check(login.is_enabled()?, "login button is not enabled");

    // Masking is critical: a readable password field makes the rest of the
    // suite meaningless, so this is a hard precondition.
    let field_type = password.attribute("type")?.unwrap_or_default();
    checks.require_eq(
        &field_type.as_str(),
        &"password",
        "password field should be masked (type='password')",
    )?;

    let username_placeholder = username.attribute("placeholder")?.unwrap_or_default();
    let password_placeholder = password.attribute("placeholder")?.unwrap_or_default();
    checks.check_eq(
        &username_placeholder.as_str(),
        &"Username",
        "username field placeholder is incorrect",
    );
    checks.check_eq(
        &password_placeholder.as_str(),
        &"Password",
        "password field placeholder is incorrect",
    );

    page.login(&config.username, &config.password)?;

    checks.flush()?;
    Ok(())
}

/// Locked-out persona: the login is rejected with a visible error, the
/// clear controls appear with it, and the form recovers after dismissal.
///
/// # Errors
///
/// Hard faults abort; soft failures surface as one aggregate at the end.
pub fn locked_out_user<D: Driver>(driver: &D, config: &HarnessConfig) -> EnsayarResult<()> {
    let page = LoginPage::new(driver);
    page.open(&config.base_url)?;
    let mut checks = Verifier::new();
    let wait = Wait::with_options(driver, config.wait_options());

    // The clear 'X' controls only accompany an error; before the login
    // attempt they are legitimately absent (or at least not shown).
    if let Some(clear) = page.try_element(INPUT_CLEAR)? {
        checks.check(
            !clear.is_displayed()?,
            "clear 'X' control should not be visible before the error message",
        );
    }

    page.login(LOCKED_OUT_USER, &config.password)?;

    match wait.until_visible(page.locator(ERROR_MESSAGE)?) {
        Ok(error) => {
            checks.check(
                error.is_displayed()?,
                "error message should appear for the locked-out user",
            );
            checks.check_contains(
                &error.text()?,
                "locked out",
                "error message should name the locked-out condition",
            );
        }
        Err(EnsayarError::WaitTimeout { .. }) => {
            checks.fail("error message did not appear in time for the locked-out user");
        }
        Err(err) => return Err(err),
    }

    // The clear controls show up together with the error.
    match page.presence(INPUT_CLEAR)? {
        Presence::Visible => {
            page.element(INPUT_CLEAR)?.click()?;
            let username = page.element(USERNAME_FIELD)?;
            let password = page.element(PASSWORD_FIELD)?;
            checks.check(
                username.attribute("value")?.unwrap_or_default().is_empty(),
                "username field should be cleared after clicking 'X'",
            );
            checks.check(
                password.attribute("value")?.unwrap_or_default().is_empty(),
                "password field should be cleared after clicking 'X'",
            );
        }
        Presence::Hidden | Presence::Absent => {
            checks.fail("clear 'X' control should be visible after the error message");
        }
    }

    // Both fields are editable again after the error.
    let username = page.element(USERNAME_FIELD)?;
    username.click()?;
    checks.check(
        username.is_enabled()?,
        "username field should be editable after the error message",
    );
    let password = page.element(PASSWORD_FIELD)?;
    password.click()?;
    checks.check(
        password.is_enabled()?,
        "password field should be editable after the error message",
    );

    checks.flush()?;
    Ok(())
}

/// Problem persona: login lands on the inventory page despite the broken
/// assets; title and container are verified.
///
/// # Errors
///
/// Hard faults abort; soft failures surface as one aggregate at the end.
pub fn problem_user<D: Driver>(driver: &D, config: &HarnessConfig) -> EnsayarResult<()> {
    let page = LoginPage::new(driver);
    page.open(&config.base_url)?;
    let mut checks = Verifier::new();
    let wait = Wait::with_options(driver, config.wait_options());

    page.login(PROBLEM_USER, &config.password)?;
    wait.until_url_contains(INVENTORY_URL_FRAGMENT)?;

    let inventory = InventoryPage::new(driver);
    checks.check_eq(
        &inventory.title()?.as_str(),
        &INVENTORY_TITLE,
        "expected page title 'Swag Labs' after login",
    );
    checks.check(
        inventory.is_loaded()?,
        "inventory page should be visible after login",
    );

    checks.flush()?;
    Ok(())
}

/// Performance-glitch persona: a timed login. On the success branch the
/// elapsed time must exceed the configured slow-login threshold (a timing
/// diagnostic; the default 5 s is inherently environment-dependent). The
/// timeout branch falls back to the error-message path; both terminal
/// states are legitimate.
///
/// # Errors
///
/// Hard faults abort; soft failures surface as one aggregate at the end.
pub fn performance_glitch_user<D: Driver>(
    driver: &D,
    config: &HarnessConfig,
) -> EnsayarResult<()> {
    let page = LoginPage::new(driver);
    page.open(&config.base_url)?;
    let mut checks = Verifier::new();
    let wait = Wait::with_options(driver, config.wait_options());

    let start = Instant::now();
    page.login(PERFORMANCE_GLITCH_USER, &config.password)?;

    match wait.until_url_contains(INVENTORY_URL_FRAGMENT) {
        Ok(_) => {
            let elapsed = start.elapsed();
            checks.check(
                elapsed >= config.slow_login_threshold(),
                "performance issue was not detected; login completed faster than the threshold",
            );
        }
        Err(EnsayarError::WaitTimeout { .. }) => {
            // Login never landed: the error display is the other legitimate
            // terminal state.
            let error = wait.until_visible(page.locator(ERROR_MESSAGE)?)?;
            checks.check_contains(
                &error.text()?,
                "Please enter valid email or password",
                "error message does not carry the expected text",
            );

            match page.presence(INPUT_CLEAR)? {
                Presence::Visible => {}
                Presence::Hidden | Presence::Absent => {
                    checks.fail("clear 'X' control should be visible after the error message");
                }
            }

            page.dismiss_error()?;
            wait.until_gone(&error)?;
            checks.check_contains(
                &error.attribute("style")?.unwrap_or_default(),
                "display: none",
                "error message should be hidden after dismissal",
            );

            if page.presence(INPUT_CLEAR)?.is_visible() {
                page.element(INPUT_CLEAR)?.click()?;
                let username = page.element(USERNAME_FIELD)?;
                checks.check(
                    username.attribute("value")?.unwrap_or_default().is_empty(),
                    "username field should be cleared after clicking 'X'",
                );
            }
        }
        Err(err) => return Err(err),
    }

    checks.flush()?;
    Ok(())
}

/// Error persona: the invalid login shows an error which can be dismissed,
/// after which the form is usable again.
///
/// # Errors
///
/// Hard faults abort; soft failures surface as one aggregate at the end.
pub fn error_user<D: Driver>(driver: &D, config: &HarnessConfig) -> EnsayarResult<()> {
    let page = LoginPage::new(driver);
    page.open(&config.base_url)?;
    let mut checks = Verifier::new();
    let wait = Wait::with_options(driver, config.wait_options());

    page.login(ERROR_USER, "wrong_password")?;

    match wait.until_visible(page.locator(ERROR_MESSAGE)?) {
        Ok(error) => {
            checks.check_contains(
                &error.text()?,
                "error user",
                "error message should name the failing user",
            );

            page.dismiss_error()?;
            match wait.until_gone(&error) {
                Ok(()) => {
                    checks.check_contains(
                        &error.attribute("style")?.unwrap_or_default(),
                        "display: none",
                        "error message should be hidden after dismissal",
                    );
                }
                Err(EnsayarError::WaitTimeout { .. }) => {
                    checks.fail("error message did not disappear after dismissal");
                }
                Err(err) => return Err(err),
            }

            let username = page.element(USERNAME_FIELD)?;
            username.click()?;
            checks.check(
                username.is_enabled()?,
                "username field should be editable after dismissing the error",
            );
            let password = page.element(PASSWORD_FIELD)?;
            password.click()?;
            checks.check(
                password.is_enabled()?,
                "password field should be editable after dismissing the error",
            );
        }
        Err(EnsayarError::WaitTimeout { .. }) => {
            checks.fail("error message did not appear in time for the error user");
        }
        Err(err) => return Err(err),
    }

    checks.flush()?;
    Ok(())
}

/// Visual persona: a full round trip. Successful login, manual return to
/// the login page, invalid login with error display and dismissal, then a
/// successful re-login. Elements are re-resolved after every navigation
/// since old handles go stale.
///
/// # Errors
///
/// Hard faults abort; soft failures surface as one aggregate at the end.
pub fn visual_user<D: Driver>(driver: &D, config: &HarnessConfig) -> EnsayarResult<()> {
    let page = LoginPage::new(driver);
    page.open(&config.base_url)?;
    let mut checks = Verifier::new();
    let wait = Wait::with_options(driver, config.wait_options());

    let inventory_locator = InventoryPage::<D>::registry()
        .lookup(INVENTORY_CONTAINER)?
        .clone();

    wait.until_visible(page.locator(USERNAME_FIELD)?)?;
    wait.until_visible(page.locator(PASSWORD_FIELD)?)?;
    wait.until_visible(page.locator(LOGIN_BUTTON)?)?;

    // Step 1: login with correct data.
    page.login(VISUAL_USER, &config.password)?;
    match wait.until_visible(&inventory_locator) {
        Ok(container) => checks.check(
            container.is_displayed()?,
            "visual user should see the inventory page after the successful login",
        ),
        Err(EnsayarError::WaitTimeout { .. }) => {
            checks.fail("visual user failed to see the inventory page after the successful login");
        }
        Err(err) => return Err(err),
    }

    // Step 2: back to the login page; re-resolve the form after navigation.
    page.open(&config.base_url)?;
    wait.until_visible(page.locator(USERNAME_FIELD)?)?;

    page.login("invalid_user", "wrong_password")?;

    let error = match wait.until_visible(page.locator(ERROR_MESSAGE)?) {
        Ok(error) => {
            checks.check(
                error.is_displayed()?,
                "error message should appear after the invalid login",
            );
            Some(error)
        }
        Err(EnsayarError::WaitTimeout { .. }) => {
            checks.fail("error message did not appear for the invalid login");
            None
        }
        Err(err) => return Err(err),
    };

    if let Some(error) = error {
        // Step 3: the close control accompanies the error.
        match wait.until_visible(page.locator(ERROR_CLOSE)?) {
            Ok(close) => {
                checks.check(
                    close.is_displayed()?,
                    "'X' control should be visible with the error message",
                );
                // Step 4: dismiss.
                close.click()?;
            }
            Err(EnsayarError::WaitTimeout { .. }) => {
                checks.fail("'X' control did not appear with the error message");
            }
            Err(err) => return Err(err),
        }

        // Step 5: the error goes away.
        match wait.until_gone(&error) {
            Ok(()) => checks.check_contains(
                &error.attribute("style")?.unwrap_or_default(),
                "display: none",
                "error message should be hidden after dismissal",
            ),
            Err(EnsayarError::WaitTimeout { .. }) => {
                checks.fail("error message did not disappear after dismissal");
            }
            Err(err) => return Err(err),
        }
    }

    // Step 6: re-login with correct data; login() re-resolves and clears
    // the fields itself.
    page.login(VISUAL_USER, &config.password)?;

    // Step 7: inventory is visible again.
    match wait.until_visible(&inventory_locator) {
        Ok(container) => checks.check(
            container.is_displayed()?,
            "visual user should see the inventory page after the re-login",
        ),
        Err(EnsayarError::WaitTimeout { .. }) => {
            checks.fail("visual user failed to see the inventory page after the re-login");
        }
        Err(err) => return Err(err),
    }

    checks.flush()?;
    Ok(())
}

/// Standard persona happy path: login and wait for the inventory URL.
///
/// # Errors
///
/// Propagates the wait timeout if the login never lands.
pub fn standard_user<D: Driver>(driver: &D, config: &HarnessConfig) -> EnsayarResult<()> {
    let page = LoginPage::new(driver);
    page.open(&config.base_url)?;
    let wait = Wait::with_options(driver, config.wait_options());

    page.login(STANDARD_USER, &config.password)?;
    let url = wait.until_url_contains(INVENTORY_URL_FRAGMENT)?;
    tracing::debug!(%url, "standard user landed on inventory");
    Ok(())
}
