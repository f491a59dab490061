//! End-to-end persona scenarios against the in-memory demo-site twin.
//!
//! The twin models the login flow of the demo e-commerce site: credential
//! validation on the login button, error display with clear controls, a
//! deliberately slow login for the performance-glitch persona, and an
//! inventory page behind a successful login.

use std::time::Duration;

use ensayar::mock::{ElementState, MockDriver, PageModel};
use ensayar::page::{ERROR_MESSAGE, INPUT_CLEAR, USERNAME_FIELD};
use ensayar::prelude::*;
use ensayar::scenarios;
use ensayar::wait::WaitOptions;

const BASE_URL: &str = "https://www.saucedemo.com/";
const INVENTORY_URL: &str = "https://www.saucedemo.com/inventory.html";
const PASSWORD: &str = "secret_sauce";

fn user_field() -> Locator {
    Locator::id("user-name")
}

fn password_field() -> Locator {
    Locator::id("password")
}

fn login_button() -> Locator {
    Locator::id("login-button")
}

fn error_container() -> Locator {
    Locator::css(".error-message-container")
}

fn error_close() -> Locator {
    Locator::css("svg.fa-times")
}

fn input_clear() -> Locator {
    Locator::css("svg.fa-times-circle")
}

/// Commands that reveal the error banner with its companion controls.
fn reveal_error(fx: &mut ensayar::mock::Effects, delay: Duration, message: String) {
    fx.defer(delay, |late| {
        late.insert(
            &error_container(),
            ElementState::visible().with_text(message),
        );
        late.insert(&error_close(), ElementState::visible());
        late.insert(&input_clear(), ElementState::visible());
    });
}

/// Build the demo-site twin.
///
/// `glitch_delay` is how long the performance-glitch login takes;
/// `reveal_delay` is how long error banners take to show up, so waits have
/// a real asynchronous transition to poll.
fn demo_site(glitch_delay: Duration, reveal_delay: Duration) -> MockDriver {
    let driver = MockDriver::new("about:blank");

    let login_page = PageModel::new("Swag Labs")
        .element(
            user_field(),
            ElementState::input()
                .with_attribute("placeholder", "Username")
                .with_attribute("type", "text"),
        )
        .element(
            password_field(),
            ElementState::input()
                .with_attribute("placeholder", "Password")
                .with_attribute("type", "password"),
        )
        .element(login_button(), ElementState::visible())
        .on_click(login_button(), move |view, fx| {
            let username = view.value_of(&user_field()).unwrap_or("").to_string();
            let password_ok = view.value_of(&password_field()) == Some(PASSWORD);

            match (username.as_str(), password_ok) {
                ("standard_user" | "problem_user" | "visual_user", true) => {
                    fx.navigate(INVENTORY_URL);
                }
                ("performance_glitch_user", true) => {
                    fx.defer(glitch_delay, |late| late.navigate(INVENTORY_URL));
                }
                ("locked_out_user", true) => {
                    reveal_error(
                        fx,
                        reveal_delay,
                        "Epic sadface: Sorry, this user has been locked out.".to_string(),
                    );
                }
                _ => {
                    let named = username.replace('_', " ");
                    reveal_error(
                        fx,
                        reveal_delay,
                        format!(
                            "Epic sadface: {named} cannot log in. \
                             Please enter valid email or password."
                        ),
                    );
                }
            }
        })
        .on_click(error_close(), |_, fx| {
            fx.hide(&error_container());
            fx.set_attribute(&error_container(), "style", "display: none;");
            fx.hide(&error_close());
        })
        .on_click(input_clear(), |_, fx| {
            fx.clear_value(&user_field());
            fx.clear_value(&password_field());
        });

    let inventory_page = PageModel::new("Swag Labs").element(
        Locator::class_name("inventory_container"),
        ElementState::visible(),
    );

    driver.define_page(BASE_URL, login_page);
    driver.define_page(INVENTORY_URL, inventory_page);
    driver
}

fn fast_site() -> MockDriver {
    demo_site(Duration::from_millis(150), Duration::from_millis(50))
}

fn test_config() -> HarnessConfig {
    HarnessConfig {
        base_url: BASE_URL.to_string(),
        username: "standard_user".to_string(),
        password: PASSWORD.to_string(),
        wait_timeout_ms: 1_000,
        poll_interval_ms: 20,
        slow_login_threshold_ms: 100,
    }
}

mod personas {
    use super::*;

    #[test]
    fn login_form_ui_passes() {
        let outcome = run("login_form_ui", fast_site(), |driver| {
            scenarios::login_form_ui(driver, &test_config())
        });
        assert!(outcome.passed(), "{:?}", outcome.failure());
    }

    #[test]
    fn standard_user_reaches_inventory() {
        let outcome = run("standard_user", fast_site(), |driver| {
            scenarios::standard_user(driver, &test_config())
        });
        assert!(outcome.passed(), "{:?}", outcome.failure());
    }

    #[test]
    fn locked_out_user_sees_error() {
        let outcome = run("locked_out_user", fast_site(), |driver| {
            scenarios::locked_out_user(driver, &test_config())
        });
        assert!(outcome.passed(), "{:?}", outcome.failure());
    }

    #[test]
    fn problem_user_lands_with_title() {
        let outcome = run("problem_user", fast_site(), |driver| {
            scenarios::problem_user(driver, &test_config())
        });
        assert!(outcome.passed(), "{:?}", outcome.failure());
    }

    #[test]
    fn performance_glitch_user_is_slow_enough() {
        let outcome = run("performance_glitch_user", fast_site(), |driver| {
            scenarios::performance_glitch_user(driver, &test_config())
        });
        assert!(outcome.passed(), "{:?}", outcome.failure());
    }

    #[test]
    fn performance_glitch_detects_fast_login() {
        // A glitch-free login is a finding: the scenario reports it.
        let site = demo_site(Duration::from_millis(10), Duration::from_millis(50));
        let outcome = run("performance_glitch_user", site, |driver| {
            scenarios::performance_glitch_user(driver, &test_config())
        });
        assert!(!outcome.passed());
        assert!(outcome
            .failure()
            .unwrap()
            .contains("performance issue was not detected"));
    }

    #[test]
    fn error_user_recovers_after_dismissal() {
        let outcome = run("error_user", fast_site(), |driver| {
            scenarios::error_user(driver, &test_config())
        });
        assert!(outcome.passed(), "{:?}", outcome.failure());
    }

    #[test]
    fn visual_user_full_round_trip() {
        let outcome = run("visual_user", fast_site(), |driver| {
            scenarios::visual_user(driver, &test_config())
        });
        assert!(outcome.passed(), "{:?}", outcome.failure());
    }
}

mod harness_contract {
    use super::*;

    #[test]
    fn locked_out_login_shows_error_message() {
        let driver = fast_site();
        let page = LoginPage::new(&driver);
        page.open(BASE_URL).unwrap();
        page.login("locked_out_user", PASSWORD).unwrap();

        let wait = Wait::with_options(&driver, WaitOptions::new().with_timeout(1_000).with_poll_interval(20));
        wait.until_visible(page.locator(ERROR_MESSAGE).unwrap())
            .unwrap();
        assert!(page.is_error_message_displayed().unwrap());
        driver.close().unwrap();
    }

    #[test]
    fn standard_login_reaches_inventory_without_timeout() {
        let driver = fast_site();
        let page = LoginPage::new(&driver);
        page.open(BASE_URL).unwrap();
        page.login("standard_user", PASSWORD).unwrap();

        let wait = Wait::with_options(&driver, WaitOptions::new().with_timeout(1_000).with_poll_interval(20));
        let url = wait.until_url_contains("inventory").unwrap();
        assert!(url.contains("inventory.html"));
        driver.close().unwrap();
    }

    #[test]
    fn error_probe_before_login_is_hard_not_found() {
        let driver = fast_site();
        let page = LoginPage::new(&driver);
        page.open(BASE_URL).unwrap();

        // The error container is absent from the DOM before any login
        // attempt: a hard error, never a false.
        let err = page.is_error_message_displayed().unwrap_err();
        assert!(matches!(err, EnsayarError::ElementNotFound { .. }));
        driver.close().unwrap();
    }

    #[test]
    fn dismissed_error_goes_invisible_on_same_reference() {
        let driver = fast_site();
        let page = LoginPage::new(&driver);
        page.open(BASE_URL).unwrap();
        page.login("locked_out_user", PASSWORD).unwrap();

        let wait = Wait::with_options(&driver, WaitOptions::new().with_timeout(1_000).with_poll_interval(20));
        let error = wait
            .until_visible(page.locator(ERROR_MESSAGE).unwrap())
            .unwrap();

        page.dismiss_error().unwrap();
        wait.until_gone(&error).unwrap();
        assert!(!error.is_displayed().unwrap());
        driver.close().unwrap();
    }

    #[test]
    fn clear_controls_hidden_until_error() {
        let driver = fast_site();
        let page = LoginPage::new(&driver);
        page.open(BASE_URL).unwrap();
        assert_eq!(page.presence(INPUT_CLEAR).unwrap(), Presence::Absent);

        page.login("locked_out_user", PASSWORD).unwrap();
        let wait = Wait::with_options(&driver, WaitOptions::new().with_timeout(1_000).with_poll_interval(20));
        wait.until_visible(page.locator(INPUT_CLEAR).unwrap())
            .unwrap();
        assert_eq!(page.presence(INPUT_CLEAR).unwrap(), Presence::Visible);
        driver.close().unwrap();
    }

    #[test]
    fn aggregate_reports_every_defect_in_order() {
        // Break both placeholders; the form-UI scenario must report both,
        // in recording order, in one outcome.
        let driver = fast_site();
        driver.navigate(BASE_URL).unwrap();
        driver.page().insert(
            user_field(),
            ElementState::input()
                .with_attribute("placeholder", "Login")
                .with_attribute("type", "text"),
        );
        driver.page().insert(
            password_field(),
            ElementState::input()
                .with_attribute("placeholder", "Secret")
                .with_attribute("type", "password"),
        );

        // Drive the checks directly on the prepared page, without an open()
        // that would reload the pristine login form.
        let outcome = run("login_form_ui_broken", driver, |d| {
            let mut checks = Verifier::new();
            let page = LoginPage::new(d);
            let username = page.element(USERNAME_FIELD).unwrap();
            checks.check_eq(
                &username.attribute("placeholder").unwrap().unwrap_or_default().as_str(),
                &"Username",
                "username field placeholder is incorrect",
            );
            let password = page.element(ensayar::page::PASSWORD_FIELD).unwrap();
            checks.check_eq(
                &password.attribute("placeholder").unwrap().unwrap_or_default().as_str(),
                &"Password",
                "password field placeholder is incorrect",
            );
            checks.flush()?;
            Ok(())
        });

        assert!(!outcome.passed());
        let message = outcome.failure().unwrap();
        let first = message.find("username field placeholder").unwrap();
        let second = message.find("password field placeholder").unwrap();
        assert!(first < second, "failures must keep recording order");
    }
}
