//! Example: driving the login page object against the in-memory browser.
//!
//! Demonstrates: page objects, wait-until polling and soft assertion
//! aggregation, with a scripted mock standing in for the real site.
//!
//! Run with: `cargo run --example mock_login`

use std::time::Duration;

use ensayar::mock::{ElementState, MockDriver, PageModel};
use ensayar::page::ERROR_MESSAGE;
use ensayar::prelude::*;

fn main() -> EnsayarResult<()> {
    ensayar::trace::init();
    println!("=== Mock Login Example ===\n");

    // 1. A login page whose button rejects every credential pair.
    let user = Locator::id("user-name");
    let pass = Locator::id("password");
    let button = Locator::id("login-button");
    let error = Locator::css(".error-message-container");

    let login_page = PageModel::new("Swag Labs")
        .element(user.clone(), ElementState::input())
        .element(pass.clone(), ElementState::input())
        .element(button.clone(), ElementState::visible())
        .on_click(button, {
            let error = error.clone();
            move |_, fx| {
                fx.defer(Duration::from_millis(100), |late| {
                    late.insert(
                        &error,
                        ElementState::visible()
                            .with_text("Epic sadface: Sorry, this user has been locked out."),
                    );
                });
            }
        });

    let driver = MockDriver::new("about:blank");
    driver.define_page("https://www.saucedemo.com/", login_page);

    // 2. One scenario, one fresh session, one aggregate report.
    let outcome = run("locked_out_demo", driver, |driver| {
        let page = LoginPage::new(driver);
        page.open("https://www.saucedemo.com/")?;

        let mut checks = Verifier::new();
        page.login("locked_out_user", "secret_sauce")?;

        let wait = Wait::with_options(
            driver,
            WaitOptions::new().with_timeout(1_000).with_poll_interval(50),
        );
        let banner = wait.until_visible(page.locator(ERROR_MESSAGE)?)?;
        checks.check(banner.is_displayed()?, "error banner should be displayed");
        checks.check_contains(
            &banner.text()?,
            "locked out",
            "error banner should name the locked-out condition",
        );

        checks.flush()?;
        Ok(())
    });

    println!(
        "scenario '{}' -> {} in {}ms",
        outcome.scenario,
        if outcome.passed() { "passed" } else { "failed" },
        outcome.elapsed_ms
    );
    println!("\n{}", outcome.to_json()?);

    Ok(())
}
