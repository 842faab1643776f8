//! Reachability, sign-in and sign-out steps.

use std::time::Duration;

use crate::config::HarnessConfig;
use crate::error::Result;
use crate::pages::{PRODUCT_NAME, TITLE_PATTERN};
use crate::probe::ServiceProbe;
use crate::properties::NOT_FOUND;
use crate::scenario::{ScenarioContext, Severity};

/// Test-data key holding the administrator's user name.
const ADMIN_USER_KEY: &str = "ACCUREV_ADMIN_USERNAME";

/// Test-data key holding the administrator's password.
const ADMIN_PASSWORD_KEY: &str = "ACCUREV_ADMIN_PASSWORD";

async fn probe_server(config: &HarnessConfig, probe: &dyn ServiceProbe) -> Result<()> {
    let address = config.probe_address()?;
    probe.check(&address, config.probe.timeout()).await?;
    Ok(())
}

pub(super) async fn server_is_reachable(ctx: &mut ScenarioContext) -> Result<()> {
    let probe = std::sync::Arc::clone(&ctx.services().probe);
    let reachable = probe_server(ctx.config(), probe.as_ref()).await;
    ctx.confirm_ok("Git Server services are running", reachable, Severity::Fatal)?;
    Ok(())
}

/// Open a browser on the server's base URL.
///
/// # Errors
///
/// Returns `CheckError::Fatal` when the browser cannot be started.
pub async fn open_server(ctx: &mut ScenarioContext) -> Result<()> {
    tracing::info!(url = ctx.config().base_url(), "opening git server");
    let started = ctx.start_session().await;
    ctx.confirm_ok("Git Server UI is launched successfully", started, Severity::Fatal)?;
    Ok(())
}

/// Verify the sign-in page and its product title.
///
/// # Errors
///
/// Returns `CheckError::Fatal` when the page, its title or the expected
/// product name is missing, and `BrowserError::NoSession` without a browser.
pub async fn login_page_is_displayed(ctx: &mut ScenarioContext) -> Result<()> {
    let pages = ctx.pages()?;
    let waits = pages.waits();
    let login = pages.login();

    let displayed = login.exists(waits.long).await;
    ctx.confirm("Git Server Login dialog is displayed", displayed, Severity::Fatal)?;
    let has_title = login.title().exists(waits.short).await;
    ctx.confirm("Git Server Login title is displayed", has_title, Severity::Fatal)?;

    let title = login
        .title()
        .text()
        .await
        .unwrap_or_default()
        .replace(['\r', '\n'], "");
    ctx.confirm_contains(
        format!("Git Server Login title contains {PRODUCT_NAME}"),
        PRODUCT_NAME,
        &title,
        Severity::Fatal,
    )?;
    ctx.confirm_matches(
        format!("Git Server Login title matches {TITLE_PATTERN}"),
        TITLE_PATTERN,
        &title,
        Severity::Fatal,
    )?;
    Ok(())
}

pub(super) async fn login_as_admin(ctx: &mut ScenarioContext) -> Result<()> {
    tracing::info!("entering default administrator credentials");
    log_in(ctx, ADMIN_USER_KEY, ADMIN_PASSWORD_KEY).await
}

/// Sign in with the credentials stored under `user_key` and `password_key`.
///
/// The login button must start disabled and enable once a user name is
/// typed. Every sub-check is recorded; the step fails as a whole if any of
/// them did.
pub(super) async fn log_in(
    ctx: &mut ScenarioContext,
    user_key: &str,
    password_key: &str,
) -> Result<()> {
    tracing::info!(user_key, password_key, "entering user name and password");
    let user = ctx.resolve(user_key);
    let password = ctx.resolve(password_key);

    let pages = ctx.pages()?;
    let waits = pages.waits();
    let login = pages.login();
    let mark = ctx.mark();

    ctx.confirm(
        format!("User name key [{user_key}] is defined"),
        user != NOT_FOUND,
        Severity::Continue,
    )?;
    ctx.confirm(
        format!("Password key [{password_key}] is defined"),
        password != NOT_FOUND,
        Severity::Continue,
    )?;

    let enabled_early = login.login_button().is_enabled(Duration::ZERO).await;
    ctx.confirm("Login button is not enabled", !enabled_early, Severity::Continue)?;

    let user_field = login.user_name_field();
    let user_field_shown = user_field.exists(waits.short).await;
    ctx.confirm("User Name field is displayed", user_field_shown, Severity::Continue)?;
    let user_typed = user_field.set_text(&user).await;
    ctx.confirm("User Name is entered", user_typed, Severity::Continue)?;

    let enabled_now = login.login_button().is_enabled(waits.long).await;
    ctx.confirm("Login button is now enabled", enabled_now, Severity::Continue)?;

    let password_field = login.password_field();
    let password_field_shown = password_field.exists(waits.short).await;
    ctx.confirm("Password field is displayed", password_field_shown, Severity::Continue)?;
    let password_typed = password_field.set_text(&password).await;
    ctx.confirm("Password is entered", password_typed, Severity::Continue)?;

    let button = login.login_button();
    let clicked = button.is_enabled(waits.long).await && button.click().await;
    ctx.confirm("Login button is clicked", clicked, Severity::Continue)?;

    ctx.confirm_since(
        mark,
        "Git Server Login user name and password can be entered successfully",
        Severity::Fatal,
    )?;
    Ok(())
}

pub(super) async fn log_out_current_user(ctx: &mut ScenarioContext) -> Result<()> {
    let pages = ctx.pages()?;
    let logged_out = pages.navigation().logout_current_user().await;
    ctx.confirm(
        "Current user is logged out then login page is displayed",
        logged_out,
        Severity::Fatal,
    )?;
    Ok(())
}

#[expect(
    clippy::unused_async,
    reason = "step bodies share one async signature"
)]
pub(super) async fn user_logs_out(ctx: &mut ScenarioContext) -> Result<()> {
    tracing::info!(scenario = %ctx.name(), "current user can log out");
    Ok(())
}
