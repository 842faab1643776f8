//! Administration and configuration steps.

use std::time::Duration;

use crate::error::Result;
use crate::pages::{ASK_ADMIN, ConfigurationPage, NOT_CONFIGURED};
use crate::scenario::{ScenarioContext, Severity};

const BRIDGE_USER_KEY: &str = "BRIDGE_USERNAME";
const BRIDGE_PASSWORD_KEY: &str = "BRIDGE_PASSWORD";
const ADMIN_GROUP_KEY: &str = "ADMIN_GROUP_NAME";

pub(super) async fn admin_option_is_displayed(ctx: &mut ScenarioContext) -> Result<()> {
    let pages = ctx.pages()?;
    let shown = pages
        .navigation()
        .administration_button()
        .exists(pages.waits().long)
        .await;
    ctx.confirm("Administrator navigation is displayed", shown, Severity::Fatal)?;
    Ok(())
}

pub(super) async fn configuration_page_is_displayed(ctx: &mut ScenarioContext) -> Result<()> {
    let pages = ctx.pages()?;
    let shown = pages.configuration().exists(pages.waits().long).await;
    ctx.confirm("Configuration Page is displayed", shown, Severity::Fatal)?;
    Ok(())
}

pub(super) async fn open_configuration(ctx: &mut ScenarioContext) -> Result<()> {
    let pages = ctx.pages()?;
    let long = pages.waits().long;
    let admin = pages.navigation().administration_button();

    let found = admin.exists(long).await;
    ctx.confirm("Administration option exists", found, Severity::Fatal)?;
    admin.click().await;

    let shown = pages.configuration().exists(long).await;
    ctx.confirm(
        "Configuration page is displayed after clicking Administration",
        shown,
        Severity::Fatal,
    )?;
    Ok(())
}

pub(super) async fn enter_bridge_credentials(ctx: &mut ScenarioContext) -> Result<()> {
    let user = ctx.resolve(BRIDGE_USER_KEY);
    let password = ctx.resolve(BRIDGE_PASSWORD_KEY);

    let pages = ctx.pages()?;
    let page = pages.configuration();
    let shown = page.exists(pages.waits().short).await;
    ctx.confirm("Configuration Page is displayed", shown, Severity::Fatal)?;

    for field in ["bridge-user", "bridge-password"] {
        if let Some(help) = page.help_message(field).await {
            tracing::debug!(field, help = %help, "configuration help text");
        }
    }

    let user_typed = page.bridge_user().set_text(&user).await;
    ctx.confirm("Bridge user is entered", user_typed, Severity::Continue)?;
    let password_typed = page.bridge_password().set_text(&password).await;
    ctx.confirm("Bridge password is entered", password_typed, Severity::Continue)?;
    Ok(())
}

/// Click save and check the button disables itself.
async fn save(ctx: &mut ScenarioContext, page: &ConfigurationPage, long: Duration) -> Result<()> {
    let button = page.save_button();
    let found = button.exists(long).await;
    ctx.confirm("Save button exists", found, Severity::Continue)?;
    let enabled = button.is_enabled(long).await;
    ctx.confirm("Save button is enabled", enabled, Severity::Fatal)?;
    button.click().await;

    let still_enabled = button.is_enabled(Duration::ZERO).await;
    ctx.confirm("Save button is no longer enabled", !still_enabled, Severity::Fatal)?;
    Ok(())
}

pub(super) async fn configuration_is_saved(ctx: &mut ScenarioContext) -> Result<()> {
    let pages = ctx.pages()?;
    let waits = pages.waits();
    let page = pages.configuration();

    let shown = page.exists(waits.short).await;
    ctx.confirm("Configuration Page is displayed", shown, Severity::Fatal)?;
    save(ctx, &page, waits.long).await
}

pub(super) async fn save_admin_group(ctx: &mut ScenarioContext) -> Result<()> {
    let group = ctx.resolve(ADMIN_GROUP_KEY);
    let pages = ctx.pages()?;
    let long = pages.waits().long;
    let page = pages.configuration();

    let shown = page.exists(long).await;
    ctx.confirm("Configuration Page is displayed", shown, Severity::Fatal)?;

    let admin_group = page.admin_group();
    let widget_shown = admin_group.exists(long).await;
    ctx.confirm("Configuration Admin Group is displayed", widget_shown, Severity::Fatal)?;
    let chosen = admin_group.select(&group).await;
    ctx.confirm(
        format!("Admin group name [{group}] can be selected"),
        chosen,
        Severity::Fatal,
    )?;

    let selected = admin_group.selected_items().await;
    ctx.confirm(
        format!("Admin group [{group}] found in selected groups"),
        selected.contains(&group),
        Severity::Continue,
    )?;

    save(ctx, &page, long).await
}

pub(super) async fn not_configured_message_is_displayed(ctx: &mut ScenarioContext) -> Result<()> {
    let pages = ctx.pages()?;
    let notice = pages.admin_error_message();

    let shown = notice.exists(pages.waits().long).await;
    ctx.confirm("Admin error message is displayed", shown, Severity::Fatal)?;

    let message = notice.message().await;
    let mark = ctx.mark();
    ctx.confirm_contains(
        "Error message contains not configured phrase",
        NOT_CONFIGURED,
        &message,
        Severity::Continue,
    )?;
    ctx.confirm_contains(
        "Error message contains ask admin to configure phrase",
        ASK_ADMIN,
        &message,
        Severity::Continue,
    )?;
    ctx.confirm_since(mark, "Error message contains all expected phrases", Severity::Fatal)?;
    Ok(())
}
