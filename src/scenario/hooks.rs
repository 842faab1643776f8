//! Before and after hooks selected by scenario tags.
//!
//! Every scenario loads its property files before the first step and closes
//! its browser after the last one. Tags add setup on top:
//!
//! | Tag         | Effect                                              |
//! |-------------|-----------------------------------------------------|
//! | `@NewSetup` | copy the template over the live product config      |
//! | `@GitURL`   | open the browser and verify the login page          |
//! | `@None`     | nothing beyond the common setup                     |

use crate::config::SetupConfig;
use crate::error::Result;
use crate::properties::reset_live_config;
use crate::steps;

use super::{ScenarioContext, Severity};

/// Resets the product configuration before the scenario.
pub const NEW_SETUP: &str = "NewSetup";

/// Opens the browser on the login page before the scenario.
pub const GIT_URL: &str = "GitURL";

/// Marks a scenario that needs no special setup.
pub const NO_SETUP: &str = "None";

/// Run the setup the scenario's tags ask for.
///
/// # Errors
///
/// Returns `CheckError::Fatal` when the product configuration cannot be
/// reset, a property file cannot be loaded, or the login page does not
/// appear.
pub async fn before_scenario(ctx: &mut ScenarioContext) -> Result<()> {
    tracing::info!(scenario = %ctx.name(), tags = ?ctx.tags(), "starting scenario");

    if ctx.has_tag(NO_SETUP) {
        tracing::info!(scenario = %ctx.name(), "no special setup requested");
    }

    if ctx.has_tag(NEW_SETUP) {
        let setup = ctx.config().setup.clone();
        let reset = reset_from_template(&setup).await;
        ctx.confirm_ok(
            "Product configuration is reset from template",
            reset,
            Severity::Fatal,
        )?;
    }

    let description = format!(
        "Config file [{}] is loaded",
        ctx.config().data.test_data_path()
    );
    let loaded = ctx.load_properties();
    ctx.confirm_ok(description, loaded, Severity::Fatal)?;

    if ctx.has_tag(GIT_URL) {
        steps::open_server(ctx).await?;
        steps::login_page_is_displayed(ctx).await?;
    }
    Ok(())
}

/// Capture the browser log and close the browser, if one is open.
pub async fn after_scenario(ctx: &mut ScenarioContext) {
    ctx.end_session().await;
    tracing::info!(scenario = %ctx.name(), checks = ctx.checks().len(), "finished scenario");
}

async fn reset_from_template(setup: &SetupConfig) -> Result<u64> {
    let (template, live) = setup.paths()?;
    reset_live_config(template, live, setup.settle()).await
}
