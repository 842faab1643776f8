//! Step definitions for the git server console.
//!
//! [`catalogue`] binds every step sentence the feature files use. Quoted
//! arguments are property keys, not literal values: they are resolved
//! through the scenario's test data before any page is touched, so a
//! missing key shows up as the not-found sentinel in the failing check.
//!
//! Step bodies are plain async functions over [`ScenarioContext`]; the
//! binding table wraps each one in a [`StepFn`]. The session steps are
//! public so the `@GitURL` hook can reuse them.

mod configuration;
mod repos;
mod session;


pub use session::{login_page_is_displayed, open_server};

use crate::error::StepError;
use crate::scenario::{ScenarioContext, StepCatalogue, StepFn, StepFuture};

/// Quoted argument: anything up to the next double quote.
const QUOTED: &str = r#""([^"]*)""#;

/// Argument `index`, or an empty string.
fn arg(args: &[String], index: usize) -> &str {
    args.get(index).map_or("", String::as_str)
}

/// Bind one body that takes no arguments.
macro_rules! no_args {
    ($body:path) => {{
        fn step<'a>(ctx: &'a mut ScenarioContext, _args: &'a [String]) -> StepFuture<'a> {
            Box::pin($body(ctx))
        }
        step as StepFn
    }};
}

fn bindings() -> Vec<(String, usize, StepFn)> {
    let q = QUOTED;
    vec![
        (
            String::from("Git Server is configured on localhost"),
            0,
            no_args!(session::server_is_reachable),
        ),
        (
            String::from("Git Server URL is entered"),
            0,
            no_args!(session::open_server),
        ),
        (
            String::from("Git Server Login is displayed"),
            0,
            no_args!(session::login_page_is_displayed),
        ),
        (
            String::from("Valid Git Server User Name and Password are entered"),
            0,
            no_args!(session::login_as_admin),
        ),
        (
            format!("Valid Git Server User Name {q} and Password {q} are entered"),
            2,
            login_with_keys as StepFn,
        ),
        (
            String::from("Go to Show All Repos from Configuration"),
            0,
            no_args!(repos::all_repos_from_configuration),
        ),
        (
            String::from("Go to Show All Repos from My Cloned Repos"),
            0,
            no_args!(repos::all_repos_from_home),
        ),
        (
            String::from("Go to Create Git Repo"),
            0,
            no_args!(repos::open_create_git_repo),
        ),
        (
            String::from("the current user logs out"),
            0,
            no_args!(session::log_out_current_user),
        ),
        (
            String::from("Admin option is displayed"),
            0,
            no_args!(configuration::admin_option_is_displayed),
        ),
        (
            format!(
                "Create a Git Repo from Depot {q} Stream {q} ACL Group Root {q} and Description {q}"
            ),
            4,
            create_git_repo as StepFn,
        ),
        (
            format!("Stream {q} Repo is displayed on All Repos page with Description {q}"),
            2,
            repo_is_listed as StepFn,
        ),
        (
            String::from("Git Server Home Page is displayed"),
            0,
            no_args!(repos::home_page_is_displayed),
        ),
        (
            String::from("Git Server Configuration Page is displayed"),
            0,
            no_args!(configuration::configuration_page_is_displayed),
        ),
        (
            String::from("Navigate to Configuration Page"),
            0,
            no_args!(configuration::open_configuration),
        ),
        (
            String::from("Valid Configuration Data is Entered"),
            0,
            no_args!(configuration::enter_bridge_credentials),
        ),
        (
            String::from("Configuration is Saved Successfully"),
            0,
            no_args!(configuration::configuration_is_saved),
        ),
        (
            String::from("current user saves an admin group"),
            0,
            no_args!(configuration::save_admin_group),
        ),
        (
            format!("Repo {q} URL Can Be Accessed"),
            1,
            copy_repo_url as StepFn,
        ),
        (
            format!("Clone a Repo as user {q} password {q}"),
            2,
            clone_repo as StepFn,
        ),
        (
            String::from("Not Configured Message is Displayed"),
            0,
            no_args!(configuration::not_configured_message_is_displayed),
        ),
        (
            String::from("the user logs out"),
            0,
            no_args!(session::user_logs_out),
        ),
    ]
}

/// Every step sentence bound to its body.
///
/// # Errors
///
/// Returns `StepError::InvalidPattern` or `StepError::ArgumentMismatch` if a
/// binding is malformed.
pub fn catalogue() -> Result<StepCatalogue, StepError> {
    let mut catalogue = StepCatalogue::new();
    for (pattern, arity, procedure) in bindings() {
        catalogue.bind(&pattern, arity, procedure)?;
    }
    tracing::debug!(steps = catalogue.len(), "step catalogue built");
    Ok(catalogue)
}

fn login_with_keys<'a>(ctx: &'a mut ScenarioContext, args: &'a [String]) -> StepFuture<'a> {
    Box::pin(session::log_in(ctx, arg(args, 0), arg(args, 1)))
}

fn create_git_repo<'a>(ctx: &'a mut ScenarioContext, args: &'a [String]) -> StepFuture<'a> {
    Box::pin(repos::create_git_repo(
        ctx,
        repos::RepoRequest {
            depot_key: arg(args, 0),
            stream_key: arg(args, 1),
            acl_group_root: arg(args, 2),
            description: arg(args, 3),
        },
    ))
}

fn repo_is_listed<'a>(ctx: &'a mut ScenarioContext, args: &'a [String]) -> StepFuture<'a> {
    Box::pin(repos::repo_is_listed(ctx, arg(args, 0), arg(args, 1)))
}

fn copy_repo_url<'a>(ctx: &'a mut ScenarioContext, args: &'a [String]) -> StepFuture<'a> {
    Box::pin(repos::copy_repo_url(ctx, arg(args, 0)))
}

fn clone_repo<'a>(ctx: &'a mut ScenarioContext, args: &'a [String]) -> StepFuture<'a> {
    Box::pin(repos::clone_repo(ctx, arg(args, 0), arg(args, 1)))
}
