//! Repo listing, creation, URL copy and clone steps.

use camino::Utf8PathBuf;

use crate::error::Result;
use crate::properties::PropertyWriter;
use crate::scenario::{ScenarioContext, Severity};
use crate::tool::CloneTarget;

pub(super) async fn home_page_is_displayed(ctx: &mut ScenarioContext) -> Result<()> {
    let pages = ctx.pages()?;
    let shown = pages.my_cloned_repos().exists(pages.waits().long).await;
    ctx.confirm("Home Page [My Cloned Repos] is displayed", shown, Severity::Fatal)?;
    Ok(())
}

pub(super) async fn all_repos_from_configuration(ctx: &mut ScenarioContext) -> Result<()> {
    let pages = ctx.pages()?;
    let long = pages.waits().long;
    let show_all = pages.configuration().show_all_repos();

    let found = show_all.exists(long).await;
    ctx.confirm("Show All Repos is displayed", found, Severity::Fatal)?;
    show_all.click().await;

    let shown = pages.all_repos().exists(long).await;
    ctx.confirm("All Repos page is displayed", shown, Severity::Fatal)?;
    Ok(())
}

pub(super) async fn all_repos_from_home(ctx: &mut ScenarioContext) -> Result<()> {
    let pages = ctx.pages()?;
    let long = pages.waits().long;
    let home = pages.my_cloned_repos();

    let home_shown = home.exists(long).await;
    ctx.confirm(
        "Home Page [My Cloned Repos] is displayed",
        home_shown,
        Severity::Continue,
    )?;

    let show_all = home.show_all_repos();
    let found = show_all.exists(long).await;
    ctx.confirm("Show All Repos is displayed", found, Severity::Fatal)?;
    let visible = show_all.is_displayed().await;
    ctx.confirm("Show All Repos is visible", visible, Severity::Fatal)?;
    show_all.click().await;

    let shown = pages.all_repos().exists(long).await;
    ctx.confirm("All Repos page is displayed", shown, Severity::Fatal)?;
    Ok(())
}

/// Creating repos is limited to administrators.
pub(super) async fn open_create_git_repo(ctx: &mut ScenarioContext) -> Result<()> {
    let pages = ctx.pages()?;
    let long = pages.waits().long;
    let all_repos = pages.all_repos();

    let listed = all_repos.exists(long).await;
    ctx.confirm("All Repos page is displayed", listed, Severity::Continue)?;

    let create = all_repos.create_git_repo();
    let found = create.exists(long).await;
    ctx.confirm("Create Git Repo button is displayed", found, Severity::Fatal)?;
    let enabled = create.is_enabled(long).await;
    ctx.confirm("Create Git Repo button is enabled", enabled, Severity::Fatal)?;
    create.click().await;

    let shown = pages.create_git_repo().exists(long).await;
    ctx.confirm("Create Git Repo page is displayed", shown, Severity::Fatal)?;
    Ok(())
}

/// Arguments of the repo creation step; all but `description` are keys.
#[derive(Debug, Clone, Copy)]
pub(super) struct RepoRequest<'a> {
    pub(super) depot_key: &'a str,
    pub(super) stream_key: &'a str,
    /// Root of the `<root>_MEMBERS` / `<root>_NAME` keys; empty skips ACL checks.
    pub(super) acl_group_root: &'a str,
    /// Literal text; empty leaves the field blank.
    pub(super) description: &'a str,
}

/// ACL entries expected after creation: each member, then the group.
fn expected_acl(members: &str, group: &str) -> Vec<String> {
    members
        .split_whitespace()
        .chain(std::iter::once(group))
        .map(ToOwned::to_owned)
        .collect()
}

pub(super) async fn create_git_repo(ctx: &mut ScenarioContext, request: RepoRequest<'_>) -> Result<()> {
    let depot = ctx.resolve(request.depot_key);
    let stream = ctx.resolve(request.stream_key);
    let expected = if request.acl_group_root.is_empty() {
        None
    } else {
        let root = request.acl_group_root;
        Some(expected_acl(
            &ctx.resolve(&format!("{root}_MEMBERS")),
            &ctx.resolve(&format!("{root}_NAME")),
        ))
    };
    tracing::info!(%depot, %stream, "creating git repo from stream");

    let pages = ctx.pages()?;
    let long = pages.waits().long;
    let form = pages.create_git_repo();
    let mark = ctx.mark();

    let shown = form.exists(long).await;
    ctx.confirm("Create a Git Repo page is displayed", shown, Severity::Fatal)?;
    let depot_field = form.depot_name();
    let depot_shown = depot_field.exists(long).await;
    ctx.confirm("Depot Name field is displayed", depot_shown, Severity::Fatal)?;
    let depot_chosen = depot_field.select(&depot).await;
    ctx.confirm(format!("Depot [{depot}] is selected"), depot_chosen, Severity::Continue)?;

    let stream_field = form.stream_name();
    let stream_shown = stream_field.exists(long).await;
    ctx.confirm(
        "Stream Name field is displayed after valid depot is selected",
        stream_shown,
        Severity::Continue,
    )?;
    let stream_chosen = stream_field.select(&stream).await;
    ctx.confirm(
        format!("Stream [{stream}] is selected from stream list"),
        stream_chosen,
        Severity::Continue,
    )?;

    let create = form.create_repo();
    let create_shown = create.exists(long).await;
    ctx.confirm(
        "Create Repo button is displayed after valid stream is selected",
        create_shown,
        Severity::Continue,
    )?;
    let create_enabled = create.is_enabled(long).await;
    ctx.confirm(
        "Create Repo button is enabled after valid stream is selected",
        create_enabled,
        Severity::Continue,
    )?;
    let description_field = form.description();
    let description_shown = description_field.exists(long).await;
    ctx.confirm(
        "Repo Description field is displayed after valid stream is selected",
        description_shown,
        Severity::Continue,
    )?;

    if request.description.is_empty() {
        tracing::info!(%stream, "no description entered");
    } else {
        let typed = description_field.set_text(request.description).await;
        ctx.confirm("Repo Description is entered", typed, Severity::Continue)?;
    }

    let clicked = create.is_enabled(std::time::Duration::ZERO).await && create.click().await;
    ctx.confirm("Create Repo is clicked successfully", clicked, Severity::Fatal)?;

    let acl = pages.access_control_list();
    let acl_shown = acl.exists(long).await;
    ctx.confirm("ACL page is displayed", acl_shown, Severity::Fatal)?;
    let actual = acl.acl_items().await;

    if let Some(entries) = expected {
        let acl_mark = ctx.mark();
        for entry in &entries {
            ctx.confirm(
                format!("Actual ACL list contains [{entry}]"),
                actual.contains(entry),
                Severity::Continue,
            )?;
        }
        ctx.confirm_since(
            acl_mark,
            "Actual ACL list contains all expected members and groups",
            Severity::Continue,
        )?;
    } else {
        tracing::info!(acl = ?actual, "no ACL group given; contents not validated");
    }

    let back = acl.back_button();
    let back_shown = back.exists(long).await;
    ctx.confirm("Verify back button exists", back_shown, Severity::Fatal)?;
    back.click().await;
    let returned = pages.all_repos().exists(long).await;
    ctx.confirm(
        "Verify back button returns user to All Repos page from ACL page",
        returned,
        Severity::Continue,
    )?;

    ctx.confirm_since(
        mark,
        format!("Repo [{stream}] created successfully with expected ACL members"),
        Severity::Fatal,
    )?;
    Ok(())
}

pub(super) async fn repo_is_listed(
    ctx: &mut ScenarioContext,
    stream_key: &str,
    description: &str,
) -> Result<()> {
    let stream = ctx.resolve(stream_key);
    let pages = ctx.pages()?;
    let all_repos = pages.all_repos();

    let shown = all_repos.exists(pages.waits().long).await;
    ctx.confirm("Verify All Repos page is displayed", shown, Severity::Fatal)?;

    let mark = ctx.mark();
    let names = all_repos.repo_names().await;
    let listed = names.contains(&stream);
    ctx.confirm(
        format!("List of repos contains repo [{stream}]"),
        listed,
        Severity::Continue,
    )?;
    if !listed {
        tracing::warn!(available = ?names, "repos listed on All Repos page");
    }

    let actual = all_repos.repo_description(&stream).await;
    ctx.confirm_equals(
        format!("Description for repo [{stream}] matches expected"),
        description,
        actual.as_deref(),
        Severity::Continue,
    )?;

    ctx.confirm_since(
        mark,
        format!("Repo [{stream}] is listed with the expected description"),
        Severity::Fatal,
    )?;
    Ok(())
}

/// Copy the repo's clone URL into the scenario clipboard.
///
/// The clipboard is cleared first and only refilled when every check
/// passes, so a later clone step never works from stale data.
pub(super) async fn copy_repo_url(ctx: &mut ScenarioContext, stream_key: &str) -> Result<()> {
    let stream = ctx.resolve(stream_key);
    tracing::info!(%stream, "copying repo URL");
    ctx.set_clipboard(None);

    let pages = ctx.pages()?;
    let all_repos = pages.all_repos();
    let mark = ctx.mark();

    let shown = all_repos.exists(pages.waits().long).await;
    ctx.confirm("All Repos page is displayed", shown, Severity::Fatal)?;
    let listed = all_repos.has_repo(&stream).await;
    ctx.confirm(
        format!("Repo [{stream}] is found in All Repos"),
        listed,
        Severity::Fatal,
    )?;

    let copied = all_repos.copy_url(&stream).await;
    ctx.confirm_present("Clipboard has contents", copied.as_deref(), Severity::Continue)?;
    ctx.confirm_contains(
        "Clipboard contains stream name",
        &stream,
        copied.as_deref().unwrap_or_default(),
        Severity::Continue,
    )?;

    let complete = ctx.checks().all_passed_since(mark);
    ctx.set_clipboard(copied.filter(|_| complete));
    ctx.confirm_since(
        mark,
        "Stream is found in All Repos page and URL is copied to clipboard",
        Severity::Fatal,
    )?;
    Ok(())
}

pub(super) async fn clone_repo(
    ctx: &mut ScenarioContext,
    user_key: &str,
    password_key: &str,
) -> Result<()> {
    let user = ctx.resolve(user_key);
    let password = ctx.resolve(password_key);
    tracing::info!(%user, "cloning repo from copied URL");

    let pages = ctx.pages()?;
    let long = pages.waits().long;
    let all_repos = pages.all_repos();
    let mark = ctx.mark();

    let shown = all_repos.exists(long).await;
    ctx.confirm("All Repos page is displayed", shown, Severity::Fatal)?;
    let copied = ctx.clipboard().map(ToOwned::to_owned);
    let clone_url = ctx.require("Clipboard storage contains data", copied)?;
    let target = ctx.require(
        format!("Clone URL [{clone_url}] names a repo"),
        CloneTarget::parse(&clone_url),
    )?;

    let tool_config = ctx.config().tool.clone();
    let config_path = ctx.project_path(&tool_config.clone_config);
    let written = PropertyWriter::new()
        .timestamped()
        .entry("USERNAME", user)
        .entry("PASSWORD", password)
        .entry("CLONE_URL", target.target.as_str())
        .write_to(&config_path);
    ctx.confirm_ok(
        format!("Settings for CLI are written to config file {config_path}"),
        written,
        Severity::Fatal,
    )?;

    let ran = ctx.tool().run_script(&tool_config.clone_script).await;
    ctx.confirm_ok("CLI run is successful", ran, Severity::Continue)?;

    let scratch = Utf8PathBuf::from(ctx.resolve_cli(&tool_config.scratch_key));
    let clone_dir = ctx.project_path(&scratch).join("clone");
    ctx.confirm(
        format!("git clone directory exists [{clone_dir}]"),
        crate::files::exists(&clone_dir),
        Severity::Continue,
    )?;
    ctx.confirm(
        format!("Repo [{}] found after cloning", target.repo_name),
        crate::files::exists(&clone_dir.join(&target.repo_name)),
        Severity::Continue,
    )?;

    all_repos.go_back().click().await;
    let home = pages.my_cloned_repos();
    let home_shown = home.exists(long).await;
    ctx.confirm("My Cloned Repos page is displayed", home_shown, Severity::Fatal)?;
    let has_repo = home.has_repo(&target.repo_name).await;
    ctx.confirm(
        format!("My Cloned Repos page contains repo [{}]", target.repo_name),
        has_repo,
        Severity::Fatal,
    )?;

    ctx.confirm_since(
        mark,
        "User has performed clone stream successfully",
        Severity::Fatal,
    )?;
    Ok(())
}
