//! Repo listings and the repo creation form.

use super::{Dropdown, Element, PageContext};

/// Attribute the copy-URL button carries for the clipboard library.
pub const CLIPBOARD_ATTRIBUTE: &str = "data-clipboard-text";

/// Home page: repos the signed-in user has cloned.
#[derive(Clone)]
pub struct MyClonedReposPage {
    context: PageContext,
}

impl MyClonedReposPage {
    pub(crate) const fn new(context: PageContext) -> Self {
        Self { context }
    }

    /// The listing panel.
    #[must_use]
    pub fn root(&self) -> Element {
        self.context.css("#my-cloned-repos")
    }

    /// Wait for the listing.
    pub async fn exists(&self, timeout: std::time::Duration) -> bool {
        self.root().exists(timeout).await
    }

    /// Link to the all-repos listing.
    #[must_use]
    pub fn show_all_repos(&self) -> Element {
        self.context.css("#my-cloned-repos #show-all-repos")
    }

    /// Names of the listed repos.
    pub async fn repo_names(&self) -> Vec<String> {
        self.context
            .css("#my-cloned-repos .repo-name")
            .texts()
            .await
    }

    /// Whether `name` is listed.
    pub async fn has_repo(&self, name: &str) -> bool {
        self.repo_names().await.iter().any(|repo| repo == name)
    }
}

/// Every repo on the server, one row each.
#[derive(Clone)]
pub struct AllReposPage {
    context: PageContext,
}

impl AllReposPage {
    pub(crate) const fn new(context: PageContext) -> Self {
        Self { context }
    }

    /// The listing panel.
    #[must_use]
    pub fn root(&self) -> Element {
        self.context.css("#all-repos")
    }

    /// Wait for the listing.
    pub async fn exists(&self, timeout: std::time::Duration) -> bool {
        self.root().exists(timeout).await
    }

    /// Opens the repo creation form; administrators only.
    #[must_use]
    pub fn create_git_repo(&self) -> Element {
        self.context.css("#all-repos button#create-git-repo")
    }

    /// Returns to the home page.
    #[must_use]
    pub fn go_back(&self) -> Element {
        self.context.css("#all-repos button.back")
    }

    fn names(&self) -> Element {
        self.context.css("#all-repos tr.repo-row .repo-name")
    }

    fn descriptions(&self) -> Element {
        self.context.css("#all-repos tr.repo-row .repo-description")
    }

    fn copy_buttons(&self) -> Element {
        self.context.css("#all-repos tr.repo-row button.copy-url")
    }

    /// Names of every listed repo, in row order.
    pub async fn repo_names(&self) -> Vec<String> {
        self.names().texts().await
    }

    async fn row_of(&self, name: &str) -> Option<usize> {
        self.repo_names().await.iter().position(|repo| repo == name)
    }

    /// Whether `name` is listed.
    pub async fn has_repo(&self, name: &str) -> bool {
        self.row_of(name).await.is_some()
    }

    /// Description shown in the row for `name`.
    pub async fn repo_description(&self, name: &str) -> Option<String> {
        let row = self.row_of(name).await?;
        self.descriptions()
            .nth(row)
            .text()
            .await
            .map(|text| text.trim().to_owned())
    }

    /// Click the copy button for `name` and return the URL it copies.
    ///
    /// The URL is read from the button's clipboard attribute, so no system
    /// clipboard is involved.
    pub async fn copy_url(&self, name: &str) -> Option<String> {
        let row = self.row_of(name).await?;
        let button = self.copy_buttons().nth(row);
        if !button.click().await {
            return None;
        }
        button
            .attribute(CLIPBOARD_ATTRIBUTE)
            .await
            .filter(|url| !url.is_empty())
    }
}

/// Form creating a repo from a depot stream.
#[derive(Clone)]
pub struct CreateGitRepoPage {
    context: PageContext,
}

impl CreateGitRepoPage {
    pub(crate) const fn new(context: PageContext) -> Self {
        Self { context }
    }

    /// The form.
    #[must_use]
    pub fn root(&self) -> Element {
        self.context.css("#create-git-repo-form")
    }

    /// Wait for the form.
    pub async fn exists(&self, timeout: std::time::Duration) -> bool {
        self.root().exists(timeout).await
    }

    /// Depot chooser.
    #[must_use]
    pub fn depot_name(&self) -> Dropdown {
        Dropdown::new(self.context.clone(), "#create-git-repo-form #depot")
    }

    /// Stream chooser; shown once a depot is chosen.
    #[must_use]
    pub fn stream_name(&self) -> Dropdown {
        Dropdown::new(self.context.clone(), "#create-git-repo-form #stream")
    }

    /// Optional free-text description.
    #[must_use]
    pub fn description(&self) -> Element {
        self.context
            .css("#create-git-repo-form textarea#description")
    }

    /// Submit button; enabled once a stream is chosen.
    #[must_use]
    pub fn create_repo(&self) -> Element {
        self.context.css("#create-git-repo-form button#create-repo")
    }
}
