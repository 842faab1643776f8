//! Page objects for the git server console.
//!
//! Every page is a stateless bundle of locators over a shared browser handle.
//! Nothing is cached: each accessor returns an [`Element`] that re-queries the
//! live DOM, so a page object may be built fresh for every step without
//! going stale.
//!
//! [`PageRegistry`] hands out typed pages and resolves logical page names
//! used in step text ("Login", "All Repos", "Home") to a [`PageKind`].

mod acl;
mod admin_message;
mod configuration;
mod element;
mod login;
mod navigation;
mod repos;
mod widgets;


use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub use acl::AccessControlListPage;
pub use admin_message::{ASK_ADMIN, AdminErrorMessagePage, NOT_CONFIGURED};
pub use configuration::ConfigurationPage;
pub use element::Element;
pub use login::{LoginPage, PRODUCT_NAME, TITLE_PATTERN};
pub use navigation::NavigationBar;
pub use repos::{AllReposPage, CLIPBOARD_ATTRIBUTE, CreateGitRepoPage, MyClonedReposPage};
pub use widgets::{Dropdown, Typeahead};

use crate::browser::{Browser, Locator};
use crate::config::TimeoutConfig;

/// Wait tiers shared by every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Waits {
    /// Wait for elements expected to be present already.
    pub short: Duration,
    /// Wait after navigation or server round-trips.
    pub long: Duration,
    /// Delay between polls.
    pub poll: Duration,
}

impl From<&TimeoutConfig> for Waits {
    fn from(timeouts: &TimeoutConfig) -> Self {
        Self {
            short: timeouts.short(),
            long: timeouts.long(),
            poll: timeouts.poll_interval(),
        }
    }
}

impl Default for Waits {
    fn default() -> Self {
        Self::from(&TimeoutConfig::default())
    }
}

/// Browser handle plus wait settings, shared by pages and widgets.
#[derive(Clone)]
pub(crate) struct PageContext {
    browser: Arc<dyn Browser>,
    waits: Waits,
}

impl PageContext {
    pub(crate) fn new(browser: Arc<dyn Browser>, waits: Waits) -> Self {
        Self { browser, waits }
    }

    pub(crate) fn element(&self, locator: Locator) -> Element {
        Element::new(Arc::clone(&self.browser), locator, self.waits.poll)
    }

    pub(crate) fn css(&self, selector: &str) -> Element {
        self.element(Locator::css(selector))
    }

    pub(crate) const fn waits(&self) -> Waits {
        self.waits
    }
}

/// Logical pages that step text may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// Sign-in form.
    Login,
    /// Top navigation bar.
    Navigation,
    /// Home page listing the user's cloned repos.
    MyClonedRepos,
    /// Every repo on the server.
    AllRepos,
    /// Repo creation form.
    CreateGitRepo,
    /// ACL shown after creating a repo.
    AccessControlList,
    /// Administration settings.
    Configuration,
    /// Message shown when the server has not been configured.
    AdminErrorMessage,
}

impl PageKind {
    /// Every page, in a stable order.
    pub const ALL: [Self; 8] = [
        Self::Login,
        Self::Navigation,
        Self::MyClonedRepos,
        Self::AllRepos,
        Self::CreateGitRepo,
        Self::AccessControlList,
        Self::Configuration,
        Self::AdminErrorMessage,
    ];

    /// Resolve a logical name, ignoring case, spaces, `-` and `_`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let normalised: String = name
            .chars()
            .filter(|ch| !matches!(ch, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match normalised.as_str() {
            "login" => Some(Self::Login),
            "navigation" | "navbar" => Some(Self::Navigation),
            "home" | "myclonedrepos" => Some(Self::MyClonedRepos),
            "allrepos" | "showallrepos" => Some(Self::AllRepos),
            "creategitrepo" | "createrepo" => Some(Self::CreateGitRepo),
            "acl" | "accesscontrollist" => Some(Self::AccessControlList),
            "configuration" | "config" => Some(Self::Configuration),
            "adminerrormessage" | "adminerror" => Some(Self::AdminErrorMessage),
            _ => None,
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Login => "Login",
            Self::Navigation => "Navigation",
            Self::MyClonedRepos => "My Cloned Repos",
            Self::AllRepos => "All Repos",
            Self::CreateGitRepo => "Create Git Repo",
            Self::AccessControlList => "Access Control List",
            Self::Configuration => "Configuration",
            Self::AdminErrorMessage => "Admin Error Message",
        };
        f.write_str(name)
    }
}

/// Typed access to every page over one browser session.
#[derive(Clone)]
pub struct PageRegistry {
    context: PageContext,
}

impl fmt::Debug for PageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageRegistry")
            .field("waits", &self.context.waits)
            .finish_non_exhaustive()
    }
}

impl PageRegistry {
    /// Build a registry over `browser`.
    #[must_use]
    pub fn new(browser: Arc<dyn Browser>, waits: Waits) -> Self {
        Self {
            context: PageContext::new(browser, waits),
        }
    }

    /// The wait tiers pages use.
    #[must_use]
    pub const fn waits(&self) -> Waits {
        self.context.waits
    }

    /// The sign-in page.
    #[must_use]
    pub fn login(&self) -> LoginPage {
        LoginPage::new(self.context.clone())
    }

    /// The navigation bar.
    #[must_use]
    pub fn navigation(&self) -> NavigationBar {
        NavigationBar::new(self.context.clone())
    }

    /// The home page.
    #[must_use]
    pub fn my_cloned_repos(&self) -> MyClonedReposPage {
        MyClonedReposPage::new(self.context.clone())
    }

    /// The all-repos listing.
    #[must_use]
    pub fn all_repos(&self) -> AllReposPage {
        AllReposPage::new(self.context.clone())
    }

    /// The repo creation form.
    #[must_use]
    pub fn create_git_repo(&self) -> CreateGitRepoPage {
        CreateGitRepoPage::new(self.context.clone())
    }

    /// The ACL page.
    #[must_use]
    pub fn access_control_list(&self) -> AccessControlListPage {
        AccessControlListPage::new(self.context.clone())
    }

    /// The configuration page.
    #[must_use]
    pub fn configuration(&self) -> ConfigurationPage {
        ConfigurationPage::new(self.context.clone())
    }

    /// The not-configured message page.
    #[must_use]
    pub fn admin_error_message(&self) -> AdminErrorMessagePage {
        AdminErrorMessagePage::new(self.context.clone())
    }

    /// Resolve a logical page name.
    #[must_use]
    pub fn page(&self, name: &str) -> Option<PageKind> {
        let kind = PageKind::from_name(name);
        if kind.is_none() {
            tracing::warn!(page = name, "unknown page name");
        }
        kind
    }

    /// The defining element of `kind`.
    #[must_use]
    pub fn defining_element(&self, kind: PageKind) -> Element {
        match kind {
            PageKind::Login => self.login().root(),
            PageKind::Navigation => self.navigation().root(),
            PageKind::MyClonedRepos => self.my_cloned_repos().root(),
            PageKind::AllRepos => self.all_repos().root(),
            PageKind::CreateGitRepo => self.create_git_repo().root(),
            PageKind::AccessControlList => self.access_control_list().root(),
            PageKind::Configuration => self.configuration().root(),
            PageKind::AdminErrorMessage => self.admin_error_message().root(),
        }
    }

    /// Wait for the page called `name`.
    ///
    /// Returns `None` when the name matches no page.
    pub async fn exists_by_name(&self, name: &str, timeout: Duration) -> Option<bool> {
        let kind = self.page(name)?;
        Some(self.defining_element(kind).exists(timeout).await)
    }
}
