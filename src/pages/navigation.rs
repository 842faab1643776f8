//! Top navigation bar.

use super::{Element, LoginPage, PageContext};

/// Navigation shown on every page after sign-in.
#[derive(Clone)]
pub struct NavigationBar {
    context: PageContext,
}

impl NavigationBar {
    pub(crate) const fn new(context: PageContext) -> Self {
        Self { context }
    }

    /// The bar itself.
    #[must_use]
    pub fn root(&self) -> Element {
        self.context.css("nav.gitserver-nav")
    }

    /// Administration entry; only rendered for administrators.
    #[must_use]
    pub fn administration_button(&self) -> Element {
        self.context.css("nav.gitserver-nav #nav-administration")
    }

    /// Logout entry.
    #[must_use]
    pub fn logout_button(&self) -> Element {
        self.context.css("nav.gitserver-nav #nav-logout")
    }

    /// Log the current user out and wait for the login form.
    pub async fn logout_current_user(&self) -> bool {
        let waits = self.context.waits();
        let logout = self.logout_button();
        if !logout.exists(waits.long).await || !logout.click().await {
            return false;
        }
        LoginPage::new(self.context.clone()).exists(waits.long).await
    }
}
