//! Sign-in page.

use super::{Element, PageContext};

/// Product name the login title must contain.
pub const PRODUCT_NAME: &str = "AccuRev";

/// Pattern the login title must match, line breaks removed.
pub const TITLE_PATTERN: &str = r"AccuRev.*Git Server";

/// The sign-in form shown before any other page.
#[derive(Clone)]
pub struct LoginPage {
    context: PageContext,
}

impl LoginPage {
    pub(crate) const fn new(context: PageContext) -> Self {
        Self { context }
    }

    /// The login form.
    #[must_use]
    pub fn root(&self) -> Element {
        self.context.css("form.login-form")
    }

    /// Wait for the login form.
    pub async fn exists(&self, timeout: std::time::Duration) -> bool {
        self.root().exists(timeout).await
    }

    /// Heading above the form.
    #[must_use]
    pub fn title(&self) -> Element {
        self.context.css("form.login-form .login-title")
    }

    /// User name input.
    #[must_use]
    pub fn user_name_field(&self) -> Element {
        self.context.css("form.login-form input#username")
    }

    /// Password input.
    #[must_use]
    pub fn password_field(&self) -> Element {
        self.context.css("form.login-form input#password")
    }

    /// Submit button; disabled until both fields hold text.
    #[must_use]
    pub fn login_button(&self) -> Element {
        self.context.css("form.login-form button#login")
    }
}
