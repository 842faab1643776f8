//! Message shown to users when the server is unconfigured.

use super::{Element, PageContext};

/// Phrase stating the server is not configured.
pub const NOT_CONFIGURED: &str = "not been configured";

/// Phrase asking the user to contact an administrator.
pub const ASK_ADMIN: &str = "administrator";

/// The not-configured notice.
#[derive(Clone)]
pub struct AdminErrorMessagePage {
    context: PageContext,
}

impl AdminErrorMessagePage {
    pub(crate) const fn new(context: PageContext) -> Self {
        Self { context }
    }

    /// The notice panel.
    #[must_use]
    pub fn root(&self) -> Element {
        self.context.css("#admin-error")
    }

    /// Wait for the notice.
    pub async fn exists(&self, timeout: std::time::Duration) -> bool {
        self.root().exists(timeout).await
    }

    /// Text of the notice, or an empty string when it cannot be read.
    pub async fn message(&self) -> String {
        self.context
            .css("#admin-error .message")
            .text()
            .await
            .unwrap_or_default()
    }
}
