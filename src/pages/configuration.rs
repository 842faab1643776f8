//! Administration settings page.

use super::{Element, PageContext, Typeahead};

/// Bridge credentials, admin groups and the save action.
#[derive(Clone)]
pub struct ConfigurationPage {
    context: PageContext,
}

impl ConfigurationPage {
    pub(crate) const fn new(context: PageContext) -> Self {
        Self { context }
    }

    /// The settings form.
    #[must_use]
    pub fn root(&self) -> Element {
        self.context.css("#configuration")
    }

    /// Wait for the settings form.
    pub async fn exists(&self, timeout: std::time::Duration) -> bool {
        self.root().exists(timeout).await
    }

    /// Bridge account user name.
    #[must_use]
    pub fn bridge_user(&self) -> Element {
        self.context.css("#configuration input#bridge-user")
    }

    /// Bridge account password.
    #[must_use]
    pub fn bridge_password(&self) -> Element {
        self.context.css("#configuration input#bridge-password")
    }

    /// Help text rendered under a field, if any.
    pub async fn help_message(&self, field: &str) -> Option<String> {
        self.context
            .css(&format!("#configuration #{field} ~ .help-block"))
            .text()
            .await
            .filter(|text| !text.trim().is_empty())
    }

    /// Groups whose members administer the server.
    #[must_use]
    pub fn admin_group(&self) -> Typeahead {
        Typeahead::new(self.context.clone(), "#configuration #admin-groups")
    }

    /// Save button; enabled only while there are unsaved changes.
    #[must_use]
    pub fn save_button(&self) -> Element {
        self.context.css("#configuration button#save")
    }

    /// Link to the all-repos listing.
    #[must_use]
    pub fn show_all_repos(&self) -> Element {
        self.context.css("#configuration #show-all-repos")
    }
}
