//! Access control list shown after a repo is created.

use super::{Element, PageContext};

/// ACL members and groups of a newly created repo.
#[derive(Clone)]
pub struct AccessControlListPage {
    context: PageContext,
}

impl AccessControlListPage {
    pub(crate) const fn new(context: PageContext) -> Self {
        Self { context }
    }

    /// The ACL panel.
    #[must_use]
    pub fn root(&self) -> Element {
        self.context.css("#acl")
    }

    /// Wait for the ACL panel.
    pub async fn exists(&self, timeout: std::time::Duration) -> bool {
        self.root().exists(timeout).await
    }

    /// One entry per member or group.
    #[must_use]
    pub fn items(&self) -> Element {
        self.context.css("#acl .acl-item")
    }

    /// Returns to the all-repos listing.
    #[must_use]
    pub fn back_button(&self) -> Element {
        self.context.css("#acl button.back")
    }

    /// Names of every member and group, in display order.
    pub async fn acl_items(&self) -> Vec<String> {
        self.items().texts().await
    }
}
