//! Reusable form widgets.

use super::{Element, PageContext};

/// Popup multi-select typeahead.
///
/// Typing into the input opens a popup of suggestions; clicking one adds it
/// to the selected tokens.
#[derive(Clone)]
pub struct Typeahead {
    context: PageContext,
    root: String,
}

impl Typeahead {
    pub(crate) fn new(context: PageContext, root: &str) -> Self {
        Self {
            context,
            root: root.to_owned(),
        }
    }

    fn part(&self, selector: &str) -> Element {
        self.context.css(&format!("{} {selector}", self.root))
    }

    /// The text input.
    #[must_use]
    pub fn input(&self) -> Element {
        self.part("input.typeahead-input")
    }

    /// Suggestion entries in the popup.
    #[must_use]
    pub fn popup_items(&self) -> Element {
        self.part(".typeahead-popup li")
    }

    /// Tokens already chosen.
    #[must_use]
    pub fn tokens(&self) -> Element {
        self.part(".typeahead-token")
    }

    /// Wait for the input to be displayed.
    pub async fn exists(&self, timeout: std::time::Duration) -> bool {
        self.input().exists(timeout).await
    }

    /// Type `value` and pick the matching suggestion.
    ///
    /// Returns whether `value` ends up among the selected tokens.
    pub async fn select(&self, value: &str) -> bool {
        let waits = self.context.waits();
        if !self.input().exists(waits.short).await || !self.input().set_text(value).await {
            return false;
        }

        let items = self.popup_items();
        if !items.exists(waits.long).await {
            tracing::warn!(widget = %self.root, value, "typeahead popup did not open");
            return false;
        }
        let Some(position) = items.texts().await.iter().position(|text| text == value) else {
            tracing::warn!(widget = %self.root, value, "no matching suggestion");
            return false;
        };
        if !items.nth(position).click().await {
            return false;
        }

        self.selected_items().await.iter().any(|item| item == value)
    }

    /// Text of every selected token.
    pub async fn selected_items(&self) -> Vec<String> {
        self.tokens().texts().await
    }
}

/// Single-choice dropdown.
#[derive(Clone)]
pub struct Dropdown {
    context: PageContext,
    root: String,
}

impl Dropdown {
    pub(crate) fn new(context: PageContext, root: &str) -> Self {
        Self {
            context,
            root: root.to_owned(),
        }
    }

    fn part(&self, selector: &str) -> Element {
        self.context.css(&format!("{} {selector}", self.root))
    }

    /// The toggle that opens the option list.
    #[must_use]
    pub fn toggle(&self) -> Element {
        self.part(".dropdown-toggle")
    }

    /// Entries in the open option list.
    #[must_use]
    pub fn options(&self) -> Element {
        self.part(".dropdown-option")
    }

    /// Wait for the toggle to be displayed.
    pub async fn exists(&self, timeout: std::time::Duration) -> bool {
        self.toggle().exists(timeout).await
    }

    /// Choose the option whose visible text is `value`.
    ///
    /// Returns whether the toggle shows `value` afterwards.
    pub async fn select(&self, value: &str) -> bool {
        let waits = self.context.waits();
        if !self.toggle().is_enabled(waits.long).await || !self.toggle().click().await {
            return false;
        }

        let options = self.options();
        if !options.exists(waits.long).await {
            tracing::warn!(widget = %self.root, value, "dropdown did not open");
            return false;
        }
        let Some(position) = options.texts().await.iter().position(|text| text == value) else {
            tracing::warn!(widget = %self.root, value, "no matching option");
            return false;
        };
        if !options.nth(position).click().await {
            return false;
        }

        self.selected().await.as_deref() == Some(value)
    }

    /// Text currently shown on the toggle.
    pub async fn selected(&self) -> Option<String> {
        self.toggle()
            .text()
            .await
            .map(|text| text.trim().to_owned())
    }
}
