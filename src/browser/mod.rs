//! The WebDriver seam.
//!
//! [`Browser`] is the only surface page objects talk to. It works at the
//! element level: a [`Locator`] plus the index of a match. Every method
//! returns a boxed future so the seam can be mocked without a running
//! WebDriver server. [`webdriver`] provides the production implementation
//! over `fantoccini`.

mod resolver;
pub mod webdriver;


use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub use resolver::{DEFAULT_WEBDRIVER_URL, WebDriverResolver};
pub use webdriver::{FantocciniBrowser, FantocciniLauncher};

use crate::config::BrowserKind;
use crate::error::BrowserError;

/// Boxed future returned by [`Browser`] and [`BrowserLauncher`] methods.
pub type BrowserFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, BrowserError>> + Send + 'a>>;

/// How an element is found in the live DOM.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// CSS selector.
    Css(String),
    /// XPath expression.
    XPath(String),
    /// Element `id` attribute.
    Id(String),
    /// Exact visible text of a link.
    LinkText(String),
}

impl Locator {
    /// Build a CSS locator.
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Build an XPath locator.
    #[must_use]
    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::XPath(expression.into())
    }

    /// Build an `id` locator.
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Build a link-text locator.
    #[must_use]
    pub fn link_text(text: impl Into<String>) -> Self {
        Self::LinkText(text.into())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(selector) => write!(f, "css({selector})"),
            Self::XPath(expression) => write!(f, "xpath({expression})"),
            Self::Id(id) => write!(f, "id({id})"),
            Self::LinkText(text) => write!(f, "link({text})"),
        }
    }
}

/// Snapshot of one matched element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementState {
    /// Whether the element is rendered visibly.
    pub displayed: bool,
    /// Whether the element accepts interaction.
    pub enabled: bool,
    /// Visible text content.
    pub text: String,
}

impl ElementState {
    /// State of a visible, enabled element with the given text.
    #[must_use]
    pub fn visible(text: impl Into<String>) -> Self {
        Self {
            displayed: true,
            enabled: true,
            text: text.into(),
        }
    }

    /// Same state, disabled.
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Operations a page object may perform against the browser.
///
/// Arguments are copied into the returned future; only `self` is borrowed.
pub trait Browser: Send + Sync {
    /// Navigate to an absolute URL.
    fn goto(&self, url: &str) -> BrowserFuture<'_, ()>;

    /// Snapshot every element matching `locator`, in document order.
    fn query(&self, locator: &Locator) -> BrowserFuture<'_, Vec<ElementState>>;

    /// Click the `index`th match.
    fn click(&self, locator: &Locator, index: usize) -> BrowserFuture<'_, ()>;

    /// Replace the text of the `index`th match.
    fn set_text(&self, locator: &Locator, index: usize, text: &str) -> BrowserFuture<'_, ()>;

    /// Read an attribute of the `index`th match.
    fn attribute(
        &self,
        locator: &Locator,
        index: usize,
        name: &str,
    ) -> BrowserFuture<'_, Option<String>>;

    /// Run a script in the page and return its JSON result.
    fn execute(&self, script: &str) -> BrowserFuture<'_, serde_json::Value>;

    /// Document title.
    fn title(&self) -> BrowserFuture<'_, String>;

    /// Current location.
    fn current_url(&self) -> BrowserFuture<'_, String>;

    /// End the WebDriver session.
    fn quit(&self) -> BrowserFuture<'_, ()>;
}

/// Parameters for opening a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSettings {
    /// WebDriver endpoint.
    pub webdriver_url: String,
    /// Browser to request.
    pub kind: BrowserKind,
    /// Run without a window.
    pub headless: bool,
}

/// Opens browser sessions.
pub trait BrowserLauncher: Send + Sync {
    /// Open a new browser.
    fn launch(&self, settings: &LaunchSettings) -> BrowserFuture<'_, Arc<dyn Browser>>;
}
