//! A locator bound to a live browser.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::browser::{Browser, ElementState, Locator};

/// One element on the current page, re-queried on every access.
///
/// Actions never fail loudly: a missing or stale element turns into `false`
/// or `None`, and the caller records the outcome as a check.
#[derive(Clone)]
pub struct Element {
    browser: Arc<dyn Browser>,
    locator: Locator,
    index: usize,
    poll: Duration,
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("locator", &self.locator)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl Element {
    /// Bind `locator` to `browser`, targeting the first match.
    #[must_use]
    pub fn new(browser: Arc<dyn Browser>, locator: Locator, poll: Duration) -> Self {
        Self {
            browser,
            locator,
            index: 0,
            poll,
        }
    }

    /// The same locator, targeting the `index`th match.
    #[must_use]
    pub fn nth(&self, index: usize) -> Self {
        Self {
            index,
            ..self.clone()
        }
    }

    /// The locator this element was built from.
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        &self.locator
    }

    async fn probe(&self) -> Option<ElementState> {
        match self.browser.query(&self.locator).await {
            Ok(states) => states.into_iter().nth(self.index),
            Err(error) => {
                tracing::debug!(locator = %self.locator, error = %error, "element query failed");
                None
            }
        }
    }

    /// Poll until `condition` holds or `timeout` elapses.
    ///
    /// The condition is checked before the first sleep, so a condition that
    /// already holds costs exactly one probe.
    async fn wait_for(&self, timeout: Duration, condition: fn(&ElementState) -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.probe().await.is_some_and(|state| condition(&state)) {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                tracing::debug!(locator = %self.locator, ?timeout, "wait timed out");
                return false;
            }
            tokio::time::sleep(self.poll.min(deadline - now)).await;
        }
    }

    /// Wait up to `timeout` for the element to be displayed.
    pub async fn exists(&self, timeout: Duration) -> bool {
        self.wait_for(timeout, |state| state.displayed).await
    }

    /// Wait up to `timeout` for the element to be displayed and enabled.
    ///
    /// A zero timeout is a single probe.
    pub async fn is_enabled(&self, timeout: Duration) -> bool {
        self.wait_for(timeout, |state| state.displayed && state.enabled)
            .await
    }

    /// Whether the element is displayed right now.
    pub async fn is_displayed(&self) -> bool {
        self.probe().await.is_some_and(|state| state.displayed)
    }

    /// Click the element.
    pub async fn click(&self) -> bool {
        match self.browser.click(&self.locator, self.index).await {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(locator = %self.locator, error = %error, "click failed");
                false
            }
        }
    }

    /// Replace the element's text.
    pub async fn set_text(&self, value: &str) -> bool {
        match self.browser.set_text(&self.locator, self.index, value).await {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(locator = %self.locator, error = %error, "set text failed");
                false
            }
        }
    }

    /// Visible text of the element.
    pub async fn text(&self) -> Option<String> {
        self.probe().await.map(|state| state.text)
    }

    /// Value of an attribute.
    pub async fn attribute(&self, name: &str) -> Option<String> {
        match self.browser.attribute(&self.locator, self.index, name).await {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(locator = %self.locator, attribute = name, error = %error, "attribute read failed");
                None
            }
        }
    }

    /// Trimmed text of every match, in document order.
    ///
    /// Positions line up with [`Element::nth`].
    pub async fn texts(&self) -> Vec<String> {
        match self.browser.query(&self.locator).await {
            Ok(states) => states
                .into_iter()
                .map(|state| state.text.trim().to_owned())
                .collect(),
            Err(error) => {
                tracing::debug!(locator = %self.locator, error = %error, "element query failed");
                Vec::new()
            }
        }
    }
}
