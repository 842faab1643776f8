//! Browser session lifecycle for one scenario.
//!
//! A [`Session`] owns the browser handle from launch to teardown. Starting a
//! session navigates to the target URL and installs a small script that
//! buffers console output in `sessionStorage`, so [`Session::capture_log`]
//! can report it at the end of the scenario.
//!
//! The buffer survives page loads but the hook does not: each full page load
//! needs [`Session::watch_console`] again. The feature runner re-arms it
//! before every step, so output logged by a page between loading and the
//! next step is not captured. Teardown is best effort: failures are logged
//! and never returned.


use std::fmt;
use std::sync::Arc;

use crate::browser::{Browser, BrowserLauncher, LaunchSettings};
use crate::error::BrowserError;

const CONSOLE_HOOK: &str = r"
if (!window.__harnessConsoleHooked) {
    window.__harnessConsoleHooked = true;
    ['log', 'info', 'warn', 'error'].forEach(function (level) {
        var original = console[level];
        console[level] = function () {
            var store = window.sessionStorage;
            var lines = JSON.parse(store.getItem('harnessConsole') || '[]');
            lines.push(level.toUpperCase() + ': ' + Array.prototype.join.call(arguments, ' '));
            store.setItem('harnessConsole', JSON.stringify(lines));
            return original.apply(console, arguments);
        };
    });
}
";

const CONSOLE_DUMP: &str =
    "return JSON.parse(window.sessionStorage.getItem('harnessConsole') || '[]');";

/// Everything needed to open a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    /// Page loaded right after launch.
    pub base_url: String,
    /// Browser launch parameters.
    pub launch: LaunchSettings,
}

/// Console output and location captured at teardown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowserLog {
    /// Location at capture time.
    pub url: Option<String>,
    /// Document title at capture time.
    pub title: Option<String>,
    /// Buffered console lines, oldest first.
    pub entries: Vec<String>,
}

impl fmt::Display for BrowserLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "url: {}", self.url.as_deref().unwrap_or("<unknown>"))?;
        writeln!(f, "title: {}", self.title.as_deref().unwrap_or("<unknown>"))?;
        for entry in &self.entries {
            writeln!(f, "  {entry}")?;
        }
        Ok(())
    }
}

/// An open browser pointed at the server under test.
pub struct Session {
    browser: Arc<dyn Browser>,
    base_url: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Launch a browser and navigate to the target URL.
    ///
    /// A browser that launched but could not navigate is closed before the
    /// error is returned. Failure to install the console hook is logged only.
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::LaunchFailed` or `BrowserError::NavigationFailed`.
    pub async fn start(
        launcher: &dyn BrowserLauncher,
        settings: &SessionSettings,
    ) -> Result<Self, BrowserError> {
        let browser = launcher.launch(&settings.launch).await?;

        if let Err(error) = browser.goto(&settings.base_url).await {
            if let Err(quit_error) = browser.quit().await {
                tracing::warn!(error = %quit_error, "failed to close browser after navigation error");
            }
            return Err(error);
        }

        let session = Self {
            browser,
            base_url: settings.base_url.clone(),
        };
        session.watch_console().await;

        tracing::info!(url = %settings.base_url, "browser session started");
        Ok(session)
    }

    /// Install the console hook on the current page.
    ///
    /// Does nothing on a page that already has it. Failures are logged only.
    pub async fn watch_console(&self) {
        if let Err(error) = self.browser.execute(CONSOLE_HOOK).await {
            tracing::warn!(error = %error, "console capture unavailable");
        }
    }

    /// Shared handle to the browser.
    #[must_use]
    pub fn browser(&self) -> Arc<dyn Browser> {
        Arc::clone(&self.browser)
    }

    /// The URL the session was opened on.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Collect console output, location and title.
    ///
    /// Returns `None` only when nothing at all could be read.
    pub async fn capture_log(&self) -> Option<BrowserLog> {
        let entries = match self.browser.execute(CONSOLE_DUMP).await {
            Ok(value) => Some(console_lines(&value)),
            Err(error) => {
                tracing::warn!(error = %error, "failed to read console buffer");
                None
            }
        };
        let url = self.browser.current_url().await.ok();
        let title = self.browser.title().await.ok();

        if entries.is_none() && url.is_none() && title.is_none() {
            return None;
        }
        Some(BrowserLog {
            url,
            title,
            entries: entries.unwrap_or_default(),
        })
    }

    /// Close the browser. Errors are logged, never returned.
    pub async fn quit(self) {
        match self.browser.quit().await {
            Ok(()) => tracing::info!("browser session closed"),
            Err(error) => tracing::warn!(error = %error, "failed to close browser session"),
        }
    }
}

fn console_lines(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map_or_else(|| item.to_string(), ToOwned::to_owned)
                })
                .collect()
        })
        .unwrap_or_default()
}
