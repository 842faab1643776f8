//! `fantoccini` implementation of the browser seam.

use std::sync::Arc;

use fantoccini::elements::Element;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;

use super::{Browser, BrowserFuture, BrowserLauncher, ElementState, LaunchSettings, Locator};
use crate::config::BrowserKind;
use crate::error::BrowserError;

const CHROME_WINDOW_SIZE: &str = "--window-size=1920,1080";

/// Build WebDriver capabilities for the requested browser.
#[must_use]
pub fn capabilities(kind: BrowserKind, headless: bool) -> Capabilities {
    let mut caps = Capabilities::new();
    match kind {
        BrowserKind::Chrome => {
            let mut args = vec![CHROME_WINDOW_SIZE, "--disable-gpu"];
            if headless {
                args.push("--headless=new");
            }
            caps.insert(String::from("browserName"), json!("chrome"));
            caps.insert(String::from("goog:chromeOptions"), json!({ "args": args }));
        }
        BrowserKind::Firefox => {
            let args: Vec<&str> = if headless { vec!["-headless"] } else { Vec::new() };
            caps.insert(String::from("browserName"), json!("firefox"));
            caps.insert(String::from("moz:firefoxOptions"), json!({ "args": args }));
        }
    }
    caps
}

/// Opens browsers through a WebDriver server.
#[derive(Debug, Clone, Copy, Default)]
pub struct FantocciniLauncher;

impl BrowserLauncher for FantocciniLauncher {
    fn launch(&self, settings: &LaunchSettings) -> BrowserFuture<'_, Arc<dyn Browser>> {
        let requested = settings.clone();
        Box::pin(async move {
            tracing::info!(
                endpoint = %requested.webdriver_url,
                browser = ?requested.kind,
                headless = requested.headless,
                "opening browser session"
            );
            let client = ClientBuilder::native()
                .capabilities(capabilities(requested.kind, requested.headless))
                .connect(&requested.webdriver_url)
                .await
                .map_err(|e| BrowserError::LaunchFailed {
                    endpoint: requested.webdriver_url.clone(),
                    message: e.to_string(),
                })?;
            Ok(Arc::new(FantocciniBrowser::new(client)) as Arc<dyn Browser>)
        })
    }
}

/// A live WebDriver session.
#[derive(Clone)]
pub struct FantocciniBrowser {
    client: Client,
}

impl FantocciniBrowser {
    /// Wrap a connected client.
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    async fn nth(&self, locator: &Locator, index: usize) -> Result<Element, BrowserError> {
        find_all(&self.client, locator)
            .await?
            .into_iter()
            .nth(index)
            .ok_or_else(|| BrowserError::ElementNotFound {
                locator: locator.to_string(),
                index,
            })
    }
}

async fn find_all(client: &Client, locator: &Locator) -> Result<Vec<Element>, BrowserError> {
    let found = match locator {
        Locator::Css(selector) => client.find_all(fantoccini::Locator::Css(selector)).await,
        Locator::XPath(expression) => client.find_all(fantoccini::Locator::XPath(expression)).await,
        Locator::Id(id) => client.find_all(fantoccini::Locator::Id(id)).await,
        Locator::LinkText(text) => client.find_all(fantoccini::Locator::LinkText(text)).await,
    };
    found.map_err(|e| command_failed("find", &e))
}

fn command_failed(command: &str, error: &impl ToString) -> BrowserError {
    BrowserError::CommandFailed {
        command: command.to_owned(),
        message: error.to_string(),
    }
}

impl Browser for FantocciniBrowser {
    fn goto(&self, url: &str) -> BrowserFuture<'_, ()> {
        let target = url.to_owned();
        Box::pin(async move {
            self.client
                .goto(&target)
                .await
                .map_err(|e| BrowserError::NavigationFailed {
                    url: target.clone(),
                    message: e.to_string(),
                })
        })
    }

    fn query(&self, locator: &Locator) -> BrowserFuture<'_, Vec<ElementState>> {
        let target = locator.clone();
        Box::pin(async move {
            let mut states = Vec::new();
            for element in find_all(&self.client, &target).await? {
                // Elements can go stale between find and inspect.
                states.push(ElementState {
                    displayed: element.is_displayed().await.unwrap_or(false),
                    enabled: element.is_enabled().await.unwrap_or(false),
                    text: element.text().await.unwrap_or_default(),
                });
            }
            Ok(states)
        })
    }

    fn click(&self, locator: &Locator, index: usize) -> BrowserFuture<'_, ()> {
        let target = locator.clone();
        Box::pin(async move {
            let element = self.nth(&target, index).await?;
            element.click().await.map_err(|e| command_failed("click", &e))
        })
    }

    fn set_text(&self, locator: &Locator, index: usize, text: &str) -> BrowserFuture<'_, ()> {
        let target = locator.clone();
        let keys = text.to_owned();
        Box::pin(async move {
            let element = self.nth(&target, index).await?;
            element.clear().await.map_err(|e| command_failed("clear", &e))?;
            element
                .send_keys(&keys)
                .await
                .map_err(|e| command_failed("send_keys", &e))
        })
    }

    fn attribute(
        &self,
        locator: &Locator,
        index: usize,
        name: &str,
    ) -> BrowserFuture<'_, Option<String>> {
        let target = locator.clone();
        let attribute = name.to_owned();
        Box::pin(async move {
            let element = self.nth(&target, index).await?;
            element
                .attr(&attribute)
                .await
                .map_err(|e| command_failed("attribute", &e))
        })
    }

    fn execute(&self, script: &str) -> BrowserFuture<'_, serde_json::Value> {
        let body = script.to_owned();
        Box::pin(async move {
            self.client
                .execute(&body, Vec::new())
                .await
                .map_err(|e| command_failed("execute", &e))
        })
    }

    fn title(&self) -> BrowserFuture<'_, String> {
        Box::pin(async move {
            self.client
                .title()
                .await
                .map_err(|e| command_failed("title", &e))
        })
    }

    fn current_url(&self) -> BrowserFuture<'_, String> {
        Box::pin(async move {
            self.client
                .current_url()
                .await
                .map(String::from)
                .map_err(|e| command_failed("current_url", &e))
        })
    }

    fn quit(&self) -> BrowserFuture<'_, ()> {
        let client = self.client.clone();
        Box::pin(async move { client.close().await.map_err(|e| command_failed("close", &e)) })
    }
}
