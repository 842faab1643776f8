//! Shared mocks for unit tests.

use std::sync::Arc;

use mockall::mock;

use std::time::Duration;

use crate::browser::{Browser, BrowserFuture, BrowserLauncher, ElementState, LaunchSettings, Locator};
use crate::config::BrowserKind;
use crate::error::BrowserError;
use crate::probe::ServiceProbe;
use crate::scenario::Services;
use crate::tool::{CommandRunner, Invocation, ToolFuture};

mock! {
    pub Driver {}

    impl Browser for Driver {
        fn goto(&self, url: &str) -> BrowserFuture<'_, ()>;
        fn query(&self, locator: &Locator) -> BrowserFuture<'_, Vec<ElementState>>;
        fn click(&self, locator: &Locator, index: usize) -> BrowserFuture<'_, ()>;
        fn set_text(&self, locator: &Locator, index: usize, text: &str) -> BrowserFuture<'_, ()>;
        fn attribute(&self, locator: &Locator, index: usize, name: &str) -> BrowserFuture<'_, Option<String>>;
        fn execute(&self, script: &str) -> BrowserFuture<'_, serde_json::Value>;
        fn title(&self) -> BrowserFuture<'_, String>;
        fn current_url(&self) -> BrowserFuture<'_, String>;
        fn quit(&self) -> BrowserFuture<'_, ()>;
    }
}

mock! {
    pub Launcher {}

    impl BrowserLauncher for Launcher {
        fn launch(&self, settings: &LaunchSettings) -> BrowserFuture<'_, Arc<dyn Browser>>;
    }
}

mock! {
    pub Commands {}

    impl CommandRunner for Commands {
        fn run(&self, invocation: &Invocation) -> ToolFuture<'_, ()>;
    }
}

mock! {
    pub Probe {}

    impl ServiceProbe for Probe {
        fn check(&self, address: &str, timeout: Duration) -> ToolFuture<'_, ()>;
    }
}

/// Services over `launcher`; the tool and probe mocks expect no calls.
pub fn services_with(launcher: MockLauncher) -> Services {
    Services {
        launcher: Arc::new(launcher),
        commands: Arc::new(MockCommands::new()),
        probe: Arc::new(MockProbe::new()),
    }
}

/// An already-resolved browser future.
pub fn ready<T: Send + 'static>(value: Result<T, BrowserError>) -> BrowserFuture<'static, T> {
    Box::pin(async move { value })
}

/// A command failure for mocks to return.
pub fn command_error(command: &str) -> BrowserError {
    BrowserError::CommandFailed {
        command: command.to_owned(),
        message: String::from("stale element reference"),
    }
}

/// Launch settings for tests.
pub fn launch_settings() -> LaunchSettings {
    LaunchSettings {
        webdriver_url: String::from("http://localhost:4444"),
        kind: BrowserKind::Chrome,
        headless: true,
    }
}

/// A launcher that hands out `driver` once.
pub fn launcher_for(driver: MockDriver) -> MockLauncher {
    let shared: Arc<dyn Browser> = Arc::new(driver);
    let mut launcher = MockLauncher::new();
    launcher
        .expect_launch()
        .times(1)
        .returning(move |_| ready(Ok(Arc::clone(&shared))));
    launcher
}

/// Runtime for driving async code from synchronous tests.
pub fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .expect("test runtime should build")
}
