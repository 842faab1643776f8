//! An in-memory administration console.
//!
//! Only the sign-in page exists. The login button stays disabled until a
//! user name is typed, and every browser counts its `quit` calls into a
//! shared counter.

use std::future::ready;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use gitserver_harness::browser::{
    Browser, BrowserFuture, BrowserLauncher, ElementState, LaunchSettings, Locator,
};
use gitserver_harness::probe::ServiceProbe;
use gitserver_harness::tool::{CommandRunner, Invocation, ToolFuture};

const LOGIN_FORM: &str = "form.login-form";
const LOGIN_TITLE: &str = "form.login-form .login-title";
const USER_FIELD: &str = "form.login-form input#username";
const PASSWORD_FIELD: &str = "form.login-form input#password";
const LOGIN_BUTTON: &str = "form.login-form button#login";

/// One browser showing the sign-in page.
pub(crate) struct FakeConsole {
    user_typed: AtomicBool,
    quits: Arc<AtomicUsize>,
}

impl FakeConsole {
    const fn new(quits: Arc<AtomicUsize>) -> Self {
        Self {
            user_typed: AtomicBool::new(false),
            quits,
        }
    }

    fn elements(&self, locator: &Locator) -> Vec<ElementState> {
        let Locator::Css(selector) = locator else {
            return Vec::new();
        };
        match selector.as_str() {
            LOGIN_FORM | USER_FIELD | PASSWORD_FIELD => vec![ElementState::visible("")],
            LOGIN_TITLE => vec![ElementState::visible("AccuRev\nGit Server")],
            LOGIN_BUTTON if self.user_typed.load(Ordering::SeqCst) => {
                vec![ElementState::visible("Login")]
            }
            LOGIN_BUTTON => vec![ElementState::visible("Login").disabled()],
            _ => Vec::new(),
        }
    }
}

impl Browser for FakeConsole {
    fn goto(&self, _url: &str) -> BrowserFuture<'_, ()> {
        Box::pin(ready(Ok(())))
    }

    fn query(&self, locator: &Locator) -> BrowserFuture<'_, Vec<ElementState>> {
        Box::pin(ready(Ok(self.elements(locator))))
    }

    fn click(&self, _locator: &Locator, _index: usize) -> BrowserFuture<'_, ()> {
        Box::pin(ready(Ok(())))
    }

    fn set_text(&self, locator: &Locator, _index: usize, text: &str) -> BrowserFuture<'_, ()> {
        if *locator == Locator::css(USER_FIELD) && !text.is_empty() {
            self.user_typed.store(true, Ordering::SeqCst);
        }
        Box::pin(ready(Ok(())))
    }

    fn attribute(
        &self,
        _locator: &Locator,
        _index: usize,
        _name: &str,
    ) -> BrowserFuture<'_, Option<String>> {
        Box::pin(ready(Ok(None)))
    }

    fn execute(&self, _script: &str) -> BrowserFuture<'_, serde_json::Value> {
        Box::pin(ready(Ok(serde_json::Value::Array(Vec::new()))))
    }

    fn title(&self) -> BrowserFuture<'_, String> {
        Box::pin(ready(Ok(String::from("AccuRev Git Server"))))
    }

    fn current_url(&self) -> BrowserFuture<'_, String> {
        Box::pin(ready(Ok(String::from("http://qa-host:8080/git-server/login"))))
    }

    fn quit(&self) -> BrowserFuture<'_, ()> {
        self.quits.fetch_add(1, Ordering::SeqCst);
        Box::pin(ready(Ok(())))
    }
}

/// Opens a fresh [`FakeConsole`] per launch.
pub(crate) struct FakeLauncher {
    pub(crate) quits: Arc<AtomicUsize>,
}

impl BrowserLauncher for FakeLauncher {
    fn launch(&self, _settings: &LaunchSettings) -> BrowserFuture<'_, Arc<dyn Browser>> {
        let browser: Arc<dyn Browser> = Arc::new(FakeConsole::new(Arc::clone(&self.quits)));
        Box::pin(ready(Ok(browser)))
    }
}

/// A command runner whose tool always succeeds.
pub(crate) struct FakeCommands;

impl CommandRunner for FakeCommands {
    fn run(&self, _invocation: &Invocation) -> ToolFuture<'_, ()> {
        Box::pin(ready(Ok(())))
    }
}

/// A probe that finds every address reachable.
pub(crate) struct FakeProbe;

impl ServiceProbe for FakeProbe {
    fn check(&self, _address: &str, _timeout: Duration) -> ToolFuture<'_, ()> {
        Box::pin(ready(Ok(())))
    }
}
