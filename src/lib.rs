//! Browser-driven acceptance harness for the git server administration
//! console.
//!
//! `gitserver-harness` runs Gherkin scenarios against a live git server
//! through WebDriver. Each scenario drives the console the way an
//! administrator would (sign in, configure the bridge account, create repos
//! from streams, copy clone URLs), records every check it makes, and hands
//! the clone itself to an external command-line tool.
//!
//! # Architecture
//!
//! Steps never touch WebDriver directly. They work through page objects,
//! which work through the [`browser::Browser`] seam, so the whole step
//! library runs unchanged against a fake browser in tests. Per-scenario
//! state lives in a [`scenario::ScenarioContext`] created by the runner and
//! dropped after teardown; there are no globals.
//!
//! # Modules
//!
//! - [`browser`]: the WebDriver seam and its `fantoccini` implementation
//! - [`config`]: layered harness configuration (CLI > env > file > defaults)
//! - [`error`]: semantic error types
//! - [`pages`]: page objects for the console
//! - [`probe`]: server reachability check
//! - [`properties`]: `key=value` property files
//! - [`scenario`]: scenario context, checks, hooks and the feature runner
//! - [`session`]: browser session lifecycle
//! - [`steps`]: the step library
//! - [`tool`]: the external command-line tool

pub mod browser;
pub mod config;
pub mod error;
pub(crate) mod files;
pub mod pages;
pub mod probe;
pub mod properties;
pub mod scenario;
pub mod session;
pub mod steps;
pub mod tool;

#[cfg(test)]
mod test_support;
