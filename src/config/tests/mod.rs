//! Unit tests for harness configuration types.
//!
//! - [`helpers`] - Shared fixtures and helper functions
//! - [`types_tests`] - Defaults, serialisation and validation
//! - [`layer_precedence_tests`] - `MergeComposer` layer precedence

mod helpers;
mod types_tests;
