//! Line-oriented `key=value` property files.
//!
//! Both property namespaces a scenario uses (the test-data file and the
//! command-line tool's configuration) are read through [`PropertyMap`]. The
//! format is deliberately forgiving:
//!
//! - blank lines and lines whose first non-blank character is `#` are skipped;
//! - a line must contain exactly one unescaped `=`, otherwise it is skipped;
//! - keys and values are trimmed of surrounding whitespace.
//!
//! # Escaping policy
//!
//! [`EscapePolicy::Escaped`] decodes `\=`, `\:`, `\#`, `\\`, `\t` and `\n`,
//! and an escaped `=` is not a separator. [`EscapePolicy::Raw`] treats a
//! backslash as an ordinary character. Use `Raw` for anything that carries
//! credentials to the external tool, which reads values verbatim.
//!
//! Skipped lines are reported at `debug` level with their line number and are
//! never an error.
//!
//! # Lookups
//!
//! [`PropertyMap::lookup`] never fails. An unknown key yields [`NOT_FOUND`],
//! so the failure surfaces later as a check failure with a recognisable value
//! in its message.

mod setup;
mod writer;


use std::collections::BTreeMap;

use camino::Utf8Path;

pub use setup::reset_live_config;
pub use writer::PropertyWriter;

use crate::error::{ConfigError, FilesystemError, Result};
use crate::files;

/// Value returned for a key that is not present.
pub const NOT_FOUND: &str = "*** PROPERTY NOT FOUND ***";

/// How backslashes in a property file are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EscapePolicy {
    /// Backslash sequences are decoded; `\=` does not split.
    #[default]
    Escaped,
    /// Backslashes are literal characters.
    Raw,
}

/// An immutable key/value mapping loaded from a property file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMap {
    entries: BTreeMap<String, String>,
}

impl PropertyMap {
    /// Parse property text.
    ///
    /// Later duplicates of a key replace earlier ones.
    #[must_use]
    pub fn parse(text: &str, policy: EscapePolicy) -> Self {
        let mut entries = BTreeMap::new();

        for (index, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match split_assignment(line, policy) {
                Some((key, value)) => {
                    entries.insert(key, value);
                }
                None => {
                    tracing::debug!(line = index + 1, "skipping malformed property line");
                }
            }
        }

        Self { entries }
    }

    /// Load and parse a property file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::FileNotFound` when the file does not exist and
    /// `ConfigError::ParseError` when it cannot be read as UTF-8 text.
    pub fn load(path: &Utf8Path, policy: EscapePolicy) -> Result<Self> {
        let text = files::read_to_string(path).map_err(|error| match error {
            FilesystemError::NotFound { path: missing } => {
                ConfigError::FileNotFound { path: missing }
            }
            other @ FilesystemError::IoError { .. } => ConfigError::ParseError {
                message: other.to_string(),
            },
        })?;

        let map = Self::parse(&text, policy);
        tracing::info!(path = %path, keys = map.len(), "loaded property file");
        Ok(map)
    }

    /// Value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Value for `key`, or [`NOT_FOUND`] when absent.
    #[must_use]
    pub fn lookup(&self, key: &str) -> &str {
        self.get(key).unwrap_or(NOT_FOUND)
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Fail unless every key in `keys` is present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` naming each absent key.
    pub fn require(&self, keys: &[&str]) -> Result<()> {
        let missing: Vec<&str> = keys
            .iter()
            .copied()
            .filter(|key| !self.contains_key(key))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::MissingRequired {
                field: missing.join(", "),
            }
            .into())
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Split a trimmed, non-comment line at its single separator.
fn split_assignment(line: &str, policy: EscapePolicy) -> Option<(String, String)> {
    let (raw_key, raw_value) = match policy {
        EscapePolicy::Raw => {
            let mut parts = line.split('=');
            let key = parts.next()?;
            let value = parts.next()?;
            if parts.next().is_some() {
                return None;
            }
            (key, value)
        }
        EscapePolicy::Escaped => {
            let separator = single_unescaped_separator(line)?;
            (line.get(..separator)?, line.get(separator + 1..)?)
        }
    };

    let key = raw_key.trim();
    if key.is_empty() {
        return None;
    }
    let value = raw_value.trim();

    match policy {
        EscapePolicy::Raw => Some((key.to_owned(), value.to_owned())),
        EscapePolicy::Escaped => Some((unescape(key), unescape(value))),
    }
}

/// Byte offset of the only unescaped `=`, or `None` for zero or several.
fn single_unescaped_separator(line: &str) -> Option<usize> {
    let mut found = None;
    let mut escaped = false;

    for (offset, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '=' if found.is_some() => return None,
            '=' => found = Some(offset),
            _ => {}
        }
    }

    found
}

fn unescape(text: &str) -> String {
    let mut decoded = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            decoded.push(ch);
            continue;
        }
        match chars.next() {
            Some('t') => decoded.push('\t'),
            Some('n') => decoded.push('\n'),
            Some(other) => decoded.push(other),
            None => decoded.push('\\'),
        }
    }

    decoded
}
