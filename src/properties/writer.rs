//! Property files written for the external command-line tool.
//!
//! Values are written verbatim. The tool reads `:` and `\` literally, so
//! no escaping is applied.

use camino::Utf8Path;

use crate::error::Result;
use crate::files;

/// Builder for a raw `KEY=VALUE` property file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyWriter {
    comment: Option<String>,
    entries: Vec<(String, String)>,
}

impl PropertyWriter {
    /// Start an empty file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix the file with a `#` comment holding the local time.
    #[must_use]
    pub fn timestamped(self) -> Self {
        let stamp = chrono::Local::now()
            .format("%Y-%m-%dT%H:%M:%S%.3f")
            .to_string();
        self.with_comment(stamp)
    }

    /// Prefix the file with a `#` comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Append an entry.
    #[must_use]
    pub fn entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// Render the file contents.
    #[must_use]
    pub fn render(&self) -> String {
        let mut text = String::new();
        if let Some(comment) = &self.comment {
            text.push('#');
            text.push_str(comment);
            text.push('\n');
        }
        for (key, value) in &self.entries {
            text.push_str(key);
            text.push('=');
            text.push_str(value);
            text.push('\n');
        }
        text
    }

    /// Write the rendered file to `path`, replacing it if present.
    ///
    /// # Errors
    ///
    /// Returns `FilesystemError` when the parent directory cannot be opened or
    /// the file cannot be written.
    pub fn write_to(&self, path: &Utf8Path) -> Result<()> {
        files::write(path, &self.render())?;
        tracing::debug!(path = %path, entries = self.entries.len(), "wrote property file");
        Ok(())
    }
}
