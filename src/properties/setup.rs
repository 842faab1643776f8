//! Reset of the product's live configuration from a template.

use std::time::Duration;

use camino::Utf8Path;

use crate::error::Result;
use crate::files;

/// Copy `template` over `live`, pausing `settle` before and after the copy.
///
/// The pauses give the server's file watcher time to observe the change.
/// Returns the number of bytes copied.
///
/// # Errors
///
/// Returns `FilesystemError::NotFound` when the template is missing and
/// `FilesystemError::IoError` when the copy fails.
pub async fn reset_live_config(template: &Utf8Path, live: &Utf8Path, settle: Duration) -> Result<u64> {
    tracing::info!(template = %template, live = %live, "resetting live configuration");

    tokio::time::sleep(settle).await;
    let copied = files::copy(template, live)?;
    tokio::time::sleep(settle).await;

    tracing::debug!(bytes = copied, "live configuration replaced");
    Ok(copied)
}
