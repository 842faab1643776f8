//! Ordered record of named checks.

use std::fmt;

/// What a failed check does to the scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Stop the scenario.
    Fatal,
    /// Record the failure and carry on.
    Continue,
}

/// One named check and its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRecord {
    /// What was checked, phrased as the expected outcome.
    pub description: String,
    /// Whether the check held.
    pub passed: bool,
    /// Severity requested by the caller.
    pub severity: Severity,
    /// Expected/actual values or the underlying error, when known.
    pub detail: Option<String>,
}

impl fmt::Display for CheckRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.passed { "PASS" } else { "FAIL" };
        write!(f, "[{verdict}] {}", self.description)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

/// Position in a [`CheckLog`] that later checks are summarised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

/// Checks recorded during one scenario, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckLog {
    records: Vec<CheckRecord>,
}

impl CheckLog {
    /// Append `record`.
    pub fn record(&mut self, record: CheckRecord) {
        self.records.push(record);
    }

    /// The current end of the log.
    #[must_use]
    pub const fn mark(&self) -> Mark {
        Mark(self.records.len())
    }

    /// Records added after `mark`.
    #[must_use]
    pub fn since(&self, mark: Mark) -> &[CheckRecord] {
        self.records.get(mark.0..).unwrap_or_default()
    }

    /// Whether every record after `mark` passed.
    #[must_use]
    pub fn all_passed_since(&self, mark: Mark) -> bool {
        self.since(mark).iter().all(|record| record.passed)
    }

    /// Every record.
    #[must_use]
    pub fn records(&self) -> &[CheckRecord] {
        &self.records
    }

    /// Failed records of any severity.
    pub fn failures(&self) -> impl Iterator<Item = &CheckRecord> {
        self.records.iter().filter(|record| !record.passed)
    }

    /// The first failed fatal record.
    #[must_use]
    pub fn first_fatal_failure(&self) -> Option<&CheckRecord> {
        self.failures()
            .find(|record| record.severity == Severity::Fatal)
    }

    /// Number of records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Take the records, leaving the log empty.
    #[must_use]
    pub fn into_records(self) -> Vec<CheckRecord> {
        self.records
    }
}
