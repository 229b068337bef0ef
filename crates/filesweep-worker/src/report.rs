//! Per-record outcomes and the aggregated cleanup report.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Report text when nothing was expired.
pub const NO_FILES_TO_DELETE: &str = "No files to delete";

/// What happened to one expired record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Object and record are both gone.
    Deleted { id: String },
    /// Object deletion failed; the record was not touched.
    ObjectDeleteFailed { id: String, error: String },
    /// Object is gone but the record is left behind.
    RecordDeleteFailed { id: String, error: String },
}

impl Outcome {
    /// Object deletion failure with the error flattened onto one line.
    pub fn object_failed(id: impl Into<String>, error: &str) -> Self {
        Self::ObjectDeleteFailed {
            id: id.into(),
            error: single_line(error),
        }
    }

    /// Record deletion failure with the error flattened onto one line.
    pub fn record_failed(id: impl Into<String>, error: &str) -> Self {
        Self::RecordDeleteFailed {
            id: id.into(),
            error: single_line(error),
        }
    }

    /// Record ID this outcome belongs to.
    pub fn id(&self) -> &str {
        match self {
            Self::Deleted { id }
            | Self::ObjectDeleteFailed { id, .. }
            | Self::RecordDeleteFailed { id, .. } => id,
        }
    }

    /// Whether both halves were deleted.
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deleted { id } => write!(f, "File: {id} - Deleted"),
            Self::ObjectDeleteFailed { id, error } => {
                write!(f, "Error deleting file: {id} - {error}")
            }
            Self::RecordDeleteFailed { id, error } => {
                write!(f, "Error deleting file entry: {id} - {error}")
            }
        }
    }
}

/// Aggregated result of one cleanup run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanupReport {
    /// Number of records listed.
    pub listed: usize,
    /// Records kept because their timestamp did not parse.
    pub unparsable: Vec<String>,
    /// One outcome per expired record.
    pub outcomes: Vec<Outcome>,
    /// Wall time spent deleting.
    #[serde(serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl CleanupReport {
    /// Whether no record was expired.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Records fully deleted.
    pub fn deleted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_deleted()).count()
    }

    /// Records with a failed half.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.deleted()
    }

    /// Records whose object is gone but whose metadata remains.
    ///
    /// These need reconciliation: the next run will list them again and
    /// fail on the missing object.
    pub fn orphaned_records(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::RecordDeleteFailed { .. }))
            .map(Outcome::id)
            .collect()
    }

    /// Plain-text report: one newline-terminated line per outcome, or the
    /// fixed sentinel when nothing expired.
    pub fn render(&self) -> String {
        if self.outcomes.is_empty() {
            return NO_FILES_TO_DELETE.to_string();
        }
        let mut text = String::new();
        for outcome in &self.outcomes {
            text.push_str(&outcome.to_string());
            text.push('\n');
        }
        text
    }
}

impl fmt::Display for CleanupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn single_line(text: &str) -> String {
    if text.contains(['\n', '\r']) {
        text.split(['\n', '\r'])
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        text.to_string()
    }
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_outcome_lines() {
        assert_eq!(
            Outcome::Deleted { id: "a".into() }.to_string(),
            "File: a - Deleted"
        );
        assert_eq!(
            Outcome::object_failed("b", "bucket offline").to_string(),
            "Error deleting file: b - bucket offline"
        );
        assert_eq!(
            Outcome::record_failed("c", "forbidden").to_string(),
            "Error deleting file entry: c - forbidden"
        );
    }

    #[test]
    fn empty_report_is_sentinel() {
        let report = CleanupReport::default();
        assert!(report.is_empty());
        assert_eq!(report.render(), "No files to delete");
    }

    #[test]
    fn report_counts_and_orphans() {
        let report = CleanupReport {
            outcomes: vec![
                Outcome::Deleted { id: "a".into() },
                Outcome::object_failed("b", "x"),
                Outcome::record_failed("c", "y"),
            ],
            ..Default::default()
        };
        assert_eq!(report.deleted(), 1);
        assert_eq!(report.failed(), 2);
        assert_eq!(report.orphaned_records(), vec!["c"]);
        assert_eq!(
            report.render(),
            "File: a - Deleted\nError deleting file: b - x\nError deleting file entry: c - y\n"
        );
    }

    #[test]
    fn multi_line_errors_stay_on_one_line() {
        let outcome = Outcome::object_failed("a", "upstream said:\nno\r\n");
        assert_eq!(outcome.to_string(), "Error deleting file: a - upstream said: no");
    }
}
