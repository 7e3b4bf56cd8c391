use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Error,
    Warning,
}

/// Stable machine-readable codes for every conformance finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    InvalidDocumentType,
    MissingRootField,
    InvalidRootFieldType,
    InvalidVersion,
    MissingPlanField,
    InvalidPlanFieldType,
    InvalidPlanStatus,
    InvalidItemType,
    MissingItemField,
    InvalidItemStatus,
    InvalidIdFormat,
    InvalidPlanref,
    InvalidSubitemsType,
}

impl IssueCode {
    /// Wire string for the code.
    pub const fn as_str(self) -> &'static str {
        match self {
            IssueCode::InvalidDocumentType => "invalid_document_type",
            IssueCode::MissingRootField => "missing_root_field",
            IssueCode::InvalidRootFieldType => "invalid_root_field_type",
            IssueCode::InvalidVersion => "invalid_version",
            IssueCode::MissingPlanField => "missing_plan_field",
            IssueCode::InvalidPlanFieldType => "invalid_plan_field_type",
            IssueCode::InvalidPlanStatus => "invalid_plan_status",
            IssueCode::InvalidItemType => "invalid_item_type",
            IssueCode::MissingItemField => "missing_item_field",
            IssueCode::InvalidItemStatus => "invalid_item_status",
            IssueCode::InvalidIdFormat => "invalid_id_format",
            IssueCode::InvalidPlanref => "invalid_planref",
            IssueCode::InvalidSubitemsType => "invalid_subitems_type",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation finding located by a dotted/bracketed path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    code: IssueCode,
    path: String,
    message: String,
    severity: IssueSeverity,
}

impl Issue {
    /// Create a new validation issue.
    pub fn new(
        code: IssueCode,
        path: impl Into<String>,
        message: impl Into<String>,
        severity: IssueSeverity,
    ) -> Self {
        Self {
            code,
            path: path.into(),
            message: message.into(),
            severity,
        }
    }

    pub fn code(&self) -> IssueCode {
        self.code
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> IssueSeverity {
        self.severity
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Aggregated validation report with errors and warnings.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

impl ValidationReport {
    /// Returns true when there are no errors. Warnings do not count.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error issue.
    pub fn add_error(
        &mut self,
        code: IssueCode,
        path: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.errors
            .push(Issue::new(code, path, message, IssueSeverity::Error));
    }

    /// Add a warning issue.
    pub fn add_warning(
        &mut self,
        code: IssueCode,
        path: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.warnings
            .push(Issue::new(code, path, message, IssueSeverity::Warning));
    }

    /// Append pre-built issues, routing each by its own severity.
    pub fn extend(&mut self, issues: impl IntoIterator<Item = Issue>) {
        for issue in issues {
            match issue.severity {
                IssueSeverity::Warning => self.warnings.push(issue),
                IssueSeverity::Error => self.errors.push(issue),
            }
        }
    }

    /// Short human-readable rendering of the first few errors.
    pub fn summary(&self) -> String {
        const SHOWN: usize = 3;

        if self.errors.is_empty() {
            return "validation failed".to_string();
        }

        let mut summary = self
            .errors
            .iter()
            .take(SHOWN)
            .map(Issue::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        if self.errors.len() > SHOWN {
            summary.push_str(&format!("; ... ({} total errors)", self.errors.len()));
        }
        summary
    }
}

/// Malformed input rejected at the codec boundary.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("vBRIEF JSON document must be an object")]
    NotAnObject,
}

/// Raised by strict entry points when a document has at least one error.
#[derive(Debug, Clone, Error)]
#[error("{}", .report.summary())]
pub struct ValidationFailure {
    pub report: ValidationReport,
}

impl ValidationFailure {
    pub fn new(report: ValidationReport) -> Self {
        Self { report }
    }
}

/// Library-level failures.
#[derive(Debug, Error)]
pub enum VBriefError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationFailure),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("index {index} out of range for {len} item(s)")]
    InvalidIndex { index: usize, len: usize },
}

/// Result type for vBRIEF operations.
pub type Result<T> = std::result::Result<T, VBriefError>;
