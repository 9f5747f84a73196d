//! Validation issues and their aggregated report.

use serde::Serialize;
use std::fmt;

use crate::domain::models::schema::StringFormat;

/// Header line of a rendered [`AggregatedError`].
pub const DEFAULT_HEADER: &str = "Configuration validation failed:";

/// One step in a path through a configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object field.
    Key(String),
    /// Array element.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// What went wrong at a given path.
#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    /// Value has the wrong JSON type, or is missing (`received == "undefined"`).
    InvalidType {
        /// Expected type name.
        expected: String,
        /// Received type name.
        received: String,
    },
    /// String does not match a required format.
    InvalidString {
        /// The violated format.
        format: StringFormat,
    },
    /// String is not one of the enum literals.
    InvalidEnumValue {
        /// Allowed literals.
        options: Vec<String>,
        /// The rejected value.
        received: String,
    },
    /// Value is below a lower bound.
    TooSmall {
        /// What was measured.
        subject: Measure,
        /// The bound.
        minimum: f64,
        /// Whether the bound itself is allowed.
        inclusive: bool,
    },
    /// Value is above an upper bound.
    TooBig {
        /// What was measured.
        subject: Measure,
        /// The bound.
        maximum: f64,
        /// Whether the bound itself is allowed.
        inclusive: bool,
    },
    /// A refinement rejected the value.
    Custom {
        /// Refinement message.
        message: String,
    },
}

/// The quantity a size bound applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    /// Characters of a string.
    StringLength,
    /// Numeric value.
    Number,
    /// Elements of an array.
    ArrayLength,
}

impl IssueKind {
    /// The diagnostic message the validator attaches to this issue.
    pub fn message(&self) -> String {
        match self {
            Self::InvalidType { received, .. } if received == "undefined" => "Required".to_string(),
            Self::InvalidType { expected, received } => {
                format!("Expected {expected}, received {received}")
            }
            Self::InvalidString { format } => format!("Invalid {format}"),
            Self::InvalidEnumValue { options, received } => format!(
                "Invalid enum value. Expected {}, received '{received}'",
                quote_options(options)
            ),
            Self::TooSmall {
                subject,
                minimum,
                inclusive,
            } => match subject {
                Measure::StringLength => format!(
                    "String must contain {} {minimum} character(s)",
                    if *inclusive { "at least" } else { "over" }
                ),
                Measure::ArrayLength => format!(
                    "Array must contain {} {minimum} element(s)",
                    if *inclusive { "at least" } else { "more than" }
                ),
                Measure::Number => format!(
                    "Number must be greater than {}{minimum}",
                    if *inclusive { "or equal to " } else { "" }
                ),
            },
            Self::TooBig {
                subject,
                maximum,
                inclusive,
            } => match subject {
                Measure::StringLength => format!(
                    "String must contain {} {maximum} character(s)",
                    if *inclusive { "at most" } else { "under" }
                ),
                Measure::ArrayLength => format!(
                    "Array must contain {} {maximum} element(s)",
                    if *inclusive { "at most" } else { "fewer than" }
                ),
                Measure::Number => format!(
                    "Number must be less than {}{maximum}",
                    if *inclusive { "or equal to " } else { "" }
                ),
            },
            Self::Custom { message } => message.clone(),
        }
    }
}

/// Render enum literals as `'a' | 'b'`.
pub(crate) fn quote_options(options: &[String]) -> String {
    options
        .iter()
        .map(|option| format!("'{option}'"))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// An issue as reported by the validator, before aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    /// Location of the offending value.
    pub path: Vec<PathSegment>,
    /// What went wrong.
    pub kind: IssueKind,
}

impl Issue {
    /// The path joined with `.`.
    pub fn dotted_path(&self) -> String {
        self.path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// One caller-facing validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Dotted path of the offending value.
    pub path: String,
    /// Human-readable message.
    pub message: String,
}

impl From<&Issue> for ValidationIssue {
    fn from(issue: &Issue) -> Self {
        let message = match &issue.kind {
            IssueKind::InvalidType { expected, received } => {
                format!("Expected {expected}, received {received}")
            }
            IssueKind::InvalidString {
                format: StringFormat::Url,
            } => "Must be a valid URL".to_string(),
            kind => kind.message(),
        };
        Self {
            path: issue.dotted_path(),
            message,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- {}: {}", self.path, self.message)
    }
}

/// Every validation issue found in one pass, in encounter order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedError {
    header: String,
    issues: Vec<ValidationIssue>,
}

impl AggregatedError {
    /// Aggregate validator issues under the default header.
    pub fn new(issues: &[Issue]) -> Self {
        Self::with_header(DEFAULT_HEADER, issues)
    }

    /// Aggregate validator issues under a custom header.
    pub fn with_header(header: impl Into<String>, issues: &[Issue]) -> Self {
        Self {
            header: header.into(),
            issues: issues.iter().map(ValidationIssue::from).collect(),
        }
    }

    /// The header line.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The aggregated issues.
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Number of issues.
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Whether there are no issues.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Dotted paths of all issues, in order.
    pub fn paths(&self) -> Vec<&str> {
        self.issues.iter().map(|issue| issue.path.as_str()).collect()
    }
}

impl fmt::Display for AggregatedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header)?;
        for issue in &self.issues {
            write!(f, "\n{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregatedError {}

impl IntoIterator for AggregatedError {
    type Item = ValidationIssue;
    type IntoIter = std::vec::IntoIter<ValidationIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}
