//! Conformance constants for vBRIEF v0.5.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// The only `vBRIEFInfo.version` accepted by the validator.
pub const SUPPORTED_VERSION: &str = "0.5";

static HIERARCHICAL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+(\.[A-Za-z0-9_-]+)*$").expect("valid id regex"));

static PLAN_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#[A-Za-z0-9_.-]+|file://.*|https://.*)$").expect("valid planRef regex")
});

/// Lifecycle states shared by plans and plan items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Draft,
    Proposed,
    Approved,
    Pending,
    Running,
    Completed,
    Blocked,
    Cancelled,
}

impl Status {
    pub const ALL: [Status; 8] = [
        Status::Draft,
        Status::Proposed,
        Status::Approved,
        Status::Pending,
        Status::Running,
        Status::Completed,
        Status::Blocked,
        Status::Cancelled,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Status::Draft => "draft",
            Status::Proposed => "proposed",
            Status::Approved => "approved",
            Status::Pending => "pending",
            Status::Running => "running",
            Status::Completed => "completed",
            Status::Blocked => "blocked",
            Status::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// Allowed status names in alphabetical order, for messages.
pub fn sorted_status_names() -> Vec<&'static str> {
    let mut names: Vec<_> = Status::ALL.iter().map(|status| status.as_str()).collect();
    names.sort_unstable();
    names
}

/// Dot-separated segments of `[A-Za-z0-9_-]+`.
pub fn is_hierarchical_id(value: &str) -> bool {
    HIERARCHICAL_ID_RE.is_match(value)
}

/// `#fragment`, `file://...` or `https://...`.
pub fn is_plan_ref(value: &str) -> bool {
    PLAN_REF_RE.is_match(value)
}
