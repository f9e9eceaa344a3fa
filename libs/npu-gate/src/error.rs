//! Error types for version parsing and gate decisions

use serde::Serialize;
use thiserror::Error;

/// Version string grammar violations
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VersionError {
    /// Nothing left after trimming
    #[error("Version string is empty")]
    Empty,

    /// Base version lacks the space before the dotted version
    #[error("No space before the dotted version")]
    MissingDelimiter,

    /// Base version holds more than one interior space
    #[error("Found {spaces} spaces, expected exactly one")]
    ExtraDelimiters { spaces: usize },

    /// Component is not an unsigned integer
    #[error("Component {index} is not a number: {token:?}")]
    InvalidComponent { index: usize, token: String },

    /// No `.` after a component
    #[error("Expected '.' after component {index}")]
    MissingSeparator { index: usize },

    /// Too few dot-separated components
    #[error("Expected at least {expected} components, found {found}")]
    TooFewComponents { expected: usize, found: usize },
}

/// Why a gate path declined
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    /// Property read returned nothing
    #[error("Property {key} unavailable")]
    PropertyUnavailable { key: &'static str },

    /// Property value violates its grammar
    #[error("Malformed version string: {error}")]
    Malformed { error: VersionError },

    /// Board has no entry in the minimum-version table
    #[error("Board {board:?} has no minimum version")]
    UnknownBoard { board: String },

    /// Driver family has no rules
    #[error("Driver family {major}.{minor} has no rules")]
    UnknownDriverFamily { major: String, minor: String },

    /// Driver family is known but the revision is not
    #[error("Driver revision {revision} of family {major}.{minor} is not supported")]
    UnknownDriverRevision {
        major: String,
        minor: String,
        revision: String,
    },

    /// A version component is under its floor
    #[error("Component {index} is {found}, needs at least {required}")]
    BelowMinimum {
        index: usize,
        found: u32,
        required: u32,
    },
}

impl From<VersionError> for Rejection {
    fn from(error: VersionError) -> Self {
        Self::Malformed { error }
    }
}

impl Rejection {
    /// Check if the input itself was bad rather than merely too old
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

/// Result type for version parsing
pub type Result<T> = std::result::Result<T, VersionError>;
