//! Error types for ingestion, deserialization and cloning.

use serde::{Deserialize, Serialize};

/// Every fallible operation of the crate reports one of these.
///
/// Evaluation never fails: a missing channel yields an absent field on the
/// produced [`Frame`](crate::frame::Frame) instead.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MotionError {
    /// The table has no data rows once empty rows were dropped.
    #[error("Failed to turn rows into a motion table: expected a header row and at least one data row, found {rows} row(s)")]
    EmptyTable { rows: usize },

    /// A header cell was not a string.
    #[error("Failed to turn rows into a motion table: header of column {column} was the number {found} rather than a string")]
    MalformedHeader { column: usize, found: f64 },

    /// A data cell could not be coerced to a number.
    #[error("Failed to turn rows into a motion table: on row {row}, column {column} held \"{value}\" rather than a number")]
    NonNumericCell {
        row: usize,
        column: usize,
        value: String,
    },

    /// Neither a `time` nor a `timestamp` column was present.
    #[error("Failed to turn rows into a motion table: there is no \"time\" or \"timestamp\" column")]
    MissingTimeColumn,

    /// Both a `time` and a `timestamp` column were present.
    #[error("Failed to turn rows into a motion table: a table cannot have both a \"time\" column and a \"timestamp\" column")]
    AmbiguousTimeColumn,

    /// Too many consecutive descending timestamps. Reported, not raised.
    #[error("{count} values of the time column were found in descending order so the rest are assumed to be as well")]
    ExcessiveDescendingTimestamps { count: usize },

    /// A serialized id did not resolve against the supplied lookups.
    #[error("Could not resolve {kind} with ID \"{id}\"")]
    UnresolvedReference { kind: ReferenceKind, id: String },

    /// Serialized payload could not be encoded or decoded.
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

/// What an [`MotionError::UnresolvedReference`] failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Body,
    Table,
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceKind::Body => f.write_str("body"),
            ReferenceKind::Table => f.write_str("motion table"),
        }
    }
}

impl MotionError {
    /// Shorthand for a missing body reference.
    pub fn unresolved_body(id: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            kind: ReferenceKind::Body,
            id: id.into(),
        }
    }

    /// Shorthand for a missing table reference.
    pub fn unresolved_table(id: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            kind: ReferenceKind::Table,
            id: id.into(),
        }
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::EmptyTable { .. }
            | Self::MalformedHeader { .. }
            | Self::NonNumericCell { .. }
            | Self::MissingTimeColumn
            | Self::AmbiguousTimeColumn => "ingest",
            Self::ExcessiveDescendingTimestamps { .. } => "data-quality",
            Self::UnresolvedReference { .. } => "reference",
            Self::Serialization { .. } => "serialization",
        }
    }

    /// Data-quality findings are surfaced to the user but never abort work.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::ExcessiveDescendingTimestamps { .. })
    }
}

impl From<serde_json::Error> for MotionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}
