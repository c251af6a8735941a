//! Error types for attribute management.
//!
//! All errors that can occur while building, looking up, or restoring
//! attributes are represented by the `AttributeError` enum. Policy
//! rejections (locked attributes, gate refusals) are not errors; those
//! operations simply return `None`.

use crate::attribute_id::AttributeId;
use thiserror::Error;

/// Format a cycle path as a readable string.
fn format_cycle_path(path: &[AttributeId]) -> String {
    if path.is_empty() {
        return String::from("(empty cycle)");
    }
    path.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Errors that can occur while working with attributes.
///
/// # Examples
///
/// ```rust
/// use attrkit::{AttributeError, AttributeId};
///
/// let err = AttributeError::DuplicateAttribute(AttributeId::from_str("Health"));
/// println!("{}", err); // "Duplicate attribute: Health"
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AttributeError {
    /// An attribute was constructed with an empty name.
    #[error("Attribute name is empty")]
    EmptyName,

    /// An attribute or collection was constructed with an empty owner.
    #[error("Attribute owner is empty")]
    EmptyOwner,

    /// An attribute with this name is already registered in the collection.
    ///
    /// The existing entry is kept.
    #[error("Duplicate attribute: {0}")]
    DuplicateAttribute(AttributeId),

    /// The owner has no attribute with this name.
    #[error("{owner} has no attribute {name}")]
    NotFound { owner: String, name: AttributeId },

    /// A numeric field in a save record could not be parsed.
    #[error("Invalid number '{text}': {reason}")]
    InvalidNumber { text: String, reason: String },

    /// A save record names a min/max reference that is not part of the record set.
    #[error("Attribute {attribute} references missing attribute {reference}")]
    UnresolvedReference {
        attribute: AttributeId,
        reference: AttributeId,
    },

    /// The clamp references form a cycle.
    ///
    /// If A is bounded by B, B by C, and C by A, the path is `[A, B, C, A]`.
    #[error("Clamp cycle detected: {}", format_cycle_path(.path))]
    Cycle { path: Vec<AttributeId> },

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for AttributeError {
    fn from(err: serde_json::Error) -> Self {
        AttributeError::Json(err.to_string())
    }
}
