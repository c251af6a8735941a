//! Attribute identifier module.
//!
//! Provides the `AttributeId` type, an interned name for attributes.
//! Uses `Arc<str>` so that cloning a name into clamp references, events,
//! and save records is cheap.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::sync::Arc;

/// Prefix of the synthesized lower-bound attribute for a clamped attribute.
pub const MIN_PREFIX: &str = "Min";

/// Prefix of the synthesized upper-bound attribute for a clamped attribute.
pub const MAX_PREFIX: &str = "Max";

/// Interned string identifier for attributes.
///
/// # Examples
///
/// ```rust
/// use attrkit::AttributeId;
///
/// let health = AttributeId::from_str("Health");
/// let health2: AttributeId = "Health".into();
///
/// assert_eq!(health, health2);
/// assert_eq!(health.min_bound().as_str(), "MinHealth");
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct AttributeId(Arc<str>);

impl Serialize for AttributeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AttributeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(AttributeId::from(s))
    }
}

impl AttributeId {
    /// Create a new `AttributeId` from a string slice.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// Get the string representation of this `AttributeId`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the name is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Name of the synthesized lower-bound attribute (`"Min" + name`).
    pub fn min_bound(&self) -> AttributeId {
        AttributeId::from(format!("{MIN_PREFIX}{}", self.0))
    }

    /// Name of the synthesized upper-bound attribute (`"Max" + name`).
    pub fn max_bound(&self) -> AttributeId {
        AttributeId::from(format!("{MAX_PREFIX}{}", self.0))
    }
}

impl From<&str> for AttributeId {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for AttributeId {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl From<&AttributeId> for AttributeId {
    fn from(id: &AttributeId) -> Self {
        id.clone()
    }
}

// Lets name-keyed maps be queried with a plain `&str`.
impl Borrow<str> for AttributeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AttributeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
