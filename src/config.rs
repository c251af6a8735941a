//! Static per-owner attribute configuration.
//!
//! A config entry describes one primary attribute and, optionally, the
//! bounds to synthesize for it. Configs are plain serde types so they can
//! be authored as data files.

use crate::attribute_id::AttributeId;
use crate::error::AttributeError;
use crate::numeric::{AttributeValue, NO_MAX, NO_MIN};
use serde::{Deserialize, Serialize};

fn default_min() -> AttributeValue {
    NO_MIN
}

fn default_max() -> AttributeValue {
    NO_MAX
}

/// Definition of one attribute in an owner's static configuration.
///
/// # Examples
///
/// ```rust
/// use attrkit::AttributeConfig;
///
/// let config = AttributeConfig::new("Health", 100.0).with_min(0.0).with_max(150.0);
/// assert!(config.has_min_clamp);
/// assert_eq!(config.max_value, 150.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeConfig {
    pub name: AttributeId,
    pub base_value: AttributeValue,
    #[serde(default)]
    pub has_min_clamp: bool,
    #[serde(default = "default_min")]
    pub min_value: AttributeValue,
    #[serde(default)]
    pub has_max_clamp: bool,
    #[serde(default = "default_max")]
    pub max_value: AttributeValue,
}

impl AttributeConfig {
    /// An unclamped attribute.
    pub fn new(name: impl Into<AttributeId>, base_value: AttributeValue) -> Self {
        Self {
            name: name.into(),
            base_value,
            has_min_clamp: false,
            min_value: NO_MIN,
            has_max_clamp: false,
            max_value: NO_MAX,
        }
    }

    /// Request a synthesized `"Min"+name` bound.
    pub fn with_min(mut self, min_value: AttributeValue) -> Self {
        self.has_min_clamp = true;
        self.min_value = min_value;
        self
    }

    /// Request a synthesized `"Max"+name` bound.
    pub fn with_max(mut self, max_value: AttributeValue) -> Self {
        self.has_max_clamp = true;
        self.max_value = max_value;
        self
    }
}

/// An owner together with its attribute definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerConfig {
    pub owner: String,
    #[serde(default)]
    pub attributes: Vec<AttributeConfig>,
}

/// Parse an owner configuration from JSON.
///
/// # Examples
///
/// ```rust
/// let json = r#"{
///     "owner": "Goblin",
///     "attributes": [
///         { "name": "Health", "base_value": 30, "has_max_clamp": true, "max_value": 30 },
///         { "name": "Speed", "base_value": 4.5 }
///     ]
/// }"#;
///
/// let config = attrkit::config::from_json(json).unwrap();
/// assert_eq!(config.owner, "Goblin");
/// assert_eq!(config.attributes.len(), 2);
/// assert!(!config.attributes[1].has_min_clamp);
/// ```
pub fn from_json(json: &str) -> Result<OwnerConfig, AttributeError> {
    Ok(serde_json::from_str(json)?)
}
