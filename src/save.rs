//! Save-record shapes.
//!
//! A save record is flat: each attribute lists its modifiers and names its
//! min/max bounds instead of nesting them, so mutual and shared references
//! survive a round trip. Numbers are stored as locale-invariant text.
//!
//! Building and loading records is done by `factory`.

use crate::attribute_id::AttributeId;
use crate::error::AttributeError;
use crate::modifier::ModifierKind;
use serde::{Deserialize, Serialize};

/// One persisted modifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierRecord {
    pub kind: ModifierKind,
    pub source: String,
    pub value: String,
}

/// One persisted attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRecord {
    pub owner: String,
    pub name: AttributeId,
    pub base_value: String,
    #[serde(default)]
    pub modifiers: Vec<ModifierRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_reference: Option<AttributeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_reference: Option<AttributeId>,
}

/// Everything needed to restore one owner's attributes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SaveRecord {
    pub owner: String,
    #[serde(default)]
    pub attributes: Vec<AttributeRecord>,
}

impl SaveRecord {
    pub fn to_json(&self) -> Result<String, AttributeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, AttributeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The record for `name`, if present.
    pub fn attribute(&self, name: &str) -> Option<&AttributeRecord> {
        self.attributes.iter().find(|a| a.name.as_str() == name)
    }
}
