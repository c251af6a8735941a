//! # attrkit - Modifier-Driven Attribute Engine
//!
//! The stat/buff layer beneath a game's character or unit data:
//! - **Attributes** with a fixed base value and an ordered modifier list
//! - **Modifiers** that add, multiply, override, reset, or lock
//! - **Clamp bounds** that are themselves attributes (`MinHealth`, `MaxHealth`)
//! - **Save records** that restore cross-referencing attributes in two phases
//!
//! ## Calculation
//!
//! ```text
//! Reset present  → base value (modifiers cleared)
//! Fixed present  → value of the last Fixed modifier
//! otherwise      → clamp((base + Σ add) × Π multiply, min_ref, max_ref)
//! ```
//!
//! Bounds are read as snapshots of their current final value. Changing a
//! bound does not recalculate the attributes it clamps; call
//! `AttributeSet::recalculate` (or `recalculate_all`) when that matters.
//!
//! ## Example
//!
//! ```rust
//! use attrkit::*;
//!
//! let mut stats = AttributeSet::new("Player").unwrap();
//! stats.add_clamped_attribute("Health", 50.0, 0.0, 100.0).unwrap();
//! stats.add_attribute("Attack", 20.0).unwrap();
//!
//! stats.add_modifier_to("Attack", ModifierKind::Add, "Sword", 5.0).unwrap();
//! stats.add_modifier_to("Attack", ModifierKind::Multiply, "Rage", 2.0).unwrap();
//! assert_eq!(stats.final_value("Attack"), 50.0); // (20 + 5) * 2
//!
//! stats.add_modifier_to("Health", ModifierKind::Add, "Potion", 1000.0).unwrap();
//! assert_eq!(stats.final_value("Health"), 100.0); // clamped by MaxHealth
//!
//! // Buffs from one source come off together.
//! stats.remove_modifiers_by_source("Rage");
//! assert_eq!(stats.final_value("Attack"), 25.0);
//!
//! // Save and restore.
//! let record = factory::create_save_record(&stats);
//! let restored = factory::restore(&record).unwrap();
//! assert_eq!(restored.final_value("Health"), 100.0);
//! ```
//!
//! ## Modules
//!
//! - [`attribute_id`] - Attribute name type
//! - [`modifier`] - Modifiers and their kinds
//! - [`calculator`] - Final value calculation
//! - [`attribute`] - A single attribute and its mutation protocol
//! - [`set`] - Per-owner attribute collection
//! - [`event`] - Change events, listeners, and gates
//! - [`graph`] - Clamp reference graph
//! - [`config`] - Static configuration
//! - [`save`] - Save-record shapes
//! - [`factory`] - Config expansion and save/load
//! - [`numeric`] - Value type, rounding, and text form
//! - [`error`] - Error types

pub mod attribute;
pub mod attribute_id;
pub mod calculator;
pub mod config;
pub mod error;
pub mod event;
pub mod factory;
pub mod graph;
pub mod modifier;
pub mod numeric;
pub mod save;
pub mod set;

// Re-export main types for convenience
pub use attribute::Attribute;
pub use attribute_id::AttributeId;
pub use calculator::{calculate, CalculateType, Calculation, ClampRange};
pub use config::{AttributeConfig, OwnerConfig};
pub use error::AttributeError;
pub use event::{AttributeChanged, ChangeListener, ModifierGate};
pub use modifier::{Modifier, ModifierChange, ModifierId, ModifierKind};
pub use numeric::AttributeValue;
pub use save::{AttributeRecord, ModifierRecord, SaveRecord};
pub use set::AttributeSet;
