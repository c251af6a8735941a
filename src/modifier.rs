//! Attribute modifiers module.
//!
//! A modifier is an immutable `{kind, source, value}` record attached to an
//! attribute. Modifiers compare by identity: every constructed modifier gets
//! a fresh `ModifierId`, so two modifiers with identical fields are still
//! distinct when removing.

use crate::numeric::AttributeValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_MODIFIER_ID: AtomicU64 = AtomicU64::new(1);

/// How a modifier affects the attribute it is attached to.
///
/// # Examples
///
/// ```rust
/// use attrkit::ModifierKind;
///
/// assert!(ModifierKind::Add.is_arithmetic());
/// assert!(!ModifierKind::Locked.is_arithmetic());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierKind {
    /// Adds `value` to the base value before multiplication.
    Add,
    /// Multiplies the summed value by `value`.
    Multiply,
    /// Freezes the modifier list. `value` is ignored.
    Locked,
    /// Forces the final value back to the base value and clears all modifiers.
    Reset,
    /// Overrides the final value with `value`. The last one added wins.
    Fixed,
}

impl ModifierKind {
    /// Whether this kind takes part in the add-then-multiply composition.
    pub fn is_arithmetic(self) -> bool {
        matches!(self, ModifierKind::Add | ModifierKind::Multiply)
    }
}

impl fmt::Display for ModifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModifierKind::Add => "Add",
            ModifierKind::Multiply => "Multiply",
            ModifierKind::Locked => "Locked",
            ModifierKind::Reset => "Reset",
            ModifierKind::Fixed => "Fixed",
        };
        f.write_str(name)
    }
}

/// Identity of a single modifier instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModifierId(u64);

impl ModifierId {
    fn next() -> Self {
        Self(NEXT_MODIFIER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value of the id.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A single additive, multiplicative, override, reset, or lock effect.
///
/// Cloning a modifier keeps its identity; the clone can be used to remove
/// the original from an attribute.
///
/// # Examples
///
/// ```rust
/// use attrkit::{Modifier, ModifierKind};
///
/// let a = Modifier::new(ModifierKind::Add, "Sword", 10.0);
/// let b = Modifier::new(ModifierKind::Add, "Sword", 10.0);
///
/// assert_ne!(a, b); // same fields, different instances
/// assert_eq!(a, a.clone());
/// ```
#[derive(Debug, Clone)]
pub struct Modifier {
    id: ModifierId,
    kind: ModifierKind,
    source: String,
    value: AttributeValue,
}

impl Modifier {
    /// Create a new modifier with a fresh identity.
    pub fn new(kind: ModifierKind, source: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            id: ModifierId::next(),
            kind,
            source: source.into(),
            value,
        }
    }

    /// Flat bonus.
    pub fn add(source: impl Into<String>, value: AttributeValue) -> Self {
        Self::new(ModifierKind::Add, source, value)
    }

    /// Multiplier.
    pub fn multiply(source: impl Into<String>, value: AttributeValue) -> Self {
        Self::new(ModifierKind::Multiply, source, value)
    }

    /// Override with an absolute value.
    pub fn fixed(source: impl Into<String>, value: AttributeValue) -> Self {
        Self::new(ModifierKind::Fixed, source, value)
    }

    /// Lock the attribute's modifier list.
    pub fn locked(source: impl Into<String>) -> Self {
        Self::new(ModifierKind::Locked, source, 0.0)
    }

    /// Reset the attribute to its base value on the next calculation.
    pub fn reset(source: impl Into<String>) -> Self {
        Self::new(ModifierKind::Reset, source, 0.0)
    }

    /// Identity used for equality; shared by clones.
    pub fn id(&self) -> ModifierId {
        self.id
    }

    /// The kind of effect.
    pub fn kind(&self) -> ModifierKind {
        self.kind
    }

    /// Label of whatever granted the modifier (an item, a spell, ...).
    ///
    /// Several modifiers may share a source and are removed together by
    /// `remove_modifiers_by_source`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use attrkit::Modifier;
    ///
    /// let ring = Modifier::add("Ring of Might", 4.0);
    /// assert_eq!(ring.source(), "Ring of Might");
    /// ```
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Magnitude. Ignored for Locked and Reset.
    pub fn value(&self) -> AttributeValue {
        self.value
    }
}

impl PartialEq for Modifier {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Modifier {}

impl std::hash::Hash for Modifier {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} = {}", self.kind, self.source, self.value)
    }
}

/// Whether a modifier was added to or removed from an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierChange {
    Added,
    Removed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_equality() {
        let a = Modifier::add("Ring", 5.0);
        let b = Modifier::add("Ring", 5.0);
        assert_ne!(a, b);
        assert_ne!(a.id(), b.id());
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_constructors() {
        assert_eq!(Modifier::multiply("Aura", 1.5).kind(), ModifierKind::Multiply);
        assert_eq!(Modifier::fixed("Curse", 1.0).kind(), ModifierKind::Fixed);
        assert_eq!(Modifier::reset("Cleanse").kind(), ModifierKind::Reset);

        let lock = Modifier::locked("Stun");
        assert_eq!(lock.kind(), ModifierKind::Locked);
        assert_eq!(lock.source(), "Stun");
        assert_eq!(lock.value(), 0.0);
    }

    #[test]
    fn test_display() {
        let m = Modifier::add("Sword", 12.5);
        assert_eq!(m.to_string(), "[Add] Sword = 12.5");
    }
}
