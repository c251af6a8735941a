//! Change events, listeners, and modifier gates.
//!
//! Events are delivered synchronously after a mutation and its
//! recalculation have been committed, so listeners only observe settled
//! attributes.

use crate::attribute_id::AttributeId;
use crate::modifier::{Modifier, ModifierChange};
use crate::numeric::AttributeValue;

/// A committed change to an attribute's modifier list.
///
/// # Examples
///
/// ```rust
/// use attrkit::{Attribute, ClampRange, Modifier, ModifierChange};
///
/// let mut hp = Attribute::new("Health", "Player", 100.0).unwrap();
/// let buff = Modifier::add("Potion", 25.0);
///
/// let event = hp.add_modifier(buff.clone(), ClampRange::UNBOUNDED).unwrap();
/// assert_eq!(event.old_value, 100.0);
/// assert_eq!(event.new_value, 125.0);
/// assert_eq!(event.change_of(&buff), Some(ModifierChange::Added));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeChanged {
    /// The attribute that changed.
    pub attribute: AttributeId,

    /// Final value before the mutation.
    pub old_value: AttributeValue,

    /// Final value after the mutation and recalculation.
    pub new_value: AttributeValue,

    /// Every modifier touched by the mutation, in the order it was touched.
    pub changed_modifiers: Vec<(Modifier, ModifierChange)>,
}

impl AttributeChanged {
    /// How `modifier` was changed by this event, if it was touched at all.
    pub fn change_of(&self, modifier: &Modifier) -> Option<ModifierChange> {
        self.changed_modifiers
            .iter()
            .find(|(m, _)| m == modifier)
            .map(|(_, change)| *change)
    }

    /// Whether the final value moved.
    pub fn value_changed(&self) -> bool {
        self.old_value != self.new_value
    }
}

/// Callback invoked with every committed change.
pub type ChangeListener = Box<dyn Fn(&AttributeChanged) + Send + Sync>;

/// Policy deciding whether a modifier may be added to or removed from an attribute.
///
/// Any `Fn(&Modifier, bool) -> bool` closure is a gate; the flag is `true`
/// when adding and `false` when removing.
///
/// # Examples
///
/// ```rust
/// use attrkit::{Modifier, ModifierGate};
///
/// let no_debuffs = |m: &Modifier, adding: bool| !adding || m.value() >= 0.0;
/// assert!(no_debuffs.can_change(&Modifier::add("Aura", 5.0), true));
/// assert!(!no_debuffs.can_change(&Modifier::add("Curse", -5.0), true));
/// ```
pub trait ModifierGate: Send + Sync {
    /// Return `false` to silently reject the change.
    fn can_change(&self, modifier: &Modifier, is_adding: bool) -> bool;
}

impl<F> ModifierGate for F
where
    F: Fn(&Modifier, bool) -> bool + Send + Sync,
{
    fn can_change(&self, modifier: &Modifier, is_adding: bool) -> bool {
        self(modifier, is_adding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_of() {
        let a = Modifier::add("A", 1.0);
        let b = Modifier::add("A", 1.0);
        let event = AttributeChanged {
            attribute: AttributeId::from_str("Speed"),
            old_value: 1.0,
            new_value: 0.0,
            changed_modifiers: vec![(a.clone(), ModifierChange::Removed)],
        };
        assert_eq!(event.change_of(&a), Some(ModifierChange::Removed));
        assert_eq!(event.change_of(&b), None);
        assert!(event.value_changed());
    }

    #[test]
    fn test_closure_gate() {
        let only_removals = |_: &Modifier, adding: bool| !adding;
        let m = Modifier::multiply("Aura", 2.0);
        assert!(!only_removals.can_change(&m, true));
        assert!(only_removals.can_change(&m, false));
    }
}
