//! Attribute module.
//!
//! An `Attribute` owns a base value, an ordered modifier list, optional
//! min/max references to other attributes (by name), and the cached result
//! of the last calculation.
//!
//! Bounds are referenced by name and resolved by whoever owns the
//! attribute: mutation methods take the current `ClampRange` snapshot. In
//! practice that is `AttributeSet`, which looks the bound attributes up and
//! forwards their cached final values.

use crate::attribute_id::AttributeId;
use crate::calculator::{calculate, CalculateType, ClampRange};
use crate::error::AttributeError;
use crate::event::{AttributeChanged, ChangeListener, ModifierGate};
use crate::modifier::{Modifier, ModifierChange, ModifierKind};
use crate::numeric::{round_to_int, AttributeValue};
use std::fmt;

/// A named numeric stat driven by modifiers.
///
/// # Examples
///
/// ```rust
/// use attrkit::{Attribute, ClampRange, Modifier};
///
/// let mut attack = Attribute::new("Attack", "Player", 50.0).unwrap();
/// attack.add_modifier(Modifier::add("Sword", 10.0), ClampRange::UNBOUNDED);
/// attack.add_modifier(Modifier::multiply("Rage", 1.5), ClampRange::UNBOUNDED);
///
/// assert_eq!(attack.final_value(), 90.0);
/// assert_eq!(attack.rounded_final_value(), 90);
/// ```
pub struct Attribute {
    name: AttributeId,
    owner: String,
    base_value: AttributeValue,
    calculate_type: CalculateType,
    modifiers: Vec<Modifier>,
    min_ref: Option<AttributeId>,
    max_ref: Option<AttributeId>,
    final_value: AttributeValue,
    rounded_final_value: i64,
    gate: Option<Box<dyn ModifierGate>>,
    listeners: Vec<ChangeListener>,
}

impl Attribute {
    /// Create an attribute with no modifiers and no bounds.
    ///
    /// Fails with `EmptyName` or `EmptyOwner` (after logging) when either
    /// identifier is empty.
    pub fn new(
        name: impl Into<AttributeId>,
        owner: impl Into<String>,
        base_value: AttributeValue,
    ) -> Result<Self, AttributeError> {
        let name = name.into();
        let owner = owner.into();
        if name.is_empty() {
            log::error!("attribute of owner '{}' has an empty name", owner);
            return Err(AttributeError::EmptyName);
        }
        if owner.is_empty() {
            log::error!("attribute '{}' has an empty owner", name);
            return Err(AttributeError::EmptyOwner);
        }

        let mut attribute = Self {
            name,
            owner,
            base_value,
            calculate_type: CalculateType::default(),
            modifiers: Vec::new(),
            min_ref: None,
            max_ref: None,
            final_value: base_value,
            rounded_final_value: 0,
            gate: None,
            listeners: Vec::new(),
        };
        attribute.recalculate(ClampRange::UNBOUNDED);
        Ok(attribute)
    }

    /// Attribute name, unique within its set.
    pub fn name(&self) -> &AttributeId {
        &self.name
    }

    /// Owning entity label, used in log messages and save records.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The unmodified value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use attrkit::{Attribute, ClampRange, Modifier};
    ///
    /// let mut armor = Attribute::new("Armor", "Guard", 12.0).unwrap();
    /// armor.add_modifier(Modifier::fixed("Shatter", 0.0), ClampRange::UNBOUNDED);
    ///
    /// assert_eq!(armor.base_value(), 12.0);
    /// assert_eq!(armor.final_value(), 0.0);
    /// ```
    pub fn base_value(&self) -> AttributeValue {
        self.base_value
    }

    /// Value as of the last calculation.
    pub fn final_value(&self) -> AttributeValue {
        self.final_value
    }

    /// `final_value` rounded to the nearest integer (ties to even).
    pub fn rounded_final_value(&self) -> i64 {
        self.rounded_final_value
    }

    /// Combination rule for Add and Multiply modifiers.
    pub fn calculate_type(&self) -> CalculateType {
        self.calculate_type
    }

    /// Modifiers in insertion order.
    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    /// Name of the attribute providing the lower bound.
    pub fn min_ref(&self) -> Option<&AttributeId> {
        self.min_ref.as_ref()
    }

    /// Name of the attribute providing the upper bound.
    pub fn max_ref(&self) -> Option<&AttributeId> {
        self.max_ref.as_ref()
    }

    /// Whether a min or max reference is set.
    pub fn has_clamp(&self) -> bool {
        self.min_ref.is_some() || self.max_ref.is_some()
    }

    /// Whether any Locked modifier is present.
    pub fn is_locked(&self) -> bool {
        self.modifiers
            .iter()
            .any(|m| m.kind() == ModifierKind::Locked)
    }

    /// Point the bounds at other attributes.
    ///
    /// Does not recalculate; the owner must call `recalculate` with the new
    /// range for the clamp to take effect.
    pub fn set_bounds(&mut self, min_ref: Option<AttributeId>, max_ref: Option<AttributeId>) {
        self.min_ref = min_ref;
        self.max_ref = max_ref;
    }

    /// Install the policy consulted before single additions and removals.
    pub fn set_gate(&mut self, gate: impl ModifierGate + 'static) {
        self.gate = Some(Box::new(gate));
    }

    /// Remove the gate; all changes allowed by the lock rules go through.
    pub fn clear_gate(&mut self) {
        self.gate = None;
    }

    /// Register a listener called after every committed change.
    pub fn subscribe(&mut self, listener: impl Fn(&AttributeChanged) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Recompute the cached values against `range` and return the final value.
    ///
    /// A Reset modifier clears the modifier list here. Bounds in `range` are
    /// only honored on the sides this attribute actually references.
    pub fn recalculate(&mut self, range: ClampRange) -> AttributeValue {
        let range = self.effective_range(range);
        let result = calculate(self.calculate_type, self.base_value, &self.modifiers, range);
        if result.clears_modifiers() {
            log::debug!(
                "{}.{}: reset modifier cleared {} modifiers",
                self.owner,
                self.name,
                self.modifiers.len()
            );
            self.modifiers.clear();
        }
        self.final_value = result.value();
        self.rounded_final_value = round_to_int(self.final_value);
        self.final_value
    }

    /// Append a modifier.
    ///
    /// Returns `None` without touching anything when the attribute is
    /// locked or the gate refuses the addition.
    pub fn add_modifier(
        &mut self,
        modifier: Modifier,
        range: ClampRange,
    ) -> Option<AttributeChanged> {
        if self.is_locked() {
            log::debug!("{}.{}: locked, ignoring {}", self.owner, self.name, modifier);
            return None;
        }
        if !self.gate_allows(&modifier, true) {
            log::debug!("{}.{}: gate rejected {}", self.owner, self.name, modifier);
            return None;
        }

        self.modifiers.push(modifier.clone());
        Some(self.commit(range, vec![(modifier, ModifierChange::Added)]))
    }

    /// Remove a modifier by identity.
    ///
    /// Returns `None` when another Locked modifier is present, when the gate
    /// refuses, or when `modifier` is not attached. Removing the only Locked
    /// modifier unlocks the attribute.
    pub fn remove_modifier(
        &mut self,
        modifier: &Modifier,
        range: ClampRange,
    ) -> Option<AttributeChanged> {
        let locked_by_other = self
            .modifiers
            .iter()
            .any(|m| m.kind() == ModifierKind::Locked && m != modifier);
        if locked_by_other {
            log::debug!("{}.{}: locked, keeping {}", self.owner, self.name, modifier);
            return None;
        }
        let index = self.modifiers.iter().position(|m| m == modifier)?;
        if !self.gate_allows(modifier, false) {
            log::debug!("{}.{}: gate kept {}", self.owner, self.name, modifier);
            return None;
        }

        let removed = self.modifiers.remove(index);
        Some(self.commit(range, vec![(removed, ModifierChange::Removed)]))
    }

    /// Remove every modifier whose source equals `source`.
    ///
    /// A no-op when any Locked modifier is present, whatever its source, or
    /// when nothing matches. Otherwise recalculates once and emits a single
    /// event listing every removed modifier.
    pub fn remove_modifiers_by_source(
        &mut self,
        source: &str,
        range: ClampRange,
    ) -> Option<AttributeChanged> {
        if self.is_locked() {
            return None;
        }
        if !self.modifiers.iter().any(|m| m.source() == source) {
            return None;
        }

        let (removed, kept): (Vec<Modifier>, Vec<Modifier>) = std::mem::take(&mut self.modifiers)
            .into_iter()
            .partition(|m| m.source() == source);
        self.modifiers = kept;

        let changes = removed
            .into_iter()
            .map(|m| (m, ModifierChange::Removed))
            .collect();
        Some(self.commit(range, changes))
    }

    /// Attach restored modifiers without gating or events, then recalculate once.
    pub(crate) fn restore_modifiers(&mut self, modifiers: Vec<Modifier>, range: ClampRange) {
        self.modifiers.extend(modifiers);
        self.recalculate(range);
    }

    fn effective_range(&self, range: ClampRange) -> ClampRange {
        ClampRange {
            min: self.min_ref.as_ref().and(range.min),
            max: self.max_ref.as_ref().and(range.max),
        }
    }

    fn gate_allows(&self, modifier: &Modifier, is_adding: bool) -> bool {
        self.gate
            .as_ref()
            .map_or(true, |gate| gate.can_change(modifier, is_adding))
    }

    fn commit(
        &mut self,
        range: ClampRange,
        changed_modifiers: Vec<(Modifier, ModifierChange)>,
    ) -> AttributeChanged {
        let old_value = self.final_value;
        let new_value = self.recalculate(range);
        let event = AttributeChanged {
            attribute: self.name.clone(),
            old_value,
            new_value,
            changed_modifiers,
        };
        for listener in &self.listeners {
            listener(&event);
        }
        event
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("base_value", &self.base_value)
            .field("final_value", &self.final_value)
            .field("rounded_final_value", &self.rounded_final_value)
            .field("modifiers", &self.modifiers)
            .field("min_ref", &self.min_ref)
            .field("max_ref", &self.max_ref)
            .field("gate", &self.gate.is_some())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Attribute> Owner:{} Name:{} BaseValue:{} FinalValue:{}",
            self.owner, self.name, self.base_value, self.final_value
        )?;
        for modifier in &self.modifiers {
            writeln!(f, "{}", modifier)?;
        }
        Ok(())
    }
}
