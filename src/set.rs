//! Attribute collection module.
//!
//! Provides `AttributeSet`, the per-owner registry of attributes. The set is
//! the arena for clamp references: attributes name their bounds, and the set
//! resolves those names to cached final values whenever an attribute is
//! recalculated through it. Bounds are read as snapshots, never recomputed
//! on the fly, so a bound attribute must be recalculated by its own owner
//! before dependents see a new value.

use crate::attribute::Attribute;
use crate::attribute_id::AttributeId;
use crate::calculator::ClampRange;
use crate::error::AttributeError;
use crate::event::{AttributeChanged, ChangeListener, ModifierGate};
use crate::graph::ClampGraph;
use crate::modifier::{Modifier, ModifierKind};
use crate::numeric::AttributeValue;
use std::collections::BTreeMap;
use std::fmt;

/// All attributes of one owner, keyed by name.
///
/// # Examples
///
/// ```rust
/// use attrkit::{AttributeSet, Modifier};
///
/// let mut stats = AttributeSet::new("Player").unwrap();
/// stats.add_clamped_attribute("Health", 80.0, 0.0, 100.0).unwrap();
///
/// stats.add_modifier("Health", Modifier::add("Potion", 50.0)).unwrap();
/// assert_eq!(stats.final_value("Health"), 100.0);
///
/// // The ceiling is an attribute too.
/// stats.add_modifier("MaxHealth", Modifier::add("Blessing", 20.0)).unwrap();
/// stats.recalculate("Health").unwrap();
/// assert_eq!(stats.final_value("Health"), 120.0);
/// ```
pub struct AttributeSet {
    owner: String,
    attributes: BTreeMap<AttributeId, Attribute>,
    listeners: Vec<ChangeListener>,
}

impl AttributeSet {
    /// Create an empty set for `owner`.
    pub fn new(owner: impl Into<String>) -> Result<Self, AttributeError> {
        let owner = owner.into();
        if owner.is_empty() {
            log::error!("attribute set owner is empty");
            return Err(AttributeError::EmptyOwner);
        }
        Ok(Self {
            owner,
            attributes: BTreeMap::new(),
            listeners: Vec::new(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Attribute names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &AttributeId> {
        self.attributes.keys()
    }

    /// Attributes in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    /// Register a listener called after every change committed through the set.
    pub fn subscribe(&mut self, listener: impl Fn(&AttributeChanged) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Register an existing attribute.
    ///
    /// A duplicate name is reported and rejected; the existing entry is kept.
    pub fn insert(&mut self, attribute: Attribute) -> Result<(), AttributeError> {
        if self.attributes.contains_key(attribute.name()) {
            return Err(self.duplicate(attribute.name().clone()));
        }
        self.attributes.insert(attribute.name().clone(), attribute);
        Ok(())
    }

    /// Create and register an unclamped attribute.
    pub fn add_attribute(
        &mut self,
        name: impl Into<AttributeId>,
        base_value: AttributeValue,
    ) -> Result<(), AttributeError> {
        let name = name.into();
        if self.attributes.contains_key(&name) {
            return Err(self.duplicate(name));
        }
        let attribute = Attribute::new(name, self.owner.clone(), base_value)?;
        self.insert(attribute)
    }

    /// Create an attribute clamped by two synthesized bound attributes.
    ///
    /// Registers `name`, `"Min"+name` (base `min_value`) and `"Max"+name`
    /// (base `max_value`). If any of the three names is taken, nothing is
    /// registered.
    pub fn add_clamped_attribute(
        &mut self,
        name: impl Into<AttributeId>,
        base_value: AttributeValue,
        min_value: AttributeValue,
        max_value: AttributeValue,
    ) -> Result<(), AttributeError> {
        let name = name.into();
        let min_name = name.min_bound();
        let max_name = name.max_bound();
        for candidate in [&name, &min_name, &max_name] {
            if self.attributes.contains_key(candidate) {
                return Err(self.duplicate(candidate.clone()));
            }
        }

        let min = Attribute::new(min_name.clone(), self.owner.clone(), min_value)?;
        let max = Attribute::new(max_name.clone(), self.owner.clone(), max_value)?;
        let mut attribute = Attribute::new(name, self.owner.clone(), base_value)?;
        attribute.set_bounds(Some(min_name), Some(max_name));
        attribute.recalculate(ClampRange::new(
            Some(min.final_value()),
            Some(max.final_value()),
        ));

        self.insert(min)?;
        self.insert(max)?;
        self.insert(attribute)
    }

    /// Look up an attribute.
    ///
    /// A missing name is reported and returned as `NotFound`.
    pub fn get(&self, name: &str) -> Result<&Attribute, AttributeError> {
        self.attributes
            .get(name)
            .ok_or_else(|| not_found(&self.owner, name))
    }

    /// Look up an attribute for direct mutation.
    ///
    /// Changes made through the returned reference do not reach the set's
    /// listeners; use the set's own mutation methods for that.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut Attribute, AttributeError> {
        let owner = &self.owner;
        self.attributes
            .get_mut(name)
            .ok_or_else(|| not_found(owner, name))
    }

    /// Final value of `name`, or 0 if the attribute is missing.
    pub fn final_value(&self, name: &str) -> AttributeValue {
        self.get(name).map_or(0.0, Attribute::final_value)
    }

    /// Rounded final value of `name`, or 0 if the attribute is missing.
    pub fn rounded_final_value(&self, name: &str) -> i64 {
        self.get(name).map_or(0, Attribute::rounded_final_value)
    }

    /// Current bound snapshot for `name`.
    ///
    /// A reference to an attribute that is not in the set counts as no bound
    /// on that side.
    pub fn clamp_range(&self, name: &str) -> Result<ClampRange, AttributeError> {
        let attribute = self.get(name)?;
        Ok(ClampRange::new(
            self.bound_value(attribute, attribute.min_ref()),
            self.bound_value(attribute, attribute.max_ref()),
        ))
    }

    /// Append a modifier to `name`.
    ///
    /// `Ok(None)` means the attribute rejected it (locked or gated).
    pub fn add_modifier(
        &mut self,
        name: &str,
        modifier: Modifier,
    ) -> Result<Option<AttributeChanged>, AttributeError> {
        self.mutate(name, |attribute, range| attribute.add_modifier(modifier, range))
    }

    /// Build a modifier and append it to `name`.
    pub fn add_modifier_to(
        &mut self,
        name: &str,
        kind: ModifierKind,
        source: impl Into<String>,
        value: AttributeValue,
    ) -> Result<Option<AttributeChanged>, AttributeError> {
        self.add_modifier(name, Modifier::new(kind, source, value))
    }

    /// Remove one modifier instance from `name`.
    pub fn remove_modifier(
        &mut self,
        name: &str,
        modifier: &Modifier,
    ) -> Result<Option<AttributeChanged>, AttributeError> {
        self.mutate(name, |attribute, range| attribute.remove_modifier(modifier, range))
    }

    /// Remove every modifier from `source` on a single attribute.
    pub fn remove_modifiers_by_source_from(
        &mut self,
        name: &str,
        source: &str,
    ) -> Result<Option<AttributeChanged>, AttributeError> {
        self.mutate(name, |attribute, range| {
            attribute.remove_modifiers_by_source(source, range)
        })
    }

    /// Remove every modifier from `source` on every attribute.
    ///
    /// Each attribute's own lock applies independently. Returns the events
    /// of the attributes that actually changed, in name order.
    pub fn remove_modifiers_by_source(&mut self, source: &str) -> Vec<AttributeChanged> {
        let names: Vec<AttributeId> = self.attributes.keys().cloned().collect();
        let mut events = Vec::new();
        for name in names {
            if let Ok(Some(event)) = self.remove_modifiers_by_source_from(name.as_str(), source) {
                events.push(event);
            }
        }
        events
    }

    /// Install the modifier gate of `name`.
    pub fn set_gate(
        &mut self,
        name: &str,
        gate: impl ModifierGate + 'static,
    ) -> Result<(), AttributeError> {
        self.get_mut(name)?.set_gate(gate);
        Ok(())
    }

    /// Point `name`'s bounds at other attributes of this set and recalculate.
    ///
    /// Every referenced name must already be registered.
    pub fn set_bounds(
        &mut self,
        name: &str,
        min_ref: Option<AttributeId>,
        max_ref: Option<AttributeId>,
    ) -> Result<(), AttributeError> {
        self.link_bounds(name, min_ref, max_ref)?;
        self.recalculate(name)?;
        Ok(())
    }

    /// Point `name`'s bounds at registered attributes without recalculating.
    pub(crate) fn link_bounds(
        &mut self,
        name: &str,
        min_ref: Option<AttributeId>,
        max_ref: Option<AttributeId>,
    ) -> Result<(), AttributeError> {
        let attribute_id = self.get(name)?.name().clone();
        for reference in min_ref.iter().chain(max_ref.iter()) {
            if !self.attributes.contains_key(reference) {
                log::error!(
                    "{}: attribute {} references missing attribute {}",
                    self.owner,
                    attribute_id,
                    reference
                );
                return Err(AttributeError::UnresolvedReference {
                    attribute: attribute_id,
                    reference: reference.clone(),
                });
            }
        }
        self.get_mut(name)?.set_bounds(min_ref, max_ref);
        Ok(())
    }

    /// Recompute `name` against the current bound snapshots.
    ///
    /// No event is emitted.
    pub fn recalculate(&mut self, name: &str) -> Result<AttributeValue, AttributeError> {
        let range = self.clamp_range(name)?;
        Ok(self.get_mut(name)?.recalculate(range))
    }

    /// Recompute every attribute, bounds before the attributes they clamp.
    ///
    /// Fails with `Cycle` (and changes nothing) if the clamp references
    /// form a cycle.
    pub fn recalculate_all(&mut self) -> Result<(), AttributeError> {
        let order = self.clamp_graph().topological_sort()?;
        for name in order {
            self.recalculate(name.as_str())?;
        }
        Ok(())
    }

    /// Graph of every attribute and its clamp references.
    pub fn clamp_graph(&self) -> ClampGraph {
        let mut graph = ClampGraph::new();
        for attribute in self.attributes.values() {
            graph.add_node(attribute.name().clone());
            for bound in attribute.min_ref().into_iter().chain(attribute.max_ref()) {
                graph.add_edge(attribute.name().clone(), bound.clone());
            }
        }
        graph
    }

    /// Opt-in check that no attribute is, directly or transitively, its own bound.
    pub fn validate_clamp_graph(&self) -> Result<(), AttributeError> {
        self.clamp_graph().detect_cycles()
    }

    /// Remove `name` together with its `"Min"+name` and `"Max"+name` bounds.
    ///
    /// Returns whatever was removed; missing names are skipped. Attributes
    /// elsewhere that referenced the removed ones lose that bound.
    pub fn remove_attribute(&mut self, name: &str) -> Vec<Attribute> {
        let id = AttributeId::from_str(name);
        [id.clone(), id.min_bound(), id.max_bound()]
            .iter()
            .filter_map(|key| self.attributes.remove(key))
            .collect()
    }

    /// Take over `other`'s owner and attributes, keeping this set's listeners.
    pub(crate) fn replace_contents(&mut self, other: AttributeSet) {
        self.owner = other.owner;
        self.attributes = other.attributes;
    }

    fn mutate<F>(&mut self, name: &str, f: F) -> Result<Option<AttributeChanged>, AttributeError>
    where
        F: FnOnce(&mut Attribute, ClampRange) -> Option<AttributeChanged>,
    {
        let range = self.clamp_range(name)?;
        let event = f(self.get_mut(name)?, range);
        if let Some(event) = &event {
            for listener in &self.listeners {
                listener(event);
            }
        }
        Ok(event)
    }

    fn bound_value(
        &self,
        attribute: &Attribute,
        reference: Option<&AttributeId>,
    ) -> Option<AttributeValue> {
        let reference = reference?;
        match self.attributes.get(reference) {
            Some(bound) => Some(bound.final_value()),
            None => {
                log::warn!(
                    "{}: bound {} of {} is not registered, treating it as unlimited",
                    self.owner,
                    reference,
                    attribute.name()
                );
                None
            }
        }
    }

    fn duplicate(&self, name: AttributeId) -> AttributeError {
        log::error!("{}: duplicate attribute {}", self.owner, name);
        AttributeError::DuplicateAttribute(name)
    }
}

fn not_found(owner: &str, name: &str) -> AttributeError {
    log::error!("{} doesn't have attribute {}", owner, name);
    AttributeError::NotFound {
        owner: owner.to_string(),
        name: AttributeId::from_str(name),
    }
}

impl fmt::Debug for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeSet")
            .field("owner", &self.owner)
            .field("attributes", &self.attributes)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
