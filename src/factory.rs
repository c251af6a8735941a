//! Attribute factory module.
//!
//! Converts between `AttributeSet` and its two external forms:
//!
//! - static configuration (`AttributeConfig`), expanded into primary
//!   attributes plus synthesized `"Min"+name` / `"Max"+name` bounds;
//! - flat save records (`SaveRecord`), restored in two phases because
//!   bounds are referenced by name and may point forward in the record list.

use crate::attribute::Attribute;
use crate::calculator::ClampRange;
use crate::config::{AttributeConfig, OwnerConfig};
use crate::error::AttributeError;
use crate::modifier::Modifier;
use crate::numeric::{format_value, parse_value};
use crate::save::{AttributeRecord, ModifierRecord, SaveRecord};
use crate::set::AttributeSet;

/// Build a fresh set for `owner` from static configuration.
///
/// # Examples
///
/// ```rust
/// use attrkit::{factory, AttributeConfig};
///
/// let configs = vec![
///     AttributeConfig::new("Foo", 50.0).with_min(10.0),
///     AttributeConfig::new("Bar", 3.0),
/// ];
/// let set = factory::build_from_prefab("Slime", &configs).unwrap();
///
/// assert_eq!(set.len(), 3);
/// assert_eq!(set.final_value("MinFoo"), 10.0);
/// assert_eq!(set.get("Foo").unwrap().min_ref().unwrap().as_str(), "MinFoo");
/// ```
pub fn build_from_prefab(
    owner: &str,
    configs: &[AttributeConfig],
) -> Result<AttributeSet, AttributeError> {
    let mut set = AttributeSet::new(owner)?;

    for config in configs {
        let mut attribute = Attribute::new(config.name.clone(), owner, config.base_value)?;
        let mut range = ClampRange::UNBOUNDED;
        let mut bounds = Vec::new();

        let min_ref = if config.has_min_clamp {
            let min = Attribute::new(config.name.min_bound(), owner, config.min_value)?;
            range.min = Some(min.final_value());
            let id = min.name().clone();
            bounds.push(min);
            Some(id)
        } else {
            None
        };
        let max_ref = if config.has_max_clamp {
            let max = Attribute::new(config.name.max_bound(), owner, config.max_value)?;
            range.max = Some(max.final_value());
            let id = max.name().clone();
            bounds.push(max);
            Some(id)
        } else {
            None
        };

        attribute.set_bounds(min_ref, max_ref);
        attribute.recalculate(range);
        set.insert(attribute)?;
        for bound in bounds {
            set.insert(bound)?;
        }
    }

    log::debug!("{}: built {} attributes from config", owner, set.len());
    Ok(set)
}

/// Build a fresh set from an owner configuration.
pub fn build_from_config(config: &OwnerConfig) -> Result<AttributeSet, AttributeError> {
    build_from_prefab(&config.owner, &config.attributes)
}

/// Flatten a set into a save record.
///
/// Attributes are written in name order; bounds are written by name.
pub fn create_save_record(set: &AttributeSet) -> SaveRecord {
    SaveRecord {
        owner: set.owner().to_string(),
        attributes: set.iter().map(attribute_record).collect(),
    }
}

fn attribute_record(attribute: &Attribute) -> AttributeRecord {
    AttributeRecord {
        owner: attribute.owner().to_string(),
        name: attribute.name().clone(),
        base_value: format_value(attribute.base_value()),
        modifiers: attribute.modifiers().iter().map(modifier_record).collect(),
        min_reference: attribute.min_ref().cloned(),
        max_reference: attribute.max_ref().cloned(),
    }
}

fn modifier_record(modifier: &Modifier) -> ModifierRecord {
    ModifierRecord {
        kind: modifier.kind(),
        source: modifier.source().to_string(),
        value: format_value(modifier.value()),
    }
}

/// Rebuild a set from a save record.
pub fn restore(record: &SaveRecord) -> Result<AttributeSet, AttributeError> {
    // Phase 1: construct every attribute with its modifiers, bounds unset.
    let mut staged = AttributeSet::new(record.owner.clone())?;
    for attribute_record in &record.attributes {
        staged.insert(construct(attribute_record)?)?;
    }

    // Phase 2: every name now resolves, so link all bounds first.
    let mut linked = Vec::new();
    for attribute_record in &record.attributes {
        if attribute_record.min_reference.is_none() && attribute_record.max_reference.is_none() {
            continue;
        }
        staged.link_bounds(
            attribute_record.name.as_str(),
            attribute_record.min_reference.clone(),
            attribute_record.max_reference.clone(),
        )?;
        linked.push(attribute_record.name.clone());
    }

    // Then recalculate each linked attribute once, bounds before dependents.
    // Cyclic references have no such order and fall back to record order.
    let order: Vec<_> = match staged.clamp_graph().topological_sort() {
        Ok(order) => order.into_iter().filter(|name| linked.contains(name)).collect(),
        Err(err) => {
            log::debug!("{}: {}, recalculating in record order", staged.owner(), err);
            linked
        }
    };
    for name in &order {
        staged.recalculate(name.as_str())?;
    }

    log::debug!("{}: restored {} attributes", staged.owner(), staged.len());
    Ok(staged)
}

/// Replace `set`'s owner and attributes with the contents of `record`.
///
/// Listeners registered on `set` are kept. On error `set` is left untouched;
/// malformed numbers fail the whole load.
pub fn load_save_record(
    set: &mut AttributeSet,
    record: &SaveRecord,
) -> Result<(), AttributeError> {
    let staged = restore(record)?;
    set.replace_contents(staged);
    Ok(())
}

fn construct(record: &AttributeRecord) -> Result<Attribute, AttributeError> {
    let base_value = parse_value(&record.base_value)?;
    let modifiers = record
        .modifiers
        .iter()
        .map(|m| -> Result<Modifier, AttributeError> {
            Ok(Modifier::new(m.kind, m.source.clone(), parse_value(&m.value)?))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut attribute = Attribute::new(record.name.clone(), record.owner.clone(), base_value)?;
    attribute.restore_modifiers(modifiers, ClampRange::UNBOUNDED);
    Ok(attribute)
}
