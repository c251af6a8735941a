use attrkit::*;
use std::sync::{Arc, Mutex};

fn clamped_player() -> AttributeSet {
    let mut stats = AttributeSet::new("Player").unwrap();
    stats
        .add_clamped_attribute("Health", 50.0, 0.0, 100.0)
        .unwrap();
    stats
}

/// Attributes without modifiers report their base value.
#[test]
fn test_no_modifiers_means_base_value() {
    let mut stats = AttributeSet::new("Player").unwrap();
    for (name, base) in [("A", 0.0), ("B", 12.5), ("C", -3.7), ("D", 1e6)] {
        stats.add_attribute(name, base).unwrap();
        let attr = stats.get(name).unwrap();
        assert_eq!(attr.final_value(), base);
        assert_eq!(attr.rounded_final_value(), base.round_ties_even() as i64);
    }
}

/// Clamp bounds come from the Min/Max attributes.
#[test]
fn test_clamp_from_bound_attributes() {
    let mut stats = clamped_player();

    let heal = Modifier::add("Heal", 1000.0);
    stats.add_modifier("Health", heal.clone()).unwrap();
    assert_eq!(stats.final_value("Health"), 100.0);
    stats.remove_modifier("Health", &heal).unwrap();
    assert_eq!(stats.final_value("Health"), 50.0);

    stats
        .add_modifier("Health", Modifier::multiply("Doom", 0.0))
        .unwrap();
    assert_eq!(stats.final_value("Health"), 0.0);
}

/// A buff on the ceiling raises the clamp once the attribute is recalculated.
#[test]
fn test_buffing_a_bound() {
    let mut stats = clamped_player();
    stats
        .add_modifier_to("Health", ModifierKind::Add, "Heal", 80.0)
        .unwrap();
    assert_eq!(stats.final_value("Health"), 100.0);

    stats
        .add_modifier_to("MaxHealth", ModifierKind::Multiply, "Fortitude", 1.2)
        .unwrap();
    assert_eq!(stats.final_value("MaxHealth"), 120.0);
    assert_eq!(stats.final_value("Health"), 100.0);

    stats.recalculate("Health").unwrap();
    assert_eq!(stats.final_value("Health"), 120.0);

    stats.remove_modifiers_by_source_from("MaxHealth", "Fortitude").unwrap();
    stats.recalculate("Health").unwrap();
    assert_eq!(stats.final_value("Health"), 100.0);
}

/// Reset forces the base value and empties the list; a second calculation agrees.
#[test]
fn test_reset_modifier() {
    let mut stats = clamped_player();
    stats
        .add_modifier_to("Health", ModifierKind::Add, "Heal", 20.0)
        .unwrap();
    stats
        .add_modifier_to("Health", ModifierKind::Fixed, "Freeze", 1.0)
        .unwrap();

    let event = stats
        .add_modifier_to("Health", ModifierKind::Reset, "Cleanse", 0.0)
        .unwrap()
        .unwrap();
    assert_eq!(event.old_value, 1.0);
    assert_eq!(event.new_value, 50.0);

    let health = stats.get("Health").unwrap();
    assert!(health.modifiers().is_empty());
    assert_eq!(health.final_value(), 50.0);

    assert_eq!(stats.recalculate("Health").unwrap(), 50.0);
    assert!(stats.get("Health").unwrap().modifiers().is_empty());
}

/// The most recently added Fixed modifier wins regardless of other modifiers.
#[test]
fn test_last_fixed_wins() {
    let mut stats = clamped_player();
    stats
        .add_modifier_to("Health", ModifierKind::Fixed, "First", 10.0)
        .unwrap();
    stats
        .add_modifier_to("Health", ModifierKind::Add, "Heal", 30.0)
        .unwrap();
    let last = Modifier::fixed("Second", 250.0);
    stats.add_modifier("Health", last.clone()).unwrap();
    stats
        .add_modifier_to("Health", ModifierKind::Multiply, "Aura", 3.0)
        .unwrap();

    // Fixed skips clamping, so 250 survives MaxHealth = 100.
    assert_eq!(stats.final_value("Health"), 250.0);
    assert_eq!(stats.rounded_final_value("Health"), 250);

    stats.remove_modifier("Health", &last).unwrap();
    assert_eq!(stats.final_value("Health"), 10.0);
}

/// Locking: additions and foreign removals are ignored; the lock itself can go.
#[test]
fn test_locking_protocol() {
    let mut stats = clamped_player();
    let buff = Modifier::add("Buff", 10.0);
    let lock = Modifier::locked("Petrify");
    stats.add_modifier("Health", buff.clone()).unwrap();
    stats.add_modifier("Health", lock.clone()).unwrap();

    let ignored = stats
        .add_modifier("Health", Modifier::add("Heal", 5.0))
        .unwrap();
    assert!(ignored.is_none());
    assert!(stats.remove_modifier("Health", &buff).unwrap().is_none());
    assert!(stats.remove_modifiers_by_source("Buff").is_empty());
    assert_eq!(stats.get("Health").unwrap().modifiers().len(), 2);

    let unlock = stats.remove_modifier("Health", &lock).unwrap().unwrap();
    assert_eq!(unlock.change_of(&lock), Some(ModifierChange::Removed));
    assert!(!stats.get("Health").unwrap().is_locked());
    assert!(stats.remove_modifier("Health", &buff).unwrap().is_some());
}

/// Bulk removal touches exactly the modifiers of the given source in one event.
#[test]
fn test_remove_by_source_single_event() {
    let mut stats = clamped_player();
    let a = Modifier::add("Banner", 5.0);
    let b = Modifier::multiply("Banner", 1.1);
    let c = Modifier::add("Ring", 3.0);
    for m in [&a, &b, &c] {
        stats.add_modifier("Health", m.clone()).unwrap();
    }

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    stats.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

    stats.remove_modifiers_by_source("Banner");
    stats.remove_modifiers_by_source("Nobody");

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    let removed: Vec<&Modifier> = events[0].changed_modifiers.iter().map(|(m, _)| m).collect();
    assert_eq!(removed, vec![&a, &b]);
    assert!(events[0]
        .changed_modifiers
        .iter()
        .all(|(_, change)| *change == ModifierChange::Removed));
    assert_eq!(stats.get("Health").unwrap().modifiers(), &[c]);
}

/// Identity-based removal: an identical-looking modifier is a different one.
#[test]
fn test_identity_removal() {
    let mut stats = clamped_player();
    let first = Modifier::add("Potion", 10.0);
    let second = Modifier::add("Potion", 10.0);
    stats.add_modifier("Health", first.clone()).unwrap();
    stats.add_modifier("Health", second.clone()).unwrap();
    assert_eq!(stats.final_value("Health"), 70.0);

    stats.remove_modifier("Health", &second).unwrap();
    let health = stats.get("Health").unwrap();
    assert_eq!(health.modifiers(), &[first]);
    assert_eq!(health.final_value(), 60.0);
}

/// Both per-attribute and collection listeners see the committed value.
#[test]
fn test_listeners_observe_settled_state() {
    let mut stats = clamped_player();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    stats
        .get_mut("Health")
        .unwrap()
        .subscribe(move |event| sink.lock().unwrap().push(("attribute", event.new_value)));
    let sink = Arc::clone(&seen);
    stats.subscribe(move |event| sink.lock().unwrap().push(("set", event.new_value)));

    stats
        .add_modifier_to("Health", ModifierKind::Add, "Heal", 25.0)
        .unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![("attribute", 75.0), ("set", 75.0)]
    );
}

/// Missing attributes are recoverable errors with zero defaults for reads.
#[test]
fn test_missing_attribute() {
    let mut stats = clamped_player();
    assert_eq!(stats.final_value("Mana"), 0.0);
    assert_eq!(stats.rounded_final_value("Mana"), 0);
    let err = stats
        .add_modifier_to("Mana", ModifierKind::Add, "Potion", 5.0)
        .unwrap_err();
    assert_eq!(
        err,
        AttributeError::NotFound {
            owner: "Player".to_string(),
            name: "Mana".into(),
        }
    );
}

/// Duplicate registration is an error and keeps the original.
#[test]
fn test_duplicate_registration() {
    let mut stats = clamped_player();
    assert!(matches!(
        stats.add_attribute("MinHealth", 5.0),
        Err(AttributeError::DuplicateAttribute(_))
    ));
    assert!(stats
        .add_clamped_attribute("Health", 1.0, 0.0, 2.0)
        .is_err());
    assert_eq!(stats.final_value("MinHealth"), 0.0);
    assert_eq!(stats.final_value("Health"), 50.0);
    assert_eq!(stats.len(), 3);
}

/// Rounded values follow every calculation branch.
#[test]
fn test_rounded_value_tracks_all_branches() {
    let mut stats = AttributeSet::new("Player").unwrap();
    stats.add_attribute("Crit", 0.4).unwrap();
    assert_eq!(stats.rounded_final_value("Crit"), 0);

    stats
        .add_modifier_to("Crit", ModifierKind::Add, "Gloves", 1.3)
        .unwrap();
    assert_eq!(stats.rounded_final_value("Crit"), 2);

    stats
        .add_modifier_to("Crit", ModifierKind::Fixed, "Curse", 7.6)
        .unwrap();
    assert_eq!(stats.rounded_final_value("Crit"), 8);

    stats
        .add_modifier_to("Crit", ModifierKind::Reset, "Cleanse", 0.0)
        .unwrap();
    assert_eq!(stats.rounded_final_value("Crit"), 0);
}

/// Mutual clamping never recurses; the opt-in validation reports it.
#[test]
fn test_mutual_clamp_cycle() {
    let mut stats = AttributeSet::new("Golem").unwrap();
    stats.add_attribute("Armor", 40.0).unwrap();
    stats.add_attribute("Shield", 30.0).unwrap();
    stats
        .set_bounds("Armor", None, Some("Shield".into()))
        .unwrap();
    stats
        .set_bounds("Shield", None, Some("Armor".into()))
        .unwrap();
    assert_eq!(stats.final_value("Armor"), 30.0);
    assert_eq!(stats.final_value("Shield"), 30.0);

    for _ in 0..10 {
        stats
            .add_modifier_to("Armor", ModifierKind::Add, "Plate", 10.0)
            .unwrap();
        stats
            .add_modifier_to("Shield", ModifierKind::Add, "Rune", 10.0)
            .unwrap();
    }
    assert_eq!(stats.final_value("Armor"), 30.0);

    match stats.validate_clamp_graph() {
        Err(AttributeError::Cycle { path }) => {
            assert!(path.contains(&"Armor".into()));
            assert!(path.contains(&"Shield".into()));
        }
        other => panic!("expected a cycle, got {:?}", other),
    }
}

/// Removing an attribute also removes its synthesized bounds.
#[test]
fn test_remove_attribute() {
    let mut stats = clamped_player();
    stats.add_attribute("Mana", 20.0).unwrap();
    let removed: Vec<String> = stats
        .remove_attribute("Health")
        .iter()
        .map(|a| a.name().to_string())
        .collect();
    assert_eq!(removed, vec!["Health", "MinHealth", "MaxHealth"]);
    assert_eq!(stats.names().collect::<Vec<_>>(), vec![&AttributeId::from("Mana")]);
}
