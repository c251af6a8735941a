//! Buff example: a character sheet with clamped health and timed buffs
//!
//! This example demonstrates:
//! - Building attributes from JSON configuration
//! - Applying and expiring buffs by source
//! - Raising a clamp bound and recalculating
//! - Saving and restoring the sheet
//!
//! Run with `RUST_LOG=debug cargo run --example buffs` to see the engine's log.

use attrkit::factory;
use attrkit::*;

const KNIGHT: &str = r#"{
    "owner": "Knight",
    "attributes": [
        { "name": "Health", "base_value": 120, "has_min_clamp": true, "min_value": 0,
          "has_max_clamp": true, "max_value": 150 },
        { "name": "Attack", "base_value": 18 },
        { "name": "Speed", "base_value": 4.5 }
    ]
}"#;

fn print_sheet(stats: &AttributeSet) {
    for attr in stats.iter() {
        println!(
            "  {:<10} base {:>7.2}  final {:>7.2}  ({} modifiers)",
            attr.name(),
            attr.base_value(),
            attr.final_value(),
            attr.modifiers().len()
        );
    }
}

fn main() -> Result<(), AttributeError> {
    env_logger::init();

    let config = config::from_json(KNIGHT)?;
    let mut stats = factory::build_from_config(&config)?;
    stats.subscribe(|event| {
        println!(
            "  ~ {} {:.2} -> {:.2}",
            event.attribute, event.old_value, event.new_value
        );
    });

    println!("=== Fresh sheet ===");
    print_sheet(&stats);

    println!("\n=== Battle cry (+50% attack, +1 speed) ===");
    stats.add_modifier_to("Attack", ModifierKind::Multiply, "BattleCry", 1.5)?;
    stats.add_modifier_to("Speed", ModifierKind::Add, "BattleCry", 1.0)?;

    println!("\n=== Healing potion (+100 health, clamped) ===");
    stats.add_modifier_to("Health", ModifierKind::Add, "Potion", 100.0)?;

    println!("\n=== Fortitude raises max health ===");
    stats.add_modifier_to("MaxHealth", ModifierKind::Add, "Fortitude", 50.0)?;
    stats.recalculate("Health")?;
    println!("  Health now {:.2}", stats.final_value("Health"));

    println!("\n=== Petrified (attack locked) ===");
    let lock = Modifier::locked("Petrify");
    stats.add_modifier("Attack", lock.clone())?;
    if stats
        .add_modifier_to("Attack", ModifierKind::Add, "Whetstone", 5.0)?
        .is_none()
    {
        println!("  Whetstone ignored: Attack is locked");
    }

    println!("\n=== Battle cry expires ===");
    let expired = stats.remove_modifiers_by_source("BattleCry");
    println!("  {} attribute(s) changed", expired.len());
    stats.remove_modifier("Attack", &lock)?;
    stats.remove_modifiers_by_source("BattleCry");

    println!("\n=== Final sheet ===");
    print_sheet(&stats);

    let json = factory::create_save_record(&stats).to_json()?;
    println!("\n=== Save record ===\n{}", json);

    let restored = factory::restore(&SaveRecord::from_json(&json)?)?;
    println!("\n=== Restored sheet ===");
    print_sheet(&restored);

    Ok(())
}
