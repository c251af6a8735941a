//! Value calculation module.
//!
//! Maps a base value, a modifier list, and a clamp range to a final value.
//! The calculator holds no state; `Attribute` applies the outcome (including
//! clearing its modifiers when a Reset modifier is present).
//!
//! Branch priority:
//!
//! ```text
//! Reset present  → base value, modifiers cleared
//! Fixed present  → value of the last Fixed modifier (no clamping)
//! otherwise      → clamp((base + Σ add) × Π multiply, min, max)
//! ```

use crate::modifier::{Modifier, ModifierKind};
use crate::numeric::{round_to_int, AttributeValue, NO_MAX, NO_MIN};
use serde::{Deserialize, Serialize};

/// Strategy used to compose Add and Multiply modifiers.
///
/// Fixed per attribute at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CalculateType {
    /// `(base + Σ add) × Π multiply`.
    #[default]
    AddThenMultiply,
}

/// Snapshot of an attribute's bound values at calculation time.
///
/// `None` on a side means no limit on that side.
///
/// # Examples
///
/// ```rust
/// use attrkit::ClampRange;
///
/// let range = ClampRange::new(Some(0.0), None);
/// assert!(range.is_clamped());
/// assert_eq!(range.apply(-5.0), 0.0);
/// assert_eq!(range.apply(1e9), 1e9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClampRange {
    pub min: Option<AttributeValue>,
    pub max: Option<AttributeValue>,
}

impl ClampRange {
    /// A range with no bounds.
    pub const UNBOUNDED: ClampRange = ClampRange {
        min: None,
        max: None,
    };

    pub fn new(min: Option<AttributeValue>, max: Option<AttributeValue>) -> Self {
        Self { min, max }
    }

    /// Whether at least one side is bounded.
    pub fn is_clamped(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    pub fn low(&self) -> AttributeValue {
        self.min.unwrap_or(NO_MIN)
    }

    pub fn high(&self) -> AttributeValue {
        self.max.unwrap_or(NO_MAX)
    }

    /// Clamp `value` into `[low, high]`.
    ///
    /// The lower bound is checked first, so an inverted range
    /// (`low > high`) never panics.
    pub fn apply(&self, value: AttributeValue) -> AttributeValue {
        if !self.is_clamped() {
            return value;
        }
        if value < self.low() {
            self.low()
        } else if value > self.high() {
            self.high()
        } else {
            value
        }
    }
}

/// Result of a single calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Calculation {
    /// A Reset modifier was present. The caller must clear its modifiers.
    Reset { value: AttributeValue },
    /// The last Fixed modifier overrode the value.
    Fixed { value: AttributeValue },
    /// The general add-then-multiply path, clamped if bounds were given.
    Composed { value: AttributeValue },
}

impl Calculation {
    /// The final value.
    pub fn value(&self) -> AttributeValue {
        match *self {
            Calculation::Reset { value }
            | Calculation::Fixed { value }
            | Calculation::Composed { value } => value,
        }
    }

    /// The final value rounded to the nearest integer.
    pub fn rounded(&self) -> i64 {
        round_to_int(self.value())
    }

    /// Whether the owning attribute must drop all its modifiers.
    pub fn clears_modifiers(&self) -> bool {
        matches!(self, Calculation::Reset { .. })
    }
}

/// Calculate the final value of an attribute.
///
/// # Examples
///
/// ```rust
/// use attrkit::{calculate, CalculateType, ClampRange, Modifier};
///
/// let mods = vec![Modifier::add("Sword", 10.0), Modifier::multiply("Rage", 2.0)];
/// let result = calculate(CalculateType::AddThenMultiply, 50.0, &mods, ClampRange::UNBOUNDED);
/// assert_eq!(result.value(), 120.0); // (50 + 10) * 2
/// ```
pub fn calculate(
    calculate_type: CalculateType,
    base_value: AttributeValue,
    modifiers: &[Modifier],
    range: ClampRange,
) -> Calculation {
    if modifiers.iter().any(|m| m.kind() == ModifierKind::Reset) {
        return Calculation::Reset { value: base_value };
    }

    if let Some(fixed) = modifiers
        .iter()
        .rev()
        .find(|m| m.kind() == ModifierKind::Fixed)
    {
        return Calculation::Fixed {
            value: fixed.value(),
        };
    }

    let raw = match calculate_type {
        CalculateType::AddThenMultiply => add_then_multiply(base_value, modifiers),
    };
    Calculation::Composed {
        value: range.apply(raw),
    }
}

fn add_then_multiply(base_value: AttributeValue, modifiers: &[Modifier]) -> AttributeValue {
    let mut sum_add = 0.0;
    let mut product_mul = 1.0;
    for modifier in modifiers {
        match modifier.kind() {
            ModifierKind::Add => sum_add += modifier.value(),
            ModifierKind::Multiply => product_mul *= modifier.value(),
            _ => {}
        }
    }
    (base_value + sum_add) * product_mul
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calc(base: f64, mods: &[Modifier], range: ClampRange) -> Calculation {
        calculate(CalculateType::AddThenMultiply, base, mods, range)
    }

    #[test]
    fn test_no_modifiers() {
        let result = calc(42.4, &[], ClampRange::UNBOUNDED);
        assert_eq!(result, Calculation::Composed { value: 42.4 });
        assert_eq!(result.rounded(), 42);
    }

    #[test]
    fn test_add_then_multiply() {
        let mods = vec![
            Modifier::add("A", 10.0),
            Modifier::multiply("B", 1.5),
            Modifier::add("C", 20.0),
            Modifier::multiply("D", 2.0),
        ];
        // (100 + 30) * 3
        assert_eq!(calc(100.0, &mods, ClampRange::UNBOUNDED).value(), 390.0);
    }

    #[test]
    fn test_locked_is_not_arithmetic() {
        let mods = vec![Modifier::locked("Stun"), Modifier::add("A", 5.0)];
        assert_eq!(calc(10.0, &mods, ClampRange::UNBOUNDED).value(), 15.0);
    }

    #[test]
    fn test_reset_wins_over_everything() {
        let mods = vec![
            Modifier::fixed("F", 999.0),
            Modifier::add("A", 5.0),
            Modifier::reset("R"),
        ];
        let result = calc(10.0, &mods, ClampRange::new(Some(50.0), None));
        assert_eq!(result, Calculation::Reset { value: 10.0 });
        assert!(result.clears_modifiers());
    }

    #[test]
    fn test_last_fixed_wins_and_skips_clamp() {
        let mods = vec![
            Modifier::fixed("F1", 1.0),
            Modifier::add("A", 5.0),
            Modifier::fixed("F2", 500.0),
            Modifier::multiply("M", 3.0),
        ];
        let result = calc(10.0, &mods, ClampRange::new(Some(0.0), Some(100.0)));
        assert_eq!(result, Calculation::Fixed { value: 500.0 });
        assert!(!result.clears_modifiers());
    }

    #[test]
    fn test_clamp_both_sides() {
        let range = ClampRange::new(Some(0.0), Some(100.0));
        assert_eq!(calc(50.0, &[Modifier::add("A", 1000.0)], range).value(), 100.0);
        assert_eq!(calc(50.0, &[Modifier::multiply("M", 0.0)], range).value(), 0.0);
        assert_eq!(calc(50.0, &[Modifier::add("A", -500.0)], range).value(), 0.0);
    }

    #[test]
    fn test_absent_bound_is_unlimited() {
        let only_max = ClampRange::new(None, Some(10.0));
        assert_eq!(calc(-1000.0, &[], only_max).value(), -1000.0);
        let only_min = ClampRange::new(Some(-10.0), None);
        assert_eq!(calc(1e12, &[], only_min).value(), 1e12);
    }

    #[test]
    fn test_inverted_range_checks_low_first() {
        let range = ClampRange::new(Some(10.0), Some(5.0));
        assert_eq!(range.apply(7.0), 10.0);
        assert_eq!(range.apply(20.0), 5.0);
    }
}
