//! Field constraints
//!
//! A [`Constraint`] is a pure predicate over one field value. It knows nothing
//! about the composite that owns the field, so it can be evaluated on its own:
//!
//! | Kind          | Applies to               | Rule                                   |
//! |---------------|--------------------------|----------------------------------------|
//! | `Length`      | strings                  | `min <= utf16_len <= max`              |
//! | `Range`       | integers, reals          | `min <= v <= max` (both inclusive)     |
//! | `OneOf`       | strings                  | value is one of the declared symbols   |
//! | `Items`       | sequences                | `min <= len <= max`, element rule each |
//! | `Unconstrained` | anything               | always holds                           |
//!
//! Absence is decided by [`Optionality`] before any bound is looked at.

use crate::value::FieldValue;

/// Declared rule for a single field value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    Unconstrained,
    /// String length in UTF-16 code units, inclusive
    Length { min: usize, max: usize },
    /// Numeric bounds, inclusive; `None` leaves that side open
    Range { min: Option<f64>, max: Option<f64> },
    /// Closed symbol set for string-typed enumerations
    OneOf(&'static [&'static str]),
    /// Sequence cardinality plus a rule applied to every element
    Items {
        min: usize,
        max: Option<usize>,
        element: &'static Constraint,
    },
}

impl Constraint {
    pub const fn max_length(max: usize) -> Self {
        Constraint::Length { min: 0, max }
    }

    pub const fn length(min: usize, max: usize) -> Self {
        Constraint::Length { min, max }
    }

    pub const fn at_least(min: f64) -> Self {
        Constraint::Range {
            min: Some(min),
            max: None,
        }
    }

    pub const fn at_most(max: f64) -> Self {
        Constraint::Range {
            min: None,
            max: Some(max),
        }
    }

    pub const fn between(min: f64, max: f64) -> Self {
        Constraint::Range {
            min: Some(min),
            max: Some(max),
        }
    }

    pub const fn one_of(symbols: &'static [&'static str]) -> Self {
        Constraint::OneOf(symbols)
    }

    /// Sequence of `min..=max` elements with unconstrained elements
    pub const fn items(min: usize, max: Option<usize>) -> Self {
        Constraint::Items {
            min,
            max,
            element: &Constraint::Unconstrained,
        }
    }

    /// Sequence of `min..=max` elements, each satisfying `element`
    pub const fn items_of(min: usize, max: Option<usize>, element: &'static Constraint) -> Self {
        Constraint::Items { min, max, element }
    }

    /// Check a string against this constraint
    pub fn check_str(&self, value: &str) -> bool {
        match *self {
            Constraint::Unconstrained => true,
            Constraint::Length { min, max } => {
                let len = utf16_len(value);
                min <= len && len <= max
            }
            Constraint::OneOf(symbols) => symbols.contains(&value),
            _ => false,
        }
    }

    /// Check a number against this constraint. NaN never passes.
    pub fn check_number(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        match *self {
            Constraint::Unconstrained => true,
            Constraint::Range { min, max } => {
                min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
            }
            _ => false,
        }
    }

    /// Check an integer exactly, without rounding it through `f64`
    pub fn check_integer(&self, value: i128) -> bool {
        match *self {
            Constraint::Unconstrained => true,
            Constraint::Range { min, max } => {
                min.map_or(true, |min| int_at_least(value, min))
                    && max.map_or(true, |max| int_at_most(value, max))
            }
            _ => false,
        }
    }

    /// Check a sequence: cardinality first, then every element
    pub fn check_items<T: FieldValue>(&self, items: &[T]) -> bool {
        match *self {
            Constraint::Unconstrained => true,
            Constraint::Items { min, max, element } => {
                let len = items.len();
                len >= min
                    && max.map_or(true, |max| len <= max)
                    && items.iter().all(|item| item.satisfies(element))
            }
            _ => false,
        }
    }

    /// Only `Unconstrained` applies to values without a bound of their own
    /// (booleans, timestamps, enums, nested composites).
    pub fn check_unbounded(&self) -> bool {
        matches!(self, Constraint::Unconstrained)
    }
}

// Bounds beyond the i128 range saturate; NaN bounds admit nothing.
fn int_at_least(value: i128, min: f64) -> bool {
    let min = min.ceil();
    if min.is_nan() || min >= i128::MAX as f64 {
        return false;
    }
    min <= i128::MIN as f64 || value >= min as i128
}

fn int_at_most(value: i128, max: f64) -> bool {
    let max = max.floor();
    if max.is_nan() || max < i128::MIN as f64 {
        return false;
    }
    max >= i128::MAX as f64 || value <= max as i128
}

/// Length of a string in UTF-16 code units
pub fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

/// Whether a field may be absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Optionality {
    Required,
    Optional,
}

/// Declaration of one field of a composite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Wire name, as it appears in OCPP JSON
    pub name: &'static str,
    pub constraint: Constraint,
    pub optionality: Optionality,
}

impl FieldSpec {
    pub const fn required(name: &'static str, constraint: Constraint) -> Self {
        Self {
            name,
            constraint,
            optionality: Optionality::Required,
        }
    }

    pub const fn optional(name: &'static str, constraint: Constraint) -> Self {
        Self {
            name,
            constraint,
            optionality: Optionality::Optional,
        }
    }

    pub fn is_optional(&self) -> bool {
        self.optionality == Optionality::Optional
    }

    pub fn accepts(&self, value: &dyn FieldValue) -> bool {
        evaluate(self, value)
    }
}

/// Evaluate a field declaration against a candidate value.
///
/// Absent values pass iff the field is optional; bounds are only consulted
/// when a value is present. Never panics.
pub fn evaluate(spec: &FieldSpec, value: &dyn FieldValue) -> bool {
    if value.is_absent() {
        return spec.is_optional();
    }
    value.satisfies(&spec.constraint)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERCENTAGE: Constraint = Constraint::between(0.0, 100.0);
    const ID_36: Constraint = Constraint::max_length(36);

    #[test]
    fn test_length_boundary() {
        let c = Constraint::max_length(20);
        assert!(c.check_str(&"a".repeat(20)));
        assert!(!c.check_str(&"a".repeat(21)));
        assert!(c.check_str(""));

        let c = Constraint::length(2, 4);
        assert!(!c.check_str("a"));
        assert!(c.check_str("ab"));
        assert!(c.check_str("abcd"));
        assert!(!c.check_str("abcde"));
    }

    #[test]
    fn test_length_counts_utf16_units() {
        // U+1F50C is a surrogate pair in UTF-16
        let plug = "\u{1F50C}";
        assert_eq!(utf16_len(plug), 2);
        assert!(!Constraint::max_length(1).check_str(plug));
        assert!(Constraint::max_length(2).check_str(plug));
        // 'é' is one code unit but two UTF-8 bytes
        assert!(Constraint::max_length(1).check_str("é"));
    }

    #[test]
    fn test_non_negative() {
        let c = Constraint::at_least(0.0);
        assert!(c.check_number(0.0));
        assert!(!c.check_number(-1.0));
        assert!(c.check_number(f64::MAX));
    }

    #[test]
    fn test_percentage_bounds() {
        assert!(PERCENTAGE.check_number(0.0));
        assert!(PERCENTAGE.check_number(100.0));
        assert!(!PERCENTAGE.check_number(100.1));
        assert!(!PERCENTAGE.check_number(-0.1));
    }

    #[test]
    fn test_nan_rejected() {
        assert!(!Constraint::Unconstrained.check_number(f64::NAN));
        assert!(!PERCENTAGE.check_number(f64::NAN));
    }

    #[test]
    fn test_one_of() {
        let c = Constraint::one_of(&["L1", "L2", "L3"]);
        assert!(c.check_str("L2"));
        assert!(!c.check_str("l2"));
        assert!(!c.check_str(""));
    }

    #[test]
    fn test_items_cardinality_and_elements() {
        let c = Constraint::items_of(1, Some(3), &ID_36);
        let ok: Vec<String> = vec!["a".into(), "b".into()];
        assert!(c.check_items(&ok));
        assert!(!c.check_items::<String>(&[]));
        let too_many: Vec<String> = (0..4).map(|i| i.to_string()).collect();
        assert!(!c.check_items(&too_many));
        let bad_element = vec!["x".repeat(37)];
        assert!(!c.check_items(&bad_element));
    }

    #[test]
    fn test_integer_range_is_exact() {
        let two_pow_53 = 9_007_199_254_740_992.0;
        assert!(Constraint::at_most(two_pow_53).check_integer(9_007_199_254_740_992));
        assert!(!Constraint::at_most(two_pow_53).check_integer(9_007_199_254_740_993));
        assert!(!Constraint::at_least(two_pow_53).check_integer(9_007_199_254_740_991));

        let phases = Constraint::between(1.0, 3.0);
        assert!(phases.check_integer(1));
        assert!(phases.check_integer(3));
        assert!(!phases.check_integer(4));

        assert!(Constraint::between(0.5, 1.5).check_integer(1));
        assert!(!Constraint::between(0.5, 1.5).check_integer(0));
        assert!(!Constraint::max_length(5).check_integer(1));
    }

    #[test]
    fn test_mismatched_kind_fails() {
        assert!(!Constraint::max_length(5).check_number(1.0));
        assert!(!Constraint::at_least(0.0).check_str("1"));
        assert!(!Constraint::max_length(5).check_unbounded());
    }

    #[test]
    fn test_evaluate_absence() {
        let required = FieldSpec::required("evseId", Constraint::at_least(0.0));
        let optional = FieldSpec::optional("connectorId", Constraint::at_least(0.0));
        let absent: Option<i32> = None;

        assert!(!evaluate(&required, &absent));
        assert!(evaluate(&optional, &absent));
        assert!(evaluate(&optional, &Some(0)));
        assert!(!evaluate(&optional, &Some(-1)));
        assert!(evaluate(&required, &5));
        assert!(!required.accepts(&-5));
    }
}
