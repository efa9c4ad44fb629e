//! Semantic value kinds
//!
//! [`FieldValue`] is the object-safe view a composite has of each of its
//! fields. Scalars check themselves against a [`Constraint`]; `Option` adds
//! absence; `Vec` adds cardinality and per-element checks; composites add
//! recursive validity.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};

use crate::composite::Violation;
use crate::constraint::Constraint;

/// A value that can sit in a composite field
pub trait FieldValue: fmt::Debug {
    /// Whether this (present) value satisfies `constraint`
    fn satisfies(&self, constraint: &Constraint) -> bool;

    /// True only for an unset optional
    fn is_absent(&self) -> bool {
        false
    }

    /// Recursive validity of nested composites; scalars have none
    fn validate_nested(&self) -> bool {
        true
    }

    /// Push every violation found below `path`
    fn collect_violations(&self, _path: &str, _out: &mut Vec<Violation>) {}

    /// Feed this value into `state`, consistent with [`same_value`](FieldValue::same_value)
    fn hash_value(&self, state: &mut dyn Hasher);

    /// Structural equality. Reflexive for every value, NaN included.
    fn same_value(&self, other: &Self) -> bool
    where
        Self: Sized;
}

impl FieldValue for String {
    fn satisfies(&self, constraint: &Constraint) -> bool {
        constraint.check_str(self)
    }

    fn hash_value(&self, mut state: &mut dyn Hasher) {
        self.hash(&mut state);
    }

    fn same_value(&self, other: &Self) -> bool {
        self == other
    }
}

macro_rules! impl_numeric_field_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl FieldValue for $t {
                fn satisfies(&self, constraint: &Constraint) -> bool {
                    constraint.check_integer(i128::from(*self))
                }

                fn hash_value(&self, mut state: &mut dyn Hasher) {
                    self.hash(&mut state);
                }

                fn same_value(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_numeric_field_value!(i32, i64, u32);

impl FieldValue for f64 {
    fn satisfies(&self, constraint: &Constraint) -> bool {
        constraint.check_number(*self)
    }

    fn hash_value(&self, state: &mut dyn Hasher) {
        state.write_u64(canonical_bits(*self));
    }

    fn same_value(&self, other: &Self) -> bool {
        canonical_bits(*self) == canonical_bits(*other)
    }
}

/// One bit pattern per value: both zeros collapse to `0.0`, every NaN to `f64::NAN`
fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

/// Implement [`FieldValue`] for types whose only applicable constraint is
/// `Unconstrained` (their domain is closed by the type itself).
macro_rules! impl_unbounded_field_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl $crate::value::FieldValue for $t {
                fn satisfies(&self, constraint: &$crate::constraint::Constraint) -> bool {
                    constraint.check_unbounded()
                }

                fn hash_value(&self, mut state: &mut dyn ::std::hash::Hasher) {
                    ::std::hash::Hash::hash(self, &mut state);
                }

                fn same_value(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

pub(crate) use impl_unbounded_field_value;

impl_unbounded_field_value!(bool, DateTime<Utc>);

impl<T: FieldValue> FieldValue for Option<T> {
    fn satisfies(&self, constraint: &Constraint) -> bool {
        match self {
            Some(value) => value.satisfies(constraint),
            None => true,
        }
    }

    fn is_absent(&self) -> bool {
        self.is_none()
    }

    fn validate_nested(&self) -> bool {
        match self {
            Some(value) => value.validate_nested(),
            None => true,
        }
    }

    fn collect_violations(&self, path: &str, out: &mut Vec<Violation>) {
        if let Some(value) = self {
            value.collect_violations(path, out);
        }
    }

    fn hash_value(&self, state: &mut dyn Hasher) {
        match self {
            Some(value) => {
                state.write_u8(1);
                value.hash_value(state);
            }
            None => state.write_u8(0),
        }
    }

    fn same_value(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same_value(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn satisfies(&self, constraint: &Constraint) -> bool {
        constraint.check_items(self)
    }

    fn validate_nested(&self) -> bool {
        self.iter().all(FieldValue::validate_nested)
    }

    fn collect_violations(&self, path: &str, out: &mut Vec<Violation>) {
        for (index, item) in self.iter().enumerate() {
            item.collect_violations(&format!("{path}[{index}]"), out);
        }
    }

    fn hash_value(&self, state: &mut dyn Hasher) {
        state.write_usize(self.len());
        for item in self {
            item.hash_value(state);
        }
    }

    fn same_value(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.same_value(b))
    }
}
