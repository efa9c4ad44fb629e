//! Composite values
//!
//! A composite is an ordered list of declared fields. Everything observable
//! about it is derived from that list:
//!
//! - validity: every field satisfies its [`FieldSpec`] and every nested
//!   composite is itself valid, recomputed on each call
//! - violations: the same walk, exhaustive, with dotted paths
//! - equality: field by field through [`FieldValue::same_value`], so a NaN
//!   field still equals itself
//! - hash: every field in declaration order
//! - rendering: `Type { field = value, ..., isValid = bool }`
//!
//! Concrete types are declared with the `composite!` macro, which only
//! supplies the field list; the functions here do the rest.

use std::fmt;
use std::hash::Hasher;

use tracing::debug;

use crate::constraint::{evaluate, FieldSpec};
use crate::error::ModelError;
use crate::value::FieldValue;

/// One declared field paired with its current value
#[derive(Clone, Copy)]
pub struct Field<'a> {
    pub spec: &'static FieldSpec,
    pub value: &'a dyn FieldValue,
}

impl<'a> Field<'a> {
    pub fn new(spec: &'static FieldSpec, value: &'a dyn FieldValue) -> Self {
        Self { spec, value }
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    /// Own constraint only, no recursion
    pub fn satisfies_spec(&self) -> bool {
        evaluate(self.spec, self.value)
    }
}

/// A field-level problem found by [`Composite::violations`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path from the root, e.g. `chargingSchedule[0].duration`
    pub path: String,
    pub type_name: &'static str,
    pub field: &'static str,
    pub value: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} at {} = {}", self.type_name, self.field, self.path, self.value)
    }
}

impl From<Violation> for ModelError {
    fn from(v: Violation) -> Self {
        ModelError::InvalidProperty {
            type_name: v.type_name,
            field: v.field,
            value: v.value,
        }
    }
}

/// An aggregate of declared fields
pub trait Composite: FieldValue + Sized {
    const TYPE_NAME: &'static str;

    /// Field declarations in schema order
    fn field_specs() -> &'static [FieldSpec];

    /// Declarations paired with current values, in schema order
    fn fields(&self) -> Vec<Field<'_>>;

    /// Recursive validity. Pure, never cached.
    fn validate(&self) -> bool {
        validate(self)
    }

    /// Every violation in the tree, in declaration order
    fn violations(&self) -> Vec<Violation> {
        let mut out = Vec::new();
        collect_violations(self, "", &mut out);
        out
    }

    fn first_violation(&self) -> Option<Violation> {
        self.violations().into_iter().next()
    }
}

/// Short-circuit conjunction of every field's own constraint and the nested
/// validity of every composite below it.
pub fn validate<C: Composite>(composite: &C) -> bool {
    composite
        .fields()
        .iter()
        .all(|field| field.satisfies_spec() && field.value.validate_nested())
}

/// Exhaustive walk; `prefix` is the path of `composite` itself ("" at root).
pub fn collect_violations<C: Composite>(composite: &C, prefix: &str, out: &mut Vec<Violation>) {
    for field in composite.fields() {
        let path = if prefix.is_empty() {
            field.name().to_string()
        } else {
            format!("{prefix}.{}", field.name())
        };
        if !field.satisfies_spec() {
            out.push(Violation {
                path: path.clone(),
                type_name: C::TYPE_NAME,
                field: field.name(),
                value: format!("{:?}", field.value),
            });
        }
        field.value.collect_violations(&path, out);
    }
}

/// Hash every declared field in declaration order
pub fn hash_fields<C: Composite>(composite: &C, state: &mut dyn Hasher) {
    for field in composite.fields() {
        field.value.hash_value(state);
    }
}

/// Canonical diagnostic rendering
pub fn render<C: Composite>(composite: &C, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {{ ", C::TYPE_NAME)?;
    for field in composite.fields() {
        write!(f, "{} = {:?}, ", field.name(), field.value)?;
    }
    write!(f, "isValid = {} }}", validate(composite))
}

/// Gate a construction or mutation on one field's declaration.
///
/// A nested composite handed in must itself be valid, so a freshly built or
/// freshly mutated parent always validates.
pub fn enforce(
    type_name: &'static str,
    spec: &FieldSpec,
    value: &dyn FieldValue,
) -> Result<(), ModelError> {
    if evaluate(spec, value) && value.validate_nested() {
        return Ok(());
    }
    let rendered = format!("{value:?}");
    debug!(
        "Rejected {}.{} = {} ({:?})",
        type_name, spec.name, rendered, spec.constraint
    );
    Err(ModelError::invalid_property(type_name, spec.name, rendered))
}
