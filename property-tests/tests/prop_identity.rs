//! Property tests for structural identity
//!
//! Tests invariants for:
//! - Equality: field-by-field, independent of construction path
//! - Hashing: consistent with equality
//! - Rendering: names the type, every field, and the validity flag

#![allow(clippy::eq_op)]

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use ocpp_model::*;
use ocpp_model_property_tests::{epoch_plus, profile};
use proptest::prelude::*;

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

// ============================================================================
// Strategies
// ============================================================================

fn periods() -> impl Strategy<Value = Vec<(i32, f64)>> {
    proptest::collection::vec((0i32..86_400, 0.0f64..50_000.0), 1..5)
}

fn status() -> impl Strategy<Value = ConnectorStatus> {
    prop::sample::select(vec![
        ConnectorStatus::Available,
        ConnectorStatus::Occupied,
        ConnectorStatus::Reserved,
        ConnectorStatus::Unavailable,
        ConnectorStatus::Faulted,
    ])
}

// ============================================================================
// Equality and Hash Property Tests
// ============================================================================

proptest! {
    /// Two independently built trees with the same content are equal and hash equal
    #[test]
    fn equal_trees_hash_equal(id in 0i32..1000, level in 0i32..10, parts in periods()) {
        let a = profile(id, level, &parts).unwrap();
        let b = profile(id, level, &parts).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(hash_of(&a), hash_of(&b));
    }

    /// Changing any single scalar breaks equality
    #[test]
    fn differing_field_not_equal(id in 0i32..1000, level in 0i32..10, parts in periods()) {
        let a = profile(id, level, &parts).unwrap();
        let b = profile(id + 1, level, &parts).unwrap();
        let c = profile(id, level + 1, &parts).unwrap();
        prop_assert_ne!(&a, &b);
        prop_assert_ne!(&a, &c);
    }

    /// Equality is symmetric and transitive across independently built trees
    #[test]
    fn equality_symmetric_transitive(
        id in 0i32..1000,
        level in 0i32..10,
        parts in periods(),
        bump in 0i32..2
    ) {
        let a = profile(id, level, &parts).unwrap();
        let b = profile(id, level, &parts).unwrap();
        let c = profile(id + bump, level, &parts).unwrap();

        prop_assert_eq!(a == b, b == a);
        prop_assert_eq!(a == c, c == a);
        prop_assert_eq!(b == c, c == b);
        if a == b && b == c {
            prop_assert!(a == c);
        }
        prop_assert_eq!(a == c, bump == 0);
    }

    /// Equality stays reflexive after unchecked mutation, NaN included
    #[test]
    fn equality_reflexive_after_mutation(
        parts in periods(),
        index in 0usize..4,
        limit in prop_oneof![Just(f64::NAN), Just(-0.0f64), -1.0e6f64..1.0e6]
    ) {
        let mut p = profile(1, 0, &parts).unwrap();
        let slots = p.charging_schedule_mut()[0].charging_schedule_period_mut();
        let index = index % slots.len();
        *slots[index].limit_mut() = limit;

        let copy = p.clone();
        prop_assert!(p == p);
        prop_assert!(p == copy && copy == p);
        prop_assert_eq!(hash_of(&p), hash_of(&copy));
    }

    /// Builder and setter paths produce the same value
    #[test]
    fn construction_path_irrelevant(
        evse in 0i32..10,
        connector in 0i32..10,
        status in status(),
        offset in 0i64..86_400
    ) {
        let at = epoch_plus(offset);
        let direct = StatusNotificationRequest::new(at, status, evse, connector).unwrap();

        let mut stepwise = StatusNotificationRequest::new(at, status, 0, 0).unwrap();
        stepwise.set_evse_id(evse).unwrap();
        stepwise.set_connector_id(connector).unwrap();

        prop_assert_eq!(hash_of(&direct), hash_of(&stepwise));
        prop_assert_eq!(direct, stepwise);
    }

    /// Equal values share a hash, distinct ones spread out
    #[test]
    fn hash_collapses_duplicates(ids in proptest::collection::vec(0i32..20, 1..30)) {
        let hashes: HashSet<u64> = ids.iter().map(|&id| hash_of(&Evse::new(id).unwrap())).collect();
        let distinct: HashSet<i32> = ids.iter().copied().collect();
        prop_assert_eq!(hashes.len(), distinct.len());
    }

    /// Signed zero compares and hashes as one value
    #[test]
    fn signed_zero_identity(start in 0i32..86_400) {
        let positive = ChargingSchedulePeriod::new(start, 0.0).unwrap();
        let negative = ChargingSchedulePeriod::new(start, -0.0).unwrap();
        prop_assert_eq!(&positive, &negative);
        prop_assert_eq!(hash_of(&positive), hash_of(&negative));
    }
}

// ============================================================================
// Rendering Property Tests
// ============================================================================

proptest! {
    /// Rendering names the type and reports current validity
    #[test]
    fn render_reports_validity(start in 0i32..86_400, phases in -3i32..8) {
        let mut period = ChargingSchedulePeriod::new(start, 7400.0).unwrap();
        *period.number_phases_mut() = Some(phases);

        let rendered = format!("{:?}", period);
        prop_assert!(rendered.starts_with("ChargingSchedulePeriod { "), "unexpected rendering: {}", rendered);
        prop_assert!(rendered.contains(&format!("startPeriod = {}", start)), "unexpected rendering: {}", rendered);
        prop_assert!(rendered.contains(&format!("numberPhases = Some({})", phases)), "unexpected rendering: {}", rendered);
        prop_assert!(rendered.ends_with(&format!("isValid = {} }}", period.validate())), "unexpected rendering: {}", rendered);
    }

    /// Rendering lists every declared field, in declaration order
    #[test]
    fn render_lists_every_field(start in 0i32..86_400) {
        let period = ChargingSchedulePeriod::new(start, 11000.0).unwrap();
        let rendered = format!("{:?}", period);

        let mut cursor = 0;
        for spec in ChargingSchedulePeriod::field_specs() {
            let needle = format!("{} = ", spec.name);
            let found = rendered[cursor..].find(&needle);
            prop_assert!(found.is_some(), "{} missing from {}", spec.name, rendered);
            cursor += found.unwrap_or(0);
        }
    }
}
