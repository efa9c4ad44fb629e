//! OCPP Model Property-Based Tests
//!
//! Proptest suite for the invariants of the constrained value model.
//!
//! # Usage
//!
//! ```bash
//! cargo test -p ocpp-model-property-tests              # Run all property tests
//! cargo test -p ocpp-model-property-tests constraint   # Run only constraint tests
//! PROPTEST_CASES=1000 cargo test -p ocpp-model-property-tests
//! ```
//!
//! # Test Modules
//!
//! - `constraint`: length, range, cardinality and absence rules
//! - `composite`: construction gates, rejected mutation, violation paths, codec agreement
//! - `identity`: equality, hashing and rendering

use chrono::{DateTime, TimeZone, Utc};

// Re-export for convenience in tests
pub use ocpp_model::*;

/// Fixed instant so generated timestamps stay comparable
pub fn epoch_plus(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + seconds, 0)
        .single()
        .unwrap_or_default()
}

/// Schedule with one period per `(start, limit)` pair; `None` if any part is rejected
pub fn schedule(id: i32, periods: &[(i32, f64)]) -> Option<ChargingSchedule> {
    let periods = periods
        .iter()
        .map(|&(start, limit)| ChargingSchedulePeriod::new(start, limit).ok())
        .collect::<Option<Vec<_>>>()?;
    ChargingSchedule::new(id, ChargingRateUnit::W, periods).ok()
}

/// Single-schedule default profile; `None` if any part is rejected
pub fn profile(id: i32, stack_level: i32, periods: &[(i32, f64)]) -> Option<ChargingProfile> {
    ChargingProfile::new(
        id,
        stack_level,
        ChargingProfilePurpose::TxDefaultProfile,
        ChargingProfileKind::Absolute,
        vec![schedule(1, periods)?],
    )
    .ok()
}
