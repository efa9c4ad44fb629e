//! OCPP 2.0.1 data types
//!
//! Leaf composites first, then the composites that nest them. Field order
//! follows the JSON schema of each type.

use chrono::{DateTime, Utc};

use super::enums::*;
use crate::constraint::Constraint;
use crate::macros::composite;

const PERCENT: Constraint = Constraint::between(0.0, 100.0);
const NON_NEGATIVE: Constraint = Constraint::at_least(0.0);
const PHASE_COUNT: Constraint = Constraint::between(1.0, 3.0);

composite! {
    /// Additional identification token, e.g. a contract id behind an RFID
    pub struct AdditionalInfo {
        required {
            additional_id_token: String = "additionalIdToken", Constraint::max_length(36);
            kind: String = "type", Constraint::max_length(50);
        }
        optional {}
    }
}

composite! {
    /// Token for identification
    pub struct IdToken {
        required {
            id_token: String = "idToken", Constraint::max_length(36);
            kind: IdTokenType = "type", Constraint::Unconstrained;
        }
        optional {
            additional_info: Vec<AdditionalInfo> = "additionalInfo", Constraint::items(1, None);
        }
    }
}

composite! {
    /// EVSE identifier
    pub struct Evse {
        required {
            id: i32 = "id", NON_NEGATIVE;
        }
        optional {
            connector_id: i32 = "connectorId", NON_NEGATIVE;
        }
    }
}

composite! {
    /// Extra status detail carried by responses
    pub struct StatusInfo {
        required {
            reason_code: String = "reasonCode", Constraint::max_length(20);
        }
        optional {
            additional_info: String = "additionalInfo", Constraint::max_length(512);
        }
    }
}

composite! {
    /// Wireless modem of a charging station
    pub struct Modem {
        required {}
        optional {
            iccid: String = "iccid", Constraint::max_length(20);
            imsi: String = "imsi", Constraint::max_length(20);
        }
    }
}

composite! {
    /// Charging station information
    pub struct ChargingStation {
        required {
            model: String = "model", Constraint::max_length(20);
            vendor_name: String = "vendorName", Constraint::max_length(50);
        }
        optional {
            serial_number: String = "serialNumber", Constraint::max_length(25);
            modem: Modem = "modem", Constraint::Unconstrained;
            firmware_version: String = "firmwareVersion", Constraint::max_length(50);
        }
    }
}

composite! {
    /// One period of a charging schedule
    pub struct ChargingSchedulePeriod {
        required {
            /// Seconds from the start of the schedule
            start_period: i32 = "startPeriod", NON_NEGATIVE;
            /// Limit in the schedule's rate unit
            limit: f64 = "limit", NON_NEGATIVE;
        }
        optional {
            number_phases: i32 = "numberPhases", PHASE_COUNT;
            phase_to_use: i32 = "phaseToUse", PHASE_COUNT;
        }
    }
}

composite! {
    /// Charging schedule
    pub struct ChargingSchedule {
        required {
            id: i32 = "id", Constraint::Unconstrained;
            charging_rate_unit: ChargingRateUnit = "chargingRateUnit", Constraint::Unconstrained;
            charging_schedule_period: Vec<ChargingSchedulePeriod> =
                "chargingSchedulePeriod", Constraint::items(1, Some(1024));
        }
        optional {
            start_schedule: DateTime<Utc> = "startSchedule", Constraint::Unconstrained;
            duration: i32 = "duration", Constraint::Unconstrained;
            min_charging_rate: f64 = "minChargingRate", Constraint::Unconstrained;
        }
    }
}

composite! {
    /// Charging profile
    pub struct ChargingProfile {
        required {
            id: i32 = "id", Constraint::Unconstrained;
            stack_level: i32 = "stackLevel", NON_NEGATIVE;
            charging_profile_purpose: ChargingProfilePurpose =
                "chargingProfilePurpose", Constraint::Unconstrained;
            charging_profile_kind: ChargingProfileKind =
                "chargingProfileKind", Constraint::Unconstrained;
            charging_schedule: Vec<ChargingSchedule> =
                "chargingSchedule", Constraint::items(1, Some(3));
        }
        optional {
            recurrency_kind: RecurrencyKind = "recurrencyKind", Constraint::Unconstrained;
            valid_from: DateTime<Utc> = "validFrom", Constraint::Unconstrained;
            valid_to: DateTime<Utc> = "validTo", Constraint::Unconstrained;
            transaction_id: String = "transactionId", Constraint::max_length(36);
        }
    }
}

composite! {
    /// Unit and power-of-ten multiplier of a sampled value
    pub struct UnitOfMeasure {
        required {}
        optional {
            unit: String = "unit", Constraint::max_length(20);
            multiplier: i32 = "multiplier", Constraint::Unconstrained;
        }
    }
}

composite! {
    /// Signed meter reading
    pub struct SignedMeterValue {
        required {
            signed_meter_data: String = "signedMeterData", Constraint::max_length(2500);
            signing_method: String = "signingMethod", Constraint::max_length(50);
            encoding_method: String = "encodingMethod", Constraint::max_length(50);
            public_key: String = "publicKey", Constraint::max_length(2500);
        }
        optional {}
    }
}

composite! {
    /// Single sampled value in a meter reading
    pub struct SampledValue {
        required {
            value: f64 = "value", Constraint::Unconstrained;
        }
        optional {
            context: ReadingContext = "context", Constraint::Unconstrained;
            measurand: Measurand = "measurand", Constraint::Unconstrained;
            phase: Phase = "phase", Constraint::Unconstrained;
            location: Location = "location", Constraint::Unconstrained;
            signed_meter_value: SignedMeterValue = "signedMeterValue", Constraint::Unconstrained;
            unit_of_measure: UnitOfMeasure = "unitOfMeasure", Constraint::Unconstrained;
        }
    }
}

composite! {
    /// Meter value with timestamp and samples
    pub struct MeterValue {
        required {
            sampled_value: Vec<SampledValue> = "sampledValue", Constraint::items(1, None);
            timestamp: DateTime<Utc> = "timestamp", Constraint::Unconstrained;
        }
        optional {}
    }
}

composite! {
    /// DC charging parameters reported by the EV
    pub struct DcChargingParameters {
        required {
            ev_max_current: i32 = "evMaxCurrent", Constraint::Unconstrained;
            ev_max_voltage: i32 = "evMaxVoltage", Constraint::Unconstrained;
        }
        optional {
            energy_amount: i32 = "energyAmount", Constraint::Unconstrained;
            ev_max_power: i32 = "evMaxPower", Constraint::Unconstrained;
            /// State of charge in percent
            state_of_charge: i32 = "stateOfCharge", PERCENT;
            ev_energy_capacity: i32 = "evEnergyCapacity", Constraint::Unconstrained;
            full_soc: i32 = "fullSoC", PERCENT;
            bulk_soc: i32 = "bulkSoC", PERCENT;
        }
    }
}
