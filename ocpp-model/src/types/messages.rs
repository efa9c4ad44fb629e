//! OCPP 2.0.1 message payloads
//!
//! Request/response roots for the actions this crate models:
//! - BootNotification / Heartbeat / StatusNotification / MeterValues (CP -> CSMS)
//! - SetChargingProfile
//! - RequestStartTransaction / RequestStopTransaction
//! - ReserveNow / CancelReservation (CSMS -> CP)

use chrono::{DateTime, Utc};

use super::datatypes::*;
use super::enums::*;
use crate::constraint::Constraint;
use crate::error::ModelError;
use crate::macros::composite;

const NON_NEGATIVE: Constraint = Constraint::at_least(0.0);
const CONNECTOR_TYPE: Constraint = Constraint::one_of(CONNECTOR_TYPES);

// ============================================================================
// Requests
// ============================================================================

composite! {
    /// BootNotification request (CP -> CSMS)
    pub struct BootNotificationRequest {
        required {
            charging_station: ChargingStation = "chargingStation", Constraint::Unconstrained;
            reason: BootReason = "reason", Constraint::Unconstrained;
        }
        optional {}
    }
}

composite! {
    /// Heartbeat request (CP -> CSMS)
    pub struct HeartbeatRequest {
        required {}
        optional {}
    }
}

composite! {
    /// StatusNotification request (CP -> CSMS)
    pub struct StatusNotificationRequest {
        required {
            timestamp: DateTime<Utc> = "timestamp", Constraint::Unconstrained;
            connector_status: ConnectorStatus = "connectorStatus", Constraint::Unconstrained;
            evse_id: i32 = "evseId", NON_NEGATIVE;
            connector_id: i32 = "connectorId", NON_NEGATIVE;
        }
        optional {}
    }
}

composite! {
    /// MeterValues request (CP -> CSMS)
    pub struct MeterValuesRequest {
        required {
            evse_id: i32 = "evseId", NON_NEGATIVE;
            meter_value: Vec<MeterValue> = "meterValue", Constraint::items(1, None);
        }
        optional {}
    }
}

composite! {
    /// SetChargingProfile request (CSMS -> CP)
    pub struct SetChargingProfileRequest {
        required {
            evse_id: i32 = "evseId", NON_NEGATIVE;
            charging_profile: ChargingProfile = "chargingProfile", Constraint::Unconstrained;
        }
        optional {}
    }
}

composite! {
    /// RequestStartTransaction request (CSMS -> CP)
    pub struct RequestStartTransactionRequest {
        required {
            id_token: IdToken = "idToken", Constraint::Unconstrained;
            remote_start_id: i32 = "remoteStartId", Constraint::Unconstrained;
        }
        optional {
            evse_id: i32 = "evseId", Constraint::at_least(1.0);
            group_id_token: IdToken = "groupIdToken", Constraint::Unconstrained;
            charging_profile: ChargingProfile = "chargingProfile", Constraint::Unconstrained;
        }
    }
}

composite! {
    /// RequestStopTransaction request (CSMS -> CP)
    pub struct RequestStopTransactionRequest {
        required {
            transaction_id: String = "transactionId", Constraint::max_length(36);
        }
        optional {}
    }
}

composite! {
    /// ReserveNow request (CSMS -> CP)
    pub struct ReserveNowRequest {
        required {
            id: i32 = "id", Constraint::Unconstrained;
            expiry_date_time: DateTime<Utc> = "expiryDateTime", Constraint::Unconstrained;
            id_token: IdToken = "idToken", Constraint::Unconstrained;
        }
        optional {
            connector_type: String = "connectorType", CONNECTOR_TYPE;
            evse_id: i32 = "evseId", NON_NEGATIVE;
            group_id_token: IdToken = "groupIdToken", Constraint::Unconstrained;
        }
    }
}

composite! {
    /// CancelReservation request (CSMS -> CP)
    pub struct CancelReservationRequest {
        required {
            reservation_id: i32 = "reservationId", Constraint::Unconstrained;
        }
        optional {}
    }
}

// ============================================================================
// Responses
// ============================================================================

composite! {
    /// BootNotification response (CSMS -> CP)
    pub struct BootNotificationResponse {
        required {
            current_time: DateTime<Utc> = "currentTime", Constraint::Unconstrained;
            /// Heartbeat interval in seconds
            interval: i32 = "interval", Constraint::Unconstrained;
            status: RegistrationStatus = "status", Constraint::Unconstrained;
        }
        optional {
            status_info: StatusInfo = "statusInfo", Constraint::Unconstrained;
        }
    }
}

composite! {
    /// Heartbeat response (CSMS -> CP)
    pub struct HeartbeatResponse {
        required {
            current_time: DateTime<Utc> = "currentTime", Constraint::Unconstrained;
        }
        optional {}
    }
}

composite! {
    /// StatusNotification response (CSMS -> CP)
    pub struct StatusNotificationResponse {
        required {}
        optional {}
    }
}

composite! {
    /// MeterValues response (CSMS -> CP)
    pub struct MeterValuesResponse {
        required {}
        optional {}
    }
}

composite! {
    /// SetChargingProfile response (CP -> CSMS)
    pub struct SetChargingProfileResponse {
        required {
            status: ChargingProfileStatus = "status", Constraint::Unconstrained;
        }
        optional {
            status_info: StatusInfo = "statusInfo", Constraint::Unconstrained;
        }
    }
}

composite! {
    /// RequestStartTransaction response (CP -> CSMS)
    pub struct RequestStartTransactionResponse {
        required {
            status: RequestStartStopStatus = "status", Constraint::Unconstrained;
        }
        optional {
            status_info: StatusInfo = "statusInfo", Constraint::Unconstrained;
            transaction_id: String = "transactionId", Constraint::max_length(36);
        }
    }
}

composite! {
    /// RequestStopTransaction response (CP -> CSMS)
    pub struct RequestStopTransactionResponse {
        required {
            status: RequestStartStopStatus = "status", Constraint::Unconstrained;
        }
        optional {
            status_info: StatusInfo = "statusInfo", Constraint::Unconstrained;
        }
    }
}

composite! {
    /// ReserveNow response (CP -> CSMS)
    pub struct ReserveNowResponse {
        required {
            status: ReserveNowStatus = "status", Constraint::Unconstrained;
        }
        optional {
            status_info: StatusInfo = "statusInfo", Constraint::Unconstrained;
        }
    }
}

composite! {
    /// CancelReservation response (CP -> CSMS)
    pub struct CancelReservationResponse {
        required {
            status: CancelReservationStatus = "status", Constraint::Unconstrained;
        }
        optional {
            status_info: StatusInfo = "statusInfo", Constraint::Unconstrained;
        }
    }
}

impl BootNotificationRequest {
    /// Boot notification for a station identified by vendor and model
    pub fn for_station(
        vendor_name: impl Into<String>,
        model: impl Into<String>,
        reason: BootReason,
    ) -> Result<Self, ModelError> {
        let station = ChargingStation::new(model.into(), vendor_name.into())?;
        Self::new(station, reason)
    }
}

impl StatusNotificationRequest {
    /// Status notification stamped with the current time
    pub fn now(evse_id: i32, connector_id: i32, status: ConnectorStatus) -> Result<Self, ModelError> {
        Self::new(Utc::now(), status, evse_id, connector_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::Composite;

    #[test]
    fn test_boot_notification_request() {
        let mut req = BootNotificationRequest::for_station("Elektrokombinacija", "EK3", BootReason::PowerUp)
            .unwrap();
        req.charging_station_mut()
            .set_serial_number(Some("EK3-001".into()))
            .unwrap();

        let json = serde_json::to_string(&req).unwrap();
        let parsed: BootNotificationRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.charging_station().model(), "EK3");
        assert_eq!(parsed, req);
    }

    #[test]
    fn test_boot_notification_model_too_long() {
        let err = BootNotificationRequest::for_station("EK", "M".repeat(21), BootReason::PowerUp)
            .unwrap_err();
        assert_eq!(err.field(), "model");
    }

    #[test]
    fn test_status_notification_negative_evse() {
        assert!(StatusNotificationRequest::now(1, 1, ConnectorStatus::Available).is_ok());
        assert!(StatusNotificationRequest::now(0, 0, ConnectorStatus::Available).is_ok());
        assert!(StatusNotificationRequest::now(-1, 1, ConnectorStatus::Available).is_err());
    }

    #[test]
    fn test_reserve_now_connector_type_domain() {
        let token = IdToken::new("TOKEN".into(), IdTokenType::Central).unwrap();
        let mut req = ReserveNowRequest::new(7, Utc::now(), token).unwrap();
        assert!(req.set_connector_type(Some("cCCS2".into())).is_ok());
        assert!(req.set_connector_type(Some("CCS2".into())).is_err());
        assert_eq!(req.connector_type().map(String::as_str), Some("cCCS2"));
    }

    #[test]
    fn test_empty_payloads() {
        let json = serde_json::to_string(&HeartbeatRequest::new().unwrap()).unwrap();
        assert_eq!(json, "{}");
        let parsed: StatusNotificationResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.validate());
    }

    #[test]
    fn test_nested_invalidation_propagates_to_root() {
        let token = IdToken::new("TOKEN".into(), IdTokenType::Central).unwrap();
        let mut req = RequestStartTransactionRequest::new(token, 42).unwrap();
        assert!(req.validate());

        req.id_token_mut().id_token_mut().push_str(&"x".repeat(40));
        assert!(!req.validate());
        assert_eq!(req.violations()[0].path, "idToken.idToken");
    }
}
