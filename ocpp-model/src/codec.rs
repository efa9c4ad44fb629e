//! OCPP 2.0.1 JSON payload codec
//!
//! Maps composites to and from the JSON payload of an OCPP CALL/CALLRESULT
//! (the `payload` element of `[2, messageId, action, payload]`). Framing and
//! transport live elsewhere; this module guarantees that:
//!
//! - nothing that fails `validate()` is ever emitted
//! - nothing that violates a field constraint is ever accepted, because
//!   decoding runs through the same constructors and setters as user code
//!
//! Failures map onto the RPC error codes a CSMS or station sends back in a
//! CALLERROR.

use std::cell::Cell;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::composite::{Composite, Violation};
use crate::config::{CheckerConfig, Direction, ReportMode};
use crate::error::INVALID_PROPERTY;
use crate::types::*;

/// OCPP RPC error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    FormatViolation,
    GenericError,
    InternalError,
    MessageTypeNotSupported,
    NotImplemented,
    NotSupported,
    OccurrenceConstraintViolation,
    PropertyConstraintViolation,
    ProtocolError,
    RpcFrameworkError,
    SecurityError,
    TypeConstraintViolation,
}

/// OCPP action names covered by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    // CP -> CSMS
    BootNotification,
    Heartbeat,
    StatusNotification,
    MeterValues,

    // CSMS -> CP
    SetChargingProfile,
    RequestStartTransaction,
    RequestStopTransaction,
    ReserveNow,
    CancelReservation,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::BootNotification,
        Action::Heartbeat,
        Action::StatusNotification,
        Action::MeterValues,
        Action::SetChargingProfile,
        Action::RequestStartTransaction,
        Action::RequestStopTransaction,
        Action::ReserveNow,
        Action::CancelReservation,
    ];
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::str::FromStr for Action {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BootNotification" => Ok(Action::BootNotification),
            "Heartbeat" => Ok(Action::Heartbeat),
            "StatusNotification" => Ok(Action::StatusNotification),
            "MeterValues" => Ok(Action::MeterValues),
            "SetChargingProfile" => Ok(Action::SetChargingProfile),
            "RequestStartTransaction" => Ok(Action::RequestStartTransaction),
            "RequestStopTransaction" => Ok(Action::RequestStopTransaction),
            "ReserveNow" => Ok(Action::ReserveNow),
            "CancelReservation" => Ok(Action::CancelReservation),
            _ => Err(CodecError::UnknownAction(s.to_string())),
        }
    }
}

/// Errors in payload encoding, decoding and checking
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload fails validation: {0}")]
    Invalid(Violation),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("payload too large: {size} > {limit} bytes")]
    TooLarge { size: usize, limit: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    /// RPC error code to answer with in a CALLERROR
    pub fn error_code(&self) -> ErrorCode {
        match self {
            CodecError::Json(err) => classify_json(err),
            CodecError::Invalid(_) => ErrorCode::PropertyConstraintViolation,
            CodecError::UnknownAction(_) => ErrorCode::NotImplemented,
            CodecError::TooLarge { .. } => ErrorCode::FormatViolation,
            CodecError::Io(_) => ErrorCode::InternalError,
        }
    }
}

fn classify_json(err: &serde_json::Error) -> ErrorCode {
    use serde_json::error::Category;

    match err.classify() {
        Category::Syntax | Category::Eof => ErrorCode::FormatViolation,
        Category::Io => ErrorCode::InternalError,
        Category::Data => {
            let message = err.to_string();
            if message.starts_with(INVALID_PROPERTY) {
                ErrorCode::PropertyConstraintViolation
            } else if message.starts_with("missing field") {
                ErrorCode::OccurrenceConstraintViolation
            } else if message.starts_with("invalid type")
                || message.starts_with("unknown variant")
                || message.starts_with("invalid value")
            {
                ErrorCode::TypeConstraintViolation
            } else {
                ErrorCode::FormatViolation
            }
        }
    }
}

/// Serialize a payload, refusing anything that does not validate
pub fn encode_payload<T: Composite + Serialize>(payload: &T) -> Result<Value, CodecError> {
    if let Some(violation) = payload.first_violation() {
        warn!("Refusing to encode {}: {}", T::TYPE_NAME, violation);
        return Err(CodecError::Invalid(violation));
    }
    Ok(serde_json::to_value(payload)?)
}

/// Deserialize a payload through the checked constructors and setters
pub fn decode_payload<T: DeserializeOwned>(payload: Value) -> Result<T, CodecError> {
    serde_json::from_value(payload).map_err(|err| {
        warn!("Rejected payload: {}", err);
        CodecError::Json(err)
    })
}

thread_local! {
    static LENIENT: Cell<bool> = const { Cell::new(false) };
}

/// True while a lenient decode is running on this thread
#[doc(hidden)]
pub fn is_lenient() -> bool {
    LENIENT.with(Cell::get)
}

struct LenientGuard {
    previous: bool,
}

impl LenientGuard {
    fn enter() -> Self {
        Self {
            previous: LENIENT.with(|flag| flag.replace(true)),
        }
    }
}

impl Drop for LenientGuard {
    fn drop(&mut self) {
        LENIENT.with(|flag| flag.set(self.previous));
    }
}

/// Deserialize a payload without enforcing field constraints.
///
/// Only the JSON shape (field presence and types) is checked. The result is
/// meant for diagnostics: run [`Composite::violations`] on it, never send it.
pub fn decode_payload_lenient<T: DeserializeOwned>(payload: Value) -> Result<T, CodecError> {
    let _guard = LenientGuard::enter();
    Ok(serde_json::from_value(payload)?)
}

/// Outcome of checking one payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub action: Action,
    pub direction: Direction,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
    pub violations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rendered: Option<String>,
}

/// Checks raw payloads against the catalog type for an action
#[derive(Debug, Clone, Default)]
pub struct Checker {
    config: CheckerConfig,
}

impl Checker {
    pub fn new(config: CheckerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Check a payload read from `path`
    pub fn check_file(&self, action: Action, path: impl AsRef<Path>) -> Result<CheckReport, CodecError> {
        let bytes = std::fs::read(path.as_ref())?;
        debug!("Read {} bytes from {}", bytes.len(), path.as_ref().display());
        self.check(action, &bytes)
    }

    /// Check a raw JSON payload.
    ///
    /// Constraint and shape problems are part of the report; only input that
    /// is not JSON at all (or too large) is an `Err`.
    pub fn check(&self, action: Action, bytes: &[u8]) -> Result<CheckReport, CodecError> {
        if bytes.len() > self.config.max_payload_bytes {
            return Err(CodecError::TooLarge {
                size: bytes.len(),
                limit: self.config.max_payload_bytes,
            });
        }
        let value: Value = serde_json::from_slice(bytes)?;

        let report = match (action, self.config.direction) {
            (Action::BootNotification, Direction::Request) => {
                self.report::<BootNotificationRequest>(action, value)
            }
            (Action::BootNotification, Direction::Response) => {
                self.report::<BootNotificationResponse>(action, value)
            }
            (Action::Heartbeat, Direction::Request) => self.report::<HeartbeatRequest>(action, value),
            (Action::Heartbeat, Direction::Response) => self.report::<HeartbeatResponse>(action, value),
            (Action::StatusNotification, Direction::Request) => {
                self.report::<StatusNotificationRequest>(action, value)
            }
            (Action::StatusNotification, Direction::Response) => {
                self.report::<StatusNotificationResponse>(action, value)
            }
            (Action::MeterValues, Direction::Request) => self.report::<MeterValuesRequest>(action, value),
            (Action::MeterValues, Direction::Response) => {
                self.report::<MeterValuesResponse>(action, value)
            }
            (Action::SetChargingProfile, Direction::Request) => {
                self.report::<SetChargingProfileRequest>(action, value)
            }
            (Action::SetChargingProfile, Direction::Response) => {
                self.report::<SetChargingProfileResponse>(action, value)
            }
            (Action::RequestStartTransaction, Direction::Request) => {
                self.report::<RequestStartTransactionRequest>(action, value)
            }
            (Action::RequestStartTransaction, Direction::Response) => {
                self.report::<RequestStartTransactionResponse>(action, value)
            }
            (Action::RequestStopTransaction, Direction::Request) => {
                self.report::<RequestStopTransactionRequest>(action, value)
            }
            (Action::RequestStopTransaction, Direction::Response) => {
                self.report::<RequestStopTransactionResponse>(action, value)
            }
            (Action::ReserveNow, Direction::Request) => self.report::<ReserveNowRequest>(action, value),
            (Action::ReserveNow, Direction::Response) => self.report::<ReserveNowResponse>(action, value),
            (Action::CancelReservation, Direction::Request) => {
                self.report::<CancelReservationRequest>(action, value)
            }
            (Action::CancelReservation, Direction::Response) => {
                self.report::<CancelReservationResponse>(action, value)
            }
        };

        info!(
            "{} {} payload: valid={} violations={}",
            action,
            self.config.direction,
            report.valid,
            report.violations.len()
        );
        Ok(report)
    }

    fn report<T: Composite + DeserializeOwned>(&self, action: Action, value: Value) -> CheckReport {
        let direction = self.config.direction;
        let decoded = match self.config.report_mode {
            ReportMode::FirstViolation => decode_payload::<T>(value),
            ReportMode::Exhaustive => decode_payload_lenient::<T>(value),
        };

        match decoded {
            Ok(payload) => {
                let violations: Vec<String> =
                    payload.violations().iter().map(ToString::to_string).collect();
                CheckReport {
                    action,
                    direction,
                    valid: violations.is_empty(),
                    error_code: (!violations.is_empty())
                        .then_some(ErrorCode::PropertyConstraintViolation),
                    violations,
                    rendered: Some(format!("{payload:?}")),
                }
            }
            Err(err) => CheckReport {
                action,
                direction,
                valid: false,
                error_code: Some(err.error_code()),
                violations: vec![err.to_string()],
                rendered: None,
            },
        }
    }
}
