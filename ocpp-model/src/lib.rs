//! # OCPP Model
//!
//! Constrained value objects for OCPP 2.0.1 message payloads.
//!
//! Every payload field is declared once, as data: a wire name, a semantic
//! type and a constraint. Validation, equality, hashing, rendering and serde
//! support are derived from that declaration.
//!
//! ## Architecture
//!
//! ```text
//!  constraint        value             composite           types
//! ┌───────────┐    ┌────────────┐    ┌──────────────┐    ┌───────────────┐
//! │ Constraint│◄───│ FieldValue │◄───│ Composite    │◄───│ IdToken, ...  │
//! │ FieldSpec │    │ String,f64 │    │ validate()   │    │ *Request      │
//! │ evaluate  │    │ Option,Vec │    │ violations() │    │ *Response     │
//! └───────────┘    └────────────┘    └──────────────┘    └───────┬───────┘
//!                                                                │ serde
//!                                                        ┌───────▼───────┐
//!                                                        │ codec         │
//!                                                        │ encode/decode │
//!                                                        │ Checker       │
//!                                                        └───────────────┘
//! ```
//!
//! ## Enforcement
//!
//! | When                | What is checked                    | On failure              |
//! |---------------------|------------------------------------|-------------------------|
//! | `new(..)`           | every required field               | `Err(InvalidProperty)`  |
//! | `set_*` / `with_*`  | that field (and what it nests)     | `Err`, value unchanged  |
//! | `*_mut()`           | nothing                            | -                       |
//! | `validate()`        | the whole tree, recursively        | `false`                 |
//! | `encode_payload`    | `validate()`                       | `Err(Invalid)`          |
//! | decoding            | same as `new` + `set_*`            | `Err(Json)`             |
//!
//! ## Usage
//!
//! ```
//! use ocpp_model::{Composite, IdToken, IdTokenType, RequestStartTransactionRequest};
//!
//! let token = IdToken::new("04A2B3C4".to_string(), IdTokenType::Iso14443)?;
//! let mut request = RequestStartTransactionRequest::new(token, 7)?
//!     .with_evse_id(1)?;
//!
//! assert!(request.set_evse_id(Some(0)).is_err());
//! assert_eq!(request.evse_id(), Some(&1));
//! assert!(request.validate());
//!
//! // Out-of-band mutation is only caught by the recursive check
//! request.id_token_mut().id_token_mut().push_str(&"X".repeat(40));
//! assert!(!request.validate());
//! # Ok::<(), ocpp_model::ModelError>(())
//! ```

mod macros;

pub mod codec;
pub mod composite;
pub mod config;
pub mod constraint;
pub mod error;
pub mod types;
pub mod value;

pub use codec::{decode_payload, encode_payload, Action, CheckReport, Checker, CodecError, ErrorCode};
pub use composite::{Composite, Field, Violation};
pub use config::{CheckerConfig, Direction, ReportMode};
pub use constraint::{evaluate, Constraint, FieldSpec, Optionality};
pub use error::ModelError;
pub use value::FieldValue;

// Re-export the catalog
pub use types::*;
