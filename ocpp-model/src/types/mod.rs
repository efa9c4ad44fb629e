//! OCPP 2.0.1 type catalog
//!
//! - `enums`: closed symbol sets
//! - `datatypes`: nested composites shared between messages
//! - `messages`: request/response payload roots

pub mod enums;
pub mod datatypes;
pub mod messages;

pub use enums::*;
pub use datatypes::*;
pub use messages::*;
