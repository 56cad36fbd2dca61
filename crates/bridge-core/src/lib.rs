//! bridge-core
//!
//! Pure bridge logic:
//! - messages (inbound client messages, device commands, device lines)
//! - the command translator (validation + mapping to device commands)

pub mod error;
pub mod messages;
pub mod translator;

pub use messages::{DeviceCommand, DeviceLine, InboundMessage};

pub use error::ValidationError;
pub use translator::translate;
