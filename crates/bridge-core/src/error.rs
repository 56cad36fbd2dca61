//! Error types for command validation.
//!
//! Validation failures are local to a single inbound message: the
//! connection that sent the message stays open, the failure is logged by
//! the caller, and nothing reaches the device.

use thiserror::Error;

/// Why an [`crate::InboundMessage`] could not be turned into a device
/// command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A questcard position falls outside the board range `1..=48`.
    #[error("questcard position {0} is outside the board range 1..=48")]
    InvalidRange(i64),

    /// A piece color is not exactly 3 components in `0..=255`.
    #[error("piece color must be exactly 3 components in 0..=255")]
    InvalidFormat,

    /// The message variant has no device-command counterpart.
    #[error("message type has no device command")]
    UnknownType,
}
