//! Message types used by the bridge.
//!
//! These are **transport-agnostic** logical messages:
//! - [`InboundMessage`]: one classified client payload.
//! - [`DeviceCommand`]: a validated command bound for the device.
//! - [`DeviceLine`]: one classified status line emitted by the device.
//!
//! Note: wire encoders/decoders (JSON client payloads, device line text)
//! live in the `bridge-protocol` crate; this module is purely logical.

/// One client payload after wire-level classification.
///
/// The parse step is total: every text line a client sends maps to
/// exactly one of these variants. Range and arity validation is *not*
/// done here; it belongs to [`crate::translate`], which is why the
/// list-shaped variants keep raw `i64` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    /// Requested questcard positions on the board.
    QuestcardPositions { positions: Vec<i64> },

    /// Requested piece color as raw components (arity checked later).
    PieceColor { color: Vec<i64> },

    /// Trigger the board's init effect.
    InitEffect,

    /// A bare digit string, relayed to the other clients as-is.
    RawToken { text: String },

    /// Anything that is neither a recognized record nor a digit token.
    Malformed { raw: String, reason: String },
}

/// A validated command bound for the device.
///
/// Validation narrows the payload types: positions fit the `1..=48`
/// board, color components fit `u8`. Each command serializes to exactly
/// one newline-terminated ASCII line (see `bridge-protocol`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCommand {
    /// Light the given questcard positions. May be empty.
    Quest(Vec<u8>),

    /// Set the piece color.
    Color { r: u8, g: u8, b: u8 },

    /// Run the init effect.
    InitEffect,
}

/// One status line emitted by the device, after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceLine {
    /// A digit-only sensor identifier, relayed verbatim to clients.
    SensorId { id: String },

    /// The device finished its init effect.
    EffectDone,

    /// Unrecognized output; logged, never broadcast.
    Unknown { text: String },
}

// -----------------------------------------------------------------------------
// Convenience constructors
// -----------------------------------------------------------------------------

impl InboundMessage {
    /// Convenience constructor for a raw digit token.
    pub fn raw_token(text: impl Into<String>) -> Self {
        InboundMessage::RawToken { text: text.into() }
    }

    /// Convenience constructor for a malformed payload.
    pub fn malformed(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        InboundMessage::Malformed {
            raw: raw.into(),
            reason: reason.into(),
        }
    }
}
