//! The command translator.
//!
//! Maps one [`InboundMessage`] to one [`DeviceCommand`], or rejects it
//! with a [`ValidationError`]. This is a pure function: no I/O, no state,
//! identical input always yields identical output. All range and arity
//! rules live here so they can be tested without a socket or a serial
//! port in sight.

use crate::error::ValidationError;
use crate::messages::{DeviceCommand, InboundMessage};

/// Validate an inbound message and translate it to a device command.
///
/// Rules:
/// - `QuestcardPositions`: every element must be in `1..=48`; an empty
///   list is allowed (clears the board).
/// - `PieceColor`: exactly 3 components, each in `0..=255`.
/// - `InitEffect`: always succeeds.
/// - `RawToken` / `Malformed`: never reach the device.
pub fn translate(msg: &InboundMessage) -> Result<DeviceCommand, ValidationError> {
    match msg {
        InboundMessage::QuestcardPositions { positions } => {
            let mut validated = Vec::with_capacity(positions.len());
            for &pos in positions {
                match u8::try_from(pos) {
                    Ok(p) if (1..=48).contains(&p) => validated.push(p),
                    _ => return Err(ValidationError::InvalidRange(pos)),
                }
            }
            Ok(DeviceCommand::Quest(validated))
        }

        InboundMessage::PieceColor { color } => {
            if color.len() != 3 {
                return Err(ValidationError::InvalidFormat);
            }
            // u8's domain is exactly the valid component range 0..=255.
            let r = u8::try_from(color[0]).map_err(|_| ValidationError::InvalidFormat)?;
            let g = u8::try_from(color[1]).map_err(|_| ValidationError::InvalidFormat)?;
            let b = u8::try_from(color[2]).map_err(|_| ValidationError::InvalidFormat)?;
            Ok(DeviceCommand::Color { r, g, b })
        }

        InboundMessage::InitEffect => Ok(DeviceCommand::InitEffect),

        InboundMessage::RawToken { .. } | InboundMessage::Malformed { .. } => {
            Err(ValidationError::UnknownType)
        }
    }
}
