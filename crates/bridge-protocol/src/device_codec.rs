//! Device line codec.
//!
//! The device speaks a newline-terminated ASCII line protocol.
//!
//! Outbound (bridge → device), one line per command:
//!
//! - `QUEST:<comma-separated positions>` (empty list → `QUEST:`)
//! - `COLOR:<r>,<g>,<b>`
//! - `INIT_EFFECT`
//!
//! Inbound (device → bridge), classified after trimming:
//!
//! - a bare digit string → sensor identifier
//! - `EFFECT_DONE`       → effect-completion notice
//! - anything else       → unknown (logged by the poller, not broadcast)

use bridge_core::{DeviceCommand, DeviceLine};

use crate::is_digit_token;

/// Serialize a validated command to its device line.
///
/// Exactly one `\n` terminator, no embedded newlines: commands carry only
/// decimal digits, commas, and the fixed ASCII keywords.
pub fn encode_command(cmd: &DeviceCommand) -> String {
    match cmd {
        DeviceCommand::Quest(positions) => {
            let joined = positions
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(",");
            format!("QUEST:{}\n", joined)
        }
        DeviceCommand::Color { r, g, b } => format!("COLOR:{},{},{}\n", r, g, b),
        DeviceCommand::InitEffect => "INIT_EFFECT\n".to_string(),
    }
}

/// Classify one raw line read from the device.
///
/// Surrounding whitespace (including the `\r` some firmwares append) is
/// trimmed before classification; the trimmed text is what gets
/// broadcast to clients.
pub fn classify_line(raw: &str) -> DeviceLine {
    let text = raw.trim();

    if is_digit_token(text) {
        DeviceLine::SensorId {
            id: text.to_string(),
        }
    } else if text == "EFFECT_DONE" {
        DeviceLine::EffectDone
    } else {
        DeviceLine::Unknown {
            text: text.to_string(),
        }
    }
}
