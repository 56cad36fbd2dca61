//! bridge-protocol
//!
//! Wire-level encoding/decoding for the bridge.
//!
//! This crate turns text on either side of the bridge into logical
//! `bridge_core` messages and back again:
//!
//! - [`client_codec`] : client text lines → [`bridge_core::InboundMessage`]
//! - [`device_codec`] : [`bridge_core::DeviceCommand`] → device line,
//!   device line → [`bridge_core::DeviceLine`]

pub mod client_codec;
pub mod device_codec;

pub use client_codec::parse_client_message;
pub use device_codec::{classify_line, encode_command};

/// True when `s` is non-empty and consists solely of ASCII digits.
///
/// This is the shared token rule on both sides of the bridge: bare digit
/// strings from clients are relayed as raw tokens, digit-only lines from
/// the device are sensor identifiers.
pub fn is_digit_token(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
