//! Client wire codec.
//!
//! Clients speak newline-delimited text. Each line is either a
//! self-describing JSON record or a bare digit token:
//!
//! - `{"type":"questcard_positions","positions":[1,48,24]}`
//! - `{"type":"piece_color","color":[255,0,0]}`
//! - `{"type":"init_effect"}`
//! - `42` (raw token, relayed to the other clients)
//!
//! Parsing is a **total** classification: every line maps to exactly one
//! [`InboundMessage`] variant, with `Malformed` as the catch-all. Range
//! and arity validation happens later, in `bridge_core::translate`.

use bridge_core::InboundMessage;
use serde::Deserialize;

use crate::is_digit_token;

/// The self-describing JSON record shape, discriminated by `type`.
///
/// Missing `positions` / `color` fields default to empty lists; the
/// translator rejects what does not validate.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireRecord {
    QuestcardPositions {
        #[serde(default)]
        positions: Vec<i64>,
    },
    PieceColor {
        #[serde(default)]
        color: Vec<i64>,
    },
    InitEffect,
}

impl From<WireRecord> for InboundMessage {
    fn from(record: WireRecord) -> Self {
        match record {
            WireRecord::QuestcardPositions { positions } => {
                InboundMessage::QuestcardPositions { positions }
            }
            WireRecord::PieceColor { color } => InboundMessage::PieceColor { color },
            WireRecord::InitEffect => InboundMessage::InitEffect,
        }
    }
}

/// Classify one client text line into an [`InboundMessage`].
///
/// Order matters: a bare digit string such as `"42"` is valid JSON, but
/// it is not a recognized record, so it falls through to the raw-token
/// rule. Unrecognized `type` discriminators land in `Malformed` with
/// serde's "unknown variant" reason.
pub fn parse_client_message(raw: &str) -> InboundMessage {
    let text = raw.trim();

    match serde_json::from_str::<WireRecord>(text) {
        Ok(record) => record.into(),
        Err(_) if is_digit_token(text) => InboundMessage::raw_token(text),
        Err(err) => InboundMessage::malformed(text, err.to_string()),
    }
}
