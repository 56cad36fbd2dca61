//! The device channel: the bridge's one serial-attached peripheral.
//!
//! The rest of the server only depends on the [`DeviceChannel`] contract:
//! an open flag, whole-line atomic writes, and a bounded-wait line read.
//! The real implementation is [`SerialChannel`]; [`ClosedChannel`] stands
//! in when the port could not be opened at startup (there is no reconnect
//! logic; a missing device is a steady, non-fatal state for the whole
//! process lifetime), and [`mock::MockChannel`] scripts the device in
//! tests.

use thiserror::Error;

mod serial;
pub use serial::SerialChannel;

pub mod mock;

/// Errors from the device channel.
///
/// None of these are fatal to the bridge: a failed write drops that one
/// command, a failed read is isolated to that poll iteration.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The channel never opened or the command was dropped.
    #[error("device channel is not open")]
    Unavailable,

    /// The device produced bytes that are not valid UTF-8.
    #[error("device sent a line that is not valid UTF-8")]
    Decode,

    /// Underlying serial I/O failure.
    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serial port layer failure.
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

/// Contract for the single serial-attached device.
///
/// `write_line` must be atomic at line granularity: concurrent callers
/// never interleave bytes mid-line. `read_line` blocks up to the
/// channel's configured timeout and returns `Ok(None)` when no complete
/// line arrived.
pub trait DeviceChannel: Send + Sync {
    /// Whether the channel opened successfully at startup.
    fn is_open(&self) -> bool;

    /// Write one newline-terminated command line.
    fn write_line(&self, line: &str) -> Result<(), DeviceError>;

    /// Read one complete line, blocking up to the configured timeout.
    ///
    /// The returned text still carries whatever framing the device sent
    /// (minus the `\n` terminator); callers trim and classify it.
    fn read_line(&self) -> Result<Option<String>, DeviceError>;
}

/// Permanently-unavailable channel used when the serial port failed to
/// open at startup.
pub struct ClosedChannel;

impl DeviceChannel for ClosedChannel {
    fn is_open(&self) -> bool {
        false
    }

    fn write_line(&self, _line: &str) -> Result<(), DeviceError> {
        Err(DeviceError::Unavailable)
    }

    fn read_line(&self) -> Result<Option<String>, DeviceError> {
        Ok(None)
    }
}
