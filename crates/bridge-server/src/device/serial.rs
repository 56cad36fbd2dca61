//! Serial device channel implementation.

use std::io::{Read, Write};
use std::sync::Mutex;
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::info;

use super::{DeviceChannel, DeviceError};

/// Serial channel over a UART device.
///
/// The port is opened once; reads and writes go through independent
/// `try_clone` handles behind separate mutexes, so the poller blocking in
/// a read never delays a command write. The reader keeps a pending-byte
/// buffer so a line split across reads is reassembled.
pub struct SerialChannel {
    reader: Mutex<LineReader>,
    writer: Mutex<Box<dyn SerialPort>>,
}

struct LineReader {
    port: Box<dyn SerialPort>,
    pending: Vec<u8>,
}

impl SerialChannel {
    /// Open a serial port as the bridge's device channel.
    ///
    /// # Arguments
    /// * `path` - Serial port path (e.g., "/dev/ttyUSB0")
    /// * `baud_rate` - Baud rate (e.g., 115200)
    /// * `timeout` - Read timeout bounding each poll
    pub fn open(path: &str, baud_rate: u32, timeout: Duration) -> Result<Self, DeviceError> {
        let port = serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(timeout)
            .open()?;

        let writer = port.try_clone()?;

        info!("opened serial port {} at {} baud", path, baud_rate);

        Ok(SerialChannel {
            reader: Mutex::new(LineReader {
                port,
                pending: Vec::new(),
            }),
            writer: Mutex::new(writer),
        })
    }
}

impl DeviceChannel for SerialChannel {
    fn is_open(&self) -> bool {
        true
    }

    fn write_line(&self, line: &str) -> Result<(), DeviceError> {
        let mut port = self.writer.lock().expect("serial writer lock poisoned");
        port.write_all(line.as_bytes())?;
        port.flush()?;
        Ok(())
    }

    fn read_line(&self) -> Result<Option<String>, DeviceError> {
        let mut reader = self.reader.lock().expect("serial reader lock poisoned");
        reader.next_line()
    }
}

impl LineReader {
    /// Pull bytes until a `\n` shows up or the port times out.
    fn next_line(&mut self) -> Result<Option<String>, DeviceError> {
        loop {
            if let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
                let line_bytes: Vec<u8> = self.pending.drain(..=pos).collect();
                // Drop the terminator; trimming of \r etc. happens at
                // classification.
                let line = String::from_utf8(line_bytes[..line_bytes.len() - 1].to_vec())
                    .map_err(|_| DeviceError::Decode)?;
                return Ok(Some(line));
            }

            let mut buf = [0u8; 256];
            match self.port.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(n) => self.pending.extend_from_slice(&buf[..n]),
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }
    }
}
