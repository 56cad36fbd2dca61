//! Mock device channel for testing.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::{DeviceChannel, DeviceError};

/// Scripted in-memory device for unit and scenario tests.
///
/// Inject the lines the "device" should emit, then inspect what the
/// bridge wrote to it. Cloning shares the same buffers.
#[derive(Clone)]
pub struct MockChannel {
    inner: Arc<Mutex<MockChannelInner>>,
}

struct MockChannelInner {
    open: bool,
    read_lines: VecDeque<String>,
    written: Vec<String>,
}

impl MockChannel {
    /// Create an open mock device.
    pub fn new() -> Self {
        Self::with_open(true)
    }

    /// Create a mock device with an explicit open state.
    pub fn with_open(open: bool) -> Self {
        MockChannel {
            inner: Arc::new(Mutex::new(MockChannelInner {
                open,
                read_lines: VecDeque::new(),
                written: Vec::new(),
            })),
        }
    }

    /// Queue a line for the bridge to read.
    pub fn inject_line(&self, line: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.read_lines.push_back(line.to_string());
    }

    /// All lines the bridge has written so far.
    pub fn written(&self) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        inner.written.clone()
    }

    /// Clear captured writes.
    pub fn clear_written(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.written.clear();
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceChannel for MockChannel {
    fn is_open(&self) -> bool {
        self.inner.lock().unwrap().open
    }

    fn write_line(&self, line: &str) -> Result<(), DeviceError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.open {
            return Err(DeviceError::Unavailable);
        }
        inner.written.push(line.to_string());
        Ok(())
    }

    fn read_line(&self) -> Result<Option<String>, DeviceError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.open {
            return Ok(None);
        }
        Ok(inner.read_lines.pop_front())
    }
}
