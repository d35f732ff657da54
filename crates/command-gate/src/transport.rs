//! Motor command transports

use steering::Command;
use tracing::info;

/// Delivers commands to the motor controller
///
/// Best effort: `false` means the command did not go out. Callers do not
/// retry.
pub trait CommandTransport {
    fn send_command(&mut self, command: Command) -> bool;
}

/// Logs every command and always succeeds
#[derive(Debug, Default)]
pub struct LogTransport;

impl CommandTransport for LogTransport {
    fn send_command(&mut self, command: Command) -> bool {
        info!(%command, "motor command");
        true
    }
}

/// Keeps every command it was handed; can be told to fail
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Vec<Command>,
    fail: bool,
}

impl RecordingTransport {
    /// A transport that rejects everything
    pub fn failing() -> Self {
        Self {
            sent: Vec::new(),
            fail: true,
        }
    }

    pub fn sent(&self) -> &[Command] {
        &self.sent
    }
}

impl CommandTransport for RecordingTransport {
    fn send_command(&mut self, command: Command) -> bool {
        if self.fail {
            return false;
        }
        self.sent.push(command);
        true
    }
}
