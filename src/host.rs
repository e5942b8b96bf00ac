//! Messages exchanged with the host process
//!
//! The preferences screen runs inside a host application that owns native
//! dialogs, the tray icon and window lifetime. Requests travel over a
//! channel; the host answers picker requests asynchronously.

use crate::error::{PrefsError, Result};
use serde::Serialize;
use std::cell::RefCell;
use std::io::Write;

/// Requests sent from the preferences screen to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "channel", content = "payload")]
pub enum HostMessage {
    /// Close the preferences window
    #[serde(rename = "close-secondary")]
    CloseSecondary,
    /// Ask for a download directory; answered with a one-element path array
    #[serde(rename = "select-location-secondary")]
    SelectLocation,
    /// Ask for a yt-dlp config file; answered with its path
    #[serde(rename = "select-config")]
    SelectConfig,
    #[serde(rename = "reload")]
    Reload,
    #[serde(rename = "useTray")]
    UseTray(bool),
    /// Open a file with the platform default handler
    #[serde(rename = "open-path")]
    OpenPath(String),
}

/// Outgoing side of the host channel
pub trait HostChannel {
    fn send(&self, message: HostMessage) -> Result<()>;
}

impl<H: HostChannel + ?Sized> HostChannel for &H {
    fn send(&self, message: HostMessage) -> Result<()> {
        (**self).send(message)
    }
}

/// Writes each message as one JSON object per line
pub struct JsonLinesHost<W: Write> {
    writer: RefCell<W>,
}

impl<W: Write> JsonLinesHost<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: RefCell::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write> HostChannel for JsonLinesHost<W> {
    fn send(&self, message: HostMessage) -> Result<()> {
        let line = serde_json::to_string(&message)?;
        log::debug!("Sending host message {}", line);
        let mut writer = self.writer.borrow_mut();
        writeln!(writer, "{}", line)
            .and_then(|_| writer.flush())
            .map_err(|e| PrefsError::Host(format!("Failed to write host message: {}", e)))
    }
}

/// Keeps sent messages in memory
#[derive(Debug, Default)]
pub struct RecordingHost {
    sent: RefCell<Vec<HostMessage>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<HostMessage> {
        self.sent.borrow().clone()
    }
}

impl HostChannel for RecordingHost {
    fn send(&self, message: HostMessage) -> Result<()> {
        self.sent.borrow_mut().push(message);
        Ok(())
    }
}
