//! Host platform capabilities used by export and copy actions
//!
//! The host (browser shell, desktop app, test harness) implements
//! [`Platform`]. Any capability may be missing; callers get
//! [`CapabilityUnavailable`] and surface it as a retryable notification.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CapabilityUnavailable;

/// Host capability an action may depend on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    Clipboard,
    FileDownload,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clipboard => write!(f, "clipboard"),
            Self::FileDownload => write!(f, "file download"),
        }
    }
}

/// A client-local file produced by an export action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileExport {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileExport {
    #[must_use]
    pub fn csv(file_name: impl Into<String>, body: String) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: "text/csv;charset=utf-8".to_string(),
            bytes: body.into_bytes(),
        }
    }
}

/// Host platform capabilities
pub trait Platform: Send + Sync {
    /// Write text to the system clipboard
    ///
    /// # Errors
    /// Returns [`CapabilityUnavailable`] when the host has no clipboard access
    fn write_clipboard(&self, text: &str) -> Result<(), CapabilityUnavailable>;

    /// Offer a file to the user as a local download
    ///
    /// # Errors
    /// Returns [`CapabilityUnavailable`] when the host cannot save files
    fn save_file(&self, file: FileExport) -> Result<(), CapabilityUnavailable>;
}

/// Platform with no capabilities at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPlatform;

impl Platform for NoPlatform {
    fn write_clipboard(&self, _text: &str) -> Result<(), CapabilityUnavailable> {
        Err(CapabilityUnavailable::new(Capability::Clipboard))
    }

    fn save_file(&self, _file: FileExport) -> Result<(), CapabilityUnavailable> {
        Err(CapabilityUnavailable::new(Capability::FileDownload))
    }
}

/// Severity of a transient notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

/// Transient user-facing notification (toast)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub retryable: bool,
}

impl Notification {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
            retryable: false,
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
            retryable: false,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
            retryable: false,
        }
    }

    #[must_use]
    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_platform_reports_each_capability() {
        let platform = NoPlatform;
        assert_eq!(
            platform.write_clipboard("x").unwrap_err().capability,
            Capability::Clipboard
        );
        assert_eq!(
            platform
                .save_file(FileExport::csv("a.csv", String::new()))
                .unwrap_err()
                .capability,
            Capability::FileDownload
        );
    }

    #[test]
    fn csv_export_mime() {
        let file = FileExport::csv("spreadsheet.csv", "a\n1".to_string());
        assert_eq!(file.mime_type, "text/csv;charset=utf-8");
        assert_eq!(file.bytes, b"a\n1");
    }

    #[test]
    fn notification_retryable_flag() {
        let note = Notification::error("Clipboard unavailable").retryable();
        assert!(note.retryable);
        assert_eq!(note.level, NotificationLevel::Error);
    }
}
