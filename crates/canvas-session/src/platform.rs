//! In-process platform for headless hosts and tests
//!
//! Records clipboard writes and file exports instead of touching the OS.
//! Each capability can be switched off to exercise the unavailable path.

use canvas_artifact::{Capability, CapabilityUnavailable, FileExport, Platform};
use parking_lot::Mutex;

#[derive(Debug)]
pub struct HeadlessPlatform {
    clipboard_enabled: bool,
    downloads_enabled: bool,
    clipboard: Mutex<Vec<String>>,
    files: Mutex<Vec<FileExport>>,
}

impl HeadlessPlatform {
    /// Platform with every capability available
    #[must_use]
    pub fn new() -> Self {
        Self {
            clipboard_enabled: true,
            downloads_enabled: true,
            clipboard: Mutex::new(Vec::new()),
            files: Mutex::new(Vec::new()),
        }
    }

    /// Disable one capability
    #[must_use]
    pub fn without(mut self, capability: Capability) -> Self {
        match capability {
            Capability::Clipboard => self.clipboard_enabled = false,
            Capability::FileDownload => self.downloads_enabled = false,
        }
        self
    }

    #[must_use]
    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Clipboard => self.clipboard_enabled,
            Capability::FileDownload => self.downloads_enabled,
        }
    }

    /// Everything written to the clipboard, oldest first
    pub fn clipboard(&self) -> Vec<String> {
        self.clipboard.lock().clone()
    }

    /// Most recent clipboard write
    pub fn last_clipboard(&self) -> Option<String> {
        self.clipboard.lock().last().cloned()
    }

    /// Every file offered for download, oldest first
    pub fn files(&self) -> Vec<FileExport> {
        self.files.lock().clone()
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for HeadlessPlatform {
    fn write_clipboard(&self, text: &str) -> Result<(), CapabilityUnavailable> {
        if !self.clipboard_enabled {
            return Err(CapabilityUnavailable::new(Capability::Clipboard));
        }
        self.clipboard.lock().push(text.to_string());
        Ok(())
    }

    fn save_file(&self, file: FileExport) -> Result<(), CapabilityUnavailable> {
        if !self.downloads_enabled {
            return Err(CapabilityUnavailable::new(Capability::FileDownload));
        }
        tracing::debug!(file = %file.file_name, bytes = file.bytes.len(), "file export recorded");
        self.files.lock().push(file);
        Ok(())
    }
}
