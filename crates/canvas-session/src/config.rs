//! Workspace configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! queue_capacity = 128
//! default_model = "anthropic/claude-opus-4.6"
//!
//! [reveal]
//! code = { after_chars = 200 }
//!
//! [title]
//! fallback = "New Chat"
//! max_chars = 80
//!
//! [log]
//! filter = "info,canvas_stream=debug"
//! json = false
//! ```

use canvas_artifact::{ArtifactKind, RevealPolicy};
use canvas_stream::RevealConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::models::DEFAULT_CHAT_MODEL;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Bound of each document's input queue
    pub queue_capacity: usize,
    /// Per-kind reveal policy overrides
    pub reveal: RevealConfig,
    pub title: TitleConfig,
    pub log: LogConfig,
    /// Model id used when the chat does not name one
    pub default_model: String,
}

impl CanvasConfig {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for invalid TOML or field types
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    #[inline]
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    #[must_use]
    pub fn with_reveal(mut self, kind: ArtifactKind, policy: RevealPolicy) -> Self {
        self.reveal = self.reveal.with_override(kind, policy);
        self
    }

    #[must_use]
    pub fn with_title_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.title.fallback = fallback.into();
        self
    }

    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log.filter = filter.into();
        self
    }

    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 256,
            reveal: RevealConfig::default(),
            title: TitleConfig::default(),
            log: LogConfig::default(),
            default_model: DEFAULT_CHAT_MODEL.to_string(),
        }
    }
}

/// Chat title generation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleConfig {
    /// Title used when generation fails
    pub fallback: String,
    pub max_chars: usize,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            fallback: "New Chat".to_string(),
            max_chars: 80,
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence
    pub filter: String,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}
