//! Linear version history for one document
//!
//! A version is recorded for every completed content update and every user
//! edit, never for intermediate streaming snapshots. Navigation moves a
//! cursor over the history without ever deleting entries; committing always
//! appends a new latest version, whichever version was being viewed.

use canvas_artifact::{ContentHash, VersionChange, VersionCursor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable snapshot of completed content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    content: String,
    hash: ContentHash,
    recorded_at: DateTime<Utc>,
}

impl Version {
    #[must_use]
    pub fn new(content: String) -> Self {
        Self {
            hash: ContentHash::of_text(&content),
            content,
            recorded_at: Utc::now(),
        }
    }

    #[inline]
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[inline]
    #[must_use]
    pub fn hash(&self) -> ContentHash {
        self.hash
    }

    #[inline]
    #[must_use]
    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionStore {
    versions: Vec<Version>,
    index: usize,
}

impl VersionStore {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn current(&self) -> Option<&Version> {
        self.versions.get(self.index)
    }

    #[must_use]
    pub fn latest(&self) -> Option<&Version> {
        self.versions.last()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Version> {
        self.versions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Version> {
        self.versions.iter()
    }

    #[inline]
    #[must_use]
    pub fn cursor(&self) -> VersionCursor {
        VersionCursor {
            index: self.index,
            len: self.versions.len(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_latest(&self) -> bool {
        self.cursor().is_latest()
    }

    /// Append `content` as the new latest version and select it
    ///
    /// Returns the new version's index.
    pub fn commit(&mut self, content: String) -> usize {
        self.versions.push(Version::new(content));
        self.index = self.versions.len() - 1;
        self.index
    }

    /// Move the cursor; out-of-range moves are no-ops
    ///
    /// Returns whether the cursor moved.
    pub fn navigate(&mut self, change: VersionChange) -> bool {
        let target = match change {
            VersionChange::Prev => self.index.checked_sub(1),
            VersionChange::Next => Some(self.index + 1).filter(|next| *next < self.versions.len()),
            VersionChange::Latest => self.versions.len().checked_sub(1),
        };
        match target {
            Some(index) if index != self.index => {
                self.index = index;
                true
            }
            _ => false,
        }
    }
}
