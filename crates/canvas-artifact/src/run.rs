//! Run identifiers for asynchronous effects
//!
//! Every slow effect (sandboxed execution, export) is tagged with a [`RunId`]
//! when it starts. Only the newest run per effect key may merge its result;
//! anything older is superseded and dropped.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::RunSuperseded;

/// Monotonic run identifier, unique within one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(u64);

impl RunId {
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}

/// Tracks the latest run per effect key
#[derive(Debug, Clone, Default)]
pub struct RunLedger {
    next: u64,
    latest: HashMap<String, RunId>,
}

impl RunLedger {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new run for `key`, superseding any in flight
    pub fn begin(&mut self, key: &str) -> RunId {
        self.next += 1;
        let id = RunId(self.next);
        self.latest.insert(key.to_string(), id);
        id
    }

    /// Latest run started for `key`
    #[inline]
    #[must_use]
    pub fn latest(&self, key: &str) -> Option<RunId> {
        self.latest.get(key).copied()
    }

    /// Check whether a completed run may still merge its result
    ///
    /// # Errors
    /// Returns [`RunSuperseded`] if a newer run for `key` has started, or the
    /// run was never issued by this ledger
    pub fn accept(&self, key: &str, run: RunId) -> Result<(), RunSuperseded> {
        match self.latest(key) {
            Some(latest) if latest == run => Ok(()),
            latest => Err(RunSuperseded {
                key: key.to_string(),
                run,
                latest,
            }),
        }
    }
}
