//! Opaque per-kind metadata
//!
//! Each definition owns the shape of its metadata; everything else in the
//! workspace handles it as [`Metadata`] and never looks inside. Definitions
//! convert to and from their own typed struct with [`Metadata::from_typed`]
//! and [`Metadata::to_typed`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::MetadataError;

/// Opaque metadata value attached to an artifact state
#[derive(Debug, Clone, PartialEq, Default, Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Metadata(JsonValue);

/// Functional update over the previous metadata value
///
/// Effects and actions never write metadata directly; they post one of these
/// and the owning consumer applies it as a single read-modify-write.
pub type MetadataUpdate = Box<dyn FnOnce(Metadata) -> Metadata + Send + 'static>;

impl Metadata {
    /// Metadata for kinds that keep none
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self(JsonValue::Null)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_null()
    }

    /// Create from a typed value owned by a definition
    ///
    /// # Errors
    /// Returns error if the value cannot be represented as JSON
    pub fn from_typed<T: Serialize>(value: &T) -> Result<Self, MetadataError> {
        serde_json::to_value(value)
            .map(Self)
            .map_err(MetadataError::Encode)
    }

    /// Convert to the definition's typed value
    ///
    /// # Errors
    /// Returns error if the stored value does not match `T`
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T, MetadataError> {
        serde_json::from_value(self.0.clone()).map_err(MetadataError::Decode)
    }

    /// Apply a typed transformation, keeping the previous value on mismatch
    #[must_use]
    pub fn map_typed<T, F>(self, f: F) -> Self
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(T) -> T,
    {
        let typed = match self.to_typed::<T>() {
            Ok(typed) => typed,
            Err(err) => {
                tracing::warn!(error = %err, "metadata shape mismatch, update dropped");
                return self;
            }
        };
        match Self::from_typed(&f(typed)) {
            Ok(updated) => updated,
            Err(err) => {
                tracing::warn!(error = %err, "metadata re-encode failed, update dropped");
                self
            }
        }
    }

    /// Raw JSON view, for serialization boundaries only
    #[inline]
    #[must_use]
    pub fn as_json(&self) -> &JsonValue {
        &self.0
    }
}

/// Build a [`MetadataUpdate`] from a typed transformation
pub fn typed_update<T, F>(f: F) -> MetadataUpdate
where
    T: Serialize + DeserializeOwned + 'static,
    F: FnOnce(T) -> T + Send + 'static,
{
    Box::new(move |previous: Metadata| previous.map_typed(f))
}
