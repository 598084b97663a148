//! Artifact kind discriminant
//!
//! [`ArtifactKind`] selects a document type's rendering and behavior contract.
//! The set is open: the built-in kinds are constants, anything else can be
//! registered later under its own tag.

use std::borrow::Cow;
use std::fmt;

const DELTA_PREFIX: &str = "data-";
const DELTA_SUFFIX: &str = "Delta";

/// Extensible kind discriminant (`code`, `sheet`, `text`, ...)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ArtifactKind(Cow<'static, str>);

impl ArtifactKind {
    pub const CODE: ArtifactKind = ArtifactKind(Cow::Borrowed("code"));
    pub const SHEET: ArtifactKind = ArtifactKind(Cow::Borrowed("sheet"));
    pub const TEXT: ArtifactKind = ArtifactKind(Cow::Borrowed("text"));

    /// Create a kind from any tag
    #[inline]
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(Cow::Owned(tag.into()))
    }

    /// Create a kind from a static tag without allocating
    #[inline]
    #[must_use]
    pub const fn from_static(tag: &'static str) -> Self {
        Self(Cow::Borrowed(tag))
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stream event tag carrying content for this kind (`data-<kind>Delta`)
    #[must_use]
    pub fn delta_event_type(&self) -> String {
        format!("{DELTA_PREFIX}{}{DELTA_SUFFIX}", self.0)
    }

    /// Extract the kind from a `data-<kind>Delta` tag
    ///
    /// Returns `None` for any other tag shape, including an empty kind.
    #[must_use]
    pub fn from_delta_event_type(tag: &str) -> Option<Self> {
        let kind = tag.strip_prefix(DELTA_PREFIX)?.strip_suffix(DELTA_SUFFIX)?;
        if kind.is_empty() {
            return None;
        }
        Some(Self::new(kind))
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArtifactKind {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for ArtifactKind {
    fn from(tag: String) -> Self {
        Self::new(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_kinds_compare_with_owned() {
        assert_eq!(ArtifactKind::SHEET, ArtifactKind::from("sheet"));
        assert_ne!(ArtifactKind::CODE, ArtifactKind::TEXT);
    }

    #[test]
    fn delta_event_type_format() {
        assert_eq!(ArtifactKind::SHEET.delta_event_type(), "data-sheetDelta");
        assert_eq!(ArtifactKind::new("video").delta_event_type(), "data-videoDelta");
    }

    #[test]
    fn parse_delta_event_type() {
        assert_eq!(
            ArtifactKind::from_delta_event_type("data-textDelta"),
            Some(ArtifactKind::TEXT)
        );
        assert_eq!(ArtifactKind::from_delta_event_type("data-Delta"), None);
        assert_eq!(ArtifactKind::from_delta_event_type("data-finish"), None);
        assert_eq!(ArtifactKind::from_delta_event_type("textDelta"), None);
    }

    #[test]
    fn serde_transparent() {
        let json = serde_json::to_string(&ArtifactKind::CODE).unwrap();
        assert_eq!(json, "\"code\"");
        let kind: ArtifactKind = serde_json::from_str("\"sheet\"").unwrap();
        assert_eq!(kind, ArtifactKind::SHEET);
    }
}
