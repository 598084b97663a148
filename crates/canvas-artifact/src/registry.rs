//! Kind → definition registry
//!
//! Provides [`ArtifactRegistry`] plus a process-wide, install-once instance.
//! The global registry is populated before any session opens and is
//! read-only afterwards; local registries stay open for later additions.

use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::definition::ArtifactDefinition;
use crate::error::RegistryError;
use crate::kind::ArtifactKind;

static GLOBAL: OnceCell<Arc<ArtifactRegistry>> = OnceCell::new();

/// Mapping from kind to its single definition, in registration order
#[derive(Debug, Default, Clone)]
pub struct ArtifactRegistry {
    definitions: IndexMap<ArtifactKind, Arc<ArtifactDefinition>>,
}

impl ArtifactRegistry {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `definition` under `kind`
    ///
    /// # Errors
    /// - [`RegistryError::DuplicateKind`] if `kind` is already registered
    /// - [`RegistryError::KindMismatch`] if the record declares another kind
    pub fn register(
        &mut self,
        kind: ArtifactKind,
        definition: ArtifactDefinition,
    ) -> Result<(), RegistryError> {
        if definition.kind() != &kind {
            return Err(RegistryError::KindMismatch {
                registered: kind,
                declared: definition.kind().clone(),
            });
        }
        if self.definitions.contains_key(&kind) {
            return Err(RegistryError::DuplicateKind(kind));
        }
        tracing::debug!(%kind, "registered artifact kind");
        self.definitions.insert(kind, Arc::new(definition));
        Ok(())
    }

    /// Register a definition under its own declared kind
    ///
    /// # Errors
    /// Returns [`RegistryError::DuplicateKind`] if the kind is taken
    pub fn register_definition(&mut self, definition: ArtifactDefinition) -> Result<(), RegistryError> {
        let kind = definition.kind().clone();
        self.register(kind, definition)
    }

    /// Look up the definition for `kind`
    ///
    /// # Errors
    /// Returns [`RegistryError::UnknownKind`] if nothing is registered for it
    pub fn resolve(&self, kind: &ArtifactKind) -> Result<Arc<ArtifactDefinition>, RegistryError> {
        self.definitions
            .get(kind)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownKind(kind.clone()))
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, kind: &ArtifactKind) -> bool {
        self.definitions.contains_key(kind)
    }

    /// Registered kinds in registration order
    pub fn kinds(&self) -> impl Iterator<Item = &ArtifactKind> {
        self.definitions.keys()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Install the process-wide registry
///
/// # Errors
/// Returns [`RegistryError::AlreadyInstalled`] on a second call
pub fn install_global(registry: ArtifactRegistry) -> Result<Arc<ArtifactRegistry>, RegistryError> {
    let registry = Arc::new(registry);
    GLOBAL
        .set(Arc::clone(&registry))
        .map_err(|_| RegistryError::AlreadyInstalled)?;
    tracing::info!(kinds = registry.len(), "installed global artifact registry");
    Ok(registry)
}

/// The process-wide registry, if installed
#[must_use]
pub fn global_registry() -> Option<Arc<ArtifactRegistry>> {
    GLOBAL.get().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::replace_content;
    use crate::view::View;

    fn definition(kind: ArtifactKind) -> ArtifactDefinition {
        ArtifactDefinition::builder(kind)
            .without_metadata()
            .on_stream_part(replace_content)
            .content(|_| View::placeholder(""))
            .build()
            .unwrap()
    }

    #[test]
    fn registry_new_empty() {
        let registry = ArtifactRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn register_and_resolve() {
        let mut registry = ArtifactRegistry::new();
        registry
            .register(ArtifactKind::TEXT, definition(ArtifactKind::TEXT))
            .unwrap();
        let def = registry.resolve(&ArtifactKind::TEXT).unwrap();
        assert_eq!(def.kind(), &ArtifactKind::TEXT);
    }

    #[test]
    fn duplicate_kind_rejected() {
        let mut registry = ArtifactRegistry::new();
        registry.register_definition(definition(ArtifactKind::SHEET)).unwrap();
        let err = registry
            .register_definition(definition(ArtifactKind::SHEET))
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateKind(ArtifactKind::SHEET));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn mismatched_kind_rejected() {
        let mut registry = ArtifactRegistry::new();
        let err = registry
            .register(ArtifactKind::CODE, definition(ArtifactKind::TEXT))
            .unwrap_err();
        assert!(matches!(err, RegistryError::KindMismatch { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn unknown_kind_leaves_others_intact() {
        let mut registry = ArtifactRegistry::new();
        registry.register_definition(definition(ArtifactKind::TEXT)).unwrap();
        let err = registry.resolve(&ArtifactKind::new("video")).unwrap_err();
        assert_eq!(err, RegistryError::UnknownKind(ArtifactKind::new("video")));
        assert!(registry.resolve(&ArtifactKind::TEXT).is_ok());
    }

    #[test]
    fn kinds_in_registration_order() {
        let mut registry = ArtifactRegistry::new();
        for kind in [ArtifactKind::TEXT, ArtifactKind::CODE, ArtifactKind::SHEET] {
            registry.register_definition(definition(kind)).unwrap();
        }
        let kinds: Vec<_> = registry.kinds().map(ArtifactKind::as_str).collect();
        assert_eq!(kinds, vec!["text", "code", "sheet"]);
    }

    #[test]
    fn global_installs_once() {
        let first = install_global(ArtifactRegistry::new());
        let second = install_global(ArtifactRegistry::new());
        assert!(first.is_ok());
        assert_eq!(second.unwrap_err(), RegistryError::AlreadyInstalled);
        assert!(global_registry().is_some());
    }
}
