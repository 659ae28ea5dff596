use crate::model::document::DocumentModel;
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// TypeRegistryError
///

#[derive(Debug, ThisError)]
pub enum TypeRegistryError {
    #[error("type '{0}' not found")]
    TypeNotFound(String),

    #[error("type '{0}' already registered")]
    TypeAlreadyRegistered(String),
}

///
/// TypeRegistry
///
/// Caller-owned registry of document models. Passed explicitly into every
/// resolver — never a process-wide singleton — so independent resolutions
/// against different registries stay isolated.
///

#[derive(Debug, Default)]
pub struct TypeRegistry {
    models: BTreeMap<String, DocumentModel>,
    /// (base type, stored discriminator value) -> subtype name
    subtypes: BTreeMap<(String, String), String>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document model under its declared name.
    pub fn register(&mut self, model: DocumentModel) -> Result<(), TypeRegistryError> {
        let name = model.name().to_string();
        if self.models.contains_key(&name) {
            return Err(TypeRegistryError::TypeAlreadyRegistered(name));
        }

        if let Some(discriminator) = model.discriminator() {
            self.subtypes.insert(
                (discriminator.base.clone(), discriminator.value.clone()),
                name.clone(),
            );
        }

        self.models.insert(name, model);
        Ok(())
    }

    /// Look up a registered model by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DocumentModel> {
        self.models.get(name)
    }

    /// Look up a registered model by name, failing loudly.
    pub fn try_get(&self, name: &str) -> Result<&DocumentModel, TypeRegistryError> {
        self.models
            .get(name)
            .ok_or_else(|| TypeRegistryError::TypeNotFound(name.to_string()))
    }

    /// Resolve the subtype registered for a stored discriminator value.
    #[must_use]
    pub fn subtype_for(&self, base: &str, stored_value: &str) -> Option<&DocumentModel> {
        let name = self
            .subtypes
            .get(&(base.to_string(), stored_value.to_string()))?;

        self.models.get(name)
    }

    /// Iterate registered models in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DocumentModel)> {
        self.models
            .iter()
            .map(|(name, model)| (name.as_str(), model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::field::FieldKind;

    fn media_models() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry
            .register(
                DocumentModel::new("media", "_id")
                    .field("_id", FieldKind::Uint)
                    .field("kind", FieldKind::Text)
                    .with_discriminator_key("kind"),
            )
            .expect("base model registration should succeed");
        registry
            .register(
                DocumentModel::new("media.image", "_id")
                    .field("_id", FieldKind::Uint)
                    .field("width", FieldKind::Uint)
                    .discriminated_as("media", "image"),
            )
            .expect("subtype registration should succeed");

        registry
    }

    #[test]
    fn subtype_lookup_resolves_stored_value() {
        let registry = media_models();
        let subtype = registry
            .subtype_for("media", "image")
            .expect("registered discriminator value should resolve");
        assert_eq!(subtype.name(), "media.image");
    }

    #[test]
    fn unknown_discriminator_value_resolves_to_none() {
        let registry = media_models();
        assert!(registry.subtype_for("media", "hologram").is_none());
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = media_models();
        let err = registry
            .register(DocumentModel::new("media", "_id"))
            .expect_err("duplicate registration should fail");
        assert!(matches!(err, TypeRegistryError::TypeAlreadyRegistered(name) if name == "media"));
    }

    #[test]
    fn missing_type_lookup_fails_loudly() {
        let registry = TypeRegistry::new();
        let err = registry
            .try_get("ghost")
            .expect_err("missing type should fail lookup");
        assert!(matches!(err, TypeRegistryError::TypeNotFound(name) if name == "ghost"));
    }
}
