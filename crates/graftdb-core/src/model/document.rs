use crate::{
    document::Document,
    model::{
        field::{FieldKind, FieldModel, value_label},
        relation::{Discriminator, VirtualModel},
    },
    record::Record,
};
use thiserror::Error as ThisError;

///
/// HydrationError
///
/// A fetched record cannot be instantiated as its target type.
///

#[derive(Debug, ThisError)]
pub enum HydrationError {
    #[error("field '{field}' on '{type_name}' is not {expected}: found {found}")]
    FieldTypeMismatch {
        type_name: String,
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

///
/// DocumentModel
/// Runtime model for one document type.
///

#[derive(Clone, Debug)]
pub struct DocumentModel {
    /// Stable external name used in registries and fetch routing.
    name: String,
    /// Primary key field name.
    primary_key: String,
    /// Ordered field list (authoritative for descriptor resolution).
    fields: Vec<FieldModel>,
    /// Computed relations keyed by name.
    virtuals: Vec<VirtualModel>,
    /// Field carrying the stored subtype marker (set on base types).
    discriminator_key: Option<String>,
    /// Subtype declaration (set on discriminator children).
    discriminator: Option<Discriminator>,
}

impl DocumentModel {
    #[must_use]
    pub fn new(name: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: primary_key.into(),
            fields: Vec::new(),
            virtuals: Vec::new(),
            discriminator_key: None,
            discriminator: None,
        }
    }

    ///
    /// CONSTRUCTION
    ///

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldModel::new(name, kind));
        self
    }

    #[must_use]
    pub fn with_virtual(mut self, relation: VirtualModel) -> Self {
        self.virtuals.push(relation);
        self
    }

    #[must_use]
    pub fn with_discriminator_key(mut self, key: impl Into<String>) -> Self {
        self.discriminator_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn discriminated_as(mut self, base: impl Into<String>, value: impl Into<String>) -> Self {
        self.discriminator = Some(Discriminator {
            base: base.into(),
            value: value.into(),
        });
        self
    }

    ///
    /// ACCESS
    ///

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldModel] {
        &self.fields
    }

    #[must_use]
    pub fn field_named(&self, name: &str) -> Option<&FieldModel> {
        self.fields.iter().find(|field| field.name() == name)
    }

    #[must_use]
    pub fn virtual_named(&self, name: &str) -> Option<&VirtualModel> {
        self.virtuals.iter().find(|relation| relation.name() == name)
    }

    #[must_use]
    pub fn discriminator_key(&self) -> Option<&str> {
        self.discriminator_key.as_deref()
    }

    #[must_use]
    pub const fn discriminator(&self) -> Option<&Discriminator> {
        self.discriminator.as_ref()
    }

    ///
    /// HYDRATION
    ///

    /// Construct a typed document from a raw record.
    ///
    /// Every record field the model declares must satisfy its declared kind.
    /// Model fields absent from the record are tolerated (projection may have
    /// dropped them), as are record fields the model never declared.
    pub fn hydrate(&self, record: Record) -> Result<Document, HydrationError> {
        for field in &self.fields {
            if let Some(value) = record.get(field.name())
                && !field.kind().matches(value)
            {
                return Err(HydrationError::FieldTypeMismatch {
                    type_name: self.name.clone(),
                    field: field.name().to_string(),
                    expected: field.kind().label(),
                    found: value_label(value),
                });
            }
        }

        Ok(Document::new(self.name.clone(), record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{record, value::Value};

    fn author_model() -> DocumentModel {
        DocumentModel::new("author", "_id")
            .field("_id", FieldKind::Uint)
            .field("name", FieldKind::Text)
    }

    #[test]
    fn hydrate_accepts_conforming_record() {
        let doc = author_model()
            .hydrate(record! { "_id" => 10u64, "name" => "A" })
            .expect("conforming record hydrates");

        assert_eq!(doc.type_name(), "author");
        assert_eq!(doc.get("name"), Some(&Value::Text("A".into())));
        assert!(doc.populated_paths().is_empty());
    }

    #[test]
    fn hydrate_tolerates_projected_and_extra_fields() {
        let doc = author_model()
            .hydrate(record! { "_id" => 10u64, "stray" => true })
            .expect("projection and extras are tolerated");

        assert!(doc.get("name").is_none());
        assert_eq!(doc.get("stray"), Some(&Value::Bool(true)));
    }

    #[test]
    fn hydrate_rejects_field_type_mismatch() {
        let err = author_model()
            .hydrate(record! { "_id" => 10u64, "name" => 42u64 })
            .expect_err("text field holding a uint must fail");

        let HydrationError::FieldTypeMismatch {
            field,
            expected,
            found,
            ..
        } = err;
        assert_eq!(field, "name");
        assert_eq!(expected, "text");
        assert_eq!(found, "uint");
    }
}
