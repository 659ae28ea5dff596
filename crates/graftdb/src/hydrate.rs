use crate::core::{
    document::Document,
    model::{DocumentModel, HydrationError, TypeRegistry},
    record::Record,
    value::Value,
};

/// Hydrate one fetched record as `expected`, honoring discriminators.
///
/// When the expected model declares a discriminator key and the record's
/// stored value under it maps to a registered subtype, the subtype's
/// hydration runs instead. Unmapped discriminator values degrade gracefully
/// to the expected base type; a record violating its chosen model's field
/// kinds is a hard error.
pub fn hydrate(
    registry: &TypeRegistry,
    expected: &DocumentModel,
    record: Record,
) -> Result<Document, HydrationError> {
    if let Some(key_field) = expected.discriminator_key()
        && let Some(Value::Text(stored)) = record.get(key_field)
        && let Some(subtype) = registry.subtype_for(expected.name(), stored)
    {
        return subtype.hydrate(record);
    }

    expected.hydrate(record)
}
