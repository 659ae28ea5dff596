use crate::core::model::{DocumentModel, FieldKind, FieldModel};

///
/// ReferenceDescriptor
///
/// How one path on one container type relates to other documents. Resolved
/// once per extraction pass from field metadata — never by sniffing runtime
/// values — and immutable afterward.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReferenceDescriptor {
    /// Stored key(s) against a statically-named target type.
    Static { target: String },
    /// Stored key(s) whose target type is read per-document (and, for
    /// arrays, per-element) from the field at `type_field`.
    DynamicByField { type_field: String },
    /// Computed join: `local_field` values matched against `foreign_field`
    /// on `target`; nothing is stored under the path itself.
    Virtual {
        target: String,
        local_field: String,
        foreign_field: String,
        just_one: bool,
        count: bool,
    },
}

/// Resolve how `path` is declared on `model`.
///
/// Returns `None` for unknown or non-reference paths — those are tolerated
/// and dropped from the active plan for documents of this type. A plan-level
/// target override turns any existing field into a static reference.
#[must_use]
pub fn resolve_descriptor(
    model: &DocumentModel,
    path: &str,
    target_override: Option<&str>,
) -> Option<ReferenceDescriptor> {
    if let Some(field) = walk_fields(model.fields(), path) {
        if let Some(target) = target_override {
            return Some(ReferenceDescriptor::Static {
                target: target.to_string(),
            });
        }

        return terminal_reference(field.kind());
    }

    // no real field under that name: check the container's computed relations
    model
        .virtual_named(path)
        .map(|relation| ReferenceDescriptor::Virtual {
            target: relation.target().to_string(),
            local_field: relation.local_field().to_string(),
            foreign_field: relation.foreign_field().to_string(),
            just_one: relation.just_one(),
            count: relation.count(),
        })
}

// Walk field metadata along a dotted path, descending through embedded
// records and flattening one array-of-records level.
fn walk_fields<'a>(mut fields: &'a [FieldModel], path: &str) -> Option<&'a FieldModel> {
    let mut segments = path.split('.').peekable();

    while let Some(segment) = segments.next() {
        let field = fields.iter().find(|field| field.name() == segment)?;
        if segments.peek().is_none() {
            return Some(field);
        }

        fields = match field.kind() {
            FieldKind::Record(inner) => inner,
            FieldKind::List(element) => match element.as_ref() {
                FieldKind::Record(inner) => inner,
                _ => return None,
            },
            _ => return None,
        };
    }

    None
}

// The reference declaration of a terminal field, looking through one level
// of array nesting for array-valued references.
fn terminal_reference(kind: &FieldKind) -> Option<ReferenceDescriptor> {
    match kind {
        FieldKind::Ref { target } => Some(ReferenceDescriptor::Static {
            target: target.clone(),
        }),
        FieldKind::RefVia { type_field } => Some(ReferenceDescriptor::DynamicByField {
            type_field: type_field.clone(),
        }),
        FieldKind::List(element) => terminal_reference(element),
        _ => None,
    }
}
