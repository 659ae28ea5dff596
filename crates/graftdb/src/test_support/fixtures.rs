//! Shared fixture models and builders for engine tests.

use crate::core::{
    document::Document,
    model::{DocumentModel, FieldKind, FieldModel, TypeRegistry, VirtualModel},
    record,
    record::Record,
    value::Value,
};

/// The standard test registry: static, dynamic, virtual, embedded-array, and
/// discriminated reference declarations in one place.
pub(crate) fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();

    let models = vec![
        DocumentModel::new("author", "_id")
            .field("_id", FieldKind::Uint)
            .field("name", FieldKind::Text),
        DocumentModel::new("post", "_id")
            .field("_id", FieldKind::Uint)
            .field("title", FieldKind::Text)
            .field("author", FieldKind::reference("author"))
            .field(
                "co_authors",
                FieldKind::List(Box::new(FieldKind::reference("author"))),
            )
            .field("attachment", FieldKind::reference("media"))
            .field("mystery", FieldKind::reference("phantom")),
        DocumentModel::new("team", "_id")
            .field("_id", FieldKind::Uint)
            .field("name", FieldKind::Text)
            .field("captain", FieldKind::reference("player")),
        DocumentModel::new("player", "_id")
            .field("_id", FieldKind::Uint)
            .field("name", FieldKind::Text)
            .field("team", FieldKind::reference("team")),
        DocumentModel::new("user", "_id")
            .field("_id", FieldKind::Uint)
            .field("name", FieldKind::Text)
            .with_virtual(VirtualModel::new("children", "child", "_id", "owner_id"))
            .with_virtual(VirtualModel::new("children_count", "child", "_id", "owner_id").counted())
            .with_virtual(VirtualModel::new("profile", "profile", "_id", "user_id").single()),
        DocumentModel::new("child", "_id")
            .field("_id", FieldKind::Uint)
            .field("owner_id", FieldKind::Uint)
            .field("name", FieldKind::Text),
        DocumentModel::new("profile", "_id")
            .field("_id", FieldKind::Uint)
            .field("user_id", FieldKind::Uint)
            .field("bio", FieldKind::Text),
        DocumentModel::new("media", "_id")
            .field("_id", FieldKind::Uint)
            .field("kind", FieldKind::Text)
            .field("url", FieldKind::Text)
            .with_discriminator_key("kind"),
        DocumentModel::new("media.image", "_id")
            .field("_id", FieldKind::Uint)
            .field("kind", FieldKind::Text)
            .field("url", FieldKind::Text)
            .field("width", FieldKind::Uint)
            .discriminated_as("media", "image"),
        DocumentModel::new("media.video", "_id")
            .field("_id", FieldKind::Uint)
            .field("kind", FieldKind::Text)
            .field("url", FieldKind::Text)
            .field("duration", FieldKind::Uint)
            .discriminated_as("media", "video"),
        DocumentModel::new("media.audio", "_id")
            .field("_id", FieldKind::Uint)
            .field("kind", FieldKind::Text)
            .field("url", FieldKind::Text)
            .field("bitrate", FieldKind::Uint)
            .discriminated_as("media", "audio"),
        DocumentModel::new("activity", "_id")
            .field("_id", FieldKind::Uint)
            .field("subject", FieldKind::reference_via("subject_kind"))
            .field("subject_kind", FieldKind::Text)
            .field(
                "items",
                FieldKind::List(Box::new(FieldKind::reference_via("item_kinds"))),
            )
            .field("item_kinds", FieldKind::List(Box::new(FieldKind::Text))),
        DocumentModel::new("order", "_id")
            .field("_id", FieldKind::Uint)
            .field(
                "items",
                FieldKind::List(Box::new(FieldKind::Record(vec![
                    FieldModel::new("product", FieldKind::reference("product")),
                    FieldModel::new("qty", FieldKind::Uint),
                ]))),
            ),
        DocumentModel::new("product", "_id")
            .field("_id", FieldKind::Uint)
            .field("name", FieldKind::Text),
    ];

    for model in models {
        registry
            .register(model)
            .expect("fixture model registration should succeed");
    }

    registry
}

pub(crate) fn author_record(id: u64, name: &str) -> Record {
    record! { "_id" => id, "name" => name }
}

pub(crate) fn post_doc(id: u64, author_id: u64) -> Document {
    Document::new("post", record! { "_id" => id, "author" => author_id })
}

pub(crate) fn user_doc(id: u64) -> Document {
    Document::new("user", record! { "_id" => id })
}

pub(crate) fn child_record(id: u64, owner_id: u64, name: &str) -> Record {
    record! { "_id" => id, "owner_id" => owner_id, "name" => name }
}

pub(crate) fn media_record(id: u64, kind: &str) -> Record {
    let mut record = record! { "_id" => id, "kind" => kind, "url" => format!("/m/{id}") };
    match kind {
        "image" => record.set("width", 640u64),
        "video" => record.set("duration", 90u64),
        "audio" => record.set("bitrate", 128u64),
        _ => {}
    }

    record
}

pub(crate) fn attached_names(doc: &Document, path: &str) -> Vec<Option<String>> {
    match doc.get_path(path) {
        Some(Value::List(items)) => items
            .iter()
            .map(|item| {
                item.as_doc()
                    .and_then(|doc| doc.get("name"))
                    .and_then(|name| name.as_text().map(ToString::to_string))
            })
            .collect(),
        Some(Value::Doc(doc)) => vec![
            doc.get("name")
                .and_then(|name| name.as_text().map(ToString::to_string)),
        ],
        _ => Vec::new(),
    }
}
