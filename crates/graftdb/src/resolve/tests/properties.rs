use crate::{
    core::{document::Document, record, value::Value},
    obs,
    plan::PlanSpec,
    resolve::{Resolver, tests::resolve},
    test_support::{MemorySource, fixtures},
};

#[test]
fn repopulation_is_idempotent_and_fetch_free() {
    let registry = fixtures::registry();
    let mut source = MemorySource::new();
    source.insert("author", vec![fixtures::author_record(10, "A")]);

    let docs = resolve(
        &registry,
        &source,
        vec![fixtures::post_doc(1, 10)],
        "author",
    );
    assert_eq!(source.call_count(), 1);

    let again = resolve(&registry, &source, docs.clone(), "author");
    assert_eq!(
        source.call_count(),
        1,
        "populated paths short-circuit extraction"
    );
    assert_eq!(again, docs, "no double-wrapping on re-resolution");
}

#[test]
fn force_re_resolves_through_attached_documents() {
    let registry = fixtures::registry();
    let mut source = MemorySource::new();
    source.insert("author", vec![fixtures::author_record(10, "A")]);

    let docs = resolve(
        &registry,
        &source,
        vec![fixtures::post_doc(1, 10)],
        "author",
    );
    let docs = resolve(&registry, &source, docs, PlanSpec::new("author").force());

    assert_eq!(
        source.call_count(),
        2,
        "force re-extracts keys from the attached documents"
    );
    assert_eq!(
        fixtures::attached_names(&docs[0], "author"),
        vec![Some("A".to_string())]
    );
}

#[test]
fn array_cardinality_is_preserved_with_null_holes() {
    let registry = fixtures::registry();
    let mut source = MemorySource::new();
    source.insert(
        "author",
        vec![
            fixtures::author_record(10, "A"),
            fixtures::author_record(20, "B"),
        ],
    );

    let post = Document::new(
        "post",
        record! {
            "_id" => 1u64,
            "co_authors" => vec![Value::Uint(10), Value::Uint(99), Value::Uint(20)],
        },
    );
    let docs = resolve(&registry, &source, vec![post], "co_authors");

    let attached = docs[0]
        .get("co_authors")
        .and_then(Value::as_list)
        .expect("array stays an array");
    assert_eq!(attached.len(), 3, "positions are preserved");
    assert!(attached[0].as_doc().is_some());
    assert_eq!(attached[1], Value::Null, "unresolved position nulls out");
    assert!(attached[2].as_doc().is_some());
}

#[test]
fn hundred_owners_of_one_target_deduplicate_to_one_key() {
    let registry = fixtures::registry();
    let mut source = MemorySource::new();
    source.insert("author", vec![fixtures::author_record(10, "A")]);

    let posts: Vec<Document> = (1u64..=100).map(|id| fixtures::post_doc(id, 10)).collect();
    let docs = resolve(&registry, &source, posts, "author");

    let calls = source.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].keys.len(), 1);
    assert!(
        docs.iter()
            .all(|doc| fixtures::attached_names(doc, "author") == vec![Some("A".to_string())])
    );
}

#[test]
fn per_owner_skip_and_limit_window() {
    let registry = fixtures::registry();
    let mut source = MemorySource::new();
    source.insert(
        "child",
        vec![
            fixtures::child_record(1, 1, "a"),
            fixtures::child_record(2, 1, "b"),
            fixtures::child_record(3, 1, "c"),
        ],
    );

    let docs = resolve(
        &registry,
        &source,
        vec![fixtures::user_doc(1)],
        PlanSpec::new("children").skip(1).limit(1),
    );

    assert_eq!(
        fixtures::attached_names(&docs[0], "children"),
        vec![Some("b".to_string())]
    );
}

#[test]
fn depopulate_restores_raw_keys_and_clears_markers() {
    let registry = fixtures::registry();
    let mut source = MemorySource::new();
    source.insert("author", vec![fixtures::author_record(10, "A")]);
    source.insert(
        "child",
        vec![fixtures::child_record(1, 1, "a")],
    );

    let mut post = resolve(
        &registry,
        &source,
        vec![fixtures::post_doc(1, 10)],
        "author",
    )
    .pop()
    .expect("one document out");

    assert!(post.depopulate("author", &registry));
    assert_eq!(post.get("author"), Some(&Value::Uint(10)));
    assert!(!post.is_populated("author"));
    assert!(!post.depopulate("author", &registry), "second call is a no-op");

    // virtual paths are removed outright
    let mut user = resolve(&registry, &source, vec![fixtures::user_doc(1)], "children")
        .pop()
        .expect("one document out");
    assert!(user.depopulate("children", &registry));
    assert!(user.get("children").is_none());
}

#[test]
fn metrics_account_for_batches_keys_and_grafts() {
    let registry = fixtures::registry();
    let mut source = MemorySource::new();
    source.insert(
        "author",
        vec![
            fixtures::author_record(10, "A"),
            fixtures::author_record(20, "B"),
        ],
    );

    obs::metrics_reset_all();
    resolve(
        &registry,
        &source,
        vec![
            fixtures::post_doc(1, 10),
            fixtures::post_doc(2, 20),
            fixtures::post_doc(3, 10),
        ],
        "author",
    );

    let report = obs::metrics_report();
    assert_eq!(report.resolve_calls, 1);
    assert_eq!(report.batches_issued, 1);
    assert_eq!(report.distinct_keys, 2);
    assert_eq!(report.records_fetched, 2);
    assert_eq!(report.records_hydrated, 2);
    assert_eq!(report.documents_grafted, 3);
    assert_eq!(report.documents_resolved, 3);

    let author = report
        .targets
        .get("author")
        .expect("per-target counters accumulate");
    assert_eq!(author.batches_issued, 1);
}

#[test]
fn independent_resolvers_share_no_state() {
    let registry_a = fixtures::registry();
    let registry_b = fixtures::registry();
    let mut source_a = MemorySource::new();
    let mut source_b = MemorySource::new();
    source_a.insert("author", vec![fixtures::author_record(10, "A")]);
    source_b.insert("author", vec![fixtures::author_record(10, "Z")]);

    let docs_a = Resolver::new(&registry_a, &source_a)
        .resolve_many(vec![fixtures::post_doc(1, 10)], "author")
        .expect("resolver A succeeds");
    let docs_b = Resolver::new(&registry_b, &source_b)
        .resolve_many(vec![fixtures::post_doc(1, 10)], "author")
        .expect("resolver B succeeds");

    assert_eq!(
        fixtures::attached_names(&docs_a[0], "author"),
        vec![Some("A".to_string())]
    );
    assert_eq!(
        fixtures::attached_names(&docs_b[0], "author"),
        vec![Some("Z".to_string())]
    );
}
