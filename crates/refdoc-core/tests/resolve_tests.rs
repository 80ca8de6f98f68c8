use std::rc::Rc;

use serde_json::json;

use refdoc_core::ResolveError;
use refdoc_core::resolve::{Chased, DerefSchema, SpecStore};
use refdoc_core::spec::schema::SchemaOrRef;

const MUSEUM: &str = include_str!("fixtures/museum.yaml");
const CIRCULAR: &str = include_str!("fixtures/circular.yaml");

fn store(yaml: &str) -> SpecStore {
    let value: serde_json::Value = serde_yaml_ng::from_str(yaml).unwrap();
    SpecStore::new(value)
}

#[test]
fn repeated_resolution_returns_the_cached_object() {
    let store = store(MUSEUM);
    let first = store.by_pointer("#/components/schemas/Event").unwrap();
    let second = store.by_pointer("#/components/schemas/Event").unwrap();
    assert!(Rc::ptr_eq(&first, &second));

    // A different pointer gets its own cache entry.
    let other = store.by_pointer("#/components/schemas/EventInput").unwrap();
    assert!(!Rc::ptr_eq(&first, &other));
}

#[test]
fn unresolved_pointer_names_the_pointer() {
    let store = store(MUSEUM);
    match store.by_pointer("#/components/schemas/Missing") {
        Err(ResolveError::UnresolvedRef(pointer)) => {
            assert_eq!(pointer, "#/components/schemas/Missing");
        }
        other => panic!("expected UnresolvedRef, got {other:?}"),
    }
}

#[test]
fn escaped_path_tokens_resolve() {
    let store = store(MUSEUM);
    let get_op = store
        .by_pointer("#/paths/~1tickets~1{ticketId}/get/operationId")
        .unwrap();
    assert_eq!(*get_op, json!("getTicket"));
}

#[test]
fn external_document_resolution() {
    let mut store = SpecStore::new(json!({"openapi": "3.0.3"}));
    store.add_external(
        "common.yaml",
        json!({"components": {"schemas": {"Error": {"type": "object"}}}}),
    );

    let error_schema = store
        .by_pointer("common.yaml#/components/schemas/Error")
        .unwrap();
    assert_eq!(error_schema["type"], json!("object"));

    match store.by_pointer("missing.yaml#/components/schemas/Error") {
        Err(ResolveError::UnknownDocument(name)) => assert_eq!(name, "missing.yaml"),
        other => panic!("expected UnknownDocument, got {other:?}"),
    }
}

#[test]
fn reference_cycle_yields_a_marker_not_overflow() {
    let store = store(CIRCULAR);
    match store.chase("#/components/schemas/Looper").unwrap() {
        Chased::Circular { pointer } => {
            assert_eq!(pointer, "#/components/schemas/Looper");
        }
        Chased::Value { .. } => panic!("cycle should be detected"),
    }

    // The typed schema dereference applies the same policy.
    let schema_ref = SchemaOrRef::Ref {
        ref_path: "#/components/schemas/Looper".to_string(),
    };
    match store.deref_schema(&schema_ref).unwrap() {
        DerefSchema::Circular { pointer } => {
            assert_eq!(pointer, "#/components/schemas/Looper");
        }
        DerefSchema::Schema { .. } => panic!("cycle should be detected"),
    }
}

#[test]
fn ref_chain_resolves_to_the_terminal_schema() {
    let store = store(CIRCULAR);
    let schema_ref = SchemaOrRef::Ref {
        ref_path: "#/components/schemas/Node".to_string(),
    };
    match store.deref_schema(&schema_ref).unwrap() {
        DerefSchema::Schema { schema, pointer } => {
            assert_eq!(pointer.as_deref(), Some("#/components/schemas/Node"));
            assert_eq!(schema.properties.len(), 3);
        }
        DerefSchema::Circular { .. } => panic!("Node is not itself a ref cycle"),
    }
}
