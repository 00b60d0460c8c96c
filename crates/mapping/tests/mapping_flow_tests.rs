//! End-to-end mapping flows through the public API.
//!
//! Covers the editor loop a user goes through: extract both samples,
//! auto-map, adjust, preview locally, build the remote payloads, undo.

use serde_json::json;
use tower_mapping::{
    DEFAULT_MAX_DEPTH, FieldType, MappingStore, SaveMappingsPayload, TestMappingsRequest,
    TransformId, ValidationWarning, auto_map, extract_pair, missing_required, render,
};

#[test]
fn test_price_string_maps_with_parse_float() {
    let source_doc = json!({"price": "19.99", "product_name": "Desk"});
    let target_doc = json!({"price": 0.0, "name": "", "sku": ""});
    let (source, target) = extract_pair(&source_doc, &target_doc, DEFAULT_MAX_DEPTH).unwrap();

    assert_eq!(source[0].field_type, FieldType::String);
    assert_eq!(target[0].field_type, FieldType::Number);

    let mut store = MappingStore::new();
    let proposals = auto_map(&source, &target, store.mappings());
    store.apply_proposals(proposals);

    let price = store.for_target(&target[0].id).unwrap();
    assert_eq!(price.source_field, source[0].id);
    assert_eq!(price.transform, Some(TransformId::ParseFloat));

    let preview = render(&source_doc, store.mappings(), &source, &target);
    assert_eq!(preview.target["price"], json!(19.99));
    assert_eq!(preview.target["name"], json!("Desk"));
}

#[test]
fn test_required_target_warns_but_still_saves() {
    let (source, target) = extract_pair(
        &json!({"name": "Desk"}),
        &json!({"name": "", "sku": ""}),
        DEFAULT_MAX_DEPTH,
    )
    .unwrap();
    let mut store = MappingStore::new();
    store.apply_proposals(auto_map(&source, &target, &[]));

    let warnings = missing_required(&target, store.mappings());
    assert_eq!(
        warnings,
        vec![ValidationWarning::MissingRequired {
            field: target[1].id.clone(),
            path: "sku".to_string(),
        }]
    );

    let payload =
        SaveMappingsPayload::build("conn-1", "shopify", "erp", store.mappings(), &source, &target)
            .unwrap();
    assert_eq!(payload.mappings.len(), 1);
}

#[test]
fn test_auto_map_is_one_undo_step() {
    let (source, target) = extract_pair(
        &json!({"name": "a", "code": "b"}),
        &json!({"name": "", "code": ""}),
        DEFAULT_MAX_DEPTH,
    )
    .unwrap();
    let mut store = MappingStore::new();
    store.add(source[0].id.clone(), target[0].id.clone());
    store.apply_proposals(auto_map(&source, &target, store.mappings()));
    assert_eq!(store.len(), 2);

    assert!(store.undo());
    assert_eq!(store.len(), 1);
    assert!(store.undo());
    assert!(store.is_empty());
    assert!(!store.undo());
}

#[test]
fn test_test_request_hash_ignores_mapping_ids() {
    let (source, target) = extract_pair(
        &json!({"title": "Desk"}),
        &json!({"name": ""}),
        DEFAULT_MAX_DEPTH,
    )
    .unwrap();

    let mut first = MappingStore::new();
    first.add(source[0].id.clone(), target[0].id.clone());
    let mut second = MappingStore::new();
    second.add(source[0].id.clone(), target[0].id.clone());
    second.clear();
    second.add(source[0].id.clone(), target[0].id.clone());

    let a = TestMappingsRequest::build("c", "s", "t", first.mappings(), &source, &target).unwrap();
    let b = TestMappingsRequest::build("c", "s", "t", second.mappings(), &source, &target).unwrap();

    assert_ne!(first.mappings()[0].id, second.mappings()[0].id);
    assert_eq!(a.content_hash().unwrap(), b.content_hash().unwrap());
}
