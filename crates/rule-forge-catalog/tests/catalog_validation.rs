// rule-forge-catalog/tests/catalog_validation.rs
// ============================================================================
// Module: Catalog Validation Tests
// Description: Tests for catalog integrity checks and rejection paths.
// Purpose: Ensure catalog documents fail closed on malformed definitions.
// Dependencies: rule-forge-catalog, rule-forge-core, serde_json
// ============================================================================
//! ## Overview
//! Exercises every catalog integrity error and the success path through
//! `into_registry`.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]

use rule_forge_catalog::CatalogDocument;
use rule_forge_catalog::CatalogError;
use serde_json::json;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a minimal valid catalog as JSON text.
fn valid_catalog() -> serde_json::Value {
    json!({
        "triggers": [
            {"id": "hand_played", "objectUsers": ["joker"]},
        ],
        "conditions": [
            {
                "id": "contains_pair",
                "applicableTriggers": ["hand_played"],
                "objectUsers": ["joker"],
            },
        ],
        "effects": [
            {
                "id": "add_mult",
                "objectUsers": ["joker"],
                "params": [
                    {"id": "amount", "type": "number", "min": 0, "max": 100, "default": 4},
                ],
            },
        ],
    })
}

/// Parses a catalog document from a JSON value.
fn parse(value: serde_json::Value) -> CatalogDocument {
    CatalogDocument::from_json_str(&value.to_string()).unwrap()
}

// ============================================================================
// SECTION: Success Path
// ============================================================================

#[test]
fn valid_catalog_produces_a_registry() {
    let registry = parse(valid_catalog()).into_registry().unwrap();
    assert!(registry.trigger(&"hand_played".into()).is_ok());
    assert!(registry.condition_type(&"contains_pair".into()).is_ok());
    assert!(registry.effect_type(&"add_mult".into()).is_ok());
}

// ============================================================================
// SECTION: Duplicate Identifiers
// ============================================================================

#[test]
fn duplicate_trigger_ids_are_rejected() {
    let mut catalog = valid_catalog();
    let triggers = catalog["triggers"].as_array_mut().unwrap();
    triggers.push(triggers[0].clone());

    let err = parse(catalog).validate().unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateTrigger(id) if id == "hand_played"));
}

#[test]
fn duplicate_parameter_ids_are_rejected() {
    let mut catalog = valid_catalog();
    let params = catalog["effects"][0]["params"].as_array_mut().unwrap();
    params.push(params[0].clone());

    let err = parse(catalog).validate().unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateParameter { param, .. } if param == "amount"));
}

// ============================================================================
// SECTION: Cross-References
// ============================================================================

#[test]
fn unknown_applicable_trigger_is_rejected() {
    let mut catalog = valid_catalog();
    catalog["conditions"][0]["applicableTriggers"] = json!(["no_such_trigger"]);

    let err = parse(catalog).validate().unwrap_err();
    assert!(matches!(
        err,
        CatalogError::UnknownApplicableTrigger { trigger, .. } if trigger == "no_such_trigger"
    ));
}

#[test]
fn dangling_show_when_is_rejected() {
    let mut catalog = valid_catalog();
    catalog["effects"][0]["params"][0]["showWhen"] =
        json!({"parameter": "ghost", "values": ["on"]});

    let err = parse(catalog).validate().unwrap_err();
    assert!(matches!(err, CatalogError::DanglingShowWhen { target, .. } if target == "ghost"));
}

#[test]
fn empty_object_users_are_rejected() {
    let mut catalog = valid_catalog();
    catalog["triggers"][0]["objectUsers"] = json!([]);

    let err = parse(catalog).validate().unwrap_err();
    assert!(matches!(err, CatalogError::EmptyObjectUsers(id) if id == "hand_played"));
}

// ============================================================================
// SECTION: Parameter Shape
// ============================================================================

#[test]
fn checkbox_on_a_condition_type_is_rejected() {
    let mut catalog = valid_catalog();
    catalog["conditions"][0]["params"] = json!([{"id": "flag", "type": "checkbox"}]);

    let err = parse(catalog).validate().unwrap_err();
    assert!(matches!(err, CatalogError::CheckboxOnCondition { param, .. } if param == "flag"));
}

#[test]
fn select_without_options_is_rejected() {
    let mut catalog = valid_catalog();
    catalog["effects"][0]["params"] = json!([{"id": "mode", "type": "select"}]);

    let err = parse(catalog).validate().unwrap_err();
    assert!(matches!(err, CatalogError::MissingOptions { param, .. } if param == "mode"));
}

#[test]
fn inverted_range_is_rejected() {
    let mut catalog = valid_catalog();
    catalog["effects"][0]["params"][0]["min"] = json!(10);
    catalog["effects"][0]["params"][0]["max"] = json!(1);

    let err = parse(catalog).validate().unwrap_err();
    assert!(matches!(err, CatalogError::InvalidRange { param, .. } if param == "amount"));
}

#[test]
fn static_default_outside_options_is_rejected() {
    let mut catalog = valid_catalog();
    catalog["effects"][0]["params"] = json!([{
        "id": "mode",
        "type": "select",
        "default": "ghost",
        "options": {
            "kind": "static",
            "options": [
                {"value": "set"},
                {"value": "add"},
            ],
        },
    }]);

    let err = parse(catalog).validate().unwrap_err();
    assert!(matches!(err, CatalogError::DefaultOutsideOptions { param, .. } if param == "mode"));
}

#[test]
fn default_inside_static_options_is_accepted() {
    let mut catalog = valid_catalog();
    catalog["effects"][0]["params"] = json!([{
        "id": "mode",
        "type": "select",
        "default": "set",
        "options": {
            "kind": "static",
            "options": [
                {"value": "set"},
                {"value": "add"},
            ],
        },
    }]);
    assert!(parse(catalog).validate().is_ok());
}
