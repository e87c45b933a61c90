// rule-forge-core/tests/visibility_options.rs
// ============================================================================
// Module: Visibility and Option Resolution Tests
// Description: Tests for showWhen gating and option source dispatch.
// Purpose: Pin value retention, exempt filtering, and resolver errors.
// Dependencies: rule-forge-core, serde_json
// ============================================================================
//! ## Overview
//! Exercises visibility gating with value retention across toggles, and the
//! three option sources (static, computed, derived) including exemption
//! filtering and the defined errors for hidden parameters and missing
//! resolvers.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]

mod common;

use rule_forge_core::EffectSlot;
use rule_forge_core::NodeId;
use rule_forge_core::OptionError;
use rule_forge_core::ParamId;
use rule_forge_core::ParamValues;
use rule_forge_core::ParameterKind;
use rule_forge_core::RulePatch;
use rule_forge_core::TypeDefinition;
use rule_forge_core::ValueCell;
use rule_forge_core::apply_patch;
use rule_forge_core::is_visible;
use rule_forge_core::resolve_options;
use rule_forge_core::visible_params;

// ============================================================================
// SECTION: Visibility
// ============================================================================

#[test]
fn parameter_without_gate_is_always_visible() {
    let registry = common::registry();
    let definition = registry.effect_type(&"add_mult".into()).unwrap();
    let amount = definition.param(&ParamId::from("amount")).unwrap();
    assert!(is_visible(amount, &ParamValues::new()));
}

#[test]
fn gate_opens_only_for_listed_sibling_values() {
    let registry = common::registry();
    let definition = registry.effect_type(&"set_counter".into()).unwrap();
    let value = definition.param(&ParamId::from("value")).unwrap();

    let mut siblings = ParamValues::new();
    assert!(!is_visible(value, &siblings));

    siblings.insert(ParamId::from("mode"), ValueCell::string("set"));
    assert!(is_visible(value, &siblings));

    siblings.insert(ParamId::from("mode"), ValueCell::string("reset"));
    assert!(!is_visible(value, &siblings));
}

#[test]
fn gate_coerces_sibling_values_to_strings() {
    let registry = common::registry();
    let definition = registry.effect_type(&"set_counter".into()).unwrap();
    let value = definition.param(&ParamId::from("value")).unwrap();

    // A variable reference coerces to its key for the membership test.
    let mut siblings = ParamValues::new();
    siblings.insert(ParamId::from("mode"), ValueCell::variable("counter", "add"));
    assert!(is_visible(value, &siblings));
}

#[test]
fn visible_params_preserves_declaration_order() {
    let registry = common::registry();
    let definition = registry.effect_type(&"set_counter".into()).unwrap();

    let mut siblings = ParamValues::new();
    siblings.insert(ParamId::from("mode"), ValueCell::string("add"));
    let visible: Vec<&str> = visible_params(definition.params(), &siblings)
        .iter()
        .map(|param| param.id.as_str())
        .collect();
    assert_eq!(visible, vec!["mode", "value", "bonus"]);
}

#[test]
fn toggling_visibility_retains_the_stored_value() {
    let mut rule = common::pair_rule();
    let mut counter = common::effect("e9", "set_counter");
    counter.params.insert(ParamId::from("mode"), ValueCell::string("set"));
    counter.params.insert(ParamId::from("value"), ValueCell::number(7.0));
    rule.slots.push(EffectSlot::Effect(counter));

    // Toggle the controlling parameter away and back.
    let hidden = apply_patch(
        &rule,
        RulePatch::SetParam {
            node_id: NodeId::from("e9"),
            param: ParamId::from("mode"),
            value: ValueCell::string("reset"),
        },
    )
    .unwrap();
    let restored = apply_patch(
        &hidden,
        RulePatch::SetParam {
            node_id: NodeId::from("e9"),
            param: ParamId::from("mode"),
            value: ValueCell::string("set"),
        },
    )
    .unwrap();

    let stored = &restored.find_effect(&NodeId::from("e9")).unwrap().params;
    assert_eq!(stored.get(&ParamId::from("value")), Some(&ValueCell::number(7.0)));
}

// ============================================================================
// SECTION: Option Sources
// ============================================================================

#[test]
fn static_options_pass_through() {
    let registry = common::registry();
    let resolvers = common::resolvers();
    let definition = registry.condition_type(&"card_suit".into()).unwrap();
    let suit = definition.param(&ParamId::from("suit")).unwrap();

    let options =
        resolve_options(suit, &ParamValues::new(), &common::joker(), &resolvers).unwrap();
    let values: Vec<&str> =
        options.iter().map(|option| option.value.as_str().unwrap()).collect();
    assert_eq!(values, vec!["spades", "hearts", "wild"]);
}

#[test]
fn exempt_options_are_filtered_for_the_object_kind() {
    let registry = common::registry();
    let resolvers = common::resolvers();
    let definition = registry.condition_type(&"card_suit".into()).unwrap();
    let suit = definition.param(&ParamId::from("suit")).unwrap();

    let options =
        resolve_options(suit, &ParamValues::new(), &common::consumable(), &resolvers).unwrap();
    let values: Vec<&str> =
        options.iter().map(|option| option.value.as_str().unwrap()).collect();
    assert_eq!(values, vec!["spades", "hearts"]);
}

#[test]
fn computed_options_invoke_the_named_resolver() {
    let registry = common::registry();
    let resolvers = common::resolvers();
    let definition = registry.condition_type(&"poker_hand".into()).unwrap();
    let hand = definition.param(&ParamId::from("hand")).unwrap();

    let options =
        resolve_options(hand, &ParamValues::new(), &common::joker(), &resolvers).unwrap();
    let values: Vec<&str> =
        options.iter().map(|option| option.value.as_str().unwrap()).collect();
    assert_eq!(values, vec!["pair", "flush"]);
}

#[test]
fn derived_options_observe_sibling_values() {
    let registry = common::registry();
    let resolvers = common::resolvers();
    let definition = registry.condition_type(&"card_rank".into()).unwrap();
    let rank = definition.param(&ParamId::from("rank")).unwrap();

    let empty =
        resolve_options(rank, &ParamValues::new(), &common::joker(), &resolvers).unwrap();
    assert!(empty.is_empty());

    let mut siblings = ParamValues::new();
    siblings.insert(ParamId::from("suit"), ValueCell::string("spades"));
    let options = resolve_options(rank, &siblings, &common::joker(), &resolvers).unwrap();
    assert_eq!(options.len(), 2);
}

#[test]
fn resolution_is_idempotent_for_unchanged_siblings() {
    let registry = common::registry();
    let resolvers = common::resolvers();
    let definition = registry.condition_type(&"card_rank".into()).unwrap();
    let rank = definition.param(&ParamId::from("rank")).unwrap();

    let mut siblings = ParamValues::new();
    siblings.insert(ParamId::from("suit"), ValueCell::string("hearts"));
    let first = resolve_options(rank, &siblings, &common::joker(), &resolvers).unwrap();
    let second = resolve_options(rank, &siblings, &common::joker(), &resolvers).unwrap();
    assert_eq!(first, second);
}

// ============================================================================
// SECTION: Option Errors
// ============================================================================

#[test]
fn resolving_a_hidden_parameter_is_a_defined_error() {
    let registry = common::registry();
    let resolvers = common::resolvers();
    let definition = registry.effect_type(&"set_counter".into()).unwrap();
    let value = definition.param(&ParamId::from("value")).unwrap();

    let err =
        resolve_options(value, &ParamValues::new(), &common::joker(), &resolvers).unwrap_err();
    assert!(matches!(err, OptionError::HiddenParameter(_)));
}

#[test]
fn unknown_resolver_is_reported() {
    let registry = common::registry();
    let definition = registry.condition_type(&"poker_hand".into()).unwrap();
    let hand = definition.param(&ParamId::from("hand")).unwrap();

    // An empty resolver registry knows no names.
    let empty = rule_forge_core::ResolverRegistry::new();
    let err = resolve_options(hand, &ParamValues::new(), &common::joker(), &empty).unwrap_err();
    assert!(matches!(err, OptionError::UnknownResolver(name) if name == "poker_hands"));
}

#[test]
fn parameter_without_options_source_is_reported() {
    let registry = common::registry();
    let resolvers = common::resolvers();
    let definition = registry.effect_type(&"add_mult".into()).unwrap();
    let amount = definition.param(&ParamId::from("amount")).unwrap();
    assert_eq!(amount.kind, ParameterKind::Number);
    assert!(amount.options.is_none());

    let err =
        resolve_options(amount, &ParamValues::new(), &common::joker(), &resolvers).unwrap_err();
    assert!(matches!(err, OptionError::NoOptions(_)));
}
